use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_eduresultd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn eduresultd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({ "id": id, "method": method, "params": params });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");
    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    serde_json::from_str(line.trim()).expect("parse response json")
}

fn expect_ok(value: &serde_json::Value) -> serde_json::Value {
    assert_eq!(
        value.get("ok").and_then(|v| v.as_bool()),
        Some(true),
        "expected ok response, got {}",
        value
    );
    value.get("result").expect("result").clone()
}

fn visibility(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
) -> bool {
    let resp = expect_ok(&request(stdin, reader, id, "results.visibility", json!({})));
    resp["visible"].as_bool().expect("visible flag")
}

#[test]
fn publication_gate_follows_override_and_schedule() {
    let workspace = temp_dir("eduresult-gate");
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    let sid = &mut stdin;
    let rdr = &mut reader;

    let _ = request(
        sid,
        rdr,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    // The seed publishes results; flip the override off first.
    assert!(visibility(sid, rdr, "2"));
    let _ = expect_ok(&request(
        sid,
        rdr,
        "3",
        "settings.setPublication",
        json!({ "published": false }),
    ));
    assert!(!visibility(sid, rdr, "4"));

    // A reached schedule opens the gate without touching the flag.
    let settings = expect_ok(&request(
        sid,
        rdr,
        "5",
        "settings.setSchedule",
        json!({ "when": "2000-01-01T00:00" }),
    ));
    assert_eq!(
        settings["settings"]["isResultsPublished"].as_bool(),
        Some(false)
    );
    assert!(visibility(sid, rdr, "6"));

    // A future schedule keeps it shut.
    let _ = expect_ok(&request(
        sid,
        rdr,
        "7",
        "settings.setSchedule",
        json!({ "when": "2999-01-01T00:00" }),
    ));
    assert!(!visibility(sid, rdr, "8"));

    // Clearing the schedule leaves only the override in play.
    let settings = expect_ok(&request(
        sid,
        rdr,
        "9",
        "settings.setSchedule",
        json!({ "when": null }),
    ));
    assert!(settings["settings"]["scheduledPublication"].is_null());
    assert!(!visibility(sid, rdr, "10"));

    // Garbage never reaches the stored settings.
    let bad = request(
        sid,
        rdr,
        "11",
        "settings.setSchedule",
        json!({ "when": "next tuesday" }),
    );
    assert_eq!(bad["ok"].as_bool(), Some(false));
    assert_eq!(bad["error"]["code"].as_str(), Some("invalid_range"));
    let current = expect_ok(&request(sid, rdr, "12", "settings.get", json!({})));
    assert!(current["settings"]["scheduledPublication"].is_null());

    let _ = expect_ok(&request(
        sid,
        rdr,
        "13",
        "settings.setPublication",
        json!({ "published": true }),
    ));
    assert!(visibility(sid, rdr, "14"));

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}
