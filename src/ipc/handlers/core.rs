use crate::ipc::error::ok;
use crate::ipc::helpers::{get_required_str, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::persist;
use serde_json::json;
use std::path::PathBuf;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string())
        }),
    )
}

fn workspace_select(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let path = PathBuf::from(get_required_str(&req.params, "path")?);
    let db = persist::load_or_seed(&path)?;
    let counts = json!({
        "students": db.students.len(),
        "teachers": db.teachers.len(),
        "subjects": db.subjects.len(),
        "classes": db.classes.len(),
    });
    state.workspace = Some(path.clone());
    state.db = Some(db);
    Ok(json!({
        "workspacePath": path.to_string_lossy(),
        "counts": counts,
    }))
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    match workspace_select(state, req) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        _ => None,
    }
}
