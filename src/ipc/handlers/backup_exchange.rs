use crate::backup;
use crate::ipc::error::ok;
use crate::ipc::helpers::{get_optional_str, get_required_str, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::persist;
use serde_json::json;
use std::path::PathBuf;

fn resolve_workspace(state: &AppState, explicit: Option<String>) -> Result<PathBuf, HandlerErr> {
    if let Some(p) = explicit {
        return Ok(PathBuf::from(p));
    }
    state
        .workspace
        .clone()
        .ok_or_else(|| HandlerErr::new("no_workspace", "select a workspace first"))
}

fn export_bundle(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let workspace = resolve_workspace(state, get_optional_str(&req.params, "workspacePath")?)?;
    let out_path = PathBuf::from(get_required_str(&req.params, "outPath")?);
    let summary = backup::export_workspace_bundle(&workspace, &out_path)
        .map_err(|e| HandlerErr::new("io_failed", e.to_string()))?;
    Ok(json!({
        "bundleFormat": summary.bundle_format,
        "entryCount": summary.entry_count,
        "outPath": out_path.to_string_lossy(),
    }))
}

fn import_bundle(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let in_path = PathBuf::from(get_required_str(&req.params, "inPath")?);
    let workspace = resolve_workspace(state, get_optional_str(&req.params, "workspacePath")?)?;
    let summary = backup::import_workspace_bundle(&in_path, &workspace)
        .map_err(|e| HandlerErr::new("io_failed", e.to_string()))?;

    // An import into the open workspace replaces the live snapshot too.
    if state.workspace.as_deref() == Some(workspace.as_path()) {
        let db = persist::load_or_seed(&workspace)?;
        state.db = Some(db);
    }

    Ok(json!({
        "bundleFormatDetected": summary.bundle_format_detected,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "backup.exportWorkspaceBundle" => export_bundle(state, req),
        "backup.importWorkspaceBundle" => import_bundle(state, req),
        _ => return None,
    };
    Some(match result {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    })
}
