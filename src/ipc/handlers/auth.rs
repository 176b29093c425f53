use crate::ipc::error::ok;
use crate::ipc::helpers::{get_required_str, require_db, HandlerErr};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

/// Exact-match username lookup. Passwords are neither checked nor
/// returned; hardening the login is out of scope for this store.
fn login(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let db = require_db(state)?;
    let username = get_required_str(&req.params, "username")?;
    let user = db
        .find_user_by_username(&username)
        .ok_or_else(|| HandlerErr::new("not_found", "unknown username"))?;
    Ok(json!({
        "user": {
            "id": user.id,
            "name": user.name,
            "role": user.role,
            "email": user.email,
            "username": user.username,
        }
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "auth.login" => Some(match login(state, req) {
            Ok(result) => ok(&req.id, result),
            Err(error) => error.response(&req.id),
        }),
        _ => None,
    }
}
