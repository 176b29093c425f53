use crate::ipc::error::ok;
use crate::ipc::helpers::{get_required_bool, require_db, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::publish;
use crate::store::Mutation;
use serde_json::json;

fn settings_json(settings: &crate::model::Settings) -> serde_json::Value {
    json!({
        "isResultsPublished": settings.is_results_published,
        "scheduledPublication": settings.scheduled_publication,
    })
}

fn get(state: &AppState, _req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let db = require_db(state)?;
    Ok(json!({ "settings": settings_json(&db.settings) }))
}

fn set_publication(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let published = get_required_bool(&req.params, "published")?;
    let next = require_db(state)?.apply(Mutation::SetPublicationOverride(published))?;
    let settings = settings_json(&next.settings);
    state.commit(next)?;
    Ok(json!({ "settings": settings }))
}

fn set_schedule(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let when = match req.params.get("when") {
        None => None,
        Some(v) if v.is_null() => None,
        Some(v) => match v.as_str() {
            Some(s) if s.trim().is_empty() => None,
            Some(s) => Some(s.to_string()),
            None => return Err(HandlerErr::bad_params("when must be string or null")),
        },
    };
    let next = require_db(state)?.apply(Mutation::SetScheduledPublication(when))?;
    let settings = settings_json(&next.settings);
    state.commit(next)?;
    Ok(json!({ "settings": settings }))
}

/// The gate check at the daemon's wall clock. The schedule activates
/// lazily here; the stored flag is only ever changed by an admin action.
fn visibility(state: &AppState, _req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let db = require_db(state)?;
    let now = chrono::Local::now().naive_local();
    Ok(json!({
        "visible": publish::is_visible_now(&db.settings, now),
        "settings": settings_json(&db.settings),
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "settings.get" => get(state, req),
        "settings.setPublication" => set_publication(state, req),
        "settings.setSchedule" => set_schedule(state, req),
        "results.visibility" => visibility(state, req),
        _ => return None,
    };
    Some(match result {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    })
}
