use crate::ipc::error::ok;
use crate::ipc::helpers::{get_required_i64, get_required_str, require_db, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::model::Mark;
use serde_json::json;

fn mark_json(m: &Mark) -> serde_json::Value {
    json!({
        "studentId": m.student_id,
        "subjectId": m.subject_id,
        "theory": m.theory,
        "practical": m.practical,
        "total": m.total,
        "grade": m.grade,
        "status": m.status,
    })
}

/// Components are clamped to the subject's theory/practical split before
/// grading, so the stored row is echoed back rather than the raw input.
fn upsert(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_required_str(&req.params, "studentId")?;
    let subject_id = get_required_str(&req.params, "subjectId")?;
    let theory = get_required_i64(&req.params, "theory")?;
    let practical = get_required_i64(&req.params, "practical")?;

    let next = require_db(state)?.upsert_mark(&student_id, &subject_id, theory, practical)?;
    let stored = next
        .mark(&student_id, &subject_id)
        .map(mark_json)
        .unwrap_or(serde_json::Value::Null);
    state.commit(next)?;
    Ok(json!({ "mark": stored }))
}

fn list_for_student(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let db = require_db(state)?;
    let student_id = get_required_str(&req.params, "studentId")?;
    if db.student(&student_id).is_none() {
        return Err(HandlerErr::new("not_found", "student not found"));
    }
    let rows: Vec<serde_json::Value> = db
        .marks
        .iter()
        .filter(|m| m.student_id == student_id)
        .map(mark_json)
        .collect();
    Ok(json!({ "marks": rows }))
}

fn list_for_subject(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let db = require_db(state)?;
    let subject_id = get_required_str(&req.params, "subjectId")?;
    if db.subject(&subject_id).is_none() {
        return Err(HandlerErr::new("not_found", "subject not found"));
    }
    let rows: Vec<serde_json::Value> = db
        .marks
        .iter()
        .filter(|m| m.subject_id == subject_id)
        .map(mark_json)
        .collect();
    Ok(json!({ "marks": rows }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "marks.upsert" => upsert(state, req),
        "marks.listForStudent" => list_for_student(state, req),
        "marks.listForSubject" => list_for_subject(state, req),
        _ => return None,
    };
    Some(match result {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    })
}
