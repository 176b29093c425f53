use crate::ipc::error::ok;
use crate::ipc::helpers::{get_required_i64, get_required_str, require_db, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::model::Attendance;
use serde_json::json;

fn attendance_json(a: &Attendance) -> serde_json::Value {
    json!({
        "studentId": a.student_id,
        "classId": a.class_id,
        "subjectId": a.subject_id,
        "workingDays": a.working_days,
        "presentDays": a.present_days,
        "percentage": a.percentage,
    })
}

fn upsert(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_required_str(&req.params, "studentId")?;
    let subject_id = get_required_str(&req.params, "subjectId")?;
    let working_days = get_required_i64(&req.params, "workingDays")?;
    let present_days = get_required_i64(&req.params, "presentDays")?;

    let next = require_db(state)?.upsert_attendance(
        &student_id,
        &subject_id,
        working_days,
        present_days,
    )?;
    let stored = next
        .attendance_row(&student_id, &subject_id)
        .map(attendance_json)
        .unwrap_or(serde_json::Value::Null);
    state.commit(next)?;
    Ok(json!({ "attendance": stored }))
}

fn list_for_student(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let db = require_db(state)?;
    let student_id = get_required_str(&req.params, "studentId")?;
    if db.student(&student_id).is_none() {
        return Err(HandlerErr::new("not_found", "student not found"));
    }
    let rows: Vec<serde_json::Value> = db
        .attendance
        .iter()
        .filter(|a| a.student_id == student_id)
        .map(attendance_json)
        .collect();
    Ok(json!({ "attendance": rows }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "attendance.upsert" => upsert(state, req),
        "attendance.listForStudent" => list_for_student(state, req),
        _ => return None,
    };
    Some(match result {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    })
}
