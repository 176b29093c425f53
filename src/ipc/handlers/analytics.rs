use crate::analytics;
use crate::ipc::error::ok;
use crate::ipc::helpers::{get_optional_str, get_required_str, require_db, HandlerErr};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, HandlerErr> {
    serde_json::to_value(value).map_err(|e| HandlerErr::new("io_failed", e.to_string()))
}

fn at_risk(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let db = require_db(state)?;
    let class_id = get_required_str(&req.params, "classId")?;
    let subject_id = get_required_str(&req.params, "subjectId")?;
    if db.class(&class_id).is_none() {
        return Err(HandlerErr::new("not_found", "class not found"));
    }
    if db.subject(&subject_id).is_none() {
        return Err(HandlerErr::new("not_found", "subject not found"));
    }
    let rows = analytics::at_risk(db, &class_id, &subject_id);
    Ok(json!({ "atRisk": to_json(&rows)? }))
}

fn grade_distribution(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let db = require_db(state)?;
    let subject_id = get_required_str(&req.params, "subjectId")?;
    if db.subject(&subject_id).is_none() {
        return Err(HandlerErr::new("not_found", "subject not found"));
    }
    let buckets = analytics::grade_distribution(db, &subject_id);
    Ok(json!({ "distribution": to_json(&buckets)? }))
}

fn benchmark(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let db = require_db(state)?;
    let student_id = get_required_str(&req.params, "studentId")?;
    if db.student(&student_id).is_none() {
        return Err(HandlerErr::new("not_found", "student not found"));
    }
    let points = analytics::class_benchmark(db, &student_id);
    Ok(json!({ "benchmark": to_json(&points)? }))
}

fn student_summary(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let db = require_db(state)?;
    let student_id = get_required_str(&req.params, "studentId")?;
    let summary = analytics::student_summary(db, &student_id)
        .ok_or_else(|| HandlerErr::new("not_found", "student not found"))?;
    Ok(json!({ "summary": to_json(&summary)? }))
}

fn merit_badges(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let db = require_db(state)?;
    let student_id = get_required_str(&req.params, "studentId")?;
    if db.student(&student_id).is_none() {
        return Err(HandlerErr::new("not_found", "student not found"));
    }
    let designated = get_optional_str(&req.params, "designatedSubject")?
        .unwrap_or_else(|| "Mathematics".to_string());
    let cluster = match req.params.get("clusterSubjects") {
        None => vec!["Physics".to_string(), "Computer Science".to_string()],
        Some(v) => {
            let Some(arr) = v.as_array() else {
                return Err(HandlerErr::bad_params(
                    "clusterSubjects must be an array of strings",
                ));
            };
            arr.iter()
                .map(|s| {
                    s.as_str().map(|s| s.to_string()).ok_or_else(|| {
                        HandlerErr::bad_params("clusterSubjects must contain only strings")
                    })
                })
                .collect::<Result<Vec<_>, _>>()?
        }
    };
    let badges = analytics::merit_badges(db, &student_id, &designated, &cluster);
    Ok(json!({ "badges": to_json(&badges)? }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "analytics.atRisk" => at_risk(state, req),
        "analytics.gradeDistribution" => grade_distribution(state, req),
        "analytics.benchmark" => benchmark(state, req),
        "analytics.studentSummary" => student_summary(state, req),
        "analytics.meritBadges" => merit_badges(state, req),
        _ => return None,
    };
    Some(match result {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    })
}
