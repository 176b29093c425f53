use crate::ipc::error::ok;
use crate::ipc::helpers::{
    get_optional_i64, get_optional_str, get_required_i64, get_required_str, get_string_array,
    require_db, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::model::Database;
use crate::store::{Mutation, StudentPatch, SubjectPatch, TeacherPatch};
use serde_json::json;

fn patch_obj<'a>(params: &'a serde_json::Value) -> Result<&'a serde_json::Value, HandlerErr> {
    let patch = params
        .get("patch")
        .ok_or_else(|| HandlerErr::bad_params("missing patch"))?;
    if !patch.is_object() {
        return Err(HandlerErr::bad_params("patch must be an object"));
    }
    Ok(patch)
}

fn apply_and_commit(
    state: &mut AppState,
    mutation: Mutation,
) -> Result<Database, HandlerErr> {
    let next = require_db(state)?.apply(mutation)?;
    state.commit(next.clone())?;
    Ok(next)
}

fn students_register(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let p = &req.params;
    let mutation = Mutation::RegisterStudent {
        name: get_required_str(p, "name")?,
        email: get_required_str(p, "email")?,
        username: get_required_str(p, "username")?,
        password: get_required_str(p, "password")?,
        roll_number: get_required_str(p, "rollNumber")?,
        class_id: get_required_str(p, "classId")?,
    };
    let next = apply_and_commit(state, mutation)?;
    let id = next.students.last().map(|s| s.id.clone()).unwrap_or_default();
    Ok(json!({ "studentId": id }))
}

fn students_update(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let id = get_required_str(&req.params, "studentId")?;
    let patch = patch_obj(&req.params)?;
    let mutation = Mutation::EditStudent {
        id,
        patch: StudentPatch {
            name: get_optional_str(patch, "name")?,
            email: get_optional_str(patch, "email")?,
            username: get_optional_str(patch, "username")?,
            password: get_optional_str(patch, "password")?,
            roll_number: get_optional_str(patch, "rollNumber")?,
            class_id: get_optional_str(patch, "classId")?,
        },
    };
    apply_and_commit(state, mutation)?;
    Ok(json!({ "ok": true }))
}

fn students_delete(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let id = get_required_str(&req.params, "studentId")?;
    apply_and_commit(state, Mutation::DeleteStudent { id })?;
    Ok(json!({ "ok": true }))
}

fn students_list(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let db = require_db(state)?;
    let class_filter = get_optional_str(&req.params, "classId")?;
    let rows: Vec<serde_json::Value> = db
        .students
        .iter()
        .filter(|s| class_filter.as_deref().map(|c| s.class_id == c).unwrap_or(true))
        .map(|s| {
            json!({
                "id": s.id,
                "name": s.name,
                "email": s.email,
                "username": s.username,
                "rollNumber": s.roll_number,
                "classId": s.class_id,
            })
        })
        .collect();
    Ok(json!({ "students": rows }))
}

fn teachers_register(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let p = &req.params;
    let mutation = Mutation::RegisterTeacher {
        name: get_required_str(p, "name")?,
        email: get_required_str(p, "email")?,
        username: get_required_str(p, "username")?,
        password: get_required_str(p, "password")?,
    };
    let next = apply_and_commit(state, mutation)?;
    let id = next.teachers.last().map(|t| t.id.clone()).unwrap_or_default();
    Ok(json!({ "teacherId": id }))
}

fn teachers_update(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let id = get_required_str(&req.params, "teacherId")?;
    let patch = patch_obj(&req.params)?;
    let mutation = Mutation::EditTeacher {
        id,
        patch: TeacherPatch {
            name: get_optional_str(patch, "name")?,
            email: get_optional_str(patch, "email")?,
            username: get_optional_str(patch, "username")?,
            password: get_optional_str(patch, "password")?,
        },
    };
    apply_and_commit(state, mutation)?;
    Ok(json!({ "ok": true }))
}

fn teachers_delete(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let id = get_required_str(&req.params, "teacherId")?;
    apply_and_commit(state, Mutation::DeleteTeacher { id })?;
    Ok(json!({ "ok": true }))
}

fn teachers_list(state: &AppState, _req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let db = require_db(state)?;
    let rows: Vec<serde_json::Value> = db
        .teachers
        .iter()
        .map(|t| {
            json!({
                "id": t.id,
                "name": t.name,
                "email": t.email,
                "username": t.username,
                "subjectIds": t.subject_ids,
            })
        })
        .collect();
    Ok(json!({ "teachers": rows }))
}

fn teachers_assign_subjects(
    state: &mut AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let teacher_id = get_required_str(&req.params, "teacherId")?;
    let subject_ids = get_string_array(&req.params, "subjectIds")?;
    let next = apply_and_commit(
        state,
        Mutation::AssignSubjectsToTeacher {
            teacher_id: teacher_id.clone(),
            subject_ids,
        },
    )?;
    let assigned = next
        .teacher(&teacher_id)
        .map(|t| t.subject_ids.clone())
        .unwrap_or_default();
    Ok(json!({ "subjectIds": assigned }))
}

fn subjects_register(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let p = &req.params;
    let mutation = Mutation::RegisterSubject {
        name: get_required_str(p, "name")?,
        code: get_required_str(p, "code")?,
        max_marks: get_required_i64(p, "maxMarks")?,
    };
    let next = apply_and_commit(state, mutation)?;
    let id = next.subjects.last().map(|s| s.id.clone()).unwrap_or_default();
    Ok(json!({ "subjectId": id }))
}

fn subjects_update(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let id = get_required_str(&req.params, "subjectId")?;
    let patch = patch_obj(&req.params)?;
    let mutation = Mutation::EditSubject {
        id,
        patch: SubjectPatch {
            name: get_optional_str(patch, "name")?,
            code: get_optional_str(patch, "code")?,
            max_marks: get_optional_i64(patch, "maxMarks")?,
        },
    };
    apply_and_commit(state, mutation)?;
    Ok(json!({ "ok": true }))
}

fn subjects_delete(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let id = get_required_str(&req.params, "subjectId")?;
    apply_and_commit(state, Mutation::DeleteSubject { id })?;
    Ok(json!({ "ok": true }))
}

fn subjects_list(state: &AppState, _req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let db = require_db(state)?;
    let rows: Vec<serde_json::Value> = db
        .subjects
        .iter()
        .map(|s| {
            json!({
                "id": s.id,
                "name": s.name,
                "code": s.code,
                "maxMarks": s.max_marks,
            })
        })
        .collect();
    Ok(json!({ "subjects": rows }))
}

fn classes_create(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let name = get_required_str(&req.params, "name")?;
    let next = apply_and_commit(state, Mutation::RegisterClass { name })?;
    let id = next.classes.last().map(|c| c.id.clone()).unwrap_or_default();
    Ok(json!({ "classId": id }))
}

fn classes_update(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let id = get_required_str(&req.params, "classId")?;
    let name = get_required_str(&req.params, "name")?;
    apply_and_commit(state, Mutation::EditClass { id, name })?;
    Ok(json!({ "ok": true }))
}

fn classes_list(state: &AppState, _req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let db = require_db(state)?;
    let rows: Vec<serde_json::Value> = db
        .classes
        .iter()
        .map(|c| json!({ "id": c.id, "name": c.name }))
        .collect();
    Ok(json!({ "classes": rows }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "students.register" => students_register(state, req),
        "students.update" => students_update(state, req),
        "students.delete" => students_delete(state, req),
        "students.list" => students_list(state, req),
        "teachers.register" => teachers_register(state, req),
        "teachers.update" => teachers_update(state, req),
        "teachers.delete" => teachers_delete(state, req),
        "teachers.list" => teachers_list(state, req),
        "teachers.assignSubjects" => teachers_assign_subjects(state, req),
        "subjects.register" => subjects_register(state, req),
        "subjects.update" => subjects_update(state, req),
        "subjects.delete" => subjects_delete(state, req),
        "subjects.list" => subjects_list(state, req),
        "classes.create" => classes_create(state, req),
        "classes.update" => classes_update(state, req),
        "classes.list" => classes_list(state, req),
        _ => return None,
    };
    Some(match result {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    })
}
