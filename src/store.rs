use crate::grading;
use crate::model::{Attendance, Class, Database, Mark, Student, Subject, Teacher};
use crate::publish;
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("username '{username}' is already assigned")]
    DuplicateUsername { username: String },
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("{field}: {message}")]
    InvalidRange { field: &'static str, message: String },
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::DuplicateUsername { .. } => "duplicate_username",
            StoreError::NotFound { .. } => "not_found",
            StoreError::InvalidRange { .. } => "invalid_range",
        }
    }

    fn not_found(entity: &'static str, id: &str) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// Partial update for a student. `None` keeps the stored value; a `None`
/// or empty password keeps the stored credential.
#[derive(Debug, Clone, Default)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub roll_number: Option<String>,
    pub class_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TeacherPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SubjectPatch {
    pub name: Option<String>,
    pub code: Option<String>,
    pub max_marks: Option<i64>,
}

/// The closed set of store operations. Every mutation of the snapshot goes
/// through [`Database::apply`], so a new operation kind is a new variant
/// here, checked exhaustively at compile time.
#[derive(Debug, Clone)]
pub enum Mutation {
    RegisterStudent {
        name: String,
        email: String,
        username: String,
        password: String,
        roll_number: String,
        class_id: String,
    },
    EditStudent {
        id: String,
        patch: StudentPatch,
    },
    DeleteStudent {
        id: String,
    },
    RegisterTeacher {
        name: String,
        email: String,
        username: String,
        password: String,
    },
    EditTeacher {
        id: String,
        patch: TeacherPatch,
    },
    DeleteTeacher {
        id: String,
    },
    RegisterSubject {
        name: String,
        code: String,
        max_marks: i64,
    },
    EditSubject {
        id: String,
        patch: SubjectPatch,
    },
    DeleteSubject {
        id: String,
    },
    AssignSubjectsToTeacher {
        teacher_id: String,
        subject_ids: Vec<String>,
    },
    UpsertMark {
        student_id: String,
        subject_id: String,
        theory: i64,
        practical: i64,
    },
    UpsertAttendance {
        student_id: String,
        subject_id: String,
        working_days: i64,
        present_days: i64,
    },
    RegisterClass {
        name: String,
    },
    EditClass {
        id: String,
        name: String,
    },
    SetPublicationOverride(bool),
    SetScheduledPublication(Option<String>),
}

fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

fn clamp(value: i64, limit: i64) -> i64 {
    value.clamp(0, limit.max(0))
}

fn graded_mark(student_id: &str, subject: &Subject, theory: i64, practical: i64) -> Mark {
    let theory = clamp(theory, grading::theory_limit(subject.max_marks));
    let practical = clamp(practical, grading::practical_limit(subject.max_marks));
    let result = grading::grade(theory, practical, subject.max_marks);
    Mark {
        student_id: student_id.to_string(),
        subject_id: subject.id.clone(),
        theory,
        practical,
        total: result.total,
        grade: result.grade.to_string(),
        status: result.status,
    }
}

fn attendance_percentage(working_days: i64, present_days: i64) -> f64 {
    if working_days > 0 {
        present_days as f64 / working_days as f64 * 100.0
    } else {
        0.0
    }
}

impl Database {
    /// Apply one mutation, producing a whole new snapshot. Every operation
    /// validates before it writes, so a returned error always leaves the
    /// caller holding the old snapshot untouched.
    pub fn apply(&self, mutation: Mutation) -> Result<Database, StoreError> {
        match mutation {
            Mutation::RegisterStudent {
                name,
                email,
                username,
                password,
                roll_number,
                class_id,
            } => self.register_student(name, email, username, password, roll_number, class_id),
            Mutation::EditStudent { id, patch } => self.edit_student(&id, patch),
            Mutation::DeleteStudent { id } => self.delete_student(&id),
            Mutation::RegisterTeacher {
                name,
                email,
                username,
                password,
            } => self.register_teacher(name, email, username, password),
            Mutation::EditTeacher { id, patch } => self.edit_teacher(&id, patch),
            Mutation::DeleteTeacher { id } => self.delete_teacher(&id),
            Mutation::RegisterSubject {
                name,
                code,
                max_marks,
            } => self.register_subject(name, code, max_marks),
            Mutation::EditSubject { id, patch } => self.edit_subject(&id, patch),
            Mutation::DeleteSubject { id } => self.delete_subject(&id),
            Mutation::AssignSubjectsToTeacher {
                teacher_id,
                subject_ids,
            } => self.assign_subjects_to_teacher(&teacher_id, subject_ids),
            Mutation::UpsertMark {
                student_id,
                subject_id,
                theory,
                practical,
            } => self.upsert_mark(&student_id, &subject_id, theory, practical),
            Mutation::UpsertAttendance {
                student_id,
                subject_id,
                working_days,
                present_days,
            } => self.upsert_attendance(&student_id, &subject_id, working_days, present_days),
            Mutation::RegisterClass { name } => Ok(self.register_class(name)),
            Mutation::EditClass { id, name } => self.edit_class(&id, name),
            Mutation::SetPublicationOverride(published) => {
                Ok(self.set_publication_override(published))
            }
            Mutation::SetScheduledPublication(when) => self.set_scheduled_publication(when),
        }
    }

    pub fn register_student(
        &self,
        name: String,
        email: String,
        username: String,
        password: String,
        roll_number: String,
        class_id: String,
    ) -> Result<Database, StoreError> {
        if self.username_taken(&username, None) {
            return Err(StoreError::DuplicateUsername { username });
        }
        if self.class(&class_id).is_none() {
            return Err(StoreError::not_found("class", &class_id));
        }
        let mut next = self.clone();
        next.students.push(Student {
            id: fresh_id(),
            name,
            email,
            username,
            password: Some(password),
            class_id,
            roll_number,
        });
        Ok(next)
    }

    pub fn edit_student(&self, id: &str, patch: StudentPatch) -> Result<Database, StoreError> {
        let idx = self
            .students
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| StoreError::not_found("student", id))?;
        if let Some(username) = &patch.username {
            if self.username_taken(username, Some(id)) {
                return Err(StoreError::DuplicateUsername {
                    username: username.clone(),
                });
            }
        }
        if let Some(class_id) = &patch.class_id {
            if self.class(class_id).is_none() {
                return Err(StoreError::not_found("class", class_id));
            }
        }
        let mut next = self.clone();
        let s = &mut next.students[idx];
        if let Some(name) = patch.name {
            s.name = name;
        }
        if let Some(email) = patch.email {
            s.email = email;
        }
        if let Some(username) = patch.username {
            s.username = username;
        }
        if let Some(roll_number) = patch.roll_number {
            s.roll_number = roll_number;
        }
        if let Some(class_id) = patch.class_id {
            s.class_id = class_id;
        }
        match patch.password {
            Some(p) if !p.is_empty() => s.password = Some(p),
            _ => {}
        }
        Ok(next)
    }

    pub fn delete_student(&self, id: &str) -> Result<Database, StoreError> {
        if self.student(id).is_none() {
            return Err(StoreError::not_found("student", id));
        }
        let mut next = self.clone();
        next.students.retain(|s| s.id != id);
        next.marks.retain(|m| m.student_id != id);
        next.attendance.retain(|a| a.student_id != id);
        Ok(next)
    }

    pub fn register_teacher(
        &self,
        name: String,
        email: String,
        username: String,
        password: String,
    ) -> Result<Database, StoreError> {
        if self.username_taken(&username, None) {
            return Err(StoreError::DuplicateUsername { username });
        }
        let mut next = self.clone();
        next.teachers.push(Teacher {
            id: fresh_id(),
            name,
            email,
            username,
            password: Some(password),
            subject_ids: Vec::new(),
        });
        Ok(next)
    }

    pub fn edit_teacher(&self, id: &str, patch: TeacherPatch) -> Result<Database, StoreError> {
        let idx = self
            .teachers
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| StoreError::not_found("teacher", id))?;
        if let Some(username) = &patch.username {
            if self.username_taken(username, Some(id)) {
                return Err(StoreError::DuplicateUsername {
                    username: username.clone(),
                });
            }
        }
        let mut next = self.clone();
        let t = &mut next.teachers[idx];
        if let Some(name) = patch.name {
            t.name = name;
        }
        if let Some(email) = patch.email {
            t.email = email;
        }
        if let Some(username) = patch.username {
            t.username = username;
        }
        match patch.password {
            Some(p) if !p.is_empty() => t.password = Some(p),
            _ => {}
        }
        Ok(next)
    }

    pub fn delete_teacher(&self, id: &str) -> Result<Database, StoreError> {
        if self.teacher(id).is_none() {
            return Err(StoreError::not_found("teacher", id));
        }
        let mut next = self.clone();
        next.teachers.retain(|t| t.id != id);
        Ok(next)
    }

    pub fn register_subject(
        &self,
        name: String,
        code: String,
        max_marks: i64,
    ) -> Result<Database, StoreError> {
        if max_marks <= 0 {
            return Err(StoreError::InvalidRange {
                field: "maxMarks",
                message: format!("must be a positive integer, got {}", max_marks),
            });
        }
        // Code uniqueness is deliberately not enforced.
        let mut next = self.clone();
        next.subjects.push(Subject {
            id: fresh_id(),
            name,
            code,
            max_marks,
        });
        Ok(next)
    }

    pub fn edit_subject(&self, id: &str, patch: SubjectPatch) -> Result<Database, StoreError> {
        let idx = self
            .subjects
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| StoreError::not_found("subject", id))?;
        if let Some(max_marks) = patch.max_marks {
            if max_marks <= 0 {
                return Err(StoreError::InvalidRange {
                    field: "maxMarks",
                    message: format!("must be a positive integer, got {}", max_marks),
                });
            }
        }
        let mut next = self.clone();
        let regrade = patch.max_marks.is_some();
        {
            let s = &mut next.subjects[idx];
            if let Some(name) = patch.name {
                s.name = name;
            }
            if let Some(code) = patch.code {
                s.code = code;
            }
            if let Some(max_marks) = patch.max_marks {
                s.max_marks = max_marks;
            }
        }
        if regrade {
            // A changed maximum moves the component ceilings and every
            // derived grade, so existing marks are re-clamped and regraded.
            let subject = next.subjects[idx].clone();
            for m in next.marks.iter_mut() {
                if m.subject_id == subject.id {
                    let regraded = graded_mark(&m.student_id, &subject, m.theory, m.practical);
                    *m = regraded;
                }
            }
        }
        Ok(next)
    }

    pub fn delete_subject(&self, id: &str) -> Result<Database, StoreError> {
        if self.subject(id).is_none() {
            return Err(StoreError::not_found("subject", id));
        }
        let mut next = self.clone();
        next.subjects.retain(|s| s.id != id);
        next.marks.retain(|m| m.subject_id != id);
        next.attendance.retain(|a| a.subject_id != id);
        for t in next.teachers.iter_mut() {
            t.subject_ids.retain(|sid| sid != id);
        }
        Ok(next)
    }

    pub fn assign_subjects_to_teacher(
        &self,
        teacher_id: &str,
        subject_ids: Vec<String>,
    ) -> Result<Database, StoreError> {
        let idx = self
            .teachers
            .iter()
            .position(|t| t.id == teacher_id)
            .ok_or_else(|| StoreError::not_found("teacher", teacher_id))?;
        let mut seen = HashSet::new();
        let mut assigned = Vec::new();
        for sid in subject_ids {
            if self.subject(&sid).is_none() {
                return Err(StoreError::not_found("subject", &sid));
            }
            if seen.insert(sid.clone()) {
                assigned.push(sid);
            }
        }
        let mut next = self.clone();
        next.teachers[idx].subject_ids = assigned;
        Ok(next)
    }

    pub fn upsert_mark(
        &self,
        student_id: &str,
        subject_id: &str,
        theory: i64,
        practical: i64,
    ) -> Result<Database, StoreError> {
        if self.student(student_id).is_none() {
            return Err(StoreError::not_found("student", student_id));
        }
        let subject = self
            .subject(subject_id)
            .ok_or_else(|| StoreError::not_found("subject", subject_id))?
            .clone();
        let entry = graded_mark(student_id, &subject, theory, practical);
        let mut next = self.clone();
        match next
            .marks
            .iter()
            .position(|m| m.student_id == student_id && m.subject_id == subject_id)
        {
            Some(i) => next.marks[i] = entry,
            None => next.marks.push(entry),
        }
        Ok(next)
    }

    pub fn upsert_attendance(
        &self,
        student_id: &str,
        subject_id: &str,
        working_days: i64,
        present_days: i64,
    ) -> Result<Database, StoreError> {
        let student = self
            .student(student_id)
            .ok_or_else(|| StoreError::not_found("student", student_id))?;
        if self.subject(subject_id).is_none() {
            return Err(StoreError::not_found("subject", subject_id));
        }
        if working_days < 0 {
            return Err(StoreError::InvalidRange {
                field: "workingDays",
                message: format!("must not be negative, got {}", working_days),
            });
        }
        if present_days < 0 {
            return Err(StoreError::InvalidRange {
                field: "presentDays",
                message: format!("must not be negative, got {}", present_days),
            });
        }
        let present_days = present_days.min(working_days);
        let entry = Attendance {
            student_id: student_id.to_string(),
            class_id: student.class_id.clone(),
            subject_id: subject_id.to_string(),
            working_days,
            present_days,
            percentage: attendance_percentage(working_days, present_days),
        };
        let mut next = self.clone();
        match next
            .attendance
            .iter()
            .position(|a| a.student_id == student_id && a.subject_id == subject_id)
        {
            Some(i) => next.attendance[i] = entry,
            None => next.attendance.push(entry),
        }
        Ok(next)
    }

    pub fn register_class(&self, name: String) -> Database {
        let mut next = self.clone();
        next.classes.push(Class {
            id: fresh_id(),
            name,
        });
        next
    }

    pub fn edit_class(&self, id: &str, name: String) -> Result<Database, StoreError> {
        let idx = self
            .classes
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StoreError::not_found("class", id))?;
        let mut next = self.clone();
        next.classes[idx].name = name;
        Ok(next)
    }

    pub fn set_publication_override(&self, published: bool) -> Database {
        let mut next = self.clone();
        next.settings.is_results_published = published;
        next
    }

    pub fn set_scheduled_publication(
        &self,
        when: Option<String>,
    ) -> Result<Database, StoreError> {
        if let Some(raw) = &when {
            if publish::parse_schedule(raw).is_none() {
                return Err(StoreError::InvalidRange {
                    field: "scheduledPublication",
                    message: format!("'{}' is not an ISO local datetime", raw),
                });
            }
        }
        let mut next = self.clone();
        next.settings.scheduled_publication = when;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MarkStatus;

    fn base() -> Database {
        let db = Database::default().register_class("Grade 10-A".to_string());
        let class_id = db.classes[0].id.clone();
        let db = db
            .register_subject("Mathematics".to_string(), "MATH101".to_string(), 100)
            .unwrap();
        let db = db
            .register_student(
                "Alice Johnson".to_string(),
                "alice@edu.com".to_string(),
                "2024001".to_string(),
                "password123".to_string(),
                "2024001".to_string(),
                class_id,
            )
            .unwrap();
        db.register_teacher(
            "John Smith".to_string(),
            "john@edu.com".to_string(),
            "teacher1".to_string(),
            "password123".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn duplicate_username_is_rejected_case_insensitively() {
        let db = base();
        let before = db.clone();
        let err = db
            .register_teacher(
                "Imposter".to_string(),
                "x@edu.com".to_string(),
                "TEACHER1".to_string(),
                "pw".to_string(),
            )
            .unwrap_err();
        assert_eq!(err.code(), "duplicate_username");
        // Rejection leaves the snapshot untouched.
        assert_eq!(db, before);
    }

    #[test]
    fn student_username_collides_with_teacher_username() {
        let db = base();
        let class_id = db.classes[0].id.clone();
        let err = db
            .register_student(
                "Bob".to_string(),
                "bob@edu.com".to_string(),
                "teacher1".to_string(),
                "pw".to_string(),
                "2024002".to_string(),
                class_id,
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateUsername { .. }));
    }

    #[test]
    fn edit_keeps_own_username_but_rejects_anothers() {
        let db = base();
        let teacher_id = db.teachers[0].id.clone();
        // Re-submitting the same username for the same record is fine.
        let patch = TeacherPatch {
            username: Some("teacher1".to_string()),
            ..TeacherPatch::default()
        };
        db.edit_teacher(&teacher_id, patch).unwrap();

        let patch = TeacherPatch {
            username: Some("2024001".to_string()),
            ..TeacherPatch::default()
        };
        let err = db.edit_teacher(&teacher_id, patch).unwrap_err();
        assert_eq!(err.code(), "duplicate_username");
    }

    #[test]
    fn empty_password_keeps_stored_credential() {
        let db = base();
        let student_id = db.students[0].id.clone();
        let patch = StudentPatch {
            name: Some("Alice J.".to_string()),
            password: Some(String::new()),
            ..StudentPatch::default()
        };
        let next = db.edit_student(&student_id, patch).unwrap();
        assert_eq!(next.students[0].name, "Alice J.");
        assert_eq!(next.students[0].password.as_deref(), Some("password123"));

        let patch = StudentPatch {
            password: Some("newsecret".to_string()),
            ..StudentPatch::default()
        };
        let next = next.edit_student(&student_id, patch).unwrap();
        assert_eq!(next.students[0].password.as_deref(), Some("newsecret"));
    }

    #[test]
    fn register_student_requires_existing_class() {
        let db = base();
        let err = db
            .register_student(
                "Bob".to_string(),
                "bob@edu.com".to_string(),
                "2024002".to_string(),
                "pw".to_string(),
                "2024002".to_string(),
                "no-such-class".to_string(),
            )
            .unwrap_err();
        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn deleting_student_cascades_to_marks_and_attendance() {
        let db = base();
        let student_id = db.students[0].id.clone();
        let subject_id = db.subjects[0].id.clone();
        let db = db.upsert_mark(&student_id, &subject_id, 50, 20).unwrap();
        let db = db
            .upsert_attendance(&student_id, &subject_id, 100, 92)
            .unwrap();
        let marks_for_student = db
            .marks
            .iter()
            .filter(|m| m.student_id == student_id)
            .count();
        let before_marks = db.marks.len();

        let next = db.delete_student(&student_id).unwrap();
        assert!(next.student(&student_id).is_none());
        assert!(next.users().iter().all(|u| u.id != student_id));
        assert_eq!(next.marks.len(), before_marks - marks_for_student);
        assert!(next.attendance.iter().all(|a| a.student_id != student_id));
    }

    #[test]
    fn deleting_subject_cascades_everywhere() {
        let db = base();
        let student_id = db.students[0].id.clone();
        let teacher_id = db.teachers[0].id.clone();
        let subject_id = db.subjects[0].id.clone();
        let db = db
            .assign_subjects_to_teacher(&teacher_id, vec![subject_id.clone()])
            .unwrap();
        let db = db.upsert_mark(&student_id, &subject_id, 50, 20).unwrap();
        let db = db
            .upsert_attendance(&student_id, &subject_id, 100, 80)
            .unwrap();

        let next = db.delete_subject(&subject_id).unwrap();
        assert!(next.subject(&subject_id).is_none());
        assert!(next.marks.iter().all(|m| m.subject_id != subject_id));
        assert!(next.attendance.iter().all(|a| a.subject_id != subject_id));
        for t in &next.teachers {
            assert!(!t.subject_ids.contains(&subject_id));
        }
    }

    #[test]
    fn delete_missing_record_reports_not_found() {
        let db = base();
        assert_eq!(db.delete_student("nope").unwrap_err().code(), "not_found");
        assert_eq!(db.delete_teacher("nope").unwrap_err().code(), "not_found");
        assert_eq!(db.delete_subject("nope").unwrap_err().code(), "not_found");
    }

    #[test]
    fn upsert_mark_clamps_components_to_split_limits() {
        let db = base();
        let student_id = db.students[0].id.clone();
        let subject_id = db.subjects[0].id.clone();
        // theory 90 against maxMarks 100 clamps to round(100*0.7) = 70.
        let next = db.upsert_mark(&student_id, &subject_id, 90, 20).unwrap();
        let m = next.mark(&student_id, &subject_id).unwrap();
        assert_eq!(m.theory, 70);
        assert_eq!(m.practical, 20);
        assert_eq!(m.total, 90);
        assert_eq!(m.grade, "A+");
        assert_eq!(m.status, MarkStatus::Pass);

        // Negative components clamp to zero rather than failing.
        let next = next.upsert_mark(&student_id, &subject_id, -5, 31).unwrap();
        let m = next.mark(&student_id, &subject_id).unwrap();
        assert_eq!(m.theory, 0);
        assert_eq!(m.practical, 30);
    }

    #[test]
    fn upsert_mark_replaces_existing_pair() {
        let db = base();
        let student_id = db.students[0].id.clone();
        let subject_id = db.subjects[0].id.clone();
        let db = db.upsert_mark(&student_id, &subject_id, 40, 10).unwrap();
        let db = db.upsert_mark(&student_id, &subject_id, 60, 25).unwrap();
        assert_eq!(db.marks.len(), 1);
        let m = db.mark(&student_id, &subject_id).unwrap();
        assert_eq!(m.total, 85);
        assert_eq!(m.grade, "A");
    }

    #[test]
    fn editing_max_marks_reclamps_and_regrades() {
        let db = base();
        let student_id = db.students[0].id.clone();
        let subject_id = db.subjects[0].id.clone();
        let db = db.upsert_mark(&student_id, &subject_id, 70, 30).unwrap();

        let patch = SubjectPatch {
            max_marks: Some(50),
            ..SubjectPatch::default()
        };
        let next = db.edit_subject(&subject_id, patch).unwrap();
        let m = next.mark(&student_id, &subject_id).unwrap();
        assert_eq!(m.theory, 35);
        assert_eq!(m.practical, 15);
        assert_eq!(m.total, 50);
        assert_eq!(m.grade, "A+");
    }

    #[test]
    fn register_subject_rejects_non_positive_max_marks() {
        let db = base();
        let err = db
            .register_subject("Broken".to_string(), "X0".to_string(), 0)
            .unwrap_err();
        assert_eq!(err.code(), "invalid_range");
    }

    #[test]
    fn subject_code_is_not_unique() {
        let db = base();
        let next = db
            .register_subject("Mathematics II".to_string(), "MATH101".to_string(), 100)
            .unwrap();
        assert_eq!(
            next.subjects
                .iter()
                .filter(|s| s.code == "MATH101")
                .count(),
            2
        );
    }

    #[test]
    fn assign_subjects_validates_and_dedupes() {
        let db = base();
        let teacher_id = db.teachers[0].id.clone();
        let subject_id = db.subjects[0].id.clone();

        let err = db
            .assign_subjects_to_teacher(&teacher_id, vec!["ghost".to_string()])
            .unwrap_err();
        assert_eq!(err.code(), "not_found");
        assert!(db.teachers[0].subject_ids.is_empty());

        let next = db
            .assign_subjects_to_teacher(
                &teacher_id,
                vec![subject_id.clone(), subject_id.clone()],
            )
            .unwrap();
        assert_eq!(next.teachers[0].subject_ids, vec![subject_id]);
    }

    #[test]
    fn attendance_derives_percentage_and_clamps_present_days() {
        let db = base();
        let student_id = db.students[0].id.clone();
        let subject_id = db.subjects[0].id.clone();
        let class_id = db.students[0].class_id.clone();

        let next = db
            .upsert_attendance(&student_id, &subject_id, 90, 95)
            .unwrap();
        let a = next.attendance_row(&student_id, &subject_id).unwrap();
        assert_eq!(a.present_days, 90);
        assert_eq!(a.percentage, 100.0);
        assert_eq!(a.class_id, class_id);

        let next = next
            .upsert_attendance(&student_id, &subject_id, 0, 0)
            .unwrap();
        let a = next.attendance_row(&student_id, &subject_id).unwrap();
        assert_eq!(a.percentage, 0.0);
        assert_eq!(next.attendance.len(), 1);
    }

    #[test]
    fn scheduled_publication_accepts_iso_local_and_rejects_garbage() {
        let db = base();
        let next = db
            .set_scheduled_publication(Some("2026-09-01T08:00".to_string()))
            .unwrap();
        assert_eq!(
            next.settings.scheduled_publication.as_deref(),
            Some("2026-09-01T08:00")
        );
        let next = next.set_scheduled_publication(None).unwrap();
        assert!(next.settings.scheduled_publication.is_none());

        let err = db
            .set_scheduled_publication(Some("next tuesday".to_string()))
            .unwrap_err();
        assert_eq!(err.code(), "invalid_range");
    }
}
