use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "TEACHER")]
    Teacher,
    #[serde(rename = "STUDENT")]
    Student,
}

/// One row of the user projection. Admins are stored as-is; student and
/// teacher rows are projected from their full records on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub class_id: String,
    pub roll_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: String,
    pub name: String,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub subject_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub code: String,
    pub max_marks: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkStatus {
    #[serde(rename = "PASS")]
    Pass,
    #[serde(rename = "FAIL")]
    Fail,
}

/// Keyed by (student_id, subject_id); at most one row per pair.
/// `total`, `grade` and `status` are derived on every write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mark {
    pub student_id: String,
    pub subject_id: String,
    pub theory: i64,
    pub practical: i64,
    pub total: i64,
    pub grade: String,
    pub status: MarkStatus,
}

/// Keyed by (student_id, subject_id). `percentage` is derived from the
/// day counts on every write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub student_id: String,
    pub class_id: String,
    pub subject_id: String,
    pub working_days: i64,
    pub present_days: i64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub is_results_published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_publication: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            is_results_published: false,
            scheduled_publication: None,
        }
    }
}

/// The whole record store as one value. Mutations never modify a snapshot
/// in place; they build a new one (see store.rs).
///
/// There is no stored users list: admins live here, student and teacher
/// user rows are projected via [`Database::users`], so the projection can
/// never drift from the underlying records.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Database {
    #[serde(default)]
    pub admins: Vec<User>,
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub teachers: Vec<Teacher>,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub classes: Vec<Class>,
    #[serde(default)]
    pub marks: Vec<Mark>,
    #[serde(default)]
    pub attendance: Vec<Attendance>,
    #[serde(default)]
    pub settings: Settings,
}

impl Student {
    pub fn as_user(&self) -> User {
        User {
            id: self.id.clone(),
            name: self.name.clone(),
            role: Role::Student,
            email: self.email.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

impl Teacher {
    pub fn as_user(&self) -> User {
        User {
            id: self.id.clone(),
            name: self.name.clone(),
            role: Role::Teacher,
            email: self.email.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

impl Database {
    /// The full user projection: admins, then teachers, then students.
    pub fn users(&self) -> Vec<User> {
        let mut out: Vec<User> = Vec::with_capacity(
            self.admins.len() + self.teachers.len() + self.students.len(),
        );
        out.extend(self.admins.iter().cloned());
        out.extend(self.teachers.iter().map(Teacher::as_user));
        out.extend(self.students.iter().map(Student::as_user));
        out
    }

    pub fn student(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn teacher(&self, id: &str) -> Option<&Teacher> {
        self.teachers.iter().find(|t| t.id == id)
    }

    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    pub fn class(&self, id: &str) -> Option<&Class> {
        self.classes.iter().find(|c| c.id == id)
    }

    pub fn mark(&self, student_id: &str, subject_id: &str) -> Option<&Mark> {
        self.marks
            .iter()
            .find(|m| m.student_id == student_id && m.subject_id == subject_id)
    }

    pub fn attendance_row(&self, student_id: &str, subject_id: &str) -> Option<&Attendance> {
        self.attendance
            .iter()
            .find(|a| a.student_id == student_id && a.subject_id == subject_id)
    }

    /// Case-insensitive username collision check across the whole
    /// projection, excluding `exclude_id` (the record being edited).
    pub fn username_taken(&self, username: &str, exclude_id: Option<&str>) -> bool {
        self.users().iter().any(|u| {
            u.username.eq_ignore_ascii_case(username) && Some(u.id.as_str()) != exclude_id
        })
    }

    /// Exact-match login lookup. Plaintext by design; hardening is out of
    /// scope for this store.
    pub fn find_user_by_username(&self, username: &str) -> Option<User> {
        self.users().into_iter().find(|u| u.username == username)
    }
}
