use crate::model::{
    Attendance, Class, Database, Mark, MarkStatus, Role, Settings, Student, Subject, Teacher, User,
};
use anyhow::Context;
use std::path::Path;

pub const SNAPSHOT_FILE: &str = "snapshot.json";

fn s(v: &str) -> String {
    v.to_string()
}

/// The demo fixture a fresh workspace starts from: one admin, one teacher
/// over two subjects, one student with marks and attendance, two classes.
/// Fixed ids keep a first launch reproducible.
pub fn seed() -> Database {
    Database {
        admins: vec![User {
            id: s("u1"),
            name: s("Admin User"),
            role: Role::Admin,
            email: s("admin@edu.com"),
            username: s("admin"),
            password: Some(s("password123")),
        }],
        students: vec![Student {
            id: s("s1"),
            name: s("Alice Johnson"),
            email: s("alice@edu.com"),
            username: s("2024001"),
            password: Some(s("password123")),
            class_id: s("c1"),
            roll_number: s("2024001"),
        }],
        teachers: vec![Teacher {
            id: s("t1"),
            name: s("John Smith"),
            email: s("john@edu.com"),
            username: s("teacher1"),
            password: Some(s("password123")),
            subject_ids: vec![s("sub1"), s("sub2")],
        }],
        subjects: vec![
            Subject {
                id: s("sub1"),
                name: s("Mathematics"),
                code: s("MATH101"),
                max_marks: 100,
            },
            Subject {
                id: s("sub2"),
                name: s("Physics"),
                code: s("PHYS101"),
                max_marks: 100,
            },
            Subject {
                id: s("sub3"),
                name: s("Computer Science"),
                code: s("CS101"),
                max_marks: 100,
            },
        ],
        classes: vec![
            Class {
                id: s("c1"),
                name: s("Grade 10-A"),
            },
            Class {
                id: s("c2"),
                name: s("Grade 10-B"),
            },
        ],
        marks: vec![
            Mark {
                student_id: s("s1"),
                subject_id: s("sub1"),
                theory: 70,
                practical: 25,
                total: 95,
                grade: s("A+"),
                status: MarkStatus::Pass,
            },
            Mark {
                student_id: s("s1"),
                subject_id: s("sub2"),
                theory: 68,
                practical: 18,
                total: 86,
                grade: s("A"),
                status: MarkStatus::Pass,
            },
        ],
        attendance: vec![
            Attendance {
                student_id: s("s1"),
                class_id: s("c1"),
                subject_id: s("sub1"),
                working_days: 100,
                present_days: 92,
                percentage: 92.0,
            },
            Attendance {
                student_id: s("s1"),
                class_id: s("c1"),
                subject_id: s("sub2"),
                working_days: 100,
                present_days: 85,
                percentage: 85.0,
            },
        ],
        settings: Settings {
            is_results_published: true,
            scheduled_publication: None,
        },
    }
}

/// Open a workspace: read its snapshot, or seed and persist one on first
/// use. Missing optional sections (e.g. settings) come back defaulted via
/// serde, so older blobs stay loadable.
pub fn load_or_seed(workspace: &Path) -> anyhow::Result<Database> {
    std::fs::create_dir_all(workspace).with_context(|| {
        format!(
            "failed to create workspace {}",
            workspace.to_string_lossy()
        )
    })?;
    let path = workspace.join(SNAPSHOT_FILE);
    if path.is_file() {
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read snapshot {}", path.to_string_lossy()))?;
        let db: Database = serde_json::from_str(&text)
            .with_context(|| format!("snapshot {} is invalid JSON", path.to_string_lossy()))?;
        return Ok(db);
    }
    let db = seed();
    save(workspace, &db)?;
    Ok(db)
}

/// Persist the whole snapshot. Written to a temp file and renamed into
/// place so a crash mid-write leaves the previous snapshot intact.
pub fn save(workspace: &Path, db: &Database) -> anyhow::Result<()> {
    let path = workspace.join(SNAPSHOT_FILE);
    let tmp = workspace.join(format!("{}.tmp", SNAPSHOT_FILE));
    let text = serde_json::to_string_pretty(db).context("failed to serialize snapshot")?;
    std::fs::write(&tmp, text)
        .with_context(|| format!("failed to write {}", tmp.to_string_lossy()))?;
    std::fs::rename(&tmp, &path).with_context(|| {
        format!(
            "failed to install snapshot at {}",
            path.to_string_lossy()
        )
    })?;
    Ok(())
}
