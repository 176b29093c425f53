use crate::grading::{self, round_off_1_decimal};
use crate::model::{Database, MarkStatus};
use serde::Serialize;

/// One bar of the performance-benchmark chart: the student's total for a
/// subject against the mean total of classmates taking the same subject.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkPoint {
    pub subject_id: String,
    pub subject_name: String,
    pub score: i64,
    pub class_avg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AtRiskStudent {
    pub student_id: String,
    pub name: String,
    pub roll_number: String,
    pub risk_level: RiskLevel,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeBucket {
    pub grade: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeritBadge {
    pub key: &'static str,
    pub title: &'static str,
    pub description: String,
    pub earned: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRow {
    pub subject_id: String,
    pub subject_name: String,
    pub subject_code: String,
    pub max_marks: i64,
    pub theory: i64,
    pub practical: i64,
    pub total: i64,
    pub grade: String,
    pub status: MarkStatus,
}

/// The transcript model: per-subject rows plus aggregate results.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub student_id: String,
    pub name: String,
    pub roll_number: String,
    pub class_name: String,
    pub rows: Vec<SummaryRow>,
    pub total_obtained: i64,
    pub total_max: i64,
    pub aggregate_percentage: f64,
    pub aggregate_grade: &'static str,
    pub attendance_average: f64,
    pub overall_pass: bool,
}

/// `Σ total / Σ maxMarks · 100` over the student's marks; 0 with no marks.
/// Marks whose subject vanished are skipped rather than counted at zero.
pub fn aggregate_percentage(db: &Database, student_id: &str) -> f64 {
    let mut obtained = 0_i64;
    let mut max = 0_i64;
    for m in db.marks.iter().filter(|m| m.student_id == student_id) {
        let Some(subject) = db.subject(&m.subject_id) else {
            continue;
        };
        obtained += m.total;
        max += subject.max_marks;
    }
    if max > 0 {
        obtained as f64 / max as f64 * 100.0
    } else {
        0.0
    }
}

/// Mean of `percentage` over the student's attendance rows; 0 with none.
pub fn attendance_average(db: &Database, student_id: &str) -> f64 {
    let rows: Vec<f64> = db
        .attendance
        .iter()
        .filter(|a| a.student_id == student_id)
        .map(|a| a.percentage)
        .collect();
    if rows.is_empty() {
        return 0.0;
    }
    rows.iter().sum::<f64>() / rows.len() as f64
}

/// Mean of `total` over marks for `subject_id` held by students of
/// `class_id`. 0 over an empty peer set, never NaN.
pub fn peer_average(db: &Database, class_id: &str, subject_id: &str) -> f64 {
    let mut sum = 0_i64;
    let mut count = 0_usize;
    for m in db.marks.iter().filter(|m| m.subject_id == subject_id) {
        let in_class = db
            .student(&m.student_id)
            .map(|s| s.class_id == class_id)
            .unwrap_or(false);
        if in_class {
            sum += m.total;
            count += 1;
        }
    }
    if count > 0 {
        sum as f64 / count as f64
    } else {
        0.0
    }
}

/// Peer averages for every subject the student holds a mark in. Peers are
/// students of the same class, the student included.
pub fn class_benchmark(db: &Database, student_id: &str) -> Vec<BenchmarkPoint> {
    let Some(student) = db.student(student_id) else {
        return Vec::new();
    };
    let class_id = student.class_id.clone();

    db.marks
        .iter()
        .filter(|m| m.student_id == student_id)
        .map(|m| {
            let subject_name = db
                .subject(&m.subject_id)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| "Unknown".to_string());
            BenchmarkPoint {
                subject_id: m.subject_id.clone(),
                subject_name,
                score: m.total,
                class_avg: round_off_1_decimal(peer_average(db, &class_id, &m.subject_id)),
            }
        })
        .collect()
}

/// Risk screen for one class under one subject. Per student: a failing
/// mark (< 40% of the subject maximum) is high risk; a borderline pass
/// (40%..<50%) is medium; attendance below 75% escalates low to medium
/// and never demotes. Students still at low are excluded.
pub fn at_risk(db: &Database, class_id: &str, subject_id: &str) -> Vec<AtRiskStudent> {
    let Some(subject) = db.subject(subject_id) else {
        return Vec::new();
    };
    let max_marks = subject.max_marks;

    db.students
        .iter()
        .filter(|s| s.class_id == class_id)
        .filter_map(|s| {
            let mut level = RiskLevel::Low;
            let mut reasons: Vec<String> = Vec::new();

            if let Some(m) = db.mark(&s.id, subject_id) {
                let pct = if max_marks > 0 {
                    m.total as f64 / max_marks as f64 * 100.0
                } else {
                    0.0
                };
                if pct < 40.0 {
                    level = RiskLevel::High;
                    reasons.push("Failing Marks".to_string());
                } else if pct < 50.0 {
                    level = RiskLevel::Medium;
                    reasons.push("Borderline Pass".to_string());
                }
            }
            if let Some(a) = db.attendance_row(&s.id, subject_id) {
                if a.percentage < 75.0 {
                    level = level.max(RiskLevel::Medium);
                    reasons.push("Low Attendance".to_string());
                }
            }

            if level == RiskLevel::Low {
                return None;
            }
            Some(AtRiskStudent {
                student_id: s.id.clone(),
                name: s.name.clone(),
                roll_number: s.roll_number.clone(),
                risk_level: level,
                reasons,
            })
        })
        .collect()
}

/// Mark counts per grade label for one subject. Every bucket appears,
/// zero counts included, so the class grade curve always has seven bars.
pub fn grade_distribution(db: &Database, subject_id: &str) -> Vec<GradeBucket> {
    grading::GRADE_LABELS
        .iter()
        .map(|label| GradeBucket {
            grade: label,
            count: db
                .marks
                .iter()
                .filter(|m| m.subject_id == subject_id && m.grade == *label)
                .count(),
        })
        .collect()
}

/// Derived recognition flags. Pure predicates over the snapshot,
/// re-evaluated per read, never stored. `designated_subject` and
/// `cluster_subjects` are subject names picked by the caller.
pub fn merit_badges(
    db: &Database,
    student_id: &str,
    designated_subject: &str,
    cluster_subjects: &[String],
) -> Vec<MeritBadge> {
    let subject_name = |id: &str| db.subject(id).map(|s| s.name.as_str()).unwrap_or("");
    let marks: Vec<_> = db
        .marks
        .iter()
        .filter(|m| m.student_id == student_id)
        .collect();

    let subject_mastery = marks
        .iter()
        .any(|m| subject_name(&m.subject_id) == designated_subject && m.total >= 90);
    let perfect_attendance = db
        .attendance
        .iter()
        .any(|a| a.student_id == student_id && a.percentage >= 100.0);
    let aggregate_excellence = aggregate_percentage(db, student_id) >= 85.0;
    let cluster_excellence = marks.iter().any(|m| {
        cluster_subjects
            .iter()
            .any(|c| c == subject_name(&m.subject_id))
            && m.total >= 80
    });

    vec![
        MeritBadge {
            key: "subjectMastery",
            title: "Subject Mastery",
            description: format!("90+ in {}", designated_subject),
            earned: subject_mastery,
        },
        MeritBadge {
            key: "perfectAttendance",
            title: "Perfect Attendance",
            description: "100% in any subject".to_string(),
            earned: perfect_attendance,
        },
        MeritBadge {
            key: "aggregateExcellence",
            title: "Academic Hero",
            description: "Over 85% aggregate".to_string(),
            earned: aggregate_excellence,
        },
        MeritBadge {
            key: "clusterExcellence",
            title: "Cluster Excellence",
            description: format!("80+ in {}", cluster_subjects.join("/")),
            earned: cluster_excellence,
        },
    ]
}

/// Assemble the transcript model for one student, or None if the id is
/// unknown. Overall pass requires every mark PASS and a passing aggregate.
pub fn student_summary(db: &Database, student_id: &str) -> Option<StudentSummary> {
    let student = db.student(student_id)?;
    let class_name = db
        .class(&student.class_id)
        .map(|c| c.name.clone())
        .unwrap_or_default();

    let mut rows = Vec::new();
    let mut total_obtained = 0_i64;
    let mut total_max = 0_i64;
    for m in db.marks.iter().filter(|m| m.student_id == student_id) {
        let Some(subject) = db.subject(&m.subject_id) else {
            continue;
        };
        total_obtained += m.total;
        total_max += subject.max_marks;
        rows.push(SummaryRow {
            subject_id: subject.id.clone(),
            subject_name: subject.name.clone(),
            subject_code: subject.code.clone(),
            max_marks: subject.max_marks,
            theory: m.theory,
            practical: m.practical,
            total: m.total,
            grade: m.grade.clone(),
            status: m.status,
        });
    }

    let aggregate = if total_max > 0 {
        total_obtained as f64 / total_max as f64 * 100.0
    } else {
        0.0
    };
    let overall_pass =
        !rows.is_empty() && rows.iter().all(|r| r.status == MarkStatus::Pass) && aggregate >= 40.0;

    Some(StudentSummary {
        student_id: student.id.clone(),
        name: student.name.clone(),
        roll_number: student.roll_number.clone(),
        class_name,
        rows,
        total_obtained,
        total_max,
        aggregate_percentage: aggregate,
        aggregate_grade: grading::letter_grade(aggregate),
        attendance_average: round_off_1_decimal(attendance_average(db, student_id)),
        overall_pass,
    })
}
