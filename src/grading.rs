use crate::model::MarkStatus;

/// Half-up integer rounding used for the theory/practical split:
/// `round(x) = floor(x + 0.5)`.
pub fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

/// 1-decimal half-up rounding used for reported averages:
/// `Int(10*x + 0.5) / 10`.
pub fn round_off_1_decimal(x: f64) -> f64 {
    ((10.0 * x) + 0.5).floor() / 10.0
}

/// Ceiling for the theory component: 70% of the subject maximum.
pub fn theory_limit(max_marks: i64) -> i64 {
    round_half_up(max_marks as f64 * 0.7)
}

/// Ceiling for the practical component: whatever the theory split leaves.
pub fn practical_limit(max_marks: i64) -> i64 {
    max_marks - theory_limit(max_marks)
}

/// Grade label for a percentage. Inclusive lower bounds, first match wins.
pub fn letter_grade(percentage: f64) -> &'static str {
    if percentage >= 90.0 {
        "A+"
    } else if percentage >= 80.0 {
        "A"
    } else if percentage >= 70.0 {
        "B+"
    } else if percentage >= 60.0 {
        "B"
    } else if percentage >= 50.0 {
        "C"
    } else if percentage >= 40.0 {
        "D"
    } else {
        "F"
    }
}

pub const GRADE_LABELS: [&str; 7] = ["A+", "A", "B+", "B", "C", "D", "F"];

pub const PASS_PERCENTAGE: f64 = 40.0;

#[derive(Debug, Clone, PartialEq)]
pub struct GradeResult {
    pub total: i64,
    pub percentage: f64,
    pub grade: &'static str,
    pub status: MarkStatus,
}

/// Map raw component scores to total/grade/status against a subject
/// maximum. Pure and deterministic; callers clamp components first
/// (see store::upsert_mark).
pub fn grade(theory: i64, practical: i64, max_marks: i64) -> GradeResult {
    let total = theory + practical;
    let percentage = if max_marks > 0 {
        total as f64 / max_marks as f64 * 100.0
    } else {
        0.0
    };
    GradeResult {
        total,
        percentage,
        grade: letter_grade(percentage),
        status: if percentage >= PASS_PERCENTAGE {
            MarkStatus::Pass
        } else {
            MarkStatus::Fail
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_off_matches_1_decimal_half_up() {
        assert_eq!(round_off_1_decimal(0.0), 0.0);
        assert_eq!(round_off_1_decimal(3.54), 3.5);
        assert_eq!(round_off_1_decimal(3.55), 3.6);
        assert_eq!(round_off_1_decimal(35.6818), 35.7);
    }

    #[test]
    fn component_limits_split_70_30() {
        assert_eq!(theory_limit(100), 70);
        assert_eq!(practical_limit(100), 30);
        assert_eq!(theory_limit(75), 53); // round(52.5) rounds up
        assert_eq!(practical_limit(75), 22);
        assert_eq!(theory_limit(50), 35);
        assert_eq!(practical_limit(50), 15);
    }

    #[test]
    fn grade_boundaries_are_inclusive_lower_bounds() {
        assert_eq!(grade(90, 0, 100).grade, "A+");
        assert_eq!(grade(89, 0, 100).grade, "A");
        assert_eq!(grade(80, 0, 100).grade, "A");
        assert_eq!(grade(79, 0, 100).grade, "B+");
        assert_eq!(grade(70, 0, 100).grade, "B+");
        assert_eq!(grade(69, 0, 100).grade, "B");
        assert_eq!(grade(60, 0, 100).grade, "B");
        assert_eq!(grade(59, 0, 100).grade, "C");
        assert_eq!(grade(50, 0, 100).grade, "C");
        assert_eq!(grade(49, 0, 100).grade, "D");
        assert_eq!(grade(40, 0, 100).grade, "D");
        assert_eq!(grade(39, 0, 100).grade, "F");
    }

    #[test]
    fn pass_boundary_is_exactly_40_percent() {
        assert_eq!(grade(40, 0, 100).status, MarkStatus::Pass);
        assert_eq!(grade(39, 0, 100).status, MarkStatus::Fail);
        // 20/50 = 40% passes on a smaller maximum too.
        assert_eq!(grade(15, 5, 50).status, MarkStatus::Pass);
        assert_eq!(grade(15, 4, 50).status, MarkStatus::Fail);
    }

    #[test]
    fn grade_is_deterministic_and_totals_components() {
        let a = grade(53, 17, 100);
        let b = grade(53, 17, 100);
        assert_eq!(a, b);
        assert_eq!(a.total, 70);
        assert_eq!(grade(0, 0, 100).total, 0);
    }

    #[test]
    fn zero_max_marks_grades_as_f_without_dividing() {
        let r = grade(0, 0, 0);
        assert_eq!(r.percentage, 0.0);
        assert_eq!(r.grade, "F");
        assert_eq!(r.status, MarkStatus::Fail);
    }
}
