use crate::model::Settings;
use chrono::NaiveDateTime;

/// Parse the stored schedule string. The store keeps the HTML
/// `datetime-local` shape (`YYYY-MM-DDTHH:MM`, seconds optional), a local
/// wall-clock instant with no zone.
pub fn parse_schedule(raw: &str) -> Option<NaiveDateTime> {
    let t = raw.trim();
    NaiveDateTime::parse_from_str(t, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(t, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

/// Whether student-facing result views may render right now: the admin
/// override wins, otherwise a reached schedule activates lazily at read
/// time. The stored flag is never flipped by the clock. An unparseable
/// schedule is treated as absent; a bad blob must not brick the read path.
pub fn is_visible_now(settings: &Settings, now: NaiveDateTime) -> bool {
    if settings.is_results_published {
        return true;
    }
    settings
        .scheduled_publication
        .as_deref()
        .and_then(parse_schedule)
        .map(|scheduled| now >= scheduled)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        parse_schedule(s).expect("test datetime")
    }

    fn settings(published: bool, scheduled: Option<&str>) -> Settings {
        Settings {
            is_results_published: published,
            scheduled_publication: scheduled.map(|s| s.to_string()),
        }
    }

    #[test]
    fn override_flag_always_wins() {
        let s = settings(true, None);
        assert!(is_visible_now(&s, at("2000-01-01T00:00")));
        let s = settings(true, Some("2999-01-01T00:00"));
        assert!(is_visible_now(&s, at("2000-01-01T00:00")));
    }

    #[test]
    fn schedule_activates_at_its_instant() {
        let s = settings(false, Some("2026-09-01T08:00"));
        assert!(!is_visible_now(&s, at("2026-09-01T07:59")));
        assert!(is_visible_now(&s, at("2026-09-01T08:00")));
        assert!(is_visible_now(&s, at("2026-09-02T00:00")));
    }

    #[test]
    fn no_schedule_and_no_flag_stays_hidden() {
        let s = settings(false, None);
        assert!(!is_visible_now(&s, at("2026-09-01T08:00")));
    }

    #[test]
    fn unparseable_schedule_is_ignored() {
        let s = settings(false, Some("soon"));
        assert!(!is_visible_now(&s, at("2026-09-01T08:00")));
    }

    #[test]
    fn schedule_accepts_optional_seconds() {
        assert!(parse_schedule("2026-09-01T08:00:30").is_some());
        assert!(parse_schedule(" 2026-09-01T08:00 ").is_some());
        assert!(parse_schedule("2026-09-01").is_none());
    }
}
