//! Event identity.
//!
//! Two events are the same showtime when they share a summary and a start
//! minute. Nothing else participates: location, description, end time and
//! attachments can all differ between a freshly scraped event and its
//! published counterpart without breaking the match.

use crate::event::Event;

/// Identity key for an event: summary plus the start timestamp truncated to
/// minute precision, offset included.
///
/// Pure with respect to event content; no caching.
pub fn fingerprint(event: &Event) -> String {
    format!(
        "{} @ {}",
        event.summary,
        event.start.date_time.format("%Y-%m-%dT%H:%M%:z")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventDateTime;
    use chrono::DateTime;

    fn dt(s: &str) -> EventDateTime {
        EventDateTime::new(DateTime::parse_from_rfc3339(s).expect("Should parse"))
    }

    #[test]
    fn test_fingerprint_ignores_non_identity_fields() {
        let mut a = Event::new(
            "Big Film @ Green Light Cinema",
            dt("2026-01-28T14:00:00-05:00"),
            dt("2026-01-28T15:30:00-05:00"),
        );
        let mut b = a.clone();

        a.description = Some("url\n\nA film.\n\nRating: PG".to_string());
        b.description = None;
        b.location = Some("221 2nd Avenue North".to_string());
        b.end = dt("2026-01-28T16:00:00-05:00");
        b.id = Some("published".to_string());

        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_fingerprint_truncates_seconds() {
        let a = Event::new(
            "Big Film",
            dt("2026-01-28T14:00:07-05:00"),
            dt("2026-01-28T15:30:00-05:00"),
        );
        let b = Event::new(
            "Big Film",
            dt("2026-01-28T14:00:59-05:00"),
            dt("2026-01-28T15:30:00-05:00"),
        );
        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_fingerprint_differs_across_minutes_and_summaries() {
        let base = Event::new(
            "Big Film",
            dt("2026-01-28T14:00:00-05:00"),
            dt("2026-01-28T15:30:00-05:00"),
        );
        let other_minute = Event::new(
            "Big Film",
            dt("2026-01-28T14:01:00-05:00"),
            dt("2026-01-28T15:30:00-05:00"),
        );
        let other_title = Event::new(
            "Other Film",
            dt("2026-01-28T14:00:00-05:00"),
            dt("2026-01-28T15:30:00-05:00"),
        );

        assert_ne!(fingerprint(&base), fingerprint(&other_minute));
        assert_ne!(fingerprint(&base), fingerprint(&other_title));
    }
}
