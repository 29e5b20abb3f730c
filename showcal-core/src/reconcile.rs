//! Reconciliation between the published calendar and a fresh extraction.
//!
//! Decisions are bounded by the window of start times the fresh set spans:
//! a calendar entry outside `[min(start), max(start)]` is never touched, so
//! a stale or partial scrape cannot delete far-future or far-past entries
//! it didn't mention.

use chrono::{DateTime, FixedOffset};
use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::event::Event;
use crate::fingerprint::fingerprint;

/// Inclusive start-time range spanned by the fresh event set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl Window {
    /// Window over the start times of a non-empty fresh set.
    fn over(fresh: &[Event]) -> Result<Self> {
        let starts = fresh.iter().map(|e| e.start.date_time);
        let start = starts.clone().min().ok_or(Error::EmptyListing)?;
        let end = starts.max().ok_or(Error::EmptyListing)?;
        Ok(Window { start, end })
    }

    /// Inclusive at both ends.
    fn contains(&self, dt: DateTime<FixedOffset>) -> bool {
        !(dt < self.start || dt > self.end)
    }
}

/// The create/delete decision for one run.
#[derive(Debug)]
pub struct ReconcilePlan {
    /// Fresh events absent from the calendar, in document order.
    pub to_create: Vec<Event>,
    /// Published events no longer listed, in calendar order.
    pub to_delete: Vec<Event>,
    /// Window the decision was bounded by.
    pub window: Window,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_delete.is_empty()
    }
}

/// Fingerprint map over a set; on collision the later event wins.
fn fingerprint_map(events: &[Event]) -> HashMap<String, &Event> {
    let mut map = HashMap::new();
    for event in events {
        map.insert(fingerprint(event), event);
    }
    map
}

/// Diff published calendar events against freshly extracted showtimes.
///
/// An empty fresh set makes the window undefined and is a fatal
/// precondition violation: no partial decision is returned.
///
/// Matching is by fingerprint only. An event whose fingerprint is present
/// on both sides is considered synchronized even if other fields differ;
/// there is no update path.
pub fn reconcile(backend_events: &[Event], fresh_events: &[Event]) -> Result<ReconcilePlan> {
    let window = Window::over(fresh_events)?;

    let backend_map = fingerprint_map(backend_events);
    let fresh_map = fingerprint_map(fresh_events);

    let mut to_create = Vec::new();
    let mut seen = HashSet::new();
    for event in fresh_events {
        let key = fingerprint(event);
        if !seen.insert(key.clone()) {
            continue;
        }
        if !window.contains(event.start.date_time) {
            // skip events outside our window
            continue;
        }
        if !backend_map.contains_key(&key) {
            // Last write wins on a collision within the fresh set
            to_create.push((*fresh_map[&key]).clone());
        }
    }

    let mut to_delete = Vec::new();
    seen.clear();
    for event in backend_events {
        let key = fingerprint(event);
        if !seen.insert(key.clone()) {
            continue;
        }
        if !window.contains(event.start.date_time) {
            // skip events outside our window
            continue;
        }
        if !fresh_map.contains_key(&key) {
            to_delete.push((*backend_map[&key]).clone());
        }
    }

    Ok(ReconcilePlan {
        to_create,
        to_delete,
        window,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventDateTime;

    fn event(summary: &str, start: &str) -> Event {
        let start = DateTime::parse_from_rfc3339(start).expect("Should parse");
        let end = start + chrono::Duration::minutes(90);
        Event::new(summary, EventDateTime::new(start), EventDateTime::new(end))
    }

    fn published(summary: &str, start: &str, id: &str) -> Event {
        let mut e = event(summary, start);
        e.id = Some(id.to_string());
        e
    }

    #[test]
    fn test_self_consistency() {
        let fresh = vec![
            event("A", "2026-01-28T14:00:00-05:00"),
            event("B", "2026-01-29T19:00:00-05:00"),
        ];
        let plan = reconcile(&fresh, &fresh).expect("Should reconcile");
        assert!(plan.is_empty());
    }

    #[test]
    fn test_idempotence_after_applying_plan() {
        let fresh = vec![
            event("A", "2026-01-28T14:00:00-05:00"),
            event("B", "2026-01-29T19:00:00-05:00"),
            event("C", "2026-01-30T21:00:00-05:00"),
        ];
        let backend = vec![
            published("A", "2026-01-28T14:00:00-05:00", "a1"),
            published("Gone", "2026-01-29T12:00:00-05:00", "g1"),
        ];

        let plan = reconcile(&backend, &fresh).expect("Should reconcile");
        assert_eq!(plan.to_create.len(), 2);
        assert_eq!(plan.to_delete.len(), 1);

        // Apply: drop deletions, append creations
        let deleted: Vec<String> = plan
            .to_delete
            .iter()
            .map(|e| fingerprint(e))
            .collect();
        let mut applied: Vec<Event> = backend
            .into_iter()
            .filter(|e| !deleted.contains(&fingerprint(e)))
            .collect();
        applied.extend(plan.to_create.clone());

        let second = reconcile(&applied, &fresh).expect("Should reconcile");
        assert!(second.is_empty(), "second pass must be a no-op");
    }

    #[test]
    fn test_empty_fresh_set_is_a_precondition_failure() {
        let backend = vec![published("A", "2026-01-28T14:00:00-05:00", "a1")];
        let err = reconcile(&backend, &[]).expect_err("Should fail");
        assert!(matches!(err, Error::EmptyListing));
    }

    #[test]
    fn test_window_excludes_unlisted_events_outside_horizon() {
        let fresh = vec![
            event("A", "2026-01-28T14:00:00-05:00"),
            event("B", "2026-01-30T21:00:00-05:00"),
        ];
        let backend = vec![
            published("Ancient", "2025-12-01T14:00:00-05:00", "old"),
            published("FarFuture", "2026-03-01T14:00:00-05:00", "fut"),
        ];

        let plan = reconcile(&backend, &fresh).expect("Should reconcile");
        // Both backend events fall outside [Jan 28, Jan 30] and survive
        assert!(plan.to_delete.is_empty());
        assert_eq!(plan.to_create.len(), 2);
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let fresh = vec![
            event("A", "2026-01-28T14:00:00-05:00"),
            event("B", "2026-01-30T21:00:00-05:00"),
        ];
        // Unlisted events exactly at the window edges are eligible for deletion
        let backend = vec![
            published("EdgeLow", "2026-01-28T14:00:00-05:00", "lo"),
            published("EdgeHigh", "2026-01-30T21:00:00-05:00", "hi"),
            published("JustBefore", "2026-01-28T13:59:59-05:00", "jb"),
            published("JustAfter", "2026-01-30T21:00:01-05:00", "ja"),
        ];

        let plan = reconcile(&backend, &fresh).expect("Should reconcile");
        let deleted: Vec<&str> = plan.to_delete.iter().map(|e| e.summary.as_str()).collect();
        assert_eq!(deleted, vec!["EdgeLow", "EdgeHigh"]);
    }

    #[test]
    fn test_changed_non_identity_fields_are_invisible() {
        let fresh = vec![{
            let mut e = event("A", "2026-01-28T14:00:00-05:00");
            e.description = Some("new description".to_string());
            e.location = Some("new address".to_string());
            e
        }];
        let backend = vec![{
            let mut e = published("A", "2026-01-28T14:00:00-05:00", "a1");
            e.description = Some("old description".to_string());
            e
        }];

        let plan = reconcile(&backend, &fresh).expect("Should reconcile");
        assert!(plan.is_empty(), "same fingerprint means already synchronized");
    }

    #[test]
    fn test_fingerprint_collision_last_write_wins() {
        let fresh = vec![
            {
                let mut e = event("A", "2026-01-28T14:00:00-05:00");
                e.description = Some("first".to_string());
                e
            },
            {
                let mut e = event("A", "2026-01-28T14:00:00-05:00");
                e.description = Some("second".to_string());
                e
            },
            event("B", "2026-01-29T19:00:00-05:00"),
        ];

        let plan = reconcile(&[], &fresh).expect("Should reconcile");
        assert_eq!(plan.to_create.len(), 2);
        assert_eq!(plan.to_create[0].description.as_deref(), Some("second"));
    }

    #[test]
    fn test_single_event_window_degenerates_to_a_point() {
        let fresh = vec![event("Solo", "2026-01-28T14:00:00-05:00")];
        let backend = vec![
            published("Solo", "2026-01-28T14:00:00-05:00", "s1"),
            published("Other", "2026-01-28T15:00:00-05:00", "o1"),
        ];
        let plan = reconcile(&backend, &fresh).expect("Should reconcile");
        // "Other" starts after the point window and is untouched
        assert!(plan.is_empty());
        assert_eq!(plan.window.start, plan.window.end);
    }
}
