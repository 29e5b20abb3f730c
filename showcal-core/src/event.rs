//! Calendar event types.
//!
//! `Event` uses the Google Calendar wire field names so the same record
//! round-trips through the API, event-set fixtures, and JSON output.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Record tag carried by every calendar event.
pub const EVENT_KIND: &str = "calendar#event";

/// A start or end time: a timestamp with an explicit UTC offset, plus the
/// IANA timezone name the calendar should display it in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDateTime {
    #[serde(rename = "dateTime")]
    pub date_time: DateTime<FixedOffset>,
    #[serde(rename = "timeZone", default = "default_time_zone")]
    pub time_zone: String,
}

fn default_time_zone() -> String {
    "UTC".to_string()
}

impl EventDateTime {
    pub fn new(date_time: DateTime<FixedOffset>) -> Self {
        EventDateTime {
            date_time,
            time_zone: default_time_zone(),
        }
    }
}

/// A calendar event.
///
/// Invariant: `start <= end`. `id`, `etag` and `html_link` are assigned by
/// the backend on insert and are never set by the extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(default = "default_kind")]
    pub kind: String,
    pub summary: String,
    pub start: EventDateTime,
    pub end: EventDateTime,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(rename = "htmlLink", default, skip_serializing_if = "Option::is_none")]
    pub html_link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Opaque attachment descriptors, passed through unmodified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<serde_json::Value>>,
}

fn default_kind() -> String {
    EVENT_KIND.to_string()
}

impl Event {
    /// A fresh (not yet published) event with only the required fields set.
    pub fn new(summary: impl Into<String>, start: EventDateTime, end: EventDateTime) -> Self {
        Event {
            kind: default_kind(),
            summary: summary.into(),
            start,
            end,
            id: None,
            etag: None,
            html_link: None,
            location: None,
            description: None,
            attachments: None,
        }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} @ {}",
            self.summary,
            self.start.date_time.format("%b %d %H:%M")
        )
    }
}
