//! Calendar backend abstraction.
//!
//! The orchestrator only ever talks to a `CalendarBackend`; the real Google
//! Calendar transport lives in `showcal-provider-google`, and fixtures stand
//! in for it during dry runs and tests.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Mutex;

use crate::error::Result;
use crate::event::Event;

/// Read/write/delete access to a calendar's event set.
#[async_trait]
pub trait CalendarBackend {
    /// Events currently published, with backend-assigned identity fields set.
    async fn read_events(&self) -> Result<Vec<Event>>;

    /// Publish events. Returns each input event augmented with the
    /// backend-assigned `id`/`etag`/`htmlLink`, in input order.
    async fn write_events(&self, events: Vec<Event>) -> Result<Vec<Event>>;

    /// Remove events by id. Deleting an already-absent id is not an error.
    async fn delete_events(&self, ids: &[String]) -> Result<()>;
}

/// A file- or memory-backed stand-in for a live calendar.
///
/// Loads an event-set fixture (a JSON array of event objects) and serves it
/// through the `CalendarBackend` interface. Writes assign synthetic ids so
/// the full non-dry-run path can be exercised offline.
pub struct FixtureBackend {
    events: Mutex<Vec<Event>>,
    counter: Mutex<u64>,
}

impl FixtureBackend {
    pub fn new(events: Vec<Event>) -> Self {
        FixtureBackend {
            events: Mutex::new(events),
            counter: Mutex::new(0),
        }
    }

    /// Load from an event-set fixture file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let events: Vec<Event> = serde_json::from_str(&contents)?;
        Ok(Self::new(events))
    }

    /// Snapshot of the current event set.
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().expect("fixture lock").clone()
    }
}

#[async_trait]
impl CalendarBackend for FixtureBackend {
    async fn read_events(&self) -> Result<Vec<Event>> {
        Ok(self.events())
    }

    async fn write_events(&self, events: Vec<Event>) -> Result<Vec<Event>> {
        let mut counter = self.counter.lock().expect("fixture lock");
        let mut stored = self.events.lock().expect("fixture lock");

        let mut written = Vec::with_capacity(events.len());
        for mut event in events {
            *counter += 1;
            event.id = Some(format!("fixture-{}", counter));
            event.etag = Some(format!("\"{}\"", counter));
            event.html_link = Some(format!("https://calendar.example.com/event/{}", counter));
            stored.push(event.clone());
            written.push(event);
        }
        Ok(written)
    }

    async fn delete_events(&self, ids: &[String]) -> Result<()> {
        let mut stored = self.events.lock().expect("fixture lock");
        stored.retain(|e| match &e.id {
            Some(id) => !ids.contains(id),
            None => true,
        });
        Ok(())
    }
}
