//! Core types and logic for the showcal ecosystem.
//!
//! This crate provides everything except the literal transport:
//! - `Event` and related types for calendar entries
//! - `extract` for turning a scraped listing page into events
//! - `fingerprint` for event identity
//! - `reconcile` for computing create/delete decisions
//! - `sync` for orchestrating a full run against a `CalendarBackend`

pub mod backend;
pub mod error;
pub mod event;
pub mod extract;
pub mod fingerprint;
pub mod reconcile;
pub mod sync;

pub use backend::{CalendarBackend, FixtureBackend};
pub use error::{Error, Result};
pub use event::{Event, EventDateTime};
pub use extract::extract;
pub use fingerprint::fingerprint;
pub use reconcile::{reconcile, ReconcilePlan};
pub use sync::{sync_document, sync_events, SyncReport};
