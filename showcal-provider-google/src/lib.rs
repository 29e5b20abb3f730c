//! Google Calendar backend for showcal.
//!
//! Thin transport over the Calendar v3 REST API with service-account
//! authentication. No sync logic lives here; this crate only implements the
//! `CalendarBackend` read/write/delete surface plus calendar and ACL
//! administration.

pub mod auth;
pub mod calendar;

pub use auth::ServiceAccountKey;
pub use calendar::GoogleCalendar;
