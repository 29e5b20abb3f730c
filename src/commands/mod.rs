pub mod calendars;
pub mod events;
pub mod update;
