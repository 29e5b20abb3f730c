//! Configuration resolution.
//!
//! One `AppConfig` is built at startup from CLI flags and environment
//! variables (flags win) and passed by reference to every command handler.

use std::path::PathBuf;

use showcal_core::{Error, Result};
use showcal_provider_google::{GoogleCalendar, ServiceAccountKey};

use crate::Cli;

/// Where the service-account credentials come from.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Path to a credentials JSON file.
    File(PathBuf),
    /// The credentials JSON contents themselves (CREDENTIALS_JSON).
    Inline(String),
}

/// Resolved configuration for one invocation.
#[derive(Debug)]
pub struct AppConfig {
    pub calendar_id: Option<String>,
    pub credentials: Option<Credentials>,
    pub dry_run: bool,
    pub calendar_file: Option<PathBuf>,
    pub showtimes_file: Option<PathBuf>,
    pub showtimes_html_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn resolve(cli: &Cli) -> Self {
        let calendar_id = cli
            .calendar_id
            .clone()
            .or_else(|| std::env::var("CALENDAR_ID").ok())
            .filter(|s| !s.is_empty());

        // Inline JSON takes precedence over any file path.
        let credentials = std::env::var("CREDENTIALS_JSON")
            .ok()
            .filter(|s| !s.is_empty())
            .map(Credentials::Inline)
            .or_else(|| cli.credentials_file.clone().map(Credentials::File))
            .or_else(|| {
                std::env::var("CREDENTIALS_FILE")
                    .ok()
                    .filter(|s| !s.is_empty())
                    .map(|p| Credentials::File(PathBuf::from(p)))
            });

        AppConfig {
            calendar_id,
            credentials,
            dry_run: cli.dry_run,
            calendar_file: cli.calendar_file.clone(),
            showtimes_file: cli.showtimes_file.clone(),
            showtimes_html_file: cli.showtimes_html_file.clone(),
        }
    }

    /// Build the live Google Calendar client.
    pub fn google_calendar(&self) -> Result<GoogleCalendar> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            Error::config(
                "no credentials provided; pass --credentials-file or set \
                 CREDENTIALS_FILE / CREDENTIALS_JSON",
            )
        })?;
        let key = match credentials {
            Credentials::File(path) => ServiceAccountKey::from_file(path)?,
            Credentials::Inline(contents) => ServiceAccountKey::from_json(contents)?,
        };
        Ok(GoogleCalendar::new(key, self.calendar_id.clone()))
    }
}
