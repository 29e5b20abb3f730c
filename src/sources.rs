//! Data sources for a run: the calendar backend and the showtimes page,
//! each replaceable by a fixture file for offline/dry-run use.

use showcal_core::{extract, CalendarBackend, Error, Event, FixtureBackend, Result};

use crate::config::AppConfig;

/// The venue's public sessions page.
const LISTING_URL: &str =
    "https://ticketing.useast.veezi.com/sessions/?siteToken=kegxkyy004b7bm6apwhtgcm274";

/// Headers the ticketing site expects before serving the full page.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/117.0.0.0 Safari/537.36";
const ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";

/// The calendar backend for this run: a fixture when `--calendar-file` is
/// given, otherwise the live Google Calendar. A dry run must not touch the
/// network, so it requires the fixture.
pub fn backend(cfg: &AppConfig) -> Result<Box<dyn CalendarBackend>> {
    if let Some(path) = &cfg.calendar_file {
        return Ok(Box::new(FixtureBackend::from_file(path)?));
    }
    if cfg.dry_run {
        return Err(Error::config(
            "no calendar file provided for dry run; pass --calendar-file",
        ));
    }
    Ok(Box::new(cfg.google_calendar()?))
}

/// Read showtimes from the fixture file or the listing site.
pub async fn read_showtimes(cfg: &AppConfig) -> Result<Vec<Event>> {
    if let Some(path) = &cfg.showtimes_file {
        let contents = std::fs::read_to_string(path)?;
        let events: Vec<Event> = serde_json::from_str(&contents)?;
        return Ok(events);
    }
    let html = load_listing_page(cfg).await?;
    extract(&html)
}

/// The raw listing document, from file or from the live site.
async fn load_listing_page(cfg: &AppConfig) -> Result<String> {
    if let Some(path) = &cfg.showtimes_html_file {
        return Ok(std::fs::read_to_string(path)?);
    }
    if cfg.dry_run {
        return Err(Error::config(
            "no showtimes JSON or HTML file provided for dry run; pass \
             --showtimes-file or --showtimes-html-file",
        ));
    }

    let client = reqwest::Client::new();
    let response = client
        .get(LISTING_URL)
        .header("User-Agent", USER_AGENT)
        .header("Accept", ACCEPT)
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await
        .map_err(|e| Error::transport(format!("Error fetching {}: {}", LISTING_URL, e)))?;

    if !response.status().is_success() {
        return Err(Error::transport(format!(
            "Error fetching {}: HTTP {}",
            LISTING_URL,
            response.status()
        )));
    }

    response
        .text()
        .await
        .map_err(|e| Error::transport(format!("Error reading {}: {}", LISTING_URL, e)))
}
