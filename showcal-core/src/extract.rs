//! Listing extraction.
//!
//! Turns the scraped HTML of the ticketing page into a normalized sequence
//! of calendar events. Two sources inside the same document are joined by
//! film title:
//!
//! - per-film blocks (`#sessionsByFilmConent .film`) carrying the title,
//!   description and content rating;
//! - `<script type="application/ld+json">` blocks, each a JSON array of
//!   schema.org session objects with start time, duration, venue and
//!   purchase URL.
//!
//! A single bad session or a single bad JSON block never aborts the rest of
//! the document: those are skipped with a diagnostic on stderr.

use chrono::{DateTime, Duration};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use std::collections::HashMap;

use crate::error::Result;
use crate::event::{Event, EventDateTime};

/// Type tag identifying a session object as a showtime.
const SESSION_TYPE: &str = "VisualArtsEvent";

/// Rating code the venue uses for unrated films.
const NOT_RATED_CODE: &str = "NR";

/// Human-readable fallback folded into the description instead of the code.
const NOT_RATED_FALLBACK: &str = "This film is Not Rated.";

/// Listings read from the per-film blocks of the showtimes page.
/// Keyed by title; used only to enrich event descriptions.
#[derive(Debug)]
struct ShowtimeListing {
    desc: String,
    rating_desc: String,
}

/// One session object from an ld+json block.
#[derive(Debug, Deserialize)]
struct SessionRecord {
    #[serde(rename = "@type")]
    type_tag: Option<String>,
    name: Option<String>,
    url: Option<String>,
    #[serde(rename = "startDate")]
    start_date: Option<String>,
    duration: Option<String>,
    location: Option<SessionLocation>,
}

#[derive(Debug, Deserialize)]
struct SessionLocation {
    name: Option<String>,
    address: Option<String>,
}

/// Element to plain text, with normalized whitespace.
///
/// Film descriptions often contain hard line wraps; collapse a lone newline
/// between two characters to a space, then collapse runs of spaces.
fn element_text(el: ElementRef) -> String {
    let raw = el
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let unwrapped = Regex::new(r"([^\n])\n([^\n])")
        .expect("static regex")
        .replace_all(&raw, "$1 $2")
        .into_owned();
    Regex::new(r"[ ]+")
        .expect("static regex")
        .replace_all(&unwrapped, " ")
        .trim()
        .to_string()
}

/// Parse an ISO-8601 duration restricted to `<n>H`/`<n>M`/`<n>S` tokens,
/// returning the total in seconds. Unrecognized tokens are ignored.
fn duration_seconds(duration: &str) -> i64 {
    let token = Regex::new(r"(\d+)([HMS])").expect("static regex");
    token
        .captures_iter(duration)
        .map(|cap| {
            let value: i64 = cap[1].parse().unwrap_or(0);
            let unit = match &cap[2] {
                "H" => 3600,
                "M" => 60,
                _ => 1,
            };
            value * unit
        })
        .sum()
}

/// Read the per-film blocks into a title-keyed map.
fn read_film_listings(doc: &Html) -> HashMap<String, ShowtimeListing> {
    let film_sel = Selector::parse("#sessionsByFilmConent .film").expect("static selector");
    let title_sel = Selector::parse(".title").expect("static selector");
    let desc_sel = Selector::parse(".film-desc").expect("static selector");
    let censor_sel = Selector::parse(".censor").expect("static selector");

    let mut films = HashMap::new();
    for film in doc.select(&film_sel) {
        let title = match film.select(&title_sel).next() {
            Some(el) => element_text(el),
            None => continue,
        };
        let desc = film
            .select(&desc_sel)
            .next()
            .map(element_text)
            .unwrap_or_default();

        // The censor element holds the bare rating code; its parent carries
        // the full rating sentence.
        let mut rating_desc = film
            .select(&censor_sel)
            .next()
            .and_then(|censor| censor.parent().and_then(ElementRef::wrap))
            .map(element_text)
            .unwrap_or_default();
        if rating_desc == NOT_RATED_CODE {
            rating_desc = NOT_RATED_FALLBACK.to_string();
        }

        films.insert(title, ShowtimeListing { desc, rating_desc });
    }
    films
}

/// Resolve one session object against the film map, or explain why not.
fn session_to_event(
    session: SessionRecord,
    films: &HashMap<String, ShowtimeListing>,
) -> std::result::Result<Event, String> {
    let name = session.name.ok_or("session has no name")?;
    let film = films
        .get(&name)
        .ok_or_else(|| format!("no film listing matches '{}'", name))?;

    let start_date = session
        .start_date
        .ok_or_else(|| format!("session '{}' has no startDate", name))?;
    let start = DateTime::parse_from_rfc3339(&start_date)
        .map_err(|e| format!("session '{}' has a bad startDate: {}", name, e))?;

    let duration = session
        .duration
        .ok_or_else(|| format!("session '{}' has no duration", name))?;
    let end = start + Duration::seconds(duration_seconds(&duration));

    let location = session
        .location
        .ok_or_else(|| format!("session '{}' has no location", name))?;
    let venue = location
        .name
        .ok_or_else(|| format!("session '{}' has no venue name", name))?;
    let url = session
        .url
        .ok_or_else(|| format!("session '{}' has no purchase URL", name))?;

    let mut event = Event::new(
        format!("{} @ {}", name, venue),
        EventDateTime::new(start),
        EventDateTime::new(end),
    );
    event.location = location.address;
    event.description = Some(format!(
        "{}\n\n{}\n\nRating: {}",
        url, film.desc, film.rating_desc
    ));
    Ok(event)
}

/// Given the HTML of the showtimes page, return the listed calendar events
/// in document order.
pub fn extract(document: &str) -> Result<Vec<Event>> {
    let doc = Html::parse_document(document);
    let films = read_film_listings(&doc);

    let script_sel =
        Selector::parse(r#"script[type="application/ld+json"]"#).expect("static selector");

    let mut events = Vec::new();
    for script in doc.select(&script_sel) {
        let body = script.text().collect::<String>();
        let value: serde_json::Value = match serde_json::from_str(&body) {
            Ok(v) => v,
            Err(e) => {
                eprintln!("Error decoding JSON block: {}", e);
                continue;
            }
        };
        let items = match value.as_array() {
            Some(items) => items,
            // not a list of showtimes
            None => continue,
        };

        for item in items {
            let session: SessionRecord = match serde_json::from_value(item.clone()) {
                Ok(s) => s,
                // not a showtime object
                Err(_) => continue,
            };
            if session.type_tag.as_deref() != Some(SESSION_TYPE) {
                continue;
            }
            match session_to_event(session, &films) {
                Ok(event) => events.push(event),
                Err(reason) => eprintln!("Skipping session: {}", reason),
            }
        }
    }

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
<div id="sessionsByFilmConent">
  <div class="film">
    <h3 class="title">Big Film</h3>
    <p class="film-desc">A sweeping epic
about a very   small town.</p>
    <div class="rating"><span class="censor">PG</span> for mild peril</div>
  </div>
  <div class="film">
    <h3 class="title">Mystery Short</h3>
    <p class="film-desc">Nobody knows.</p>
    <div class="rating"><span class="censor">NR</span></div>
  </div>
</div>
<script type="application/ld+json">
[{"@type":"VisualArtsEvent",
  "startDate":"2026-01-28T14:00:00-05:00",
  "duration":"PT1H30M",
  "location":{"@type":"Place","address":"221 2nd Avenue North, St. Petersburg, Florida, 33701, USA","name":"Green Light Cinema"},
  "name":"Big Film",
  "url":"https://ticketing.example.com/purchase/1",
  "@context":"http://schema.org"},
 {"@type":"Place","name":"Not a showtime"},
 {"@type":"VisualArtsEvent",
  "startDate":"2026-01-29T19:15:00-05:00",
  "duration":"PT45M",
  "location":{"@type":"Place","address":"221 2nd Avenue North","name":"Green Light Cinema"},
  "name":"Unlisted Film",
  "url":"https://ticketing.example.com/purchase/2"},
 {"@type":"VisualArtsEvent",
  "startDate":"2026-01-30T21:00:00-05:00",
  "duration":"PT2H",
  "location":{"@type":"Place","address":"221 2nd Avenue North","name":"Green Light Cinema"},
  "name":"Mystery Short",
  "url":"https://ticketing.example.com/purchase/3"}]
</script>
<script type="application/ld+json">this is not json</script>
<script type="application/ld+json">{"@type":"WebSite","name":"not an array"}</script>
</body></html>"#;

    #[test]
    fn test_extract_joins_sessions_with_film_blocks() {
        let events = extract(PAGE).expect("Should extract");

        // Unmatched "Unlisted Film" is skipped, siblings survive
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].summary, "Big Film @ Green Light Cinema");
        assert_eq!(events[1].summary, "Mystery Short @ Green Light Cinema");
        assert_eq!(
            events[0].location.as_deref(),
            Some("221 2nd Avenue North, St. Petersburg, Florida, 33701, USA")
        );
        // Extractor never assigns backend identity fields
        assert!(events[0].id.is_none());
        assert!(events[0].etag.is_none());
        assert!(events[0].html_link.is_none());
    }

    #[test]
    fn test_duration_arithmetic() {
        let events = extract(PAGE).expect("Should extract");
        let big = &events[0];
        assert_eq!(big.start.date_time.to_rfc3339(), "2026-01-28T14:00:00-05:00");
        assert_eq!(big.end.date_time.to_rfc3339(), "2026-01-28T15:30:00-05:00");
    }

    #[test]
    fn test_duration_token_combinations() {
        assert_eq!(duration_seconds("PT1H30M"), 5400);
        assert_eq!(duration_seconds("PT45M"), 2700);
        assert_eq!(duration_seconds("PT2H"), 7200);
        assert_eq!(duration_seconds("PT1H2M3S"), 3723);
        assert_eq!(duration_seconds("PT"), 0);
    }

    #[test]
    fn test_description_composition_and_hard_wrap_collapse() {
        let events = extract(PAGE).expect("Should extract");
        let desc = events[0].description.as_deref().expect("Should have description");
        assert_eq!(
            desc,
            "https://ticketing.example.com/purchase/1\n\n\
             A sweeping epic about a very small town.\n\n\
             Rating: PG for mild peril"
        );
    }

    #[test]
    fn test_not_rated_code_rewritten_to_fallback_sentence() {
        let events = extract(PAGE).expect("Should extract");
        let desc = events[1].description.as_deref().expect("Should have description");
        assert!(desc.ends_with("Rating: This film is Not Rated."), "got: {}", desc);
        assert!(!desc.ends_with("Rating: NR"));
    }

    #[test]
    fn test_bad_json_block_does_not_abort_document() {
        // PAGE contains one malformed block and one non-array block after the
        // valid one; both are skipped and extraction still succeeds.
        let events = extract(PAGE).expect("Should extract");
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_empty_document_yields_empty_set() {
        let events = extract("<html><body></body></html>").expect("Should extract");
        assert!(events.is_empty());
    }
}
