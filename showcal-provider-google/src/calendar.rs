//! Calendar v3 REST transport.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tokio::sync::Mutex;

use showcal_core::{CalendarBackend, Error, Event, Result};

use crate::auth::{fetch_access_token, AccessToken, ServiceAccountKey};

const API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// One rule from a calendar's access control list.
#[derive(Debug, Clone, Deserialize)]
pub struct AclRule {
    #[serde(default)]
    pub id: String,
    pub role: String,
    pub scope: AclScope,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AclScope {
    #[serde(rename = "type")]
    pub scope_type: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// A calendar visible to the service account.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarListEntry {
    pub id: String,
    #[serde(default)]
    pub summary: String,
}

#[derive(Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

/// Interface for interacting with one Google Calendar.
pub struct GoogleCalendar {
    http: reqwest::Client,
    key: ServiceAccountKey,
    calendar_id: Option<String>,
    token: Mutex<Option<AccessToken>>,
}

impl GoogleCalendar {
    pub fn new(key: ServiceAccountKey, calendar_id: Option<String>) -> Self {
        GoogleCalendar {
            http: reqwest::Client::new(),
            key,
            calendar_id,
            token: Mutex::new(None),
        }
    }

    fn calendar_id(&self) -> Result<&str> {
        self.calendar_id
            .as_deref()
            .ok_or_else(|| Error::config("no calendar ID provided"))
    }

    /// Current bearer token, refreshed through the service-account flow
    /// when missing or expired.
    async fn bearer(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        match cached.as_ref() {
            Some(token) if !token.is_expired() => Ok(token.token.clone()),
            _ => {
                let token = fetch_access_token(&self.http, &self.key).await?;
                let bearer = token.token.clone();
                *cached = Some(token);
                Ok(bearer)
            }
        }
    }

    async fn check(response: reqwest::Response, what: &str) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "could not read error response".to_string());
        Err(Error::transport(format!(
            "{}: HTTP {} - {}",
            what, status, body
        )))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        what: &str,
    ) -> Result<T> {
        let bearer = self.bearer().await?;
        let response = self
            .http
            .get(url)
            .query(query)
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|e| Error::transport(format!("{}: {}", what, e)))?;
        Self::check(response, what)
            .await?
            .json()
            .await
            .map_err(|e| Error::transport(format!("{}: bad response body: {}", what, e)))
    }

    /// List all calendars the service account has access to.
    pub async fn list_calendars(&self) -> Result<Vec<CalendarListEntry>> {
        let url = format!("{}/users/me/calendarList", API_BASE);
        let page: Page<CalendarListEntry> = self
            .get_json(&url, &[], "Failed to list calendars")
            .await?;
        Ok(page.items)
    }

    /// Create a new calendar, grant public read access, and return its ID.
    pub async fn create_calendar(&mut self, summary: &str) -> Result<String> {
        let bearer = self.bearer().await?;
        let url = format!("{}/calendars", API_BASE);
        let response = self
            .http
            .post(&url)
            .bearer_auth(bearer)
            .json(&serde_json::json!({ "summary": summary }))
            .send()
            .await
            .map_err(|e| Error::transport(format!("Failed to create calendar: {}", e)))?;
        let created: serde_json::Value =
            Self::check(response, "Failed to create calendar")
                .await?
                .json()
                .await
                .map_err(|e| Error::transport(format!("bad create response: {}", e)))?;

        let id = created
            .get("id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::transport("create response carried no calendar id"))?
            .to_string();
        self.calendar_id = Some(id.clone());
        eprintln!("Calendar created with ID: {}", id);

        self.insert_acl("reader", "default", None).await?;
        eprintln!("Calendar ACL updated to allow public read access");
        Ok(id)
    }

    /// Delete the calendar itself.
    pub async fn delete_calendar(&self) -> Result<()> {
        let bearer = self.bearer().await?;
        let url = format!("{}/calendars/{}", API_BASE, self.calendar_id()?);
        let response = self
            .http
            .delete(&url)
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|e| Error::transport(format!("Failed to delete calendar: {}", e)))?;
        Self::check(response, "Failed to delete calendar").await?;
        Ok(())
    }

    /// Get the ACL of the calendar.
    pub async fn acls(&self) -> Result<Vec<AclRule>> {
        let url = format!("{}/calendars/{}/acl", API_BASE, self.calendar_id()?);
        let page: Page<AclRule> = self.get_json(&url, &[], "Failed to fetch ACL").await?;
        Ok(page.items)
    }

    async fn insert_acl(
        &self,
        role: &str,
        scope_type: &str,
        value: Option<&str>,
    ) -> Result<()> {
        let bearer = self.bearer().await?;
        let url = format!("{}/calendars/{}/acl", API_BASE, self.calendar_id()?);

        let mut scope = serde_json::json!({ "type": scope_type });
        if let Some(value) = value {
            scope["value"] = serde_json::json!(value);
        }
        let response = self
            .http
            .post(&url)
            .bearer_auth(bearer)
            .json(&serde_json::json!({ "role": role, "scope": scope }))
            .send()
            .await
            .map_err(|e| Error::transport(format!("Failed to insert ACL rule: {}", e)))?;
        Self::check(response, "Failed to insert ACL rule").await?;
        Ok(())
    }

    async fn delete_acl(&self, rule_id: &str) -> Result<()> {
        let bearer = self.bearer().await?;
        let url = format!(
            "{}/calendars/{}/acl/{}",
            API_BASE,
            self.calendar_id()?,
            rule_id
        );
        let response = self
            .http
            .delete(&url)
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|e| Error::transport(format!("Failed to delete ACL rule: {}", e)))?;
        Self::check(response, "Failed to delete ACL rule").await?;
        Ok(())
    }

    /// Grant `email` write access.
    pub async fn add_writer(&self, email: &str) -> Result<()> {
        self.insert_acl("writer", "user", Some(email)).await?;
        eprintln!("User {} added to ACL with role writer", email);
        Ok(())
    }

    /// Revoke `email`'s rule, whatever its role.
    pub async fn remove_writer(&self, email: &str) -> Result<()> {
        for acl in self.acls().await? {
            if acl.scope.scope_type == "user" && acl.scope.value.as_deref() == Some(email) {
                self.delete_acl(&acl.id).await?;
                eprintln!("User {} removed from ACL", email);
                return Ok(());
            }
        }
        Err(Error::transport(format!("User {} not found in ACL", email)))
    }

    /// Grant `email` ownership.
    pub async fn add_owner(&self, email: &str) -> Result<()> {
        self.insert_acl("owner", "user", Some(email)).await?;
        eprintln!("User {} added to ACL with role owner", email);
        Ok(())
    }

    /// Revoke `email`'s owner rule.
    pub async fn remove_owner(&self, email: &str) -> Result<()> {
        for acl in self.acls().await? {
            if acl.scope.scope_type == "user"
                && acl.scope.value.as_deref() == Some(email)
                && acl.role == "owner"
            {
                self.delete_acl(&acl.id).await?;
                eprintln!("Owner {} removed from ACL", email);
                return Ok(());
            }
        }
        Err(Error::transport(format!("Owner {} not found in ACL", email)))
    }
}

#[async_trait]
impl CalendarBackend for GoogleCalendar {
    async fn read_events(&self) -> Result<Vec<Event>> {
        let url = format!("{}/calendars/{}/events", API_BASE, self.calendar_id()?);

        let mut events = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut query = vec![
                ("timeMin", Utc::now().to_rfc3339()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }

            let page: Page<serde_json::Value> = self
                .get_json(&url, &query, "Failed to fetch events")
                .await?;

            for item in page.items {
                match serde_json::from_value::<Event>(item) {
                    Ok(event) => events.push(event),
                    // e.g. an all-day entry someone added by hand
                    Err(e) => eprintln!("Skipping unreadable calendar entry: {}", e),
                }
            }

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        Ok(events)
    }

    async fn write_events(&self, events: Vec<Event>) -> Result<Vec<Event>> {
        let url = format!("{}/calendars/{}/events", API_BASE, self.calendar_id()?);

        let mut written = Vec::with_capacity(events.len());
        for event in events {
            let bearer = self.bearer().await?;
            let response = self
                .http
                .post(&url)
                .query(&[("supportsAttachments", "true")])
                .bearer_auth(bearer)
                .json(&event)
                .send()
                .await
                .map_err(|e| {
                    Error::transport(format!("Failed to insert event '{}': {}", event.summary, e))
                })?;
            let created: Event = Self::check(response, "Failed to insert event")
                .await?
                .json()
                .await
                .map_err(|e| Error::transport(format!("bad insert response: {}", e)))?;
            written.push(created);
        }
        Ok(written)
    }

    async fn delete_events(&self, ids: &[String]) -> Result<()> {
        for id in ids {
            let bearer = self.bearer().await?;
            let url = format!(
                "{}/calendars/{}/events/{}",
                API_BASE,
                self.calendar_id()?,
                id
            );
            let response = self
                .http
                .delete(&url)
                .bearer_auth(bearer)
                .send()
                .await
                .map_err(|e| Error::transport(format!("Failed to delete event {}: {}", id, e)))?;

            // Already-gone events are fine: the goal is absence.
            if response.status() == reqwest::StatusCode::NOT_FOUND
                || response.status() == reqwest::StatusCode::GONE
            {
                continue;
            }
            Self::check(response, "Failed to delete event").await?;
        }
        if !ids.is_empty() {
            eprintln!("Events deleted: {}", ids.join(", "));
        }
        Ok(())
    }
}
