//! Sync orchestration.
//!
//! Sequences one run: read the calendar, reconcile against the fresh
//! showtimes, publish the creations, delete the removals. Dry run computes
//! the same decision but replaces both mutation phases with reporting.
//!
//! Creation and deletion are independent phases with no rollback: a failure
//! partway through either leaves the already-applied changes in effect and
//! propagates.

use serde::Serialize;

use crate::backend::CalendarBackend;
use crate::error::Result;
use crate::event::Event;
use crate::extract::extract;
use crate::reconcile::reconcile;

/// What a run created and deleted.
#[derive(Debug, Serialize)]
pub struct SyncReport {
    /// Created events; outside dry run these carry backend-assigned ids.
    pub created: Vec<Event>,
    /// Ids of deleted events.
    pub deleted: Vec<String>,
    /// Whether mutations were suppressed.
    pub dry_run: bool,
}

/// Reconcile the backend against a fresh event set and apply the decision.
pub async fn sync_events(
    backend: &dyn CalendarBackend,
    fresh: Vec<Event>,
    dry_run: bool,
) -> Result<SyncReport> {
    let backend_events = backend.read_events().await?;
    let plan = reconcile(&backend_events, &fresh)?;

    eprintln!("Window start: {}", plan.window.start.to_rfc3339());
    eprintln!("Window end: {}", plan.window.end.to_rfc3339());
    for event in &plan.to_create {
        eprintln!("Adding event {}", event);
    }
    for event in &plan.to_delete {
        eprintln!("Deleting event {}", event);
    }

    let delete_ids: Vec<String> = plan
        .to_delete
        .iter()
        .filter_map(|e| e.id.clone())
        .collect();

    if dry_run {
        eprintln!(
            "Dry run: would write {} and delete {} events",
            plan.to_create.len(),
            delete_ids.len()
        );
        return Ok(SyncReport {
            created: plan.to_create,
            deleted: delete_ids,
            dry_run: true,
        });
    }

    let created = backend.write_events(plan.to_create).await?;
    eprintln!("Successfully wrote {} events", created.len());

    backend.delete_events(&delete_ids).await?;
    eprintln!("Deleted {} events", delete_ids.len());

    Ok(SyncReport {
        created,
        deleted: delete_ids,
        dry_run: false,
    })
}

/// Extract showtimes from a scraped listing document, then sync.
pub async fn sync_document(
    backend: &dyn CalendarBackend,
    document: &str,
    dry_run: bool,
) -> Result<SyncReport> {
    let fresh = extract(document)?;
    sync_events(backend, fresh, dry_run).await
}
