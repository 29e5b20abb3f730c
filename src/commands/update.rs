//! The sync run: read, extract, reconcile, apply.

use anyhow::Result;
use showcal_core::sync_events;

use crate::config::AppConfig;
use crate::sources;

pub async fn run(cfg: &AppConfig) -> Result<()> {
    let fresh = sources::read_showtimes(cfg).await?;
    let backend = sources::backend(cfg)?;

    let report = sync_events(backend.as_ref(), fresh, cfg.dry_run).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
