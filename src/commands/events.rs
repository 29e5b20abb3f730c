//! Event administration: inspect, delete, clear.

use anyhow::Result;

use crate::config::AppConfig;
use crate::sources;

pub async fn read_calendar(cfg: &AppConfig) -> Result<()> {
    let backend = sources::backend(cfg)?;
    let events = backend.read_events().await?;
    println!("{}", serde_json::to_string_pretty(&events)?);
    Ok(())
}

pub async fn read_showtimes(cfg: &AppConfig) -> Result<()> {
    let events = sources::read_showtimes(cfg).await?;
    println!("{}", serde_json::to_string_pretty(&events)?);
    Ok(())
}

pub async fn delete(cfg: &AppConfig, ids: &[String]) -> Result<()> {
    if cfg.dry_run {
        eprintln!(
            "Dry run: would delete events: {}",
            serde_json::to_string_pretty(ids)?
        );
        return Ok(());
    }
    let backend = sources::backend(cfg)?;
    backend.delete_events(ids).await?;
    Ok(())
}

pub async fn clear(cfg: &AppConfig) -> Result<()> {
    let backend = sources::backend(cfg)?;
    let events = backend.read_events().await?;
    let ids: Vec<String> = events.into_iter().filter_map(|e| e.id).collect();

    if cfg.dry_run {
        eprintln!(
            "Dry run: would delete events: {}",
            serde_json::to_string_pretty(&ids)?
        );
        return Ok(());
    }
    backend.delete_events(&ids).await?;
    Ok(())
}
