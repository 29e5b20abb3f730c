//! Calendar administration: creation, deletion, and ACL management.
//!
//! These are thin pass-throughs to the Google backend with dry-run guards;
//! none of them participate in reconciliation.

use anyhow::Result;

use crate::config::AppConfig;

pub async fn list(cfg: &AppConfig) -> Result<()> {
    if cfg.dry_run {
        eprintln!("Dry run: would list calendars");
        return Ok(());
    }
    let cal = cfg.google_calendar()?;
    let calendars = cal.list_calendars().await?;
    let lines: Vec<String> = calendars
        .iter()
        .map(|c| format!("{}: {}", c.id, c.summary))
        .collect();
    println!("{}", serde_json::to_string_pretty(&lines)?);
    Ok(())
}

pub async fn create(cfg: &AppConfig, name: Option<String>) -> Result<()> {
    let name = name.unwrap_or_else(|| "Green Light Cinema Showtimes".to_string());
    if cfg.dry_run {
        eprintln!("Dry run: would create calendar '{}' and print its ID", name);
        return Ok(());
    }
    let mut cal = cfg.google_calendar()?;
    let id = cal.create_calendar(&name).await?;
    println!("{}", id);
    Ok(())
}

pub async fn delete(cfg: &AppConfig) -> Result<()> {
    if cfg.dry_run {
        eprintln!("Dry run: would delete the calendar");
        return Ok(());
    }
    let cal = cfg.google_calendar()?;
    cal.delete_calendar().await?;
    Ok(())
}

pub async fn print_acl(cfg: &AppConfig) -> Result<()> {
    if cfg.dry_run {
        eprintln!("dry run prevented fetching acls");
        return Ok(());
    }
    let cal = cfg.google_calendar()?;
    let acls = cal.acls().await?;
    let lines: Vec<String> = acls
        .iter()
        .map(|acl| {
            format!(
                "{}/{}: {}",
                acl.scope.scope_type,
                acl.role,
                acl.scope.value.as_deref().unwrap_or("")
            )
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&lines)?);
    Ok(())
}

pub async fn add_writer(cfg: &AppConfig, email: &str) -> Result<()> {
    if cfg.dry_run {
        eprintln!("Dry run: would add writer {}", email);
        return Ok(());
    }
    Ok(cfg.google_calendar()?.add_writer(email).await?)
}

pub async fn remove_writer(cfg: &AppConfig, email: &str) -> Result<()> {
    if cfg.dry_run {
        eprintln!("Dry run: would remove user {} from calendar ACL", email);
        return Ok(());
    }
    Ok(cfg.google_calendar()?.remove_writer(email).await?)
}

pub async fn add_owner(cfg: &AppConfig, email: &str) -> Result<()> {
    if cfg.dry_run {
        eprintln!("Dry run: would add owner {}", email);
        return Ok(());
    }
    Ok(cfg.google_calendar()?.add_owner(email).await?)
}

pub async fn remove_owner(cfg: &AppConfig, email: &str) -> Result<()> {
    if cfg.dry_run {
        eprintln!("Dry run: would remove owner {} from calendar ACL", email);
        return Ok(());
    }
    Ok(cfg.google_calendar()?.remove_owner(email).await?)
}
