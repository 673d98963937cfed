//! CLI `doctor` command — run database diagnostics and print a health report.

use anyhow::{Context, Result};

use crate::config::AomigoConfig;
use crate::db;

/// Run database diagnostics and print a health report.
pub fn doctor(config: &AomigoConfig) -> Result<()> {
    let db_path = config.resolved_db_path();

    if !db_path.exists() {
        println!("Database: not found at {}", db_path.display());
        println!("Run `aomigo serve` to initialize.");
        return Ok(());
    }

    let file_size = std::fs::metadata(&db_path)
        .map(|m| m.len())
        .unwrap_or(0);

    let conn = db::open_database(&db_path)
        .context("failed to open database (may be corrupt)")?;

    let report = db::check_database_health(&conn)
        .context("failed to run health check")?;

    let configured_ladder = config
        .review
        .intervals
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(",");

    println!("AOMIGO Health Report");
    println!("====================");
    println!();
    println!("Database:          {}", db_path.display());
    println!("File size:         {}", format_bytes(file_size));
    println!("Schema version:    {}", report.schema_version);
    println!();
    println!("Review ladder:");
    println!("  Stored:          {}", report.review_ladder.as_deref().unwrap_or("(not set)"));
    println!("  Configured:      {configured_ladder}");
    if let Some(ref stored) = report.review_ladder {
        if stored != &configured_ladder {
            println!("  WARNING: ladder mismatch! Existing schedules keep their old spacing.");
        } else {
            println!("  Status:          OK (match)");
        }
    }
    println!();
    println!("Row counts:");
    println!("  Profiles:        {}", report.profile_count);
    println!("  Topics:          {}", report.topic_count);
    println!("  Reviews:         {}", report.review_count);
    println!("  Sessions:        {}", report.session_count);
    println!("  Posts:           {}", report.post_count);
    println!("  Activity log:    {}", report.log_count);
    println!();
    if report.integrity_ok {
        println!("Integrity check:   PASSED");
    } else {
        println!("Integrity check:   FAILED ({})", report.integrity_details);
    }

    if !report.integrity_ok {
        println!();
        println!("Recovery steps:");
        println!("  1. Restore from a backup: cp backup.db ~/.aomigo/aomigo.db");
        println!("  2. Or start fresh: rm ~/.aomigo/aomigo.db && aomigo serve");
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
