//! Aggregate learning statistics for the `stats` CLI command.

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// Snapshot of the whole store (or one user's slice of it).
#[derive(Debug, Serialize)]
pub struct LearningSummary {
    pub profiles: u64,
    pub topics: u64,
    pub sessions: u64,
    pub posts: u64,
    pub reviews_total: u64,
    pub reviews_open: u64,
    pub reviews_due: u64,
    /// Topic counts keyed by mastery level 0..=5.
    pub mastery_distribution: HashMap<i64, u64>,
    pub avg_mastery: f64,
    pub db_size_bytes: u64,
}

/// Compute store statistics.
///
/// If `user_id` is provided, counts are filtered to that user. `db_path` is
/// used for file size calculation; pass None for in-memory databases.
pub fn learning_summary(
    conn: &Connection,
    user_id: Option<&str>,
    now: DateTime<Utc>,
    db_path: Option<&Path>,
) -> Result<LearningSummary> {
    let count = |sql_all: &str, sql_user: &str| -> Result<u64> {
        let n: i64 = match user_id {
            Some(u) => conn.query_row(sql_user, params![u], |row| row.get(0))?,
            None => conn.query_row(sql_all, [], |row| row.get(0))?,
        };
        Ok(n as u64)
    };

    let profiles = count(
        "SELECT COUNT(*) FROM users_profile",
        "SELECT COUNT(*) FROM users_profile WHERE id = ?1",
    )?;
    let topics = count(
        "SELECT COUNT(*) FROM topics",
        "SELECT COUNT(*) FROM topics WHERE user_id = ?1",
    )?;
    let sessions = count(
        "SELECT COUNT(*) FROM teaching_sessions",
        "SELECT COUNT(*) FROM teaching_sessions WHERE user_id = ?1",
    )?;
    let posts = count(
        "SELECT COUNT(*) FROM posts",
        "SELECT COUNT(*) FROM posts WHERE user_id = ?1",
    )?;
    let reviews_total = count(
        "SELECT COUNT(*) FROM reviews",
        "SELECT COUNT(*) FROM reviews WHERE user_id = ?1",
    )?;
    let reviews_open = count(
        "SELECT COUNT(*) FROM reviews WHERE completed_at IS NULL",
        "SELECT COUNT(*) FROM reviews WHERE completed_at IS NULL AND user_id = ?1",
    )?;

    let now_str = now.to_rfc3339();
    let reviews_due: i64 = match user_id {
        Some(u) => conn.query_row(
            "SELECT COUNT(*) FROM reviews \
             WHERE completed_at IS NULL AND scheduled_date < ?1 AND user_id = ?2",
            params![now_str, u],
            |row| row.get(0),
        )?,
        None => conn.query_row(
            "SELECT COUNT(*) FROM reviews WHERE completed_at IS NULL AND scheduled_date < ?1",
            params![now_str],
            |row| row.get(0),
        )?,
    };

    let mastery_distribution = mastery_distribution(conn, user_id)?;
    let avg_mastery: f64 = match user_id {
        Some(u) => conn.query_row(
            "SELECT COALESCE(AVG(mastery_level), 0) FROM topics WHERE user_id = ?1",
            params![u],
            |row| row.get(0),
        )?,
        None => conn.query_row(
            "SELECT COALESCE(AVG(mastery_level), 0) FROM topics",
            [],
            |row| row.get(0),
        )?,
    };

    let db_size_bytes = db_path
        .and_then(|p| std::fs::metadata(p).ok())
        .map(|m| m.len())
        .unwrap_or(0);

    Ok(LearningSummary {
        profiles,
        topics,
        sessions,
        posts,
        reviews_total,
        reviews_open,
        reviews_due: reviews_due as u64,
        mastery_distribution,
        avg_mastery,
        db_size_bytes,
    })
}

/// Topic counts per mastery level, with all six levels present.
fn mastery_distribution(
    conn: &Connection,
    user_id: Option<&str>,
) -> Result<HashMap<i64, u64>> {
    let mut map = HashMap::new();
    for level in 0..=5 {
        map.insert(level, 0);
    }

    let rows: Vec<(i64, i64)> = match user_id {
        Some(u) => {
            let mut stmt = conn.prepare(
                "SELECT mastery_level, COUNT(*) FROM topics WHERE user_id = ?1 GROUP BY mastery_level",
            )?;
            let collected = stmt
                .query_map(params![u], |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<Result<Vec<_>, _>>()?;
            collected
        }
        None => {
            let mut stmt = conn
                .prepare("SELECT mastery_level, COUNT(*) FROM topics GROUP BY mastery_level")?;
            let collected = stmt
                .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<Result<Vec<_>, _>>()?;
            collected
        }
    };

    for (level, count) in rows {
        map.insert(level, count as u64);
    }
    Ok(map)
}
