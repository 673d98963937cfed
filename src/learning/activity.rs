//! Append-only activity log.
//!
//! Every domain operation leaves a row here — teaching, answers, review
//! scheduling and completion, streak changes, community writes. The table is
//! never updated or deleted from.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

/// Write an entry to the activity_log table.
pub fn log(
    conn: &Connection,
    operation: &str,
    user_id: &str,
    details: Option<&serde_json::Value>,
    now: DateTime<Utc>,
) -> rusqlite::Result<()> {
    let details_json = details.map(|d| d.to_string());
    conn.execute(
        "INSERT INTO activity_log (operation, user_id, details, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![operation, user_id, details_json, now.to_rfc3339()],
    )?;
    Ok(())
}
