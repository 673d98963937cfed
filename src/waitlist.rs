//! Launch waitlist storage.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::Serialize;

/// A waitlist signup.
#[derive(Debug, Clone, Serialize)]
pub struct WaitlistEntry {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub created_at: String,
}

/// Add an email to the waitlist. Duplicate signups return the existing entry.
pub fn add_entry(
    conn: &Connection,
    email: &str,
    name: Option<&str>,
    now: DateTime<Utc>,
) -> rusqlite::Result<WaitlistEntry> {
    let id = uuid::Uuid::now_v7().to_string();
    conn.execute(
        "INSERT INTO waitlist (id, email, name, created_at) VALUES (?1, ?2, ?3, ?4) \
         ON CONFLICT(email) DO NOTHING",
        params![id, email, name, now.to_rfc3339()],
    )?;

    conn.query_row(
        "SELECT id, email, name, created_at FROM waitlist WHERE email = ?1",
        params![email],
        |row| {
            Ok(WaitlistEntry {
                id: row.get(0)?,
                email: row.get(1)?,
                name: row.get(2)?,
                created_at: row.get(3)?,
            })
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[test]
    fn signup_and_duplicate_are_quiet() {
        let conn = db::open_memory_database().unwrap();

        let first = add_entry(&conn, "kit@example.com", Some("Kit"), Utc::now()).unwrap();
        assert_eq!(first.email, "kit@example.com");
        assert_eq!(first.name.as_deref(), Some("Kit"));

        let second = add_entry(&conn, "kit@example.com", None, Utc::now()).unwrap();
        assert_eq!(second.id, first.id, "duplicate signup keeps the original row");

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM waitlist", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
