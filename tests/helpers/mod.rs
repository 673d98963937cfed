#![allow(dead_code)]

use aomigo::db;
use aomigo::learning::profile::get_or_create_profile;
use aomigo::learning::schedule::{FIRST_REVIEW_MINUTES, REVIEW_INTERVALS};
use aomigo::learning::sessions;
use aomigo::learning::types::{InputType, TeachingSession};
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::Connection;

/// Open a fresh in-memory database with schema and migrations applied.
pub fn test_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.pragma_update(None, "foreign_keys", "ON").unwrap();
    db::schema::init_schema(&conn).unwrap();
    db::migrations::run_migrations(&conn).unwrap();
    conn
}

/// A fixed "now" so scheduling assertions are exact.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap()
}

/// Create a profile for `user_id` with default pet stats.
pub fn seed_profile(conn: &Connection, user_id: &str) {
    get_or_create_profile(conn, user_id, None, "Aomigo", fixed_now()).unwrap();
}

/// Record a teaching session with the given topics at `now`.
pub fn teach(
    conn: &mut Connection,
    user_id: &str,
    raw_input: &str,
    topic_names: &[&str],
    now: DateTime<Utc>,
) -> TeachingSession {
    let topics: Vec<String> = topic_names.iter().map(|t| t.to_string()).collect();
    sessions::record_session(
        conn,
        user_id,
        None,
        InputType::Text,
        raw_input,
        &topics,
        "What else can you tell me?",
        now,
        &REVIEW_INTERVALS,
        FIRST_REVIEW_MINUTES,
    )
    .unwrap()
}
