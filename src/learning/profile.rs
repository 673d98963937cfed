//! Pet profile persistence — lazy creation and partial updates.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::learning::types::UserProfile;
use crate::learning::{LearningError, LearningResult};

/// Starting health for a freshly created pet.
pub const DEFAULT_HEALTH: i64 = 80;

/// Partial profile update. `None` fields are left untouched.
#[derive(Debug, Default, Clone)]
pub struct ProfileChanges {
    pub pet_name: Option<String>,
    pub language_preference: Option<String>,
    pub email: Option<String>,
}

pub(crate) fn profile_from_row(row: &Row<'_>) -> rusqlite::Result<UserProfile> {
    Ok(UserProfile {
        id: row.get(0)?,
        email: row.get(1)?,
        pet_name: row.get(2)?,
        intelligence: row.get(3)?,
        health: row.get(4)?,
        level: row.get(5)?,
        day_streak: row.get(6)?,
        last_activity_date: row.get(7)?,
        language_preference: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

const PROFILE_COLUMNS: &str = "id, email, pet_name, intelligence, health, level, day_streak, \
     last_activity_date, language_preference, created_at, updated_at";

/// Fetch a profile by user id.
pub fn get_profile(conn: &Connection, user_id: &str) -> LearningResult<Option<UserProfile>> {
    let profile = conn
        .query_row(
            &format!("SELECT {PROFILE_COLUMNS} FROM users_profile WHERE id = ?1"),
            params![user_id],
            profile_from_row,
        )
        .optional()?;
    Ok(profile)
}

/// Fetch a profile, erroring if it does not exist.
pub fn require_profile(conn: &Connection, user_id: &str) -> LearningResult<UserProfile> {
    get_profile(conn, user_id)?.ok_or_else(|| LearningError::ProfileNotFound(user_id.to_string()))
}

/// Fetch the caller's profile, creating a default pet on first sight.
pub fn get_or_create_profile(
    conn: &Connection,
    user_id: &str,
    email: Option<&str>,
    default_pet_name: &str,
    now: DateTime<Utc>,
) -> LearningResult<UserProfile> {
    if let Some(existing) = get_profile(conn, user_id)? {
        return Ok(existing);
    }

    let now_str = now.to_rfc3339();
    let today = now.date_naive().to_string();
    conn.execute(
        "INSERT INTO users_profile \
         (id, email, pet_name, intelligence, health, level, day_streak, last_activity_date, created_at, updated_at) \
         VALUES (?1, ?2, ?3, 0, ?4, 1, 0, ?5, ?6, ?6)",
        params![user_id, email, default_pet_name, DEFAULT_HEALTH, today, now_str],
    )?;
    tracing::info!(user = %user_id, "created default pet profile");

    require_profile(conn, user_id)
}

/// Apply a partial update to the caller's profile.
///
/// Only identity fields go through here — stat changes use the clamped
/// mutators in [`crate::learning::stats`].
pub fn update_profile(
    conn: &Connection,
    user_id: &str,
    changes: &ProfileChanges,
    now: DateTime<Utc>,
) -> LearningResult<UserProfile> {
    let current = require_profile(conn, user_id)?;

    let pet_name = changes.pet_name.as_deref().unwrap_or(&current.pet_name);
    let language = changes
        .language_preference
        .as_deref()
        .unwrap_or(&current.language_preference);
    let email = changes
        .email
        .as_deref()
        .or(current.email.as_deref());

    conn.execute(
        "UPDATE users_profile SET pet_name = ?1, language_preference = ?2, email = ?3, updated_at = ?4 \
         WHERE id = ?5",
        params![pet_name, language, email, now.to_rfc3339(), user_id],
    )?;

    crate::learning::activity::log(
        conn,
        "profile",
        user_id,
        Some(&serde_json::json!({"pet_name": pet_name})),
        now,
    )?;

    require_profile(conn, user_id)
}
