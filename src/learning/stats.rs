//! Pet stat mutation — clamped intelligence/health changes, level derivation,
//! and the daily streak update.
//!
//! All writes go through here so the range invariants hold no matter what the
//! caller passes: intelligence stays in `[0, 1000]`, health in `[0, 100]`,
//! level in `[1, 10]`, and the streak never goes negative.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection};
use serde::Serialize;

use crate::learning::activity;
use crate::learning::profile::require_profile;
use crate::learning::types::PetMood;
use crate::learning::LearningResult;

/// Upper bound for the intelligence stat.
pub const MAX_INTELLIGENCE: i64 = 1000;
/// Upper bound for the health stat.
pub const MAX_HEALTH: i64 = 100;
/// Upper bound for the pet level.
pub const MAX_LEVEL: i64 = 10;

/// Health gained for keeping the streak alive another day.
const STREAK_HEALTH_BONUS: i64 = 2;
/// Health lost per missed day, charged for at most three days.
const MISSED_DAY_PENALTY: i64 = 5;
const MAX_PENALIZED_DAYS: i64 = 3;

/// Outcome of an intelligence gain.
#[derive(Debug, Serialize)]
pub struct IntelligenceGain {
    pub intelligence: i64,
    pub level: i64,
    pub leveled_up: bool,
}

/// Outcome of the daily streak update.
#[derive(Debug, Serialize)]
pub struct StreakUpdate {
    pub day_streak: i64,
    pub health_delta: i64,
    /// False when the update was a same-day no-op.
    pub changed: bool,
}

pub fn clamp_intelligence(value: i64) -> i64 {
    value.clamp(0, MAX_INTELLIGENCE)
}

pub fn clamp_health(value: i64) -> i64 {
    value.clamp(0, MAX_HEALTH)
}

/// Level is derived from intelligence: one level per 100 points, capped at 10.
pub fn level_for_intelligence(intelligence: i64) -> i64 {
    (intelligence / 100 + 1).min(MAX_LEVEL)
}

/// The pet's mood, read off its health.
pub fn mood_for_health(health: i64) -> PetMood {
    if health < 20 {
        PetMood::Sleepy
    } else if health < 60 {
        PetMood::Happy
    } else if health < 85 {
        PetMood::Excited
    } else {
        PetMood::Energized
    }
}

/// Add intelligence points (clamped) and recompute the level.
pub fn add_intelligence(
    conn: &Connection,
    user_id: &str,
    points: i64,
    now: DateTime<Utc>,
) -> LearningResult<IntelligenceGain> {
    let profile = require_profile(conn, user_id)?;

    let intelligence = clamp_intelligence(profile.intelligence + points);
    let level = level_for_intelligence(intelligence);

    conn.execute(
        "UPDATE users_profile SET intelligence = ?1, level = ?2, updated_at = ?3 WHERE id = ?4",
        params![intelligence, level, now.to_rfc3339(), user_id],
    )?;

    Ok(IntelligenceGain {
        intelligence,
        level,
        leveled_up: level > profile.level,
    })
}

/// Add (or subtract) health, clamped to `[0, 100]`.
pub fn add_health(
    conn: &Connection,
    user_id: &str,
    delta: i64,
    now: DateTime<Utc>,
) -> LearningResult<i64> {
    let profile = require_profile(conn, user_id)?;

    let health = clamp_health(profile.health + delta);
    conn.execute(
        "UPDATE users_profile SET health = ?1, updated_at = ?2 WHERE id = ?3",
        params![health, now.to_rfc3339(), user_id],
    )?;

    Ok(health)
}

/// Decide the streak transition without touching the database.
///
/// Same day: no-op. Yesterday: streak + 1 and a small health bonus.
/// Anything older: reset to zero with a penalty proportional to the days
/// missed, capped at three days' worth. A stored date in the future (clock
/// skew) resets without penalty.
fn streak_transition(last_activity: NaiveDate, today: NaiveDate, streak: i64) -> StreakUpdate {
    if last_activity == today {
        return StreakUpdate {
            day_streak: streak,
            health_delta: 0,
            changed: false,
        };
    }

    let yesterday = today.pred_opt().unwrap_or(today);
    if last_activity == yesterday {
        return StreakUpdate {
            day_streak: streak + 1,
            health_delta: STREAK_HEALTH_BONUS,
            changed: true,
        };
    }

    let days_missed = ((today - last_activity).num_days() - 1).max(0);
    StreakUpdate {
        day_streak: 0,
        health_delta: -MISSED_DAY_PENALTY * days_missed.min(MAX_PENALIZED_DAYS),
        changed: true,
    }
}

/// Run the daily streak update for a user and persist the outcome.
///
/// Idempotent within one calendar day: a second call on the same date leaves
/// the profile untouched.
pub fn update_streak(
    conn: &Connection,
    user_id: &str,
    now: DateTime<Utc>,
) -> LearningResult<StreakUpdate> {
    let profile = require_profile(conn, user_id)?;

    let today = now.date_naive();
    let last_activity = profile
        .last_activity_date
        .parse::<NaiveDate>()
        .unwrap_or(today);

    let update = streak_transition(last_activity, today, profile.day_streak);
    if !update.changed {
        return Ok(update);
    }

    conn.execute(
        "UPDATE users_profile SET day_streak = ?1, last_activity_date = ?2, updated_at = ?3 \
         WHERE id = ?4",
        params![
            update.day_streak,
            today.to_string(),
            now.to_rfc3339(),
            user_id
        ],
    )?;

    if update.health_delta != 0 {
        add_health(conn, user_id, update.health_delta, now)?;
    }

    activity::log(
        conn,
        "streak",
        user_id,
        Some(&serde_json::json!({
            "day_streak": update.day_streak,
            "health_delta": update.health_delta,
        })),
        now,
    )?;

    Ok(update)
}
