//! Core domain type definitions.
//!
//! Defines [`ReviewResult`] (the three review outcomes), [`InputType`]
//! (teaching input channels), [`PetMood`], and the record structs matching
//! the database tables.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};

/// Outcome of a spaced-repetition review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewResult {
    /// Clear understanding — step up the interval ladder.
    Good,
    /// Needs more work — step down the interval ladder.
    Poor,
    /// Not attempted — the rung stays where it is.
    Skipped,
}

impl ReviewResult {
    /// SQL-compatible string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Poor => "poor",
            Self::Skipped => "skipped",
        }
    }
}

impl std::fmt::Display for ReviewResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReviewResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "good" => Ok(Self::Good),
            "poor" => Ok(Self::Poor),
            "skipped" => Ok(Self::Skipped),
            _ => Err(format!("unknown review result: {s}")),
        }
    }
}

/// How the teaching input arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    Text,
    Voice,
    Image,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Voice => "voice",
            Self::Image => "image",
        }
    }
}

impl std::fmt::Display for InputType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InputType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "voice" => Ok(Self::Voice),
            "image" => Ok(Self::Image),
            _ => Err(format!("unknown input type: {s}")),
        }
    }
}

/// The pet's mood, derived from its health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PetMood {
    Sleepy,
    Happy,
    Excited,
    Energized,
}

/// A pet profile, matching the `users_profile` table schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Auth uid of the owning user.
    pub id: String,
    pub email: Option<String>,
    pub pet_name: String,
    /// Gamified knowledge stat in `[0, 1000]`.
    pub intelligence: i64,
    /// Wellbeing stat in `[0, 100]`.
    pub health: i64,
    /// Derived from intelligence: `min(10, intelligence/100 + 1)`.
    pub level: i64,
    /// Consecutive days with activity.
    pub day_streak: i64,
    /// Calendar date (YYYY-MM-DD) of the last recorded activity.
    pub last_activity_date: String,
    pub language_preference: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A topic the user has taught their pet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    /// UUID v7 (time-sortable) primary key.
    pub id: String,
    pub user_id: String,
    pub topic_name: String,
    /// How many times the topic has been taught.
    pub depth: i64,
    pub first_learned: String,
    pub last_reviewed: String,
    pub review_count: i64,
    /// Retention score in `[0, 5]`.
    pub mastery_level: i64,
}

/// A scheduled or completed review, matching the `reviews` table schema.
///
/// Completed rows are history: once `completed_at` is set the row never
/// changes again, and a fresh row carries the next occurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub user_id: String,
    pub topic_id: String,
    pub scheduled_date: String,
    pub interval_days: i64,
    pub completed_at: Option<String>,
    pub result: Option<ReviewResult>,
    pub next_review_date: Option<String>,
}

/// A teaching session: the raw input, what the assistant made of it, and how
/// the follow-up answer went.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeachingSession {
    pub id: String,
    pub user_id: String,
    /// Client-facing session handle (e.g. `session-<uuid>`).
    pub session_id: String,
    pub input_type: InputType,
    pub raw_input: String,
    pub extracted_topics: Vec<String>,
    pub follow_up_question: Option<String>,
    pub user_answer: Option<String>,
    pub quality_score: Option<i64>,
    pub intelligence_gain: Option<i64>,
    pub health_change: Option<i64>,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn review_result_round_trips() {
        for r in [ReviewResult::Good, ReviewResult::Poor, ReviewResult::Skipped] {
            assert_eq!(ReviewResult::from_str(r.as_str()).unwrap(), r);
        }
        assert!(ReviewResult::from_str("great").is_err());
    }

    #[test]
    fn input_type_round_trips() {
        for t in [InputType::Text, InputType::Voice, InputType::Image] {
            assert_eq!(InputType::from_str(t.as_str()).unwrap(), t);
        }
        assert!(InputType::from_str("video").is_err());
    }
}
