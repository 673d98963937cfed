//! Teaching sessions — recording what the user taught, wiring up topics and
//! bootstrap reviews, and applying the answer rewards.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

use crate::learning::activity;
use crate::learning::stats;
use crate::learning::topics;
use crate::learning::types::{InputType, TeachingSession};
use crate::learning::{reviews, LearningError, LearningResult};

const SESSION_COLUMNS: &str = "id, user_id, session_id, input_type, raw_input, extracted_topics, \
     follow_up_question, user_answer, quality_score, intelligence_gain, health_change, created_at";

fn session_from_row(row: &Row<'_>) -> rusqlite::Result<TeachingSession> {
    let input_type: String = row.get(3)?;
    let topics_json: String = row.get(5)?;
    Ok(TeachingSession {
        id: row.get(0)?,
        user_id: row.get(1)?,
        session_id: row.get(2)?,
        input_type: input_type.parse().unwrap_or(InputType::Text),
        raw_input: row.get(4)?,
        extracted_topics: serde_json::from_str(&topics_json).unwrap_or_default(),
        follow_up_question: row.get(6)?,
        user_answer: row.get(7)?,
        quality_score: row.get(8)?,
        intelligence_gain: row.get(9)?,
        health_change: row.get(10)?,
        created_at: row.get(11)?,
    })
}

/// A compact history item handed to the assistant as context for the next
/// follow-up question.
#[derive(Debug, Serialize)]
pub struct HistoryItem {
    pub raw_input: String,
    pub extracted_topics: Vec<String>,
}

/// Rewards applied when an answer is scored.
#[derive(Debug, Serialize)]
pub struct AnswerRewards {
    pub intelligence_gain: i64,
    pub health_change: i64,
    pub leveled_up: bool,
}

/// Intelligence gained for an answer: one point per ten score points.
pub fn intelligence_gain_for_score(quality_score: i64) -> i64 {
    quality_score / 10
}

/// Health gained for an answer: a solid answer feeds the pet better.
pub fn health_change_for_score(quality_score: i64) -> i64 {
    if quality_score > 70 {
        3
    } else {
        1
    }
}

/// Record a teaching session and wire up its topics.
///
/// Every extracted topic is found-or-created (teaching it again deepens it)
/// and gets a bootstrap review scheduled minutes ahead at ladder index 0.
#[allow(clippy::too_many_arguments)]
pub fn record_session(
    conn: &mut Connection,
    user_id: &str,
    session_id: Option<&str>,
    input_type: InputType,
    raw_input: &str,
    extracted_topics: &[String],
    follow_up_question: &str,
    now: DateTime<Utc>,
    ladder: &[u32],
    first_review_minutes: i64,
) -> LearningResult<TeachingSession> {
    let session_handle = match session_id {
        Some(s) => s.to_string(),
        None => format!("session-{}", uuid::Uuid::now_v7()),
    };
    let topics_json = serde_json::to_string(extracted_topics).unwrap_or_else(|_| "[]".into());

    let tx = conn.transaction()?;

    let id = uuid::Uuid::now_v7().to_string();
    tx.execute(
        "INSERT INTO teaching_sessions \
         (id, user_id, session_id, input_type, raw_input, extracted_topics, follow_up_question, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            id,
            user_id,
            session_handle,
            input_type.as_str(),
            raw_input,
            topics_json,
            follow_up_question,
            now.to_rfc3339()
        ],
    )?;

    for name in extracted_topics {
        let topic = topics::find_or_create(&tx, user_id, name, now)?;
        reviews::schedule_review(&tx, user_id, &topic.id, 0, now, ladder, first_review_minutes)?;
    }

    activity::log(
        &tx,
        "teach",
        user_id,
        Some(&serde_json::json!({
            "session_id": session_handle,
            "topics": extracted_topics,
        })),
        now,
    )?;

    tx.commit()?;

    get_by_session_id(conn, user_id, &session_handle)
}

/// Fetch a session by its client-facing handle, scoped to the owner.
pub fn get_by_session_id(
    conn: &Connection,
    user_id: &str,
    session_id: &str,
) -> LearningResult<TeachingSession> {
    conn.query_row(
        &format!(
            "SELECT {SESSION_COLUMNS} FROM teaching_sessions \
             WHERE session_id = ?1 AND user_id = ?2"
        ),
        params![session_id, user_id],
        session_from_row,
    )
    .optional()?
    .ok_or_else(|| LearningError::SessionNotFound(session_id.to_string()))
}

/// Store the user's answer and its evaluation, then feed the pet.
///
/// The rewards (`quality_score / 10` intelligence, +3 health above 70 points
/// and +1 otherwise) and the daily streak update land in the same
/// transaction as the session write.
pub fn update_answer(
    conn: &mut Connection,
    user_id: &str,
    session_id: &str,
    answer: &str,
    quality_score: i64,
    now: DateTime<Utc>,
) -> LearningResult<(TeachingSession, AnswerRewards)> {
    // Scoped lookup doubles as the ownership check
    get_by_session_id(conn, user_id, session_id)?;

    let quality_score = quality_score.clamp(0, 100);
    let intelligence_gain = intelligence_gain_for_score(quality_score);
    let health_change = health_change_for_score(quality_score);

    let tx = conn.transaction()?;

    tx.execute(
        "UPDATE teaching_sessions \
         SET user_answer = ?1, quality_score = ?2, intelligence_gain = ?3, health_change = ?4 \
         WHERE session_id = ?5 AND user_id = ?6",
        params![
            answer,
            quality_score,
            intelligence_gain,
            health_change,
            session_id,
            user_id
        ],
    )?;

    let gain = stats::add_intelligence(&tx, user_id, intelligence_gain, now)?;
    stats::add_health(&tx, user_id, health_change, now)?;
    stats::update_streak(&tx, user_id, now)?;

    activity::log(
        &tx,
        "answer",
        user_id,
        Some(&serde_json::json!({
            "session_id": session_id,
            "quality_score": quality_score,
            "intelligence_gain": intelligence_gain,
        })),
        now,
    )?;

    tx.commit()?;

    let session = get_by_session_id(conn, user_id, session_id)?;
    Ok((
        session,
        AnswerRewards {
            intelligence_gain,
            health_change,
            leveled_up: gain.leveled_up,
        },
    ))
}

/// List a user's sessions, newest first.
pub fn list_for_user(
    conn: &Connection,
    user_id: &str,
    limit: Option<u32>,
) -> LearningResult<Vec<TeachingSession>> {
    let limit = limit.map(i64::from).unwrap_or(-1);
    let mut stmt = conn.prepare(&format!(
        "SELECT {SESSION_COLUMNS} FROM teaching_sessions WHERE user_id = ?1 \
         ORDER BY created_at DESC LIMIT ?2"
    ))?;
    let sessions = stmt
        .query_map(params![user_id, limit], session_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(sessions)
}

/// Recent teaching inputs for assistant context, newest first.
pub fn fetch_recent_history(
    conn: &Connection,
    user_id: &str,
    limit: u32,
) -> LearningResult<Vec<HistoryItem>> {
    let sessions = list_for_user(conn, user_id, Some(limit))?;
    Ok(sessions
        .into_iter()
        .map(|s| HistoryItem {
            raw_input: s.raw_input,
            extracted_topics: s.extracted_topics,
        })
        .collect())
}
