//! Teaching endpoints — the core teach/answer loop plus session history.
//!
//! The assistant does its thinking off the async runtime via
//! `spawn_blocking`, and every assistant call degrades to the deterministic
//! mock on failure: a dead API key never blocks a lesson.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::identity::Identity;
use crate::api::AppState;
use crate::assistant::mock::MockAssistant;
use crate::assistant::{AnswerEvaluation, AssistantProvider, ReviewEvaluation};
use crate::learning::sessions::{self, AnswerRewards, HistoryItem};
use crate::learning::types::{InputType, TeachingSession};

#[derive(Debug, Deserialize)]
pub struct TeachRequest {
    pub raw_input: String,
    /// `text`, `voice`, or `image`. Defaults to `text`.
    pub input_type: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub session: TeachingSession,
    pub evaluation: String,
    pub rewards: AnswerRewards,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u32>,
}

/// Topic extraction with the mock as a safety net.
fn extract_with_fallback(assistant: &dyn AssistantProvider, input: &str) -> Vec<String> {
    match assistant.extract_topics(input) {
        Ok(topics) => topics,
        Err(err) => {
            tracing::warn!(error = %err, "topic extraction failed, simulating");
            MockAssistant
                .extract_topics(input)
                .unwrap_or_else(|_| vec!["learning".to_string()])
        }
    }
}

/// Follow-up generation with the mock as a safety net.
fn question_with_fallback(
    assistant: &dyn AssistantProvider,
    input: &str,
    topics: &[String],
    history: &[String],
) -> String {
    match assistant.follow_up_question(input, topics, history) {
        Ok(question) => question,
        Err(err) => {
            tracing::warn!(error = %err, "follow-up generation failed, simulating");
            MockAssistant
                .follow_up_question(input, topics, history)
                .unwrap_or_else(|_| "Tell me more about what you learned!".to_string())
        }
    }
}

/// Answer evaluation with the mock as a safety net.
fn evaluate_with_fallback(
    assistant: &dyn AssistantProvider,
    question: &str,
    answer: &str,
) -> AnswerEvaluation {
    match assistant.evaluate_answer(question, answer) {
        Ok(evaluation) => evaluation,
        Err(err) => {
            tracing::warn!(error = %err, "answer evaluation failed, simulating");
            MockAssistant
                .evaluate_answer(question, answer)
                .unwrap_or_else(|_| AnswerEvaluation {
                    evaluation: "Great effort! You're learning so well!".to_string(),
                    quality_score: 75,
                })
        }
    }
}

/// Review evaluation with the mock as a safety net.
pub(crate) fn evaluate_review_with_fallback(
    assistant: &dyn AssistantProvider,
    topic_name: &str,
    answer: &str,
) -> ReviewEvaluation {
    match assistant.evaluate_review(topic_name, answer) {
        Ok(evaluation) => evaluation,
        Err(err) => {
            tracing::warn!(error = %err, "review evaluation failed, simulating");
            MockAssistant
                .evaluate_review(topic_name, answer)
                .unwrap_or_else(|_| ReviewEvaluation {
                    feedback: "Great effort! Keep learning!".to_string(),
                    result: crate::learning::types::ReviewResult::Good,
                    quality_score: 75,
                })
        }
    }
}

/// POST /api/v1/teach — record a lesson.
///
/// Extracts topics, generates the follow-up question, persists the session,
/// and schedules each topic's bootstrap review ten minutes out.
pub async fn teach(
    State(state): State<AppState>,
    identity: Identity,
    Json(req): Json<TeachRequest>,
) -> Result<(StatusCode, Json<TeachingSession>), ApiError> {
    if req.raw_input.trim().is_empty() {
        return Err(ApiError::unprocessable("raw_input must not be empty"));
    }
    let input_type: InputType = req
        .input_type
        .as_deref()
        .unwrap_or("text")
        .parse()
        .map_err(|e: String| ApiError::unprocessable(e))?;

    // Recent lessons give the assistant context for a sharper question
    let history: Vec<String> = {
        let conn = state.db()?;
        sessions::fetch_recent_history(&conn, &identity.uid, 3)?
            .into_iter()
            .map(|item| item.raw_input)
            .collect()
    };

    let assistant = state.assistant.clone();
    let raw_input = req.raw_input.clone();
    let (topics, question) = tokio::task::spawn_blocking(move || {
        let topics = extract_with_fallback(assistant.as_ref(), &raw_input);
        let question =
            question_with_fallback(assistant.as_ref(), &raw_input, &topics, &history);
        (topics, question)
    })
    .await
    .map_err(|e| ApiError::internal(format!("assistant task failed: {e}")))?;

    let mut conn = state.db()?;
    let session = sessions::record_session(
        &mut conn,
        &identity.uid,
        req.session_id.as_deref(),
        input_type,
        &req.raw_input,
        &topics,
        &question,
        Utc::now(),
        &state.config.review.intervals,
        state.config.review.first_review_minutes,
    )?;

    Ok((StatusCode::CREATED, Json(session)))
}

/// POST /api/v1/teach/{session_id}/answer — score the follow-up answer and
/// feed the pet.
pub async fn answer(
    State(state): State<AppState>,
    identity: Identity,
    Path(session_id): Path<String>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, ApiError> {
    if req.answer.trim().is_empty() {
        return Err(ApiError::unprocessable("answer must not be empty"));
    }

    let question = {
        let conn = state.db()?;
        // The rewards land on the profile, so make sure the pet exists
        crate::learning::profile::get_or_create_profile(
            &conn,
            &identity.uid,
            identity.email.as_deref(),
            &state.config.storage.default_pet_name,
            Utc::now(),
        )?;
        sessions::get_by_session_id(&conn, &identity.uid, &session_id)?
            .follow_up_question
            .unwrap_or_default()
    };

    let assistant = state.assistant.clone();
    let answer_text = req.answer.clone();
    let evaluation = tokio::task::spawn_blocking(move || {
        evaluate_with_fallback(assistant.as_ref(), &question, &answer_text)
    })
    .await
    .map_err(|e| ApiError::internal(format!("assistant task failed: {e}")))?;

    let mut conn = state.db()?;
    let (session, rewards) = sessions::update_answer(
        &mut conn,
        &identity.uid,
        &session_id,
        &req.answer,
        evaluation.quality_score,
        Utc::now(),
    )?;

    Ok(Json(AnswerResponse {
        session,
        evaluation: evaluation.evaluation,
        rewards,
    }))
}

/// GET /api/v1/sessions — the caller's teaching sessions, newest first.
pub async fn list_sessions(
    State(state): State<AppState>,
    identity: Identity,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<TeachingSession>>, ApiError> {
    let conn = state.db()?;
    let sessions = sessions::list_for_user(&conn, &identity.uid, query.limit)?;
    Ok(Json(sessions))
}

/// GET /api/v1/sessions/history — compact recent lessons for context display.
pub async fn history(
    State(state): State<AppState>,
    identity: Identity,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<HistoryItem>>, ApiError> {
    let conn = state.db()?;
    let items =
        sessions::fetch_recent_history(&conn, &identity.uid, query.limit.unwrap_or(10))?;
    Ok(Json(items))
}
