//! Review endpoints — open list, ladder, scheduling, completion.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::identity::Identity;
use crate::api::teaching::evaluate_review_with_fallback;
use crate::api::AppState;
use crate::learning::types::{Review, ReviewResult};
use crate::learning::{reviews, schedule};

#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    pub topic_id: String,
    /// Ladder index; defaults to the bootstrap rung.
    pub interval_index: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct CompleteRequest {
    /// `good`, `poor`, or `skipped`. May be omitted when `answer` is given —
    /// the assistant then judges the explanation.
    pub result: Option<String>,
    /// The user's explanation of the topic, for assistant evaluation.
    pub answer: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OpenReview {
    #[serde(flatten)]
    pub review: Review,
    pub overdue: bool,
    pub overdue_days: i64,
}

#[derive(Debug, Serialize)]
pub struct CompleteResponse {
    pub completed: Review,
    pub next: Review,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<i64>,
}

/// GET /api/v1/reviews/open — the caller's uncompleted reviews, soonest
/// first, annotated with overdue state.
pub async fn list_open(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<OpenReview>>, ApiError> {
    let now = Utc::now();
    let conn = state.db()?;
    let open = reviews::list_open(&conn, &identity.uid)?
        .into_iter()
        .map(|review| {
            let scheduled = review
                .scheduled_date
                .parse::<chrono::DateTime<Utc>>()
                .unwrap_or(now);
            OpenReview {
                overdue: schedule::is_overdue(scheduled, now),
                overdue_days: schedule::overdue_days(scheduled, now),
                review,
            }
        })
        .collect();
    Ok(Json(open))
}

/// GET /api/v1/reviews/intervals — the interval ladder, in days.
pub async fn list_intervals(State(state): State<AppState>) -> Json<Vec<u32>> {
    Json(state.config.review.intervals.clone())
}

/// POST /api/v1/reviews/schedule — schedule a review for a topic.
pub async fn schedule(
    State(state): State<AppState>,
    identity: Identity,
    Json(req): Json<ScheduleRequest>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    let index = req.interval_index.unwrap_or(0);
    if index >= state.config.review.intervals.len() {
        return Err(ApiError::unprocessable(format!(
            "interval_index {index} is off the ladder"
        )));
    }

    let conn = state.db()?;
    let review = reviews::schedule_review(
        &conn,
        &identity.uid,
        &req.topic_id,
        index,
        Utc::now(),
        &state.config.review.intervals,
        state.config.review.first_review_minutes,
    )?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// POST /api/v1/reviews/{review_id}/complete — stamp the outcome and schedule
/// the successor.
///
/// The outcome comes either directly from the body (`result`) or from the
/// assistant judging the supplied `answer`.
pub async fn complete(
    State(state): State<AppState>,
    identity: Identity,
    Path(review_id): Path<String>,
    Json(req): Json<CompleteRequest>,
) -> Result<Json<CompleteResponse>, ApiError> {
    let (result, feedback, quality_score) = match (req.result.as_deref(), req.answer) {
        (Some(raw), _) => {
            let result: ReviewResult = raw
                .parse()
                .map_err(|e: String| ApiError::unprocessable(e))?;
            (result, None, None)
        }
        (None, Some(answer)) => {
            let topic_name = {
                let conn = state.db()?;
                let review = reviews::get_review(&conn, &review_id)?;
                if review.user_id != identity.uid {
                    return Err(crate::learning::LearningError::ReviewOwnership {
                        review_id,
                        user_id: identity.uid,
                    }
                    .into());
                }
                crate::learning::topics::get_topic(&conn, &review.topic_id)?.topic_name
            };

            let assistant = state.assistant.clone();
            let evaluation = tokio::task::spawn_blocking(move || {
                evaluate_review_with_fallback(assistant.as_ref(), &topic_name, &answer)
            })
            .await
            .map_err(|e| ApiError::internal(format!("assistant task failed: {e}")))?;

            (
                evaluation.result,
                Some(evaluation.feedback),
                Some(evaluation.quality_score),
            )
        }
        (None, None) => {
            return Err(ApiError::unprocessable(
                "either result or answer is required",
            ));
        }
    };

    let mut conn = state.db()?;
    let outcome = reviews::complete_review(
        &mut conn,
        &review_id,
        &identity.uid,
        result,
        Utc::now(),
        &state.config.review.intervals,
        state.config.review.first_review_minutes,
    )?;

    Ok(Json(CompleteResponse {
        completed: outcome.completed,
        next: outcome.next,
        feedback,
        quality_score,
    }))
}
