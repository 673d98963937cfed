//! Topic endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::identity::Identity;
use crate::api::AppState;
use crate::learning::types::Topic;
use crate::learning::{topics, LearningError};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u32>,
}

/// GET /api/v1/topics — the caller's topics, most recently reviewed first.
pub async fn list(
    State(state): State<AppState>,
    identity: Identity,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Topic>>, ApiError> {
    let conn = state.db()?;
    let topics = topics::list_for_user(&conn, &identity.uid, query.limit)?;
    Ok(Json(topics))
}

/// GET /api/v1/topics/{topic_id} — one topic. Foreign topics are invisible.
pub async fn get_one(
    State(state): State<AppState>,
    identity: Identity,
    Path(topic_id): Path<String>,
) -> Result<Json<Topic>, ApiError> {
    let conn = state.db()?;
    let topic = topics::get_topic(&conn, &topic_id)?;
    if topic.user_id != identity.uid {
        return Err(LearningError::TopicNotFound(topic_id).into());
    }
    Ok(Json(topic))
}
