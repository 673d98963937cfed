//! Community feed endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::identity::Identity;
use crate::api::AppState;
use crate::community::posts::LikeOutcome;
use crate::community::{comments, posts, CommunityPost, PostComment};
use crate::learning::profile;

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub summary_text: String,
    #[serde(default)]
    pub topics_learned: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

/// GET /api/v1/community/feed — recent posts, newest first.
pub async fn feed(
    State(state): State<AppState>,
    _identity: Identity,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<CommunityPost>>, ApiError> {
    let conn = state.db()?;
    let posts = posts::list_feed(&conn, query.limit)?;
    Ok(Json(posts))
}

/// POST /api/v1/community/posts — publish a post under the caller's pet name.
pub async fn create_post(
    State(state): State<AppState>,
    identity: Identity,
    Json(req): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<CommunityPost>), ApiError> {
    if req.summary_text.trim().is_empty() {
        return Err(ApiError::unprocessable("summary_text must not be empty"));
    }

    let now = Utc::now();
    let conn = state.db()?;
    let pet = profile::get_or_create_profile(
        &conn,
        &identity.uid,
        identity.email.as_deref(),
        &state.config.storage.default_pet_name,
        now,
    )?;

    let post = posts::create_post(
        &conn,
        &identity.uid,
        &pet.pet_name,
        &req.summary_text,
        &req.topics_learned,
        now,
    )?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// POST /api/v1/community/posts/{post_id}/like — toggle the caller's like.
pub async fn toggle_like(
    State(state): State<AppState>,
    identity: Identity,
    Path(post_id): Path<String>,
) -> Result<Json<LikeOutcome>, ApiError> {
    let mut conn = state.db()?;
    let outcome = posts::toggle_like(&mut conn, &post_id, &identity.uid, Utc::now())?;
    Ok(Json(outcome))
}

/// GET /api/v1/community/posts/{post_id}/comments — conversation order.
pub async fn list_comments(
    State(state): State<AppState>,
    _identity: Identity,
    Path(post_id): Path<String>,
) -> Result<Json<Vec<PostComment>>, ApiError> {
    let conn = state.db()?;
    // 404 for unknown posts rather than an empty list
    posts::get_post(&conn, &post_id)?;
    let comments = comments::list_comments(&conn, &post_id)?;
    Ok(Json(comments))
}

/// POST /api/v1/community/posts/{post_id}/comments — add a comment.
pub async fn add_comment(
    State(state): State<AppState>,
    identity: Identity,
    Path(post_id): Path<String>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<PostComment>), ApiError> {
    if req.content.trim().is_empty() {
        return Err(ApiError::unprocessable("content must not be empty"));
    }

    let now = Utc::now();
    let mut conn = state.db()?;
    let pet = profile::get_or_create_profile(
        &conn,
        &identity.uid,
        identity.email.as_deref(),
        &state.config.storage.default_pet_name,
        now,
    )?;

    let comment = comments::add_comment(
        &mut conn,
        &post_id,
        &identity.uid,
        &pet.pet_name,
        &req.content,
        now,
    )?;
    Ok((StatusCode::CREATED, Json(comment)))
}
