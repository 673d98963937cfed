//! REST API surface.
//!
//! Route table mirrors the hosted AOMIGO backend: profile, review, teaching,
//! topic, community, and waitlist endpoints under `/api/v1`, plus a bare
//! `/health` probe. Handlers share one SQLite connection behind a mutex and
//! an assistant provider behind an `Arc`.

pub mod community;
pub mod error;
pub mod identity;
pub mod profiles;
pub mod reviews;
pub mod teaching;
pub mod topics;
pub mod waitlist;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::api::error::ApiError;
use crate::assistant::AssistantProvider;
use crate::config::AomigoConfig;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<rusqlite::Connection>>,
    pub assistant: Arc<dyn AssistantProvider>,
    pub config: Arc<AomigoConfig>,
}

impl AppState {
    /// Lock the database connection, surfacing poisoning as a 500.
    pub fn db(&self) -> Result<MutexGuard<'_, rusqlite::Connection>, ApiError> {
        self.db
            .lock()
            .map_err(|_| ApiError::internal("database lock poisoned"))
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// GET /health — liveness probe.
async fn health(State(_state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/profiles/me",
            get(profiles::get_me).patch(profiles::update_me),
        )
        .route("/profiles/me/activity", post(profiles::record_activity))
        .route("/reviews/open", get(reviews::list_open))
        .route("/reviews/intervals", get(reviews::list_intervals))
        .route("/reviews/schedule", post(reviews::schedule))
        .route("/reviews/{review_id}/complete", post(reviews::complete))
        .route("/topics", get(topics::list))
        .route("/topics/{topic_id}", get(topics::get_one))
        .route("/teach", post(teaching::teach))
        .route("/teach/{session_id}/answer", post(teaching::answer))
        .route("/sessions", get(teaching::list_sessions))
        .route("/sessions/history", get(teaching::history))
        .route("/community/feed", get(community::feed))
        .route("/community/posts", post(community::create_post))
        .route(
            "/community/posts/{post_id}/like",
            post(community::toggle_like),
        )
        .route(
            "/community/posts/{post_id}/comments",
            get(community::list_comments).post(community::add_comment),
        )
        .route("/waitlist", post(waitlist::join));

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .with_state(state)
}
