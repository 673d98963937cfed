//! Public waitlist endpoint — the one route that takes no identity.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::AppState;
use crate::waitlist::{self, WaitlistEntry};

#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub email: String,
    pub name: Option<String>,
}

/// POST /api/v1/waitlist — join the launch waitlist.
pub async fn join(
    State(state): State<AppState>,
    Json(req): Json<JoinRequest>,
) -> Result<(StatusCode, Json<WaitlistEntry>), ApiError> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::unprocessable("a valid email is required"));
    }

    let conn = state.db()?;
    let entry = waitlist::add_entry(&conn, &email, req.name.as_deref(), Utc::now())?;
    Ok((StatusCode::CREATED, Json(entry)))
}
