//! Profile endpoints — get-or-create, partial update, daily activity.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::identity::Identity;
use crate::api::AppState;
use crate::learning::profile::{self, ProfileChanges};
use crate::learning::stats::{self, StreakUpdate};
use crate::learning::types::{PetMood, UserProfile};

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub mood: PetMood,
}

impl From<UserProfile> for ProfileResponse {
    fn from(profile: UserProfile) -> Self {
        let mood = stats::mood_for_health(profile.health);
        Self { profile, mood }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProfileUpdateRequest {
    pub pet_name: Option<String>,
    pub language_preference: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    #[serde(flatten)]
    pub profile: ProfileResponse,
    pub streak: StreakUpdate,
}

/// GET /api/v1/profiles/me — fetch the caller's pet, creating it on first sight.
pub async fn get_me(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<ProfileResponse>, ApiError> {
    let conn = state.db()?;
    let profile = profile::get_or_create_profile(
        &conn,
        &identity.uid,
        identity.email.as_deref(),
        &state.config.storage.default_pet_name,
        Utc::now(),
    )?;
    Ok(Json(profile.into()))
}

/// PATCH /api/v1/profiles/me — partial identity update.
pub async fn update_me(
    State(state): State<AppState>,
    identity: Identity,
    Json(req): Json<ProfileUpdateRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    if let Some(lang) = req.language_preference.as_deref() {
        if lang != "en" && lang != "zh" {
            return Err(ApiError::unprocessable(format!(
                "unsupported language preference: {lang}"
            )));
        }
    }
    if let Some(name) = req.pet_name.as_deref() {
        if name.trim().is_empty() {
            return Err(ApiError::unprocessable("pet_name must not be empty"));
        }
    }

    let now = Utc::now();
    let conn = state.db()?;
    profile::get_or_create_profile(
        &conn,
        &identity.uid,
        identity.email.as_deref(),
        &state.config.storage.default_pet_name,
        now,
    )?;

    let changes = ProfileChanges {
        pet_name: req.pet_name,
        language_preference: req.language_preference,
        email: req.email,
    };
    let profile = profile::update_profile(&conn, &identity.uid, &changes, now)?;
    Ok(Json(profile.into()))
}

/// POST /api/v1/profiles/me/activity — run the daily streak update.
pub async fn record_activity(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<ActivityResponse>, ApiError> {
    let now = Utc::now();
    let conn = state.db()?;
    profile::get_or_create_profile(
        &conn,
        &identity.uid,
        identity.email.as_deref(),
        &state.config.storage.default_pet_name,
        now,
    )?;

    let streak = stats::update_streak(&conn, &identity.uid, now)?;
    let profile = profile::require_profile(&conn, &identity.uid)?;
    Ok(Json(ActivityResponse {
        profile: profile.into(),
        streak,
    }))
}
