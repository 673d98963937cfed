//! Domain error to HTTP status mapping.
//!
//! Every handler returns `Result<_, ApiError>`; the error renders as a JSON
//! body of the shape `{"detail": "..."}` with the mapped status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::community::CommunityError;
use crate::learning::LearningError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl ApiError {
    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            detail: detail.into(),
        }
    }

    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, detail = %self.detail, "request failed");
        }
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}

impl From<LearningError> for ApiError {
    fn from(err: LearningError) -> Self {
        let status = match &err {
            LearningError::ReviewNotFound(_)
            | LearningError::TopicNotFound(_)
            | LearningError::SessionNotFound(_)
            | LearningError::ProfileNotFound(_) => StatusCode::NOT_FOUND,
            LearningError::ReviewOwnership { .. } => StatusCode::FORBIDDEN,
            LearningError::ReviewAlreadyCompleted(_) => StatusCode::CONFLICT,
            LearningError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            detail: err.to_string(),
        }
    }
}

impl From<CommunityError> for ApiError {
    fn from(err: CommunityError) -> Self {
        let status = match &err {
            CommunityError::PostNotFound(_) => StatusCode::NOT_FOUND,
            CommunityError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            detail: err.to_string(),
        }
    }
}

impl From<rusqlite::Error> for ApiError {
    fn from(err: rusqlite::Error) -> Self {
        Self::internal(err.to_string())
    }
}
