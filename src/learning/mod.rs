pub mod activity;
pub mod profile;
pub mod reviews;
pub mod schedule;
pub mod sessions;
pub mod stats;
pub mod summary;
pub mod topics;
pub mod types;

use thiserror::Error;

/// Errors surfaced by the learning domain. The API layer maps these to HTTP
/// status codes; everything else bubbles up as an internal error.
#[derive(Debug, Error)]
pub enum LearningError {
    #[error("review {0} not found")]
    ReviewNotFound(String),

    #[error("review {review_id} does not belong to user {user_id}")]
    ReviewOwnership { review_id: String, user_id: String },

    #[error("review {0} is already completed")]
    ReviewAlreadyCompleted(String),

    #[error("topic {0} not found")]
    TopicNotFound(String),

    #[error("teaching session {0} not found")]
    SessionNotFound(String),

    #[error("profile {0} not found")]
    ProfileNotFound(String),

    #[error(transparent)]
    Db(#[from] rusqlite::Error),
}

pub type LearningResult<T> = Result<T, LearningError>;
