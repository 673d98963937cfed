//! Community feed — posts, comments, and likes.
//!
//! Pets share what their humans learned. Posts denormalize the pet name so
//! the feed renders without joining profiles, and the like/comment counters
//! are maintained alongside their rows in the same transaction.

pub mod comments;
pub mod posts;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommunityError {
    #[error("post {0} not found")]
    PostNotFound(String),

    #[error(transparent)]
    Db(#[from] rusqlite::Error),
}

pub type CommunityResult<T> = Result<T, CommunityError>;

/// A community feed post, matching the `posts` table schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityPost {
    pub id: String,
    pub user_id: String,
    pub pet_name: String,
    pub summary_text: String,
    pub topics_learned: Vec<String>,
    pub likes_count: i64,
    pub comment_count: i64,
    pub created_at: String,
}

/// A comment on a community post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostComment {
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    pub pet_name: String,
    pub content: String,
    pub likes_count: i64,
    pub created_at: String,
}
