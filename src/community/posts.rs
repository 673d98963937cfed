//! Post creation, the feed query, and like toggling.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

use crate::community::{CommunityError, CommunityPost, CommunityResult};
use crate::learning::activity;

const POST_COLUMNS: &str =
    "id, user_id, pet_name, summary_text, topics_learned, likes_count, comment_count, created_at";

pub(crate) fn post_from_row(row: &Row<'_>) -> rusqlite::Result<CommunityPost> {
    let topics_json: String = row.get(4)?;
    Ok(CommunityPost {
        id: row.get(0)?,
        user_id: row.get(1)?,
        pet_name: row.get(2)?,
        summary_text: row.get(3)?,
        topics_learned: serde_json::from_str(&topics_json).unwrap_or_default(),
        likes_count: row.get(5)?,
        comment_count: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Outcome of a like toggle.
#[derive(Debug, Serialize)]
pub struct LikeOutcome {
    /// True when the toggle added a like, false when it removed one.
    pub liked: bool,
    pub likes_count: i64,
}

/// Publish a post to the feed.
pub fn create_post(
    conn: &Connection,
    user_id: &str,
    pet_name: &str,
    summary_text: &str,
    topics_learned: &[String],
    now: DateTime<Utc>,
) -> CommunityResult<CommunityPost> {
    let id = uuid::Uuid::now_v7().to_string();
    let topics_json = serde_json::to_string(topics_learned).unwrap_or_else(|_| "[]".into());

    conn.execute(
        "INSERT INTO posts (id, user_id, pet_name, summary_text, topics_learned, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![id, user_id, pet_name, summary_text, topics_json, now.to_rfc3339()],
    )?;

    activity::log(
        conn,
        "post",
        user_id,
        Some(&serde_json::json!({"post_id": id})),
        now,
    )?;

    get_post(conn, &id)
}

/// Fetch a post by id, erroring if it does not exist.
pub fn get_post(conn: &Connection, post_id: &str) -> CommunityResult<CommunityPost> {
    conn.query_row(
        &format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1"),
        params![post_id],
        post_from_row,
    )
    .optional()?
    .ok_or_else(|| CommunityError::PostNotFound(post_id.to_string()))
}

/// The feed: recent posts, newest first.
pub fn list_feed(conn: &Connection, limit: Option<u32>) -> CommunityResult<Vec<CommunityPost>> {
    let limit = limit.map(i64::from).unwrap_or(50);
    let mut stmt = conn.prepare(&format!(
        "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC LIMIT ?1"
    ))?;
    let posts = stmt
        .query_map(params![limit], post_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(posts)
}

/// Toggle the caller's like on a post.
///
/// One like per user per post; toggling off decrements the counter, which
/// never drops below zero.
pub fn toggle_like(
    conn: &mut Connection,
    post_id: &str,
    user_id: &str,
    now: DateTime<Utc>,
) -> CommunityResult<LikeOutcome> {
    // Existence check before touching counters
    get_post(conn, post_id)?;

    let tx = conn.transaction()?;

    let existing: Option<String> = tx
        .query_row(
            "SELECT id FROM post_likes WHERE post_id = ?1 AND user_id = ?2",
            params![post_id, user_id],
            |row| row.get(0),
        )
        .optional()?;

    let liked = match existing {
        Some(like_id) => {
            tx.execute("DELETE FROM post_likes WHERE id = ?1", params![like_id])?;
            tx.execute(
                "UPDATE posts SET likes_count = MAX(likes_count - 1, 0) WHERE id = ?1",
                params![post_id],
            )?;
            false
        }
        None => {
            let like_id = uuid::Uuid::now_v7().to_string();
            tx.execute(
                "INSERT INTO post_likes (id, post_id, user_id, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![like_id, post_id, user_id, now.to_rfc3339()],
            )?;
            tx.execute(
                "UPDATE posts SET likes_count = likes_count + 1 WHERE id = ?1",
                params![post_id],
            )?;
            true
        }
    };

    activity::log(
        &tx,
        "like",
        user_id,
        Some(&serde_json::json!({"post_id": post_id, "liked": liked})),
        now,
    )?;

    tx.commit()?;

    let post = get_post(conn, post_id)?;
    Ok(LikeOutcome {
        liked,
        likes_count: post.likes_count,
    })
}
