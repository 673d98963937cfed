//! Comments on community posts.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use crate::community::posts::get_post;
use crate::community::{CommunityResult, PostComment};
use crate::learning::activity;

const COMMENT_COLUMNS: &str =
    "id, post_id, user_id, pet_name, content, likes_count, created_at";

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<PostComment> {
    Ok(PostComment {
        id: row.get(0)?,
        post_id: row.get(1)?,
        user_id: row.get(2)?,
        pet_name: row.get(3)?,
        content: row.get(4)?,
        likes_count: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Add a comment and bump the post's comment counter in one transaction.
pub fn add_comment(
    conn: &mut Connection,
    post_id: &str,
    user_id: &str,
    pet_name: &str,
    content: &str,
    now: DateTime<Utc>,
) -> CommunityResult<PostComment> {
    // Existence check before touching counters
    get_post(conn, post_id)?;

    let tx = conn.transaction()?;

    let id = uuid::Uuid::now_v7().to_string();
    tx.execute(
        "INSERT INTO post_comments (id, post_id, user_id, pet_name, content, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![id, post_id, user_id, pet_name, content, now.to_rfc3339()],
    )?;
    tx.execute(
        "UPDATE posts SET comment_count = comment_count + 1 WHERE id = ?1",
        params![post_id],
    )?;

    activity::log(
        &tx,
        "comment",
        user_id,
        Some(&serde_json::json!({"post_id": post_id, "comment_id": id})),
        now,
    )?;

    tx.commit()?;

    let comment = conn.query_row(
        &format!("SELECT {COMMENT_COLUMNS} FROM post_comments WHERE id = ?1"),
        params![id],
        comment_from_row,
    )?;
    Ok(comment)
}

/// Comments on a post, oldest first (conversation order).
pub fn list_comments(conn: &Connection, post_id: &str) -> CommunityResult<Vec<PostComment>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COMMENT_COLUMNS} FROM post_comments WHERE post_id = ?1 ORDER BY created_at ASC"
    ))?;
    let comments = stmt
        .query_map(params![post_id], comment_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(comments)
}
