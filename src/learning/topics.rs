//! Topic persistence — find-or-create on teach, review bookkeeping, listing.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::learning::types::{ReviewResult, Topic};
use crate::learning::{LearningError, LearningResult};

const TOPIC_COLUMNS: &str =
    "id, user_id, topic_name, depth, first_learned, last_reviewed, review_count, mastery_level";

fn topic_from_row(row: &Row<'_>) -> rusqlite::Result<Topic> {
    Ok(Topic {
        id: row.get(0)?,
        user_id: row.get(1)?,
        topic_name: row.get(2)?,
        depth: row.get(3)?,
        first_learned: row.get(4)?,
        last_reviewed: row.get(5)?,
        review_count: row.get(6)?,
        mastery_level: row.get(7)?,
    })
}

/// Find a topic by name for a user, or create it.
///
/// Teaching an existing topic again deepens it: depth + 1 and a fresh
/// `last_reviewed` stamp. A new topic starts at depth 1.
pub fn find_or_create(
    conn: &Connection,
    user_id: &str,
    topic_name: &str,
    now: DateTime<Utc>,
) -> LearningResult<Topic> {
    let now_str = now.to_rfc3339();

    let existing = conn
        .query_row(
            &format!(
                "SELECT {TOPIC_COLUMNS} FROM topics WHERE user_id = ?1 AND topic_name = ?2"
            ),
            params![user_id, topic_name],
            topic_from_row,
        )
        .optional()?;

    if let Some(topic) = existing {
        conn.execute(
            "UPDATE topics SET depth = depth + 1, last_reviewed = ?1 WHERE id = ?2",
            params![now_str, topic.id],
        )?;
        return get_topic(conn, &topic.id);
    }

    let id = uuid::Uuid::now_v7().to_string();
    conn.execute(
        "INSERT INTO topics (id, user_id, topic_name, depth, first_learned, last_reviewed) \
         VALUES (?1, ?2, ?3, 1, ?4, ?4)",
        params![id, user_id, topic_name, now_str],
    )?;

    get_topic(conn, &id)
}

/// Fetch a topic by id, erroring if it does not exist.
pub fn get_topic(conn: &Connection, topic_id: &str) -> LearningResult<Topic> {
    conn.query_row(
        &format!("SELECT {TOPIC_COLUMNS} FROM topics WHERE id = ?1"),
        params![topic_id],
        topic_from_row,
    )
    .optional()?
    .ok_or_else(|| LearningError::TopicNotFound(topic_id.to_string()))
}

/// List a user's topics, most recently reviewed first.
pub fn list_for_user(
    conn: &Connection,
    user_id: &str,
    limit: Option<u32>,
) -> LearningResult<Vec<Topic>> {
    let limit = limit.map(i64::from).unwrap_or(-1);
    let mut stmt = conn.prepare(&format!(
        "SELECT {TOPIC_COLUMNS} FROM topics WHERE user_id = ?1 \
         ORDER BY last_reviewed DESC LIMIT ?2"
    ))?;
    let topics = stmt
        .query_map(params![user_id, limit], topic_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(topics)
}

/// Stamp a topic's `last_reviewed` timestamp.
pub fn touch_last_reviewed(
    conn: &Connection,
    topic_id: &str,
    now: DateTime<Utc>,
) -> LearningResult<()> {
    let rows = conn.execute(
        "UPDATE topics SET last_reviewed = ?1 WHERE id = ?2",
        params![now.to_rfc3339(), topic_id],
    )?;
    if rows == 0 {
        return Err(LearningError::TopicNotFound(topic_id.to_string()));
    }
    Ok(())
}

/// Apply a review outcome to the topic: bump the review count, step mastery
/// (+1 capped at 5 on good, -1 floored at 0 on poor, unchanged on skip), and
/// touch `last_reviewed`.
pub fn record_review_outcome(
    conn: &Connection,
    topic_id: &str,
    result: ReviewResult,
    now: DateTime<Utc>,
) -> LearningResult<Topic> {
    let topic = get_topic(conn, topic_id)?;

    let mastery = match result {
        ReviewResult::Good => (topic.mastery_level + 1).min(5),
        ReviewResult::Poor => (topic.mastery_level - 1).max(0),
        ReviewResult::Skipped => topic.mastery_level,
    };

    conn.execute(
        "UPDATE topics SET review_count = review_count + 1, mastery_level = ?1, last_reviewed = ?2 \
         WHERE id = ?3",
        params![mastery, now.to_rfc3339(), topic_id],
    )?;

    get_topic(conn, topic_id)
}

/// Human-readable mastery label.
pub fn mastery_label(level: i64) -> &'static str {
    match level {
        0 => "New",
        1 => "Learning",
        2 => "Familiar",
        3 => "Comfortable",
        4 => "Proficient",
        5 => "Mastered",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn test_db() -> Connection {
        db::open_memory_database().unwrap()
    }

    #[test]
    fn create_then_reteach_deepens_topic() {
        let conn = test_db();

        let first = find_or_create(&conn, "u1", "photosynthesis", Utc::now()).unwrap();
        assert_eq!(first.depth, 1);
        assert_eq!(first.mastery_level, 0);

        let second = find_or_create(&conn, "u1", "photosynthesis", Utc::now()).unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.depth, 2);
    }

    #[test]
    fn same_name_different_users_are_distinct() {
        let conn = test_db();
        let a = find_or_create(&conn, "u1", "calculus", Utc::now()).unwrap();
        let b = find_or_create(&conn, "u2", "calculus", Utc::now()).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn get_missing_topic_errors() {
        let conn = test_db();
        let err = get_topic(&conn, "nope").unwrap_err();
        assert!(matches!(err, LearningError::TopicNotFound(_)));
    }

    #[test]
    fn good_reviews_raise_mastery_to_cap() {
        let conn = test_db();
        let topic = find_or_create(&conn, "u1", "ohms law", Utc::now()).unwrap();

        for _ in 0..7 {
            record_review_outcome(&conn, &topic.id, ReviewResult::Good, Utc::now()).unwrap();
        }

        let topic = get_topic(&conn, &topic.id).unwrap();
        assert_eq!(topic.mastery_level, 5, "mastery caps at 5");
        assert_eq!(topic.review_count, 7);
    }

    #[test]
    fn poor_review_lowers_mastery_to_floor() {
        let conn = test_db();
        let topic = find_or_create(&conn, "u1", "ohms law", Utc::now()).unwrap();

        record_review_outcome(&conn, &topic.id, ReviewResult::Poor, Utc::now()).unwrap();
        let topic = get_topic(&conn, &topic.id).unwrap();
        assert_eq!(topic.mastery_level, 0, "mastery floors at 0");
    }

    #[test]
    fn skipped_review_keeps_mastery() {
        let conn = test_db();
        let topic = find_or_create(&conn, "u1", "ohms law", Utc::now()).unwrap();
        record_review_outcome(&conn, &topic.id, ReviewResult::Good, Utc::now()).unwrap();

        let topic = record_review_outcome(&conn, &topic.id, ReviewResult::Skipped, Utc::now())
            .unwrap();
        assert_eq!(topic.mastery_level, 1);
        assert_eq!(topic.review_count, 2);
    }

    #[test]
    fn list_returns_most_recent_first() {
        let conn = test_db();
        let t1 = find_or_create(&conn, "u1", "first", Utc::now()).unwrap();
        let t2 = find_or_create(&conn, "u1", "second", Utc::now()).unwrap();

        conn.execute(
            "UPDATE topics SET last_reviewed = '2026-01-01T00:00:00+00:00' WHERE id = ?1",
            params![t1.id],
        )
        .unwrap();

        let topics = list_for_user(&conn, "u1", None).unwrap();
        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].id, t2.id);

        let limited = list_for_user(&conn, "u1", Some(1)).unwrap();
        assert_eq!(limited.len(), 1);
    }
}
