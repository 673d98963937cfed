//! Review lifecycle — scheduling, listing, and completion.
//!
//! Review rows are append-only history. Completing a review stamps the row
//! with its outcome exactly once, then inserts a fresh row for the next
//! occurrence at the stepped interval. All of that happens inside one
//! transaction along with the topic bookkeeping and the activity log entry.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

use crate::learning::activity;
use crate::learning::schedule;
use crate::learning::topics;
use crate::learning::types::{Review, ReviewResult};
use crate::learning::{LearningError, LearningResult};

const REVIEW_COLUMNS: &str = "id, user_id, topic_id, scheduled_date, interval_days, \
     completed_at, result, next_review_date";

fn review_from_row(row: &Row<'_>) -> rusqlite::Result<Review> {
    let result: Option<String> = row.get(6)?;
    Ok(Review {
        id: row.get(0)?,
        user_id: row.get(1)?,
        topic_id: row.get(2)?,
        scheduled_date: row.get(3)?,
        interval_days: row.get(4)?,
        completed_at: row.get(5)?,
        result: result.and_then(|r| r.parse().ok()),
        next_review_date: row.get(7)?,
    })
}

/// Outcome of completing a review: the stamped row plus its successor.
#[derive(Debug, Serialize)]
pub struct CompletionOutcome {
    pub completed: Review,
    pub next: Review,
}

/// Fetch a review by id, erroring if it does not exist.
pub fn get_review(conn: &Connection, review_id: &str) -> LearningResult<Review> {
    conn.query_row(
        &format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = ?1"),
        params![review_id],
        review_from_row,
    )
    .optional()?
    .ok_or_else(|| LearningError::ReviewNotFound(review_id.to_string()))
}

/// Open (uncompleted) reviews for a user, soonest first.
pub fn list_open(conn: &Connection, user_id: &str) -> LearningResult<Vec<Review>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {REVIEW_COLUMNS} FROM reviews \
         WHERE user_id = ?1 AND completed_at IS NULL \
         ORDER BY scheduled_date ASC"
    ))?;
    let reviews = stmt
        .query_map(params![user_id], review_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(reviews)
}

/// Count of open reviews whose scheduled moment has passed.
pub fn due_count(conn: &Connection, user_id: &str, now: DateTime<Utc>) -> LearningResult<u64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM reviews \
         WHERE user_id = ?1 AND completed_at IS NULL AND scheduled_date < ?2",
        params![user_id, now.to_rfc3339()],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}

/// Schedule a review for a topic at the given ladder index.
///
/// Index 0 lands minutes ahead (the bootstrap review right after teaching);
/// every other rung lands whole days out.
pub fn schedule_review(
    conn: &Connection,
    user_id: &str,
    topic_id: &str,
    interval_index: usize,
    now: DateTime<Utc>,
    ladder: &[u32],
    first_review_minutes: i64,
) -> LearningResult<Review> {
    // Reject unknown topics with a domain error before the FK does
    topics::get_topic(conn, topic_id)?;

    let scheduled = schedule::review_date(now, interval_index, ladder, first_review_minutes);
    let interval_days = ladder
        .get(interval_index)
        .or(ladder.last())
        .copied()
        .unwrap_or(0);

    let id = uuid::Uuid::now_v7().to_string();
    conn.execute(
        "INSERT INTO reviews (id, user_id, topic_id, scheduled_date, interval_days) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![id, user_id, topic_id, scheduled.to_rfc3339(), interval_days],
    )?;

    activity::log(
        conn,
        "review_scheduled",
        user_id,
        Some(&serde_json::json!({
            "review_id": id,
            "topic_id": topic_id,
            "interval_days": interval_days,
        })),
        now,
    )?;

    get_review(conn, &id)
}

/// Complete a review and schedule its successor.
///
/// The stored `interval_days` is mapped back onto the ladder, the rung is
/// stepped by the outcome (up on good, down on poor, held on skip), and the
/// successor row is inserted at the new rung. The completed row is stamped
/// once and never touched again; completing it a second time is an error.
pub fn complete_review(
    conn: &mut Connection,
    review_id: &str,
    user_id: &str,
    result: ReviewResult,
    now: DateTime<Utc>,
    ladder: &[u32],
    first_review_minutes: i64,
) -> LearningResult<CompletionOutcome> {
    let current = get_review(conn, review_id)?;
    if current.user_id != user_id {
        return Err(LearningError::ReviewOwnership {
            review_id: review_id.to_string(),
            user_id: user_id.to_string(),
        });
    }
    if current.completed_at.is_some() {
        return Err(LearningError::ReviewAlreadyCompleted(review_id.to_string()));
    }

    let current_index = schedule::interval_index_for_days(current.interval_days, ladder);
    let next_index = schedule::next_interval_index(current_index, result, ladder);
    let next_date = schedule::review_date(now, next_index, ladder, first_review_minutes);
    let next_interval_days = ladder
        .get(next_index)
        .or(ladder.last())
        .copied()
        .unwrap_or(0);

    let tx = conn.transaction()?;

    // 1. Stamp the completed row
    tx.execute(
        "UPDATE reviews SET completed_at = ?1, result = ?2, next_review_date = ?3 WHERE id = ?4",
        params![
            now.to_rfc3339(),
            result.as_str(),
            next_date.to_rfc3339(),
            review_id
        ],
    )?;

    // 2. Insert the successor
    let next_id = uuid::Uuid::now_v7().to_string();
    tx.execute(
        "INSERT INTO reviews (id, user_id, topic_id, scheduled_date, interval_days) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            next_id,
            user_id,
            current.topic_id,
            next_date.to_rfc3339(),
            next_interval_days
        ],
    )?;

    // 3. Topic bookkeeping: review count, mastery step, last_reviewed
    topics::record_review_outcome(&tx, &current.topic_id, result, now)?;

    // 4. Activity log
    activity::log(
        &tx,
        "review_completed",
        user_id,
        Some(&serde_json::json!({
            "review_id": review_id,
            "topic_id": current.topic_id,
            "result": result.as_str(),
            "next_interval_days": next_interval_days,
        })),
        now,
    )?;

    tx.commit()?;

    Ok(CompletionOutcome {
        completed: get_review(conn, review_id)?,
        next: get_review(conn, &next_id)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::learning::schedule::{FIRST_REVIEW_MINUTES, REVIEW_INTERVALS};
    use chrono::{Duration, TimeZone};

    fn test_db() -> Connection {
        db::open_memory_database().unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap()
    }

    fn seed_topic(conn: &Connection) -> String {
        topics::find_or_create(conn, "u1", "tides", now()).unwrap().id
    }

    fn schedule(conn: &Connection, topic_id: &str, index: usize) -> Review {
        schedule_review(
            conn,
            "u1",
            topic_id,
            index,
            now(),
            &REVIEW_INTERVALS,
            FIRST_REVIEW_MINUTES,
        )
        .unwrap()
    }

    #[test]
    fn schedule_at_index_zero_lands_ten_minutes_out() {
        let conn = test_db();
        let topic_id = seed_topic(&conn);

        let review = schedule(&conn, &topic_id, 0);
        assert_eq!(review.interval_days, 0);

        let scheduled: DateTime<Utc> = review.scheduled_date.parse().unwrap();
        assert_eq!(scheduled - now(), Duration::minutes(10));
    }

    #[test]
    fn schedule_for_unknown_topic_errors() {
        let conn = test_db();
        let err = schedule_review(
            &conn,
            "u1",
            "missing",
            0,
            now(),
            &REVIEW_INTERVALS,
            FIRST_REVIEW_MINUTES,
        )
        .unwrap_err();
        assert!(matches!(err, LearningError::TopicNotFound(_)));
    }

    #[test]
    fn list_open_excludes_completed() {
        let mut conn = test_db();
        let topic_id = seed_topic(&conn);
        let review = schedule(&conn, &topic_id, 0);

        assert_eq!(list_open(&conn, "u1").unwrap().len(), 1);

        complete_review(
            &mut conn,
            &review.id,
            "u1",
            ReviewResult::Good,
            now(),
            &REVIEW_INTERVALS,
            FIRST_REVIEW_MINUTES,
        )
        .unwrap();

        // the completed row is gone from the open list, its successor appears
        let open = list_open(&conn, "u1").unwrap();
        assert_eq!(open.len(), 1);
        assert_ne!(open[0].id, review.id);
    }

    #[test]
    fn good_completion_steps_the_ladder_up() {
        let mut conn = test_db();
        let topic_id = seed_topic(&conn);
        let review = schedule(&conn, &topic_id, 2); // 3 days

        let outcome = complete_review(
            &mut conn,
            &review.id,
            "u1",
            ReviewResult::Good,
            now(),
            &REVIEW_INTERVALS,
            FIRST_REVIEW_MINUTES,
        )
        .unwrap();

        assert_eq!(outcome.completed.result, Some(ReviewResult::Good));
        assert!(outcome.completed.completed_at.is_some());
        assert_eq!(outcome.next.interval_days, 7);

        let next_date: DateTime<Utc> = outcome.next.scheduled_date.parse().unwrap();
        assert_eq!(next_date - now(), Duration::days(7));
    }

    #[test]
    fn poor_completion_at_seven_days_drops_to_three() {
        let mut conn = test_db();
        let topic_id = seed_topic(&conn);
        let review = schedule(&conn, &topic_id, 3); // 7 days

        let outcome = complete_review(
            &mut conn,
            &review.id,
            "u1",
            ReviewResult::Poor,
            now(),
            &REVIEW_INTERVALS,
            FIRST_REVIEW_MINUTES,
        )
        .unwrap();

        assert_eq!(outcome.next.interval_days, 3);
    }

    #[test]
    fn poor_at_bootstrap_rung_reschedules_minutes_out() {
        let mut conn = test_db();
        let topic_id = seed_topic(&conn);
        let review = schedule(&conn, &topic_id, 0);

        let outcome = complete_review(
            &mut conn,
            &review.id,
            "u1",
            ReviewResult::Poor,
            now(),
            &REVIEW_INTERVALS,
            FIRST_REVIEW_MINUTES,
        )
        .unwrap();

        assert_eq!(outcome.next.interval_days, 0);
        let next_date: DateTime<Utc> = outcome.next.scheduled_date.parse().unwrap();
        assert_eq!(next_date - now(), Duration::minutes(10));
    }

    #[test]
    fn skipped_completion_holds_the_rung() {
        let mut conn = test_db();
        let topic_id = seed_topic(&conn);
        let review = schedule(&conn, &topic_id, 4); // 14 days

        let outcome = complete_review(
            &mut conn,
            &review.id,
            "u1",
            ReviewResult::Skipped,
            now(),
            &REVIEW_INTERVALS,
            FIRST_REVIEW_MINUTES,
        )
        .unwrap();

        assert_eq!(outcome.next.interval_days, 14);
    }

    #[test]
    fn completion_updates_topic_bookkeeping() {
        let mut conn = test_db();
        let topic_id = seed_topic(&conn);
        let review = schedule(&conn, &topic_id, 0);

        complete_review(
            &mut conn,
            &review.id,
            "u1",
            ReviewResult::Good,
            now(),
            &REVIEW_INTERVALS,
            FIRST_REVIEW_MINUTES,
        )
        .unwrap();

        let topic = topics::get_topic(&conn, &topic_id).unwrap();
        assert_eq!(topic.review_count, 1);
        assert_eq!(topic.mastery_level, 1);
    }

    #[test]
    fn completing_twice_is_rejected() {
        let mut conn = test_db();
        let topic_id = seed_topic(&conn);
        let review = schedule(&conn, &topic_id, 0);

        complete_review(
            &mut conn,
            &review.id,
            "u1",
            ReviewResult::Good,
            now(),
            &REVIEW_INTERVALS,
            FIRST_REVIEW_MINUTES,
        )
        .unwrap();

        let err = complete_review(
            &mut conn,
            &review.id,
            "u1",
            ReviewResult::Good,
            now(),
            &REVIEW_INTERVALS,
            FIRST_REVIEW_MINUTES,
        )
        .unwrap_err();
        assert!(matches!(err, LearningError::ReviewAlreadyCompleted(_)));
    }

    #[test]
    fn foreign_review_is_rejected() {
        let mut conn = test_db();
        let topic_id = seed_topic(&conn);
        let review = schedule(&conn, &topic_id, 0);

        let err = complete_review(
            &mut conn,
            &review.id,
            "intruder",
            ReviewResult::Good,
            now(),
            &REVIEW_INTERVALS,
            FIRST_REVIEW_MINUTES,
        )
        .unwrap_err();
        assert!(matches!(err, LearningError::ReviewOwnership { .. }));

        // nothing was stamped
        let review = get_review(&conn, &review.id).unwrap();
        assert!(review.completed_at.is_none());
    }

    #[test]
    fn completing_missing_review_errors() {
        let mut conn = test_db();
        let err = complete_review(
            &mut conn,
            "nope",
            "u1",
            ReviewResult::Good,
            now(),
            &REVIEW_INTERVALS,
            FIRST_REVIEW_MINUTES,
        )
        .unwrap_err();
        assert!(matches!(err, LearningError::ReviewNotFound(_)));
    }

    #[test]
    fn due_count_counts_past_schedules_only() {
        let conn = test_db();
        let topic_id = seed_topic(&conn);
        schedule(&conn, &topic_id, 3); // 7 days ahead, not due

        assert_eq!(due_count(&conn, "u1", now()).unwrap(), 0);
        assert_eq!(
            due_count(&conn, "u1", now() + Duration::days(8)).unwrap(),
            1
        );
    }
}
