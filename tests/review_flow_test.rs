mod helpers;

use aomigo::learning::reviews::{complete_review, list_open, schedule_review};
use aomigo::learning::schedule::{FIRST_REVIEW_MINUTES, REVIEW_INTERVALS};
use aomigo::learning::topics;
use aomigo::learning::types::ReviewResult;
use chrono::{DateTime, Duration, Utc};
use helpers::{fixed_now, test_db};

#[test]
fn teaching_then_climbing_the_full_ladder() {
    let mut conn = test_db();
    let now = fixed_now();

    let topic = topics::find_or_create(&conn, "u1", "plate tectonics", now).unwrap();
    let mut review = schedule_review(
        &conn,
        "u1",
        &topic.id,
        0,
        now,
        &REVIEW_INTERVALS,
        FIRST_REVIEW_MINUTES,
    )
    .unwrap();

    // Seven good reviews walk the ladder 0 -> 6 and then hold at 60 days
    let expected_days = [1, 3, 7, 14, 30, 60, 60];
    let mut clock = now;
    for days in expected_days {
        clock += Duration::hours(1);
        let outcome = complete_review(
            &mut conn,
            &review.id,
            "u1",
            ReviewResult::Good,
            clock,
            &REVIEW_INTERVALS,
            FIRST_REVIEW_MINUTES,
        )
        .unwrap();
        assert_eq!(outcome.next.interval_days, days);
        review = outcome.next;
    }

    // Each completion appended a successor: 8 rows total, one still open
    let total: i64 = conn
        .query_row("SELECT COUNT(*) FROM reviews WHERE topic_id = ?1", [&topic.id], |r| {
            r.get(0)
        })
        .unwrap();
    assert_eq!(total, 8);
    assert_eq!(list_open(&conn, "u1").unwrap().len(), 1);

    // Mastery capped at 5 despite 7 good reviews
    let topic = topics::get_topic(&conn, &topic.id).unwrap();
    assert_eq!(topic.mastery_level, 5);
    assert_eq!(topic.review_count, 7);
}

#[test]
fn poor_streak_walks_back_to_the_bootstrap_rung() {
    let mut conn = test_db();
    let now = fixed_now();

    let topic = topics::find_or_create(&conn, "u1", "irregular verbs", now).unwrap();
    let mut review = schedule_review(
        &conn,
        "u1",
        &topic.id,
        3, // 7 days
        now,
        &REVIEW_INTERVALS,
        FIRST_REVIEW_MINUTES,
    )
    .unwrap();

    let expected_days = [3, 1, 0, 0];
    for days in expected_days {
        let outcome = complete_review(
            &mut conn,
            &review.id,
            "u1",
            ReviewResult::Poor,
            now,
            &REVIEW_INTERVALS,
            FIRST_REVIEW_MINUTES,
        )
        .unwrap();
        assert_eq!(outcome.next.interval_days, days);
        review = outcome.next;
    }

    // The bootstrap rung reschedules minutes ahead, not a day
    let scheduled: DateTime<Utc> = review.scheduled_date.parse().unwrap();
    assert_eq!(scheduled - now, Duration::minutes(10));
}

#[test]
fn completed_rows_are_immutable_history() {
    let mut conn = test_db();
    let now = fixed_now();

    let topic = topics::find_or_create(&conn, "u1", "tides", now).unwrap();
    let review = schedule_review(
        &conn,
        "u1",
        &topic.id,
        0,
        now,
        &REVIEW_INTERVALS,
        FIRST_REVIEW_MINUTES,
    )
    .unwrap();

    let outcome = complete_review(
        &mut conn,
        &review.id,
        "u1",
        ReviewResult::Good,
        now,
        &REVIEW_INTERVALS,
        FIRST_REVIEW_MINUTES,
    )
    .unwrap();

    let stamped_at = outcome.completed.completed_at.clone().unwrap();

    // A second completion attempt is rejected and changes nothing
    complete_review(
        &mut conn,
        &review.id,
        "u1",
        ReviewResult::Poor,
        now + Duration::days(1),
        &REVIEW_INTERVALS,
        FIRST_REVIEW_MINUTES,
    )
    .unwrap_err();

    let (completed_at, result): (String, String) = conn
        .query_row(
            "SELECT completed_at, result FROM reviews WHERE id = ?1",
            [&review.id],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(completed_at, stamped_at);
    assert_eq!(result, "good");
}

#[test]
fn mixed_outcomes_track_mastery_and_spacing() {
    let mut conn = test_db();
    let now = fixed_now();

    let topic = topics::find_or_create(&conn, "u1", "photosynthesis", now).unwrap();
    let review = schedule_review(
        &conn,
        "u1",
        &topic.id,
        0,
        now,
        &REVIEW_INTERVALS,
        FIRST_REVIEW_MINUTES,
    )
    .unwrap();

    let good = complete_review(
        &mut conn, &review.id, "u1", ReviewResult::Good, now,
        &REVIEW_INTERVALS, FIRST_REVIEW_MINUTES,
    )
    .unwrap();
    let skipped = complete_review(
        &mut conn, &good.next.id, "u1", ReviewResult::Skipped, now,
        &REVIEW_INTERVALS, FIRST_REVIEW_MINUTES,
    )
    .unwrap();
    let poor = complete_review(
        &mut conn, &skipped.next.id, "u1", ReviewResult::Poor, now,
        &REVIEW_INTERVALS, FIRST_REVIEW_MINUTES,
    )
    .unwrap();

    // good: 0 -> 1 day, skip: holds 1 day, poor: 1 day -> bootstrap
    assert_eq!(good.next.interval_days, 1);
    assert_eq!(skipped.next.interval_days, 1);
    assert_eq!(poor.next.interval_days, 0);

    // mastery: +1, hold, -1
    let topic = topics::get_topic(&conn, &topic.id).unwrap();
    assert_eq!(topic.mastery_level, 0);
    assert_eq!(topic.review_count, 3);
}
