//! Forgetting-curve scheduling.
//!
//! Reviews climb a fixed interval ladder: 10 minutes, then 1, 3, 7, 14, 30,
//! and 60 days. A good review steps one rung up, a poor one steps one rung
//! down, and a skipped review stays put. Index 0 is the bootstrap rung — it
//! schedules minutes ahead rather than a whole day, so the first review of a
//! freshly taught topic lands while the material is still warm.

use chrono::{DateTime, Duration, Utc};

use crate::learning::types::ReviewResult;

/// The interval ladder, in days. Index 0 schedules
/// [`FIRST_REVIEW_MINUTES`] ahead instead.
pub const REVIEW_INTERVALS: [u32; 7] = [0, 1, 3, 7, 14, 30, 60];

/// Minutes until the bootstrap (index 0) review.
pub const FIRST_REVIEW_MINUTES: i64 = 10;

/// Step the interval index for a review outcome, clamped to the ladder.
pub fn next_interval_index(current: usize, result: ReviewResult, ladder: &[u32]) -> usize {
    let top = ladder.len().saturating_sub(1);
    match result {
        ReviewResult::Good => (current + 1).min(top),
        ReviewResult::Poor => current.saturating_sub(1).min(top),
        ReviewResult::Skipped => current.min(top),
    }
}

/// Recover the ladder index from a stored `interval_days` value.
///
/// Off-ladder values (hand-edited rows, a ladder change between releases)
/// resolve to the nearest rung, preferring the lower rung on ties.
pub fn interval_index_for_days(days: i64, ladder: &[u32]) -> usize {
    let mut best = 0;
    let mut best_distance = i64::MAX;
    for (i, d) in ladder.iter().enumerate() {
        let distance = (days - *d as i64).abs();
        if distance < best_distance {
            best = i;
            best_distance = distance;
        }
    }
    best
}

/// The calendar moment a review at `index` should be attempted, counted from
/// `now`. Index 0 is minutes ahead; every other rung is whole days.
pub fn review_date(
    now: DateTime<Utc>,
    index: usize,
    ladder: &[u32],
    first_review_minutes: i64,
) -> DateTime<Utc> {
    if index == 0 {
        return now + Duration::minutes(first_review_minutes);
    }
    let days = ladder.get(index).or(ladder.last()).copied().unwrap_or(0);
    now + Duration::days(days as i64)
}

/// A review is overdue once its scheduled moment has passed.
pub fn is_overdue(scheduled: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    scheduled < now
}

/// Whole days a review is overdue, rounded up, floored at zero.
pub fn overdue_days(scheduled: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let seconds = (now - scheduled).num_seconds();
    if seconds <= 0 {
        return 0;
    }
    const DAY_SECONDS: i64 = 24 * 60 * 60;
    (seconds + DAY_SECONDS - 1) / DAY_SECONDS
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap()
    }

    #[test]
    fn good_steps_up_for_every_index() {
        for i in 0..REVIEW_INTERVALS.len() {
            let next = next_interval_index(i, ReviewResult::Good, &REVIEW_INTERVALS);
            assert_eq!(next, (i + 1).min(6), "index {i}");
        }
    }

    #[test]
    fn poor_steps_down_for_every_index() {
        for i in 0..REVIEW_INTERVALS.len() {
            let next = next_interval_index(i, ReviewResult::Poor, &REVIEW_INTERVALS);
            assert_eq!(next, i.saturating_sub(1), "index {i}");
        }
    }

    #[test]
    fn skipped_stays_put() {
        for i in 0..REVIEW_INTERVALS.len() {
            let next = next_interval_index(i, ReviewResult::Skipped, &REVIEW_INTERVALS);
            assert_eq!(next, i);
        }
    }

    #[test]
    fn good_at_top_rung_stays_at_top() {
        assert_eq!(next_interval_index(6, ReviewResult::Good, &REVIEW_INTERVALS), 6);
    }

    #[test]
    fn poor_at_bottom_rung_stays_at_bottom() {
        assert_eq!(next_interval_index(0, ReviewResult::Poor, &REVIEW_INTERVALS), 0);
    }

    #[test]
    fn poor_at_seven_days_drops_to_three() {
        // index 3 = 7 days; a poor review lands on index 2 = 3 days
        let next = next_interval_index(3, ReviewResult::Poor, &REVIEW_INTERVALS);
        assert_eq!(next, 2);
        assert_eq!(REVIEW_INTERVALS[next], 3);
    }

    #[test]
    fn index_zero_schedules_ten_minutes_out() {
        let date = review_date(now(), 0, &REVIEW_INTERVALS, FIRST_REVIEW_MINUTES);
        assert_eq!(date - now(), Duration::minutes(10));
    }

    #[test]
    fn nonzero_index_schedules_whole_days() {
        let date = review_date(now(), 3, &REVIEW_INTERVALS, FIRST_REVIEW_MINUTES);
        assert_eq!(date - now(), Duration::days(7));
    }

    #[test]
    fn out_of_range_index_falls_back_to_top_rung() {
        let date = review_date(now(), 99, &REVIEW_INTERVALS, FIRST_REVIEW_MINUTES);
        assert_eq!(date - now(), Duration::days(60));
    }

    #[test]
    fn first_review_is_ten_minutes_not_a_day() {
        let date = review_date(now(), 0, &REVIEW_INTERVALS, FIRST_REVIEW_MINUTES);
        assert_eq!(date - now(), Duration::minutes(10));
        assert!(date - now() < Duration::days(1));
    }

    #[test]
    fn index_recovery_exact_and_nearest() {
        assert_eq!(interval_index_for_days(0, &REVIEW_INTERVALS), 0);
        assert_eq!(interval_index_for_days(7, &REVIEW_INTERVALS), 3);
        assert_eq!(interval_index_for_days(60, &REVIEW_INTERVALS), 6);
        // off-ladder values resolve to the nearest rung
        assert_eq!(interval_index_for_days(8, &REVIEW_INTERVALS), 3);
        assert_eq!(interval_index_for_days(45, &REVIEW_INTERVALS), 5);
        assert_eq!(interval_index_for_days(1000, &REVIEW_INTERVALS), 6);
        // ties prefer the lower rung
        assert_eq!(interval_index_for_days(2, &REVIEW_INTERVALS), 1);
    }

    #[test]
    fn overdue_checks() {
        let scheduled = now() - Duration::hours(1);
        assert!(is_overdue(scheduled, now()));
        assert!(!is_overdue(now() + Duration::minutes(1), now()));

        assert_eq!(overdue_days(now() - Duration::hours(1), now()), 1);
        assert_eq!(overdue_days(now() - Duration::days(3), now()), 3);
        assert_eq!(overdue_days(now() + Duration::days(2), now()), 0);
    }
}
