//! Leveled spaced-repetition scheduler.
//!
//! Each topic carries a retention level 0-6. A successful review moves the
//! level one step toward 6, a failed one moves it one step toward 0, both
//! saturating. The destination level indexes a fixed interval table that
//! re-arms the next review date:
//! - level 0 → 1 day, level 1 → 3 days, ... level 6 → 120 days
//! - there is no terminal state: level 6 keeps re-arming at 120 days
//!
//! The functions here are pure; persisting the updated topic and logging
//! the activity are the caller's job.

use super::Topic;
use chrono::{DateTime, Duration, Utc};

/// Days until the next review, indexed by retention level.
pub const REVIEW_INTERVALS: [i64; 7] = [1, 3, 7, 14, 30, 60, 120];

pub const MAX_REVIEW_LEVEL: u8 = 6;

// The interval table must cover exactly the level range 0..=MAX_REVIEW_LEVEL.
const _: () = assert!(REVIEW_INTERVALS.len() == MAX_REVIEW_LEVEL as usize + 1);

/// Interval in days for a retention level. Out-of-range levels clamp to
/// the top tier.
pub fn interval_days(level: u8) -> i64 {
    REVIEW_INTERVALS[level.min(MAX_REVIEW_LEVEL) as usize]
}

/// Applies a review outcome to a topic and returns the updated value.
///
/// Only `review_level`, `next_review_at` and `last_studied` change; every
/// other field is carried over untouched.
pub fn complete_review(topic: &Topic, success: bool, now: DateTime<Utc>) -> Topic {
    let next_level = if success {
        topic.review_level.saturating_add(1).min(MAX_REVIEW_LEVEL)
    } else {
        topic.review_level.saturating_sub(1)
    };

    let mut updated = topic.clone();
    updated.review_level = next_level;
    updated.next_review_at = Some(now + Duration::days(interval_days(next_level)));
    updated.last_studied = Some(now);
    updated
}

/// True when the topic has a scheduled review at or before `now`.
/// Topics that never completed a review cycle are never due.
pub fn is_review_due(topic: &Topic, now: DateTime<Utc>) -> bool {
    match topic.next_review_at {
        Some(next) => next <= now,
        None => false,
    }
}

/// Filters a topic collection down to the ones currently due for review.
pub fn due_topics<'a, I>(topics: I, now: DateTime<Utc>) -> Vec<&'a Topic>
where
    I: IntoIterator<Item = &'a Topic>,
{
    topics
        .into_iter()
        .filter(|t| is_review_due(t, now))
        .collect()
}
