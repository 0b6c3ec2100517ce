//! Dashboard aggregates derived from topic state.

use super::Topic;

/// Mean retention level across all topics; 0.0 for an empty collection.
pub fn average_review_level<'a, I>(topics: I) -> f64
where
    I: IntoIterator<Item = &'a Topic>,
{
    let mut sum = 0u64;
    let mut count = 0u64;
    for topic in topics {
        sum += topic.review_level as u64;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

/// Total accumulated study time in seconds.
pub fn total_time_spent<'a, I>(topics: I) -> u64
where
    I: IntoIterator<Item = &'a Topic>,
{
    topics.into_iter().map(|t| t.time_spent).sum()
}

/// Mastery rank from cumulative study hours. Independent of the review
/// scheduler.
pub fn rank_for_seconds(total_seconds: u64) -> &'static str {
    let hours = total_seconds as f64 / 3600.0;
    if hours < 5.0 {
        "Novice"
    } else if hours < 20.0 {
        "Apprentice"
    } else if hours < 50.0 {
        "Scholar"
    } else if hours < 100.0 {
        "Master"
    } else {
        "Grandmaster"
    }
}

/// Formats seconds as "Hh MMm" for dashboard display.
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    format!("{}h {:02}m", hours, minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic_at_level(level: u8) -> Topic {
        let mut topic = Topic::new("t", "");
        topic.review_level = level;
        topic
    }

    #[test]
    fn test_average_of_empty_collection_is_zero() {
        let topics: Vec<Topic> = Vec::new();
        assert_eq!(average_review_level(&topics), 0.0);
    }

    #[test]
    fn test_average_review_level() {
        let topics = vec![topic_at_level(2), topic_at_level(4), topic_at_level(6)];
        assert_eq!(average_review_level(&topics), 4.0);
    }

    #[test]
    fn test_total_time_spent() {
        let mut a = Topic::new("a", "");
        a.time_spent = 120;
        let mut b = Topic::new("b", "");
        b.time_spent = 60;
        assert_eq!(total_time_spent([&a, &b]), 180);
    }

    #[test]
    fn test_rank_tiers() {
        assert_eq!(rank_for_seconds(0), "Novice");
        assert_eq!(rank_for_seconds(4 * 3600), "Novice");
        assert_eq!(rank_for_seconds(5 * 3600), "Apprentice");
        assert_eq!(rank_for_seconds(20 * 3600), "Scholar");
        assert_eq!(rank_for_seconds(50 * 3600), "Master");
        assert_eq!(rank_for_seconds(100 * 3600), "Grandmaster");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0h 00m");
        assert_eq!(format_duration(3720), "1h 02m");
    }
}
