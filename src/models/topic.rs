//! Topic is one learning unit inside a study area.
use super::Resource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kanban column a topic sits in. Moving between columns never touches
/// the review scheduling fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StudyStatus {
    Pending,
    InProgress,
    Reviewing,
    Completed,
}

impl StudyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudyStatus::Pending => "PENDING",
            StudyStatus::InProgress => "IN_PROGRESS",
            StudyStatus::Reviewing => "REVIEWING",
            StudyStatus::Completed => "COMPLETED",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "IN_PROGRESS" => StudyStatus::InProgress,
            "REVIEWING" => StudyStatus::Reviewing,
            "COMPLETED" => StudyStatus::Completed,
            _ => StudyStatus::Pending,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StudyStatus::Pending => "To Learn",
            StudyStatus::InProgress => "In Progress",
            StudyStatus::Reviewing => "Reviewing",
            StudyStatus::Completed => "Mastered",
        }
    }

    pub const ALL: [StudyStatus; 4] = [
        StudyStatus::Pending,
        StudyStatus::InProgress,
        StudyStatus::Reviewing,
        StudyStatus::Completed,
    ];
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: StudyStatus,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub resources: Vec<Resource>,
    /// Accumulated study time in seconds. Owned by the timer, not the scheduler.
    #[serde(default)]
    pub time_spent: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_studied: Option<DateTime<Utc>>,
    /// Retention level 0-6. 0 = never reviewed or most recently failed.
    #[serde(default)]
    pub review_level: u8,
    /// Absent until the first review cycle completes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review_at: Option<DateTime<Utc>>,
}

impl Topic {
    /// Creates a fresh topic at review level 0 with no scheduled review.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            status: StudyStatus::Pending,
            notes: String::new(),
            resources: Vec::new(),
            time_spent: 0,
            last_studied: None,
            review_level: 0,
            next_review_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_topic_defaults() {
        let topic = Topic::new("Ownership", "Borrow checker basics");

        assert_eq!(topic.review_level, 0);
        assert!(topic.next_review_at.is_none());
        assert!(topic.last_studied.is_none());
        assert_eq!(topic.time_spent, 0);
        assert_eq!(topic.status, StudyStatus::Pending);
        assert!(topic.resources.is_empty());
    }

    #[test]
    fn test_status_round_trip() {
        for status in StudyStatus::ALL {
            assert_eq!(StudyStatus::from_str(status.as_str()), status);
        }
    }

    #[test]
    fn test_unknown_status_defaults_to_pending() {
        assert_eq!(StudyStatus::from_str("???"), StudyStatus::Pending);
    }
}
