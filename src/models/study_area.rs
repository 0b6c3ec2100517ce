//! Study area is a named collection of topics
use super::Topic;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyArea {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub topics: Vec<Topic>,
    pub created_at: DateTime<Utc>,
}

const AREA_ICONS: [&str; 12] = [
    "🧠", "💻", "🌍", "📊", "🔬", "🎨", "📜", "⚖️", "🏔️", "🧬", "🎼", "🚀",
];

impl StudyArea {
    /// Creates a new empty area. The icon rotates through a fixed set so
    /// sibling areas get distinct icons.
    pub fn new(name: impl Into<String>, existing_areas: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: "Personal knowledge track.".to_string(),
            icon: AREA_ICONS[existing_areas % AREA_ICONS.len()].to_string(),
            topics: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_area_is_empty() {
        let area = StudyArea::new("Rust", 0);
        assert!(area.topics.is_empty());
        assert_eq!(area.name, "Rust");
    }

    #[test]
    fn test_icons_rotate() {
        let a = StudyArea::new("A", 0);
        let b = StudyArea::new("B", 1);
        assert_ne!(a.icon, b.icon);
    }
}
