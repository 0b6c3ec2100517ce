//! Container for all study areas loaded into memory
use super::{StudyArea, Topic};

#[derive(Clone, Default)]
pub struct AreaSet {
    pub areas: Vec<StudyArea>,
}

impl AreaSet {
    /// Iterates over every topic in every area.
    pub fn all_topics(&self) -> impl Iterator<Item = &Topic> {
        self.areas.iter().flat_map(|a| a.topics.iter())
    }
}
