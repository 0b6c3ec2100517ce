pub mod activity_log;
pub mod area_set;
pub mod quiz;
pub mod resource;
pub mod scheduler;
pub mod stats;
pub mod study_area;
pub mod topic;

pub use activity_log::{ActivityLog, StudyLog};
pub use area_set::AreaSet;
pub use quiz::QuizQuestion;
pub use resource::{Resource, ResourceType};
pub use study_area::StudyArea;
pub use topic::{StudyStatus, Topic};
