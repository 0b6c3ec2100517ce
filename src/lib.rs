pub mod database;
pub mod export;
pub mod models;

pub use models::{ActivityLog, AreaSet, Resource, StudyArea, StudyStatus, Topic};
