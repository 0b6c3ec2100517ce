//! JSON import/export for study areas.
//! Lets a whole area (topics, notes, resources, scheduling state) move
//! between installations as a single file.

use crate::models::StudyArea;
use std::fs::File;
use std::io::{Read, Write};

/// Exports a study area to a JSON file at the specified path.
pub fn export_json_to_path(area: &StudyArea, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let json_string = serde_json::to_string_pretty(area)?;
    let mut file = File::create(path)?;
    file.write_all(json_string.as_bytes())?;
    Ok(())
}

/// Imports a study area from a JSON file.
/// Returns an error if the file doesn't exist or contains invalid JSON.
pub fn import_json(filename: &str) -> Result<StudyArea, Box<dyn std::error::Error>> {
    let mut file = File::open(filename)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let area: StudyArea = serde_json::from_str(&contents)?;

    log::info!("Area '{}' imported from '{}'", area.name, filename);
    Ok(area)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Resource, ResourceType, StudyArea, Topic};
    use chrono::{TimeZone, Utc};
    use std::fs;

    fn create_test_area() -> StudyArea {
        let mut area = StudyArea::new("Distributed Systems", 0);
        let mut topic = Topic::new("Consensus", "Raft and Paxos");
        topic.review_level = 3;
        topic.next_review_at = Some(Utc.with_ymd_and_hms(2024, 4, 1, 8, 0, 0).unwrap());
        topic.resources.push(Resource::new(
            ResourceType::Pdf,
            "Raft paper",
            "https://raft.github.io/raft.pdf",
        ));
        area.topics.push(topic);
        area.topics.push(Topic::new("Clocks", "Lamport and vector clocks"));
        area
    }

    #[test]
    fn test_export_json_to_path() {
        let area = create_test_area();
        let test_file = "test_export.json";

        let result = export_json_to_path(&area, test_file);
        assert!(result.is_ok());

        assert!(fs::metadata(test_file).is_ok(), "File should exist");

        let _ = fs::remove_file(test_file);
    }

    #[test]
    fn test_export_and_import_roundtrip() {
        let original = create_test_area();
        let test_file = "test_roundtrip.json";

        export_json_to_path(&original, test_file).unwrap();
        let imported = import_json(test_file).unwrap();

        assert_eq!(original.id, imported.id);
        assert_eq!(original.name, imported.name);
        assert_eq!(original.topics.len(), imported.topics.len());

        // Scheduling state survives the round trip intact.
        assert_eq!(imported.topics[0].review_level, 3);
        assert_eq!(imported.topics[0].next_review_at, original.topics[0].next_review_at);
        assert!(imported.topics[1].next_review_at.is_none());
        assert_eq!(imported.topics[0].resources.len(), 1);

        let _ = fs::remove_file(test_file);
    }

    #[test]
    fn test_import_nonexistent_file() {
        let result = import_json("nonexistent_file_xyz123.json");
        assert!(result.is_err());
    }

    #[test]
    fn test_import_invalid_json() {
        let test_file = "test_invalid.json";
        fs::write(test_file, "{ this is not valid json }").unwrap();

        let result = import_json(test_file);
        assert!(result.is_err());

        let _ = fs::remove_file(test_file);
    }

    #[test]
    fn test_import_minimal_topic_fields_default() {
        // Older exports may omit optional scheduling fields entirely.
        let json_content = r#"{
  "id": "7f6f1d7e-7d81-4b8c-9a6e-2f4f6f2a1c01",
  "name": "Minimal",
  "description": "",
  "icon": "🧠",
  "createdAt": "2024-01-01T00:00:00Z",
  "topics": [
    { "id": "7f6f1d7e-7d81-4b8c-9a6e-2f4f6f2a1c02",
      "title": "Bare topic", "description": "", "status": "PENDING" }
  ]
}"#;
        let test_file = "test_minimal.json";
        fs::write(test_file, json_content).unwrap();

        let area = import_json(test_file).unwrap();
        assert_eq!(area.topics[0].review_level, 0);
        assert!(area.topics[0].next_review_at.is_none());
        assert_eq!(area.topics[0].time_spent, 0);

        let _ = fs::remove_file(test_file);
    }
}
