//! Learning resources attached to a topic (links, videos, books, ...).
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Link,
    Video,
    Book,
    Pdf,
    Other,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Link => "link",
            ResourceType::Video => "video",
            ResourceType::Book => "book",
            ResourceType::Pdf => "pdf",
            ResourceType::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "link" => ResourceType::Link,
            "video" => ResourceType::Video,
            "book" => ResourceType::Book,
            "pdf" => ResourceType::Pdf,
            _ => ResourceType::Other,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub watched: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_notes: Option<String>,
}

impl Resource {
    pub fn new(resource_type: ResourceType, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            resource_type,
            title: title.into(),
            url: url.into(),
            description: None,
            watched: false,
            video_notes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_round_trip() {
        for ty in [
            ResourceType::Link,
            ResourceType::Video,
            ResourceType::Book,
            ResourceType::Pdf,
            ResourceType::Other,
        ] {
            assert_eq!(ResourceType::from_str(ty.as_str()), ty);
        }
    }

    #[test]
    fn test_new_resource_is_unwatched() {
        let res = Resource::new(ResourceType::Video, "Intro talk", "https://example.com");
        assert!(!res.watched);
        assert!(res.description.is_none());
    }
}
