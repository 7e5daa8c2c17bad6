use serde::{Deserialize, Serialize};
use crate::rating::Rating;
use crate::status::WatchStatus;

/// One tracked movie or series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntry {
    pub id: String, // Assigned by the store, never changes
    pub name: String,
    pub year: String, // Free text, e.g. "2022-2024"
    pub category: String,
    pub status: WatchStatus,
    pub rating: Rating,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Every entry field except the id; what a form submission produces
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EntryDraft {
    pub name: String,
    pub year: String,
    pub category: String,
    pub status: WatchStatus,
    pub rating: Rating,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl EntryDraft {
    pub fn into_entry(self, id: String) -> WatchlistEntry {
        WatchlistEntry {
            id,
            name: self.name,
            year: self.year,
            category: self.category,
            status: self.status,
            rating: self.rating,
            remarks: self.remarks,
            platform: self.platform,
            image_url: self.image_url,
        }
    }
}

impl From<WatchlistEntry> for EntryDraft {
    fn from(entry: WatchlistEntry) -> Self {
        Self {
            name: entry.name,
            year: entry.year,
            category: entry.category,
            status: entry.status,
            rating: entry.rating,
            remarks: entry.remarks,
            platform: entry.platform,
            image_url: entry.image_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dune() -> EntryDraft {
        EntryDraft {
            name: "Dune".to_string(),
            year: "2021".to_string(),
            category: "Hollywood Movies".to_string(),
            status: WatchStatus::ToWatch,
            rating: Rating::new(8).unwrap(),
            remarks: String::new(),
            platform: String::new(),
            image_url: None,
        }
    }

    #[test]
    fn test_entry_json_shape() {
        let entry = dune().into_entry("abc".to_string());
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["id"], "abc");
        assert_eq!(value["status"], "To Watch");
        assert_eq!(value["rating"], "8");
        assert!(value.get("imageUrl").is_none());

        let mut with_image = entry.clone();
        with_image.image_url = Some("https://img.example/dune.jpg".to_string());
        let value = serde_json::to_value(&with_image).unwrap();
        assert_eq!(value["imageUrl"], "https://img.example/dune.jpg");
    }

    #[test]
    fn test_optional_text_fields_default_to_empty() {
        let json = r#"{"id":"x","name":"Dune","year":"2021","category":"Anime","status":"Watched","rating":"9"}"#;
        let entry: WatchlistEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.remarks, "");
        assert_eq!(entry.platform, "");
        assert_eq!(entry.image_url, None);
    }

    #[test]
    fn test_draft_round_trip_keeps_fields() {
        let entry = dune().into_entry("id-1".to_string());
        let draft = EntryDraft::from(entry.clone());
        assert_eq!(draft.into_entry("id-1".to_string()), entry);
    }
}
