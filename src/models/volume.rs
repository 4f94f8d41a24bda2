// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Book catalog volume records (Google Books `volumes` resource).
//!
//! Every nested field is optional on the wire. The accessors below turn a
//! missing field into [`AppError::MalformedVolume`] so nothing half-formed
//! reaches the store.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Identifier type carrying the ISBN stored on books and swaps.
pub const ISBN_10: &str = "ISBN_10";

/// A catalog entry as returned by the book search API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub struct Volume {
    /// External catalog volume ID (used as the `books` document ID)
    pub id: String,
    #[serde(default)]
    pub volume_info: VolumeInfo,
}

/// Bibliographic metadata of a volume.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub struct VolumeInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Option<Vec<String>>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub industry_identifiers: Option<Vec<IndustryIdentifier>>,
    #[serde(default)]
    pub image_links: Option<ImageLinks>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub struct IndustryIdentifier {
    /// "ISBN_10", "ISBN_13", "OTHER", ...
    #[serde(rename = "type")]
    pub kind: String,
    pub identifier: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub struct ImageLinks {
    #[serde(default)]
    pub small_thumbnail: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

fn missing(field: &str) -> AppError {
    AppError::MalformedVolume(format!("volumeInfo.{} is missing", field))
}

impl VolumeInfo {
    pub fn title(&self) -> Result<&str, AppError> {
        self.title.as_deref().ok_or_else(|| missing("title"))
    }

    /// First listed author.
    pub fn first_author(&self) -> Result<&str, AppError> {
        self.authors
            .as_ref()
            .and_then(|a| a.first())
            .map(String::as_str)
            .ok_or_else(|| missing("authors"))
    }

    /// First listed category.
    pub fn first_category(&self) -> Result<&str, AppError> {
        self.categories
            .as_ref()
            .and_then(|c| c.first())
            .map(String::as_str)
            .ok_or_else(|| missing("categories"))
    }

    pub fn description(&self) -> Result<&str, AppError> {
        self.description
            .as_deref()
            .ok_or_else(|| missing("description"))
    }

    pub fn thumbnail(&self) -> Result<&str, AppError> {
        self.image_links
            .as_ref()
            .and_then(|l| l.thumbnail.as_deref())
            .ok_or_else(|| missing("imageLinks.thumbnail"))
    }

    /// The first `ISBN_10` industry identifier.
    pub fn isbn10(&self) -> Result<&str, AppError> {
        self.industry_identifiers
            .as_ref()
            .and_then(|ids| ids.iter().find(|id| id.kind == ISBN_10))
            .map(|id| id.identifier.as_str())
            .ok_or_else(|| missing("industryIdentifiers[ISBN_10]"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_catalog_volume() {
        let json = serde_json::json!({
            "id": "zyTCAlFPjgYC",
            "volumeInfo": {
                "title": "The Google Story",
                "authors": ["David A. Vise", "Mark Malseed"],
                "categories": ["Business & Economics"],
                "description": "Here is the story behind one of the most remarkable Internet successes.",
                "industryIdentifiers": [
                    { "type": "ISBN_13", "identifier": "9780553804577" },
                    { "type": "ISBN_10", "identifier": "055380457X" }
                ],
                "imageLinks": {
                    "smallThumbnail": "http://books.google.com/s.jpg",
                    "thumbnail": "http://books.google.com/t.jpg"
                },
                "pageCount": 207
            }
        });

        let volume: Volume = serde_json::from_value(json).unwrap();
        let info = &volume.volume_info;

        assert_eq!(volume.id, "zyTCAlFPjgYC");
        assert_eq!(info.first_author().unwrap(), "David A. Vise");
        assert_eq!(info.first_category().unwrap(), "Business & Economics");
        assert_eq!(info.isbn10().unwrap(), "055380457X");
        assert_eq!(info.thumbnail().unwrap(), "http://books.google.com/t.jpg");
    }

    #[test]
    fn test_missing_fields_are_malformed() {
        let volume: Volume = serde_json::from_value(serde_json::json!({
            "id": "abc",
            "volumeInfo": {
                "title": "Untitled",
                "authors": [],
                "industryIdentifiers": [{ "type": "ISBN_13", "identifier": "9780000000000" }]
            }
        }))
        .unwrap();
        let info = &volume.volume_info;

        assert!(matches!(info.first_author(), Err(AppError::MalformedVolume(_))));
        assert!(matches!(info.first_category(), Err(AppError::MalformedVolume(_))));
        assert!(matches!(info.description(), Err(AppError::MalformedVolume(_))));
        assert!(matches!(info.thumbnail(), Err(AppError::MalformedVolume(_))));
        assert!(matches!(info.isbn10(), Err(AppError::MalformedVolume(_))));
    }
}
