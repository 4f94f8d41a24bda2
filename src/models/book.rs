// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Book model stored at `books/{volumeId}`.

use crate::error::AppError;
use crate::models::Volume;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Number of description words kept in the short description.
pub const SHORT_DESCRIPTION_WORDS: usize = 30;

/// Book listing stored in Firestore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub struct Book {
    pub title: String,
    /// First listed author
    pub author: String,
    /// First listed category
    pub category: String,
    pub long_description: String,
    /// First words of the description followed by "..."
    pub short_description: String,
    /// ISBN-10 identifier
    pub isbn: String,
    pub cover_image_uri: String,
    /// When the book was added (RFC3339, UTC)
    pub date_added: String,
}

impl Book {
    /// Build a book listing from a catalog volume.
    pub fn from_volume(volume: &Volume, date_added: String) -> Result<Self, AppError> {
        let info = &volume.volume_info;
        let description = info.description()?;

        Ok(Self {
            title: info.title()?.to_string(),
            author: info.first_author()?.to_string(),
            category: info.first_category()?.to_string(),
            long_description: description.to_string(),
            short_description: short_description(description),
            isbn: info.isbn10()?.to_string(),
            cover_image_uri: info.thumbnail()?.to_string(),
            date_added,
        })
    }

    /// Case-insensitive substring match against title, author or category.
    ///
    /// `needle` must already be lower-cased.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.author.to_lowercase().contains(needle)
            || self.category.to_lowercase().contains(needle)
    }
}

/// First 30 space-separated words of `description` followed by "...".
///
/// The ellipsis is appended even when the description is shorter.
pub fn short_description(description: &str) -> String {
    let mut short = description
        .split(' ')
        .take(SHORT_DESCRIPTION_WORDS)
        .collect::<Vec<_>>()
        .join(" ");
    short.push_str("...");
    short
}
