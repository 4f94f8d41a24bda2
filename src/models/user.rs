// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// User profile stored in Firestore at `users/{uid}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub struct User {
    /// Auth identity (also used as document ID)
    pub uid: String,
    /// Display name, unique across users
    pub username: String,
    /// Free-form location
    #[serde(default)]
    pub location: String,
    /// Avatar image URI
    #[serde(default)]
    pub selected_image: String,
    /// Completed swaps counter
    #[serde(default)]
    pub successful_swaps: u32,
    /// Average rating
    #[serde(default)]
    pub rating: f64,
    /// When the profile was first created
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub date_joined: DateTime<Utc>,
}
