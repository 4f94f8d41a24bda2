// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Chat messages stored in the `chats` collection.
//!
//! The field names (`_id`, `createdAt`, `user.avatar`) follow the chat UI
//! component used by the mobile client.

use crate::models::User;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A chat message attached to a swap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub struct Message {
    /// Swap ID plus a short random suffix; not guaranteed unique
    #[serde(rename = "_id")]
    pub id: String,
    pub swap_id: String,
    pub text: String,
    /// Milliseconds since the Unix epoch
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub created_at: i64,
    pub user: MessageUser,
}

/// Sender snapshot captured when the message is sent.
///
/// Later profile changes are not reflected in old messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub struct MessageUser {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub name: String,
}

impl From<&User> for MessageUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.uid.clone(),
            avatar: user.selected_image.clone(),
            name: user.username.clone(),
        }
    }
}
