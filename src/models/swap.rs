// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Swap offers stored in the `swaps` collection.

use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Lifecycle state of a swap offer.
///
/// No transitions are enforced; any caller may set any status. Values
/// written by other clients that are not listed here round-trip through
/// `Other` unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SwapStatus {
    Available,
    Requested,
    Completed,
    Cancelled,
    Other(String),
}

impl SwapStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SwapStatus::Available => "available",
            SwapStatus::Requested => "requested",
            SwapStatus::Completed => "completed",
            SwapStatus::Cancelled => "cancelled",
            SwapStatus::Other(s) => s,
        }
    }
}

impl From<String> for SwapStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "available" => SwapStatus::Available,
            "requested" => SwapStatus::Requested,
            "completed" => SwapStatus::Completed,
            "cancelled" => SwapStatus::Cancelled,
            _ => SwapStatus::Other(s),
        }
    }
}

impl From<&str> for SwapStatus {
    fn from(s: &str) -> Self {
        SwapStatus::from(s.to_string())
    }
}

impl From<SwapStatus> for String {
    fn from(status: SwapStatus) -> Self {
        match status {
            SwapStatus::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for SwapStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An offer to exchange a physical copy of a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub struct Swap {
    /// Own document ID. Written by a second patch after creation, so it can
    /// be missing if that patch never landed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swap_id: Option<String>,
    /// ISBN-10 of the offered book
    pub isbn: String,
    /// Physical condition as described by the offerer
    #[serde(default)]
    pub condition: String,
    /// Offering user ID
    pub offered_by: String,
    /// Requesting user ID, empty while unclaimed
    #[serde(default)]
    pub requested_by: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub status: SwapStatus,
}

impl Swap {
    /// A fresh, unclaimed offer.
    pub fn new_offer(isbn: &str, condition: &str, offered_by: &str) -> Self {
        Self {
            swap_id: None,
            isbn: isbn.to_string(),
            condition: condition.to_string(),
            offered_by: offered_by.to_string(),
            requested_by: String::new(),
            status: SwapStatus::Available,
        }
    }
}
