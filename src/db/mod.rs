// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.
//!
//! [`BookSwapDb`] holds the typed operations used by the app. It talks to a
//! [`DocumentStore`] so the backend can be Firestore in production or the
//! in-memory store in tests.

pub mod book_swap;
pub mod firestore;
pub mod memory;

pub use book_swap::BookSwapDb;
pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

use crate::error::AppError;
use async_trait::async_trait;
use rand::{distributions::Alphanumeric, Rng};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const BOOKS: &str = "books";
    pub const SWAPS: &str = "swaps";
    /// Chat messages (keyed by generated ID, grouped by `swapId`)
    pub const CHATS: &str = "chats";
}

/// A schemaless document: field name to JSON value.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// A query result: document ID and fields.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub fields: Document,
}

/// Fields kept as native timestamps by stores that have them. Values are
/// RFC3339 strings in documents.
pub const TIMESTAMP_FIELDS: &[&str] = &["dateJoined"];

/// Length of generated document IDs.
pub const AUTO_ID_LEN: usize = 20;

/// Generate a random alphanumeric document ID.
pub fn auto_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(AUTO_ID_LEN)
        .map(char::from)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Equality filters combined with AND, plus an optional single-field order.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub filters: Vec<(String, String)>,
    pub order_by: Option<(String, Direction)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field == value`.
    pub fn eq(mut self, field: &str, value: impl Into<String>) -> Self {
        self.filters.push((field.to_string(), value.into()));
        self
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by = Some((field.to_string(), direction));
        self
    }
}

/// Minimal document-database operations the data-access layer needs.
///
/// Documents without the ordered field are left out of ordered queries.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Run a query against a collection.
    async fn query(
        &self,
        collection: &str,
        query: Query,
    ) -> Result<Vec<StoredDocument>, AppError>;

    /// Fetch a single document by ID.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, AppError>;

    /// Create or fully replace a document.
    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<(), AppError>;

    /// Create a document or overwrite only the given fields of an existing one.
    async fn merge(&self, collection: &str, id: &str, fields: Document) -> Result<(), AppError>;

    /// Create a document under a generated ID and return the ID.
    async fn add(&self, collection: &str, doc: Document) -> Result<String, AppError>;

    /// Patch fields of an existing document. Fails with `NotFound` if absent.
    async fn update(&self, collection: &str, id: &str, fields: Document) -> Result<(), AppError>;

    /// Delete a document. Deleting a missing document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), AppError>;
}

/// Serialize a model into a document.
pub fn to_document<T: serde::Serialize>(value: &T) -> Result<Document, AppError> {
    match serde_json::to_value(value)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(AppError::Database(format!(
            "Expected an object document, got {}",
            other
        ))),
    }
}

/// Deserialize a document into a model.
pub fn from_document<T: serde::de::DeserializeOwned>(doc: Document) -> Result<T, AppError> {
    Ok(serde_json::from_value(serde_json::Value::Object(doc))?)
}
