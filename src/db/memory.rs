// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory document store.
//!
//! Used as the test double for [`BookSwapDb`](super::BookSwapDb) and for
//! running the API locally without Firestore. Documents within a collection
//! iterate in document-ID order.

use super::{auto_id, Direction, Document, DocumentStore, Query, StoredDocument};
use crate::error::AppError;
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Process-local document store keyed by collection name.
#[derive(Default)]
pub struct MemoryStore {
    collections: DashMap<String, BTreeMap<String, Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently in a collection.
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .get(collection)
            .map(|docs| docs.len())
            .unwrap_or(0)
    }
}

/// Cross-type ordering: null < bool < number < string < array < map.
fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn matches_filters(doc: &Document, filters: &[(String, String)]) -> bool {
    filters.iter().all(|(field, expected)| {
        matches!(doc.get(field), Some(Value::String(actual)) if actual == expected)
    })
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn query(
        &self,
        collection: &str,
        query: Query,
    ) -> Result<Vec<StoredDocument>, AppError> {
        let mut docs: Vec<StoredDocument> = match self.collections.get(collection) {
            Some(col) => col
                .iter()
                .filter(|(_, doc)| matches_filters(doc, &query.filters))
                .map(|(id, doc)| StoredDocument {
                    id: id.clone(),
                    fields: doc.clone(),
                })
                .collect(),
            None => return Ok(vec![]),
        };

        if let Some((field, direction)) = &query.order_by {
            docs.retain(|doc| doc.fields.contains_key(field));
            docs.sort_by(|a, b| {
                let ord = compare_values(&a.fields[field.as_str()], &b.fields[field.as_str()]);
                match direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                }
            });
        }

        Ok(docs)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, AppError> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|col| col.get(id).cloned()))
    }

    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<(), AppError> {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), doc);
        Ok(())
    }

    async fn merge(&self, collection: &str, id: &str, fields: Document) -> Result<(), AppError> {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .entry(id.to_string())
            .or_default()
            .extend(fields);
        Ok(())
    }

    async fn add(&self, collection: &str, doc: Document) -> Result<String, AppError> {
        let id = auto_id();
        self.set(collection, &id, doc).await?;
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, fields: Document) -> Result<(), AppError> {
        let mut col = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| AppError::NotFound(format!("{}/{}", collection, id)))?;
        let doc = col
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("{}/{}", collection, id)))?;
        doc.extend(fields);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), AppError> {
        if let Some(mut col) = self.collections.get_mut(collection) {
            col.remove(id);
        }
        Ok(())
    }
}
