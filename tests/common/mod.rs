// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use bookswap::config::Config;
use bookswap::db::{
    BookSwapDb, Document, DocumentStore, FirestoreStore, MemoryStore, Query, StoredDocument,
};
use bookswap::error::AppError;
use bookswap::models::volume::{ImageLinks, IndustryIdentifier};
use bookswap::models::{Volume, VolumeInfo};
use bookswap::routes::create_router;
use bookswap::services::{Alerter, CatalogService};
use bookswap::AppState;
use std::sync::{Arc, Mutex};

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Keeps every alert in memory, in the order raised.
#[derive(Debug, Default)]
pub struct RecordingAlerter {
    alerts: Mutex<Vec<(String, String)>>,
}

impl RecordingAlerter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of `(title, message)` pairs raised so far.
    #[allow(dead_code)]
    pub fn alerts(&self) -> Vec<(String, String)> {
        self.alerts.lock().unwrap().clone()
    }
}

impl Alerter for RecordingAlerter {
    fn alert(&self, title: &str, message: &str) {
        self.alerts
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
    }
}

/// Create a data-access layer on the Firestore emulator.
#[allow(dead_code)]
pub async fn test_db() -> (BookSwapDb, Arc<RecordingAlerter>) {
    let store = FirestoreStore::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator");
    let alerter = Arc::new(RecordingAlerter::new());
    (BookSwapDb::new(Arc::new(store), alerter.clone()), alerter)
}

/// Create a data-access layer on a fresh in-memory store.
#[allow(dead_code)]
pub fn memory_db() -> (BookSwapDb, Arc<MemoryStore>, Arc<RecordingAlerter>) {
    let store = Arc::new(MemoryStore::new());
    let alerter = Arc::new(RecordingAlerter::new());
    (
        BookSwapDb::new(store.clone(), alerter.clone()),
        store,
        alerter,
    )
}

/// Memory store that yields to the scheduler before every call, so
/// concurrently awaited operations interleave at the I/O boundary like they
/// would against a remote database.
#[allow(dead_code)]
pub struct YieldingStore {
    pub inner: MemoryStore,
}

#[async_trait]
impl DocumentStore for YieldingStore {
    async fn query(
        &self,
        collection: &str,
        query: Query,
    ) -> Result<Vec<StoredDocument>, AppError> {
        tokio::task::yield_now().await;
        self.inner.query(collection, query).await
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, AppError> {
        tokio::task::yield_now().await;
        self.inner.get(collection, id).await
    }

    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<(), AppError> {
        tokio::task::yield_now().await;
        self.inner.set(collection, id, doc).await
    }

    async fn merge(&self, collection: &str, id: &str, fields: Document) -> Result<(), AppError> {
        tokio::task::yield_now().await;
        self.inner.merge(collection, id, fields).await
    }

    async fn add(&self, collection: &str, doc: Document) -> Result<String, AppError> {
        tokio::task::yield_now().await;
        self.inner.add(collection, doc).await
    }

    async fn update(&self, collection: &str, id: &str, fields: Document) -> Result<(), AppError> {
        tokio::task::yield_now().await;
        self.inner.update(collection, id, fields).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), AppError> {
        tokio::task::yield_now().await;
        self.inner.delete(collection, id).await
    }
}

/// Unique suffix for test isolation on a shared emulator.
#[allow(dead_code)]
pub fn unique_id(prefix: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}

/// A complete catalog volume.
#[allow(dead_code)]
pub fn sample_volume(id: &str, title: &str, author: &str, category: &str, isbn: &str) -> Volume {
    Volume {
        id: id.to_string(),
        volume_info: VolumeInfo {
            title: Some(title.to_string()),
            authors: Some(vec![author.to_string(), "Second Author".to_string()]),
            categories: Some(vec![category.to_string(), "Second Category".to_string()]),
            description: Some(format!("{} is a book about many things", title)),
            industry_identifiers: Some(vec![
                IndustryIdentifier {
                    kind: "ISBN_13".to_string(),
                    identifier: format!("978{}", isbn),
                },
                IndustryIdentifier {
                    kind: "ISBN_10".to_string(),
                    identifier: isbn.to_string(),
                },
            ]),
            image_links: Some(ImageLinks {
                small_thumbnail: None,
                thumbnail: Some(format!("http://books.example.com/{}.jpg", id)),
            }),
        },
    }
}

/// Create a test app on an in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::default();
    let (db, _, _) = memory_db();
    // Nothing listens here; catalog-backed routes fail fast.
    let catalog = CatalogService::new("http://127.0.0.1:9/books/v1", None);

    let state = Arc::new(AppState {
        config,
        db,
        catalog,
    });

    (create_router(state.clone()), state)
}
