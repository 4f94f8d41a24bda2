// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bookswap API Server
//!
//! Serves the book-swapping mobile app: user profiles, listed books,
//! swap offers and swap chats.

use bookswap::{
    config::{Config, StoreBackend},
    db::{BookSwapDb, DocumentStore, FirestoreStore, MemoryStore},
    services::{CatalogService, TracingAlerter},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Bookswap API");

    let store: Arc<dyn DocumentStore> = match config.store_backend {
        StoreBackend::Firestore => Arc::new(FirestoreStore::new(&config.gcp_project_id).await?),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };
    let db = BookSwapDb::new(store, Arc::new(TracingAlerter));

    let catalog = CatalogService::from_config(&config);
    tracing::info!(url = %config.books_api_url, "Book catalog client initialized");

    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        catalog,
    });

    let app = bookswap::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("bookswap=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
