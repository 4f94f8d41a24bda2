// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bookswap: backend for a book-swapping mobile app
//!
//! This crate provides the data-access layer over the app's document
//! database (users, books, swaps, chats) and a thin JSON API over it.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::BookSwapDb;
use services::CatalogService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: BookSwapDb,
    pub catalog: CatalogService,
}
