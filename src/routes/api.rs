// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON API routes used by the mobile app.
//!
//! The caller supplies the authenticated uid; token verification happens
//! in front of this service.

use crate::error::{AppError, Result};
use crate::models::{Book, Message, Swap, SwapStatus, User, Volume};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

const DEFAULT_CATALOG_RESULTS: u32 = 20;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users", post(create_user))
        .route("/api/users/{uid}", get(get_user).patch(update_user))
        .route("/api/users/{uid}/offers", get(get_offers))
        .route("/api/users/{uid}/requests", get(get_requests))
        .route("/api/books", get(get_books).post(add_book))
        .route("/api/books/isbn/{isbn}", get(get_book_by_isbn))
        .route(
            "/api/books/isbn/{isbn}/swap-count",
            post(update_swap_count),
        )
        .route("/api/swaps", get(get_swaps_by_isbn).post(add_swap))
        .route(
            "/api/swaps/{swap_id}",
            patch(update_swap).delete(delete_swap),
        )
        .route(
            "/api/swaps/{swap_id}/messages",
            get(get_messages).post(add_message),
        )
        .route("/api/catalog/search", get(search_catalog))
}

// ─── Users ───────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    #[serde(default)]
    #[validate(length(max = 128))]
    pub location: String,
    #[validate(length(min = 1, max = 128))]
    pub uid: String,
    #[serde(default)]
    #[validate(length(max = 2048))]
    pub selected_image: String,
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>)> {
    req.validate()?;

    let user = state
        .db
        .create_user(&req.username, &req.location, &req.uid, &req.selected_image)
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> Result<Json<User>> {
    let user = state
        .db
        .get_user_by_uid(&uid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", uid)))?;

    Ok(Json(user))
}

/// Profile patch. Missing or empty fields are left unchanged.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub struct UpdateUserRequest {
    #[validate(length(max = 64))]
    pub username: Option<String>,
    #[validate(length(max = 128))]
    pub location: Option<String>,
    #[validate(length(max = 2048))]
    pub selected_image: Option<String>,
}

async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<StatusCode> {
    req.validate()?;

    state
        .db
        .update_user(
            req.username.as_deref(),
            req.location.as_deref(),
            &uid,
            req.selected_image.as_deref(),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub struct SwapsResponse {
    pub swaps: Vec<Swap>,
}

async fn get_offers(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> Result<Json<SwapsResponse>> {
    let swaps = state.db.get_offers_by_user_id(&uid).await?;
    Ok(Json(SwapsResponse { swaps }))
}

async fn get_requests(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> Result<Json<SwapsResponse>> {
    let swaps = state.db.get_requests_by_user_id(&uid).await?;
    Ok(Json(SwapsResponse { swaps }))
}

// ─── Books ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct BooksQuery {
    /// Case-insensitive match on title, author or category
    search: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub struct BooksResponse {
    pub books: Vec<Book>,
}

async fn get_books(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BooksQuery>,
) -> Result<Json<BooksResponse>> {
    let books = state.db.get_books(params.search.as_deref()).await?;
    Ok(Json(BooksResponse { books }))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub struct AddBookRequest {
    #[validate(length(min = 1, max = 64))]
    pub volume_id: String,
}

/// Look the volume up in the catalog and list it.
async fn add_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddBookRequest>,
) -> Result<(StatusCode, Json<Book>)> {
    req.validate()?;

    let volume = state.catalog.get_volume(&req.volume_id).await?;
    let book = state.db.add_book(&volume).await?;

    Ok((StatusCode::CREATED, Json(book)))
}

async fn get_book_by_isbn(
    State(state): State<Arc<AppState>>,
    Path(isbn): Path<String>,
) -> Result<Json<Book>> {
    let book = state
        .db
        .get_book_by_isbn(&isbn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No book with ISBN {}", isbn)))?;

    Ok(Json(book))
}

async fn update_swap_count(
    State(state): State<Arc<AppState>>,
    Path(isbn): Path<String>,
) -> Result<StatusCode> {
    state.db.update_swap_count_by_isbn(&isbn).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ─── Swaps ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct SwapsQuery {
    isbn: Option<String>,
}

/// Available swaps for an ISBN.
async fn get_swaps_by_isbn(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SwapsQuery>,
) -> Result<Json<SwapsResponse>> {
    let isbn = params
        .isbn
        .filter(|i| !i.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing 'isbn' parameter".to_string()))?;

    let swaps = state.db.get_swaps_by_isbn(&isbn).await?;
    Ok(Json(SwapsResponse { swaps }))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub struct AddSwapRequest {
    #[validate(length(max = 256))]
    pub condition: String,
    #[validate(length(min = 1, max = 64))]
    pub volume_id: String,
    #[validate(length(min = 1, max = 128))]
    pub offered_by: String,
}

async fn add_swap(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddSwapRequest>,
) -> Result<(StatusCode, Json<Swap>)> {
    req.validate()?;

    let volume: Volume = state.catalog.get_volume(&req.volume_id).await?;
    let swap = state
        .db
        .add_swap(&req.condition, &volume, &req.offered_by)
        .await?;

    Ok((StatusCode::CREATED, Json(swap)))
}

/// Swap patch. Missing or empty fields are left unchanged.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub struct UpdateSwapRequest {
    #[validate(length(max = 128))]
    pub requested_by: Option<String>,
    #[validate(length(max = 32))]
    pub status: Option<String>,
}

async fn update_swap(
    State(state): State<Arc<AppState>>,
    Path(swap_id): Path<String>,
    Json(req): Json<UpdateSwapRequest>,
) -> Result<StatusCode> {
    req.validate()?;

    let status = req.status.map(SwapStatus::from);
    state
        .db
        .update_swap_by_id(&swap_id, req.requested_by.as_deref(), status.as_ref())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn delete_swap(
    State(state): State<Arc<AppState>>,
    Path(swap_id): Path<String>,
) -> Result<StatusCode> {
    state.db.delete_swap_by_id(&swap_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ─── Messages ────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub struct MessagesResponse {
    pub messages: Vec<Message>,
}

async fn get_messages(
    State(state): State<Arc<AppState>>,
    Path(swap_id): Path<String>,
) -> Result<Json<MessagesResponse>> {
    let messages = state.db.get_messages(&swap_id).await?;
    Ok(Json(MessagesResponse { messages }))
}

#[derive(Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub struct AddMessageRequest {
    /// Sender uid; the profile is snapshotted into the message
    #[validate(length(min = 1, max = 128))]
    pub uid: String,
    #[validate(length(min = 1, max = 4000))]
    pub text: String,
}

async fn add_message(
    State(state): State<Arc<AppState>>,
    Path(swap_id): Path<String>,
    Json(req): Json<AddMessageRequest>,
) -> Result<(StatusCode, Json<Message>)> {
    req.validate()?;

    let sender = state
        .db
        .get_user_by_uid(&req.uid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", req.uid)))?;

    let message = state.db.add_message(&swap_id, &sender, &req.text).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

// ─── Catalog ─────────────────────────────────────────────────

#[derive(Deserialize)]
struct CatalogQuery {
    q: Option<String>,
    max_results: Option<u32>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub struct VolumesResponse {
    pub volumes: Vec<Volume>,
}

async fn search_catalog(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CatalogQuery>,
) -> Result<Json<VolumesResponse>> {
    let q = params
        .q
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing 'q' parameter".to_string()))?;

    let volumes = state
        .catalog
        .search(&q, params.max_results.unwrap_or(DEFAULT_CATALOG_RESULTS))
        .await?;

    Ok(Json(VolumesResponse { volumes }))
}
