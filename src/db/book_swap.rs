// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed data-access operations for the book-swap app.
//!
//! Provides operations for:
//! - Users (profiles, username uniqueness on creation)
//! - Books (catalog volumes listed in the app)
//! - Swaps (offers and requests for physical copies)
//! - Chats (messages attached to a swap)
//!
//! Every operation is a single stateless round trip (two for `add_swap`)
//! with no transactions. Failures are logged here and returned to the
//! caller.

use super::{
    collections, from_document, to_document, Direction, Document, DocumentStore, Query,
    StoredDocument,
};
use crate::error::AppError;
use crate::models::{Book, Message, MessageUser, Swap, SwapStatus, User, Volume};
use crate::services::alert::{Alerter, TracingAlerter};
use crate::time_utils::{epoch_millis, format_utc_rfc3339};
use rand::Rng;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Length of the random base-36 suffix appended to message IDs.
const MESSAGE_SUFFIX_LEN: usize = 6;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Data-access layer over an injected document store.
#[derive(Clone)]
pub struct BookSwapDb {
    store: Arc<dyn DocumentStore>,
    alerter: Arc<dyn Alerter>,
}

impl BookSwapDb {
    pub fn new(store: Arc<dyn DocumentStore>, alerter: Arc<dyn Alerter>) -> Self {
        Self { store, alerter }
    }

    /// Backed by a fresh in-memory store, alerts go to the log.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(super::MemoryStore::new()),
            Arc::new(TracingAlerter),
        )
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by auth uid.
    pub async fn get_user_by_uid(&self, uid: &str) -> Result<Option<User>, AppError> {
        let docs = self
            .store
            .query(collections::USERS, Query::new().eq("uid", uid))
            .await
            .inspect_err(|e| tracing::warn!(uid, error = %e, "Failed to look up user"))?;

        Ok(decode_all::<User>(collections::USERS, docs).into_iter().next())
    }

    /// Read every user profile. Only used for the username check.
    async fn get_all_users(&self) -> Result<Vec<User>, AppError> {
        let docs = self
            .store
            .query(collections::USERS, Query::new())
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to list users"))?;

        Ok(decode_all(collections::USERS, docs))
    }

    /// Create the profile for a newly signed-in user.
    ///
    /// The username check scans all users before writing, so two concurrent
    /// calls with the same username can both succeed. Any failure raises the
    /// "username exists" alert, whatever the cause.
    pub async fn create_user(
        &self,
        username: &str,
        location: &str,
        uid: &str,
        selected_image: &str,
    ) -> Result<User, AppError> {
        let result = self
            .insert_user(username, location, uid, selected_image)
            .await;

        if let Err(e) = &result {
            tracing::warn!(uid, username, error = %e, "User creation failed");
            self.alerter.alert("Error", AppError::USERNAME_EXISTS_ALERT);
        }

        result
    }

    async fn insert_user(
        &self,
        username: &str,
        location: &str,
        uid: &str,
        selected_image: &str,
    ) -> Result<User, AppError> {
        let users = self.get_all_users().await?;
        if users.iter().any(|user| user.username == username) {
            return Err(AppError::UsernameTaken(username.to_string()));
        }

        let user = User {
            uid: uid.to_string(),
            username: username.to_string(),
            location: location.to_string(),
            selected_image: selected_image.to_string(),
            successful_swaps: 0,
            rating: 0.0,
            date_joined: chrono::Utc::now(),
        };

        self.store
            .merge(collections::USERS, uid, to_document(&user)?)
            .await?;

        tracing::info!(uid, username, "User created");
        Ok(user)
    }

    /// Patch profile fields. `None` or empty values leave the field as is.
    pub async fn update_user(
        &self,
        username: Option<&str>,
        location: Option<&str>,
        uid: &str,
        selected_image: Option<&str>,
    ) -> Result<(), AppError> {
        let fields = patch_fields(&[
            ("username", username),
            ("location", location),
            ("selectedImage", selected_image),
        ]);

        if fields.is_empty() {
            tracing::debug!(uid, "Nothing to update on user");
            return Ok(());
        }

        self.store
            .update(collections::USERS, uid, fields)
            .await
            .inspect_err(|e| tracing::warn!(uid, error = %e, "Failed to update user"))
    }

    // ─── Book Operations ─────────────────────────────────────────

    /// List a catalog volume as a book, keyed by the volume ID.
    pub async fn add_book(&self, volume: &Volume) -> Result<Book, AppError> {
        if volume.id.is_empty() {
            return Err(AppError::MalformedVolume("id is missing".to_string()));
        }

        let book = Book::from_volume(volume, format_utc_rfc3339(chrono::Utc::now()))
            .inspect_err(|e| tracing::warn!(volume_id = %volume.id, error = %e, "Rejected volume"))?;

        self.store
            .set(collections::BOOKS, &volume.id, to_document(&book)?)
            .await
            .inspect_err(
                |e| tracing::warn!(volume_id = %volume.id, error = %e, "Failed to add book"),
            )?;

        tracing::info!(volume_id = %volume.id, isbn = %book.isbn, "Book added");
        Ok(book)
    }

    /// All books, newest first, optionally filtered by a case-insensitive
    /// substring of title, author or category.
    pub async fn get_books(&self, search_text: Option<&str>) -> Result<Vec<Book>, AppError> {
        let docs = self
            .store
            .query(
                collections::BOOKS,
                Query::new().order_by("dateAdded", Direction::Descending),
            )
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to list books"))?;

        let books: Vec<Book> = decode_all(collections::BOOKS, docs);

        match search_text.filter(|s| !s.is_empty()) {
            Some(text) => {
                let needle = text.to_lowercase();
                Ok(books.into_iter().filter(|b| b.matches(&needle)).collect())
            }
            None => Ok(books),
        }
    }

    /// First book with the given ISBN.
    pub async fn get_book_by_isbn(&self, isbn: &str) -> Result<Option<Book>, AppError> {
        let docs = self
            .store
            .query(collections::BOOKS, Query::new().eq("isbn", isbn))
            .await
            .inspect_err(|e| tracing::warn!(isbn, error = %e, "Failed to look up book"))?;

        Ok(decode_all::<Book>(collections::BOOKS, docs).into_iter().next())
    }

    // ─── Swap Operations ─────────────────────────────────────────

    /// Offer a copy of a book for swapping.
    ///
    /// Creates the swap under a generated ID, then patches the document with
    /// its own ID as `swapId`. The two writes are separate round trips.
    pub async fn add_swap(
        &self,
        condition: &str,
        volume: &Volume,
        offered_by: &str,
    ) -> Result<Swap, AppError> {
        let isbn = volume.volume_info.isbn10()?;
        let mut swap = Swap::new_offer(isbn, condition, offered_by);

        let swap_id = self
            .store
            .add(collections::SWAPS, to_document(&swap)?)
            .await
            .inspect_err(|e| tracing::warn!(isbn, offered_by, error = %e, "Failed to add swap"))?;

        let mut patch = Document::new();
        patch.insert("swapId".to_string(), Value::String(swap_id.clone()));
        self.store
            .update(collections::SWAPS, &swap_id, patch)
            .await
            .inspect_err(|e| {
                tracing::error!(swap_id = %swap_id, error = %e, "Swap created without swapId")
            })?;

        tracing::info!(swap_id = %swap_id, isbn, offered_by, "Swap offered");
        swap.swap_id = Some(swap_id);
        Ok(swap)
    }

    /// Available swaps for an ISBN.
    pub async fn get_swaps_by_isbn(&self, isbn: &str) -> Result<Vec<Swap>, AppError> {
        self.query_swaps(
            Query::new()
                .eq("isbn", isbn)
                .eq("status", SwapStatus::Available.as_str()),
        )
        .await
    }

    /// Patch a swap. `None` or empty values leave the field as is.
    pub async fn update_swap_by_id(
        &self,
        swap_id: &str,
        requested_by: Option<&str>,
        status: Option<&SwapStatus>,
    ) -> Result<(), AppError> {
        let fields = patch_fields(&[
            ("requestedBy", requested_by),
            ("status", status.map(SwapStatus::as_str)),
        ]);

        if fields.is_empty() {
            tracing::debug!(swap_id, "Nothing to update on swap");
            return Ok(());
        }

        self.store
            .update(collections::SWAPS, swap_id, fields)
            .await
            .inspect_err(|e| tracing::warn!(swap_id, error = %e, "Failed to update swap"))
    }

    pub async fn delete_swap_by_id(&self, swap_id: &str) -> Result<(), AppError> {
        self.store
            .delete(collections::SWAPS, swap_id)
            .await
            .inspect_err(|e| tracing::warn!(swap_id, error = %e, "Failed to delete swap"))?;

        tracing::info!(swap_id, "Swap deleted");
        Ok(())
    }

    /// Swaps offered by a user.
    pub async fn get_offers_by_user_id(&self, uid: &str) -> Result<Vec<Swap>, AppError> {
        self.query_swaps(Query::new().eq("offeredBy", uid)).await
    }

    /// Swaps requested by a user.
    pub async fn get_requests_by_user_id(&self, uid: &str) -> Result<Vec<Swap>, AppError> {
        self.query_swaps(Query::new().eq("requestedBy", uid)).await
    }

    /// Intended to bump a swap counter once swaps complete; left as a no-op
    /// until that behaviour is defined.
    pub async fn update_swap_count_by_isbn(&self, isbn: &str) -> Result<(), AppError> {
        tracing::debug!(isbn, "Swap count update requested (no-op)");
        Ok(())
    }

    async fn query_swaps(&self, query: Query) -> Result<Vec<Swap>, AppError> {
        let docs = self
            .store
            .query(collections::SWAPS, query.clone())
            .await
            .inspect_err(
                |e| tracing::warn!(filters = ?query.filters, error = %e, "Failed to query swaps"),
            )?;

        Ok(decode_all(collections::SWAPS, docs))
    }

    // ─── Chat Operations ─────────────────────────────────────────

    /// Messages for a swap, newest first.
    pub async fn get_messages(&self, swap_id: &str) -> Result<Vec<Message>, AppError> {
        let docs = self
            .store
            .query(
                collections::CHATS,
                Query::new()
                    .eq("swapId", swap_id)
                    .order_by("createdAt", Direction::Descending),
            )
            .await
            .inspect_err(|e| tracing::warn!(swap_id, error = %e, "Failed to load messages"))?;

        Ok(decode_all(collections::CHATS, docs))
    }

    /// Append a message, embedding a snapshot of the sender.
    pub async fn add_message(
        &self,
        swap_id: &str,
        current_user: &User,
        text: &str,
    ) -> Result<Message, AppError> {
        let message = Message {
            id: format!("{}{}", swap_id, message_suffix()),
            swap_id: swap_id.to_string(),
            text: text.to_string(),
            created_at: epoch_millis(chrono::Utc::now()),
            user: MessageUser::from(current_user),
        };

        self.store
            .add(collections::CHATS, to_document(&message)?)
            .await
            .inspect_err(|e| {
                tracing::warn!(swap_id, uid = %current_user.uid, error = %e, "Failed to add message")
            })?;

        tracing::debug!(swap_id, message_id = %message.id, "Message added");
        Ok(message)
    }
}

/// Decode query results into models. Documents that do not fit the model
/// are logged and skipped.
fn decode_all<T: DeserializeOwned>(collection: &str, docs: Vec<StoredDocument>) -> Vec<T> {
    docs.into_iter()
        .filter_map(|StoredDocument { id, fields }| {
            from_document(fields)
                .inspect_err(|e| {
                    tracing::warn!(collection, doc_id = %id, error = %e, "Skipping undecodable document")
                })
                .ok()
        })
        .collect()
}

/// Collect the non-empty values into a patch document.
fn patch_fields(pairs: &[(&str, Option<&str>)]) -> Document {
    pairs
        .iter()
        .filter_map(|(field, value)| {
            value
                .filter(|v| !v.is_empty())
                .map(|v| (field.to_string(), Value::String(v.to_string())))
        })
        .collect()
}

/// Random base-36 suffix for message IDs.
fn message_suffix() -> String {
    let mut rng = rand::thread_rng();
    (0..MESSAGE_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_fields_skips_empty_and_missing() {
        let fields = patch_fields(&[
            ("username", Some("reader")),
            ("location", Some("")),
            ("selectedImage", None),
        ]);

        assert_eq!(fields.len(), 1);
        assert_eq!(fields["username"], "reader");
    }

    #[test]
    fn test_message_suffix_is_base36() {
        let suffix = message_suffix();
        assert_eq!(suffix.len(), MESSAGE_SUFFIX_LEN);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[tokio::test]
    async fn test_update_with_no_fields_skips_round_trip() {
        // Offline store fails every call, so success means nothing was sent.
        let db = BookSwapDb::new(
            Arc::new(crate::db::FirestoreStore::new_mock()),
            Arc::new(TracingAlerter),
        );

        db.update_user(None, Some(""), "uid-1", None).await.unwrap();
        db.update_swap_by_id("swap-1", Some(""), None).await.unwrap();
        db.update_swap_count_by_isbn("0441013597").await.unwrap();
    }

    #[tokio::test]
    async fn test_offline_store_errors_propagate() {
        let db = BookSwapDb::new(
            Arc::new(crate::db::FirestoreStore::new_mock()),
            Arc::new(TracingAlerter),
        );

        assert!(matches!(
            db.get_user_by_uid("uid-1").await,
            Err(AppError::Database(_))
        ));
        assert!(matches!(db.get_books(None).await, Err(AppError::Database(_))));
        assert!(matches!(
            db.delete_swap_by_id("swap-1").await,
            Err(AppError::Database(_))
        ));
    }
}
