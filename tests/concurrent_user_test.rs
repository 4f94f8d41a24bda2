// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Documents the read-then-write race in user creation.

use bookswap::db::{collections, BookSwapDb, MemoryStore};
use std::sync::Arc;

mod common;
use common::{RecordingAlerter, YieldingStore};

#[tokio::test]
async fn test_concurrent_create_user_same_username_both_succeed() {
    // Both calls scan `users` before either writes, so both pass the
    // uniqueness check. This asserts current behaviour, not the intended
    // invariant.
    let store = Arc::new(YieldingStore {
        inner: MemoryStore::new(),
    });
    let alerter = Arc::new(RecordingAlerter::new());
    let db = BookSwapDb::new(store.clone(), alerter.clone());

    let (a, b) = tokio::join!(
        db.create_user("twin", "Leeds", "uid-a", ""),
        db.create_user("twin", "York", "uid-b", ""),
    );

    assert!(a.is_ok());
    assert!(b.is_ok());
    assert_eq!(store.inner.count(collections::USERS), 2);
    assert!(alerter.alerts().is_empty());

    let first = db.get_user_by_uid("uid-a").await.unwrap().unwrap();
    let second = db.get_user_by_uid("uid-b").await.unwrap().unwrap();
    assert_eq!(first.username, second.username);
}

#[tokio::test]
async fn test_sequential_create_user_same_username_rejected() {
    let store = Arc::new(YieldingStore {
        inner: MemoryStore::new(),
    });
    let db = BookSwapDb::new(store.clone(), Arc::new(RecordingAlerter::new()));

    db.create_user("twin", "Leeds", "uid-a", "").await.unwrap();
    assert!(db.create_user("twin", "York", "uid-b", "").await.is_err());
    assert_eq!(store.inner.count(collections::USERS), 1);
}
