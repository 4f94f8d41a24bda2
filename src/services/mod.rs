// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - collaborators outside the document store.

pub mod alert;
pub mod catalog;

pub use alert::{Alerter, TracingAlerter};
pub use catalog::CatalogService;
