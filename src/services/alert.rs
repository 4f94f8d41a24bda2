// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User-facing alerts.
//!
//! The data-access layer raises an alert when profile creation fails. The
//! embedding application decides how to show it.

/// Sink for blocking, user-facing alert dialogs.
pub trait Alerter: Send + Sync {
    fn alert(&self, title: &str, message: &str);
}

/// Emits alerts as log events. Used by the HTTP server, where the same
/// message travels back in the error response.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAlerter;

impl Alerter for TracingAlerter {
    fn alert(&self, title: &str, message: &str) {
        tracing::warn!(title, message, "User alert raised");
    }
}
