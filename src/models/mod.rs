// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod book;
pub mod message;
pub mod swap;
pub mod user;
pub mod volume;

pub use book::Book;
pub use message::{Message, MessageUser};
pub use swap::{Swap, SwapStatus};
pub use user::User;
pub use volume::{Volume, VolumeInfo};
