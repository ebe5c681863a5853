//! Shared identity types used across all relaygram crates.

pub mod types;

pub use types::{ChatRef, MessageKey, MessageRef, ThreadKey, UserId};
