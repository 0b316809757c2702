//! Conversation memory for Parley.
//!
//! This module defines the `ConversationMemory` trait that every history
//! store implements, and the volatile `InProcessMemory` store. The durable
//! SQLite-backed store lives in parley-infra.

pub mod in_process;
pub mod store;

pub use in_process::InProcessMemory;
pub use store::{ConversationMemory, DEFAULT_DIALOG_ID, DEFAULT_HISTORY_LIMIT};
