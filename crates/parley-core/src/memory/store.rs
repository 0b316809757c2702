//! ConversationMemory trait definition.
//!
//! An append-only message log per dialog with bounded read-back.
//! Follows the same RPITIT pattern as the provider trait.

use parley_types::error::RepositoryError;
use parley_types::llm::{Message, MessageRole};

/// Dialog used when the caller does not name one.
pub const DEFAULT_DIALOG_ID: &str = "default";

/// Number of messages read back when no limit is given.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Trait for per-dialog conversation history stores.
///
/// Messages for a dialog are only ever appended; they are never reordered or
/// rewritten. Implementations are not required to serialize concurrent
/// writers to the *same* dialog.
pub trait ConversationMemory: Send + Sync {
    /// Append one message to a dialog, creating the dialog if absent.
    fn append(
        &self,
        dialog_id: &str,
        role: MessageRole,
        text: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// The most recent `limit` messages of a dialog, oldest first.
    ///
    /// Returns an empty list for an unknown dialog.
    fn get_history(
        &self,
        dialog_id: &str,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;

    /// All dialog ids that have at least one message, sorted.
    fn dialog_ids(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<String>, RepositoryError>> + Send;
}
