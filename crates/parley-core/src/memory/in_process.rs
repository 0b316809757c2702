//! Volatile in-process conversation store.

use dashmap::DashMap;

use parley_types::error::RepositoryError;
use parley_types::llm::{Message, MessageRole};

use super::store::ConversationMemory;

/// History store held entirely in process memory and lost on exit.
///
/// Dialogs live in separate `DashMap` shards, so appends to different
/// dialogs never contend. Two writers racing on the same dialog may
/// interleave their messages.
#[derive(Debug, Default)]
pub struct InProcessMemory {
    dialogs: DashMap<String, Vec<Message>>,
}

impl InProcessMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of messages stored for a dialog.
    pub fn len(&self, dialog_id: &str) -> usize {
        self.dialogs.get(dialog_id).map(|d| d.len()).unwrap_or(0)
    }

    /// True if no dialog holds any message.
    pub fn is_empty(&self) -> bool {
        self.dialogs.iter().all(|d| d.is_empty())
    }
}

impl ConversationMemory for InProcessMemory {
    async fn append(
        &self,
        dialog_id: &str,
        role: MessageRole,
        text: &str,
    ) -> Result<(), RepositoryError> {
        self.dialogs
            .entry(dialog_id.to_string())
            .or_default()
            .push(Message::new(role, text));
        Ok(())
    }

    async fn get_history(
        &self,
        dialog_id: &str,
        limit: usize,
    ) -> Result<Vec<Message>, RepositoryError> {
        let history = match self.dialogs.get(dialog_id) {
            Some(dialog) => {
                let start = dialog.len().saturating_sub(limit);
                dialog[start..].to_vec()
            }
            None => Vec::new(),
        };
        Ok(history)
    }

    async fn dialog_ids(&self) -> Result<Vec<String>, RepositoryError> {
        let mut ids: Vec<String> = self.dialogs.iter().map(|d| d.key().clone()).collect();
        ids.sort();
        Ok(ids)
    }
}
