//! SQLite conversation memory.
//!
//! Implements `ConversationMemory` from `parley-core` on top of the
//! `dialog_messages` table. Each message is one row; row ids give the
//! conversation order, so history survives process restarts intact.

use chrono::{DateTime, Utc};
use sqlx::Row;

use parley_core::memory::ConversationMemory;
use parley_types::error::RepositoryError;
use parley_types::llm::{Message, MessageRole};

use super::pool::DatabasePool;

/// A stored message together with the time it was recorded.
#[derive(Debug, Clone)]
pub struct StoredMessage {
    pub message: Message,
    pub created_at: DateTime<Utc>,
}

/// Durable, process-shared conversation memory.
pub struct SqliteConversationMemory {
    pool: DatabasePool,
}

impl SqliteConversationMemory {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// The most recent `limit` messages with their timestamps, oldest first.
    pub async fn recent_entries(
        &self,
        dialog_id: &str,
        limit: usize,
    ) -> Result<Vec<StoredMessage>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT role, content, created_at FROM dialog_messages
             WHERE dialog_id = ? ORDER BY id DESC LIMIT ?",
        )
        .bind(dialog_id)
        .bind(sql_limit(limit))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx_error)?;

        let mut entries = rows
            .iter()
            .map(MessageRow::from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_sqlx_error)?
            .into_iter()
            .map(MessageRow::into_stored)
            .collect::<Result<Vec<_>, _>>()?;

        // Fetched newest first so LIMIT keeps the tail.
        entries.reverse();
        Ok(entries)
    }

    /// Number of messages stored for a dialog.
    pub async fn count(&self, dialog_id: &str) -> Result<u64, RepositoryError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM dialog_messages WHERE dialog_id = ?")
                .bind(dialog_id)
                .fetch_one(&self.pool.reader)
                .await
                .map_err(map_sqlx_error)?;
        Ok(count.max(0) as u64)
    }
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

struct MessageRow {
    role: String,
    content: String,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_stored(self) -> Result<StoredMessage, RepositoryError> {
        let role: MessageRole = self.role.parse().map_err(RepositoryError::Query)?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))?;
        Ok(StoredMessage {
            message: Message::new(role, self.content),
            created_at,
        })
    }
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

fn map_sqlx_error(err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            RepositoryError::Connection
        }
        other => RepositoryError::Query(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// ConversationMemory implementation
// ---------------------------------------------------------------------------

impl ConversationMemory for SqliteConversationMemory {
    async fn append(
        &self,
        dialog_id: &str,
        role: MessageRole,
        text: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO dialog_messages (dialog_id, role, content, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(dialog_id)
        .bind(role.to_string())
        .bind(text)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn get_history(
        &self,
        dialog_id: &str,
        limit: usize,
    ) -> Result<Vec<Message>, RepositoryError> {
        let entries = self.recent_entries(dialog_id, limit).await?;
        Ok(entries.into_iter().map(|e| e.message).collect())
    }

    async fn dialog_ids(&self) -> Result<Vec<String>, RepositoryError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT DISTINCT dialog_id FROM dialog_messages ORDER BY dialog_id")
                .fetch_all(&self.pool.reader)
                .await
                .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
