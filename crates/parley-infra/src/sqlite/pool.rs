//! SQLite connection pools.
//!
//! One writer connection serializes every INSERT; readers share a small
//! read-only pool. Both run in WAL mode so reads never block on the writer.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

/// File name of the conversation database inside the data directory.
pub const DATABASE_FILE: &str = "parley.db";

const READER_CONNECTIONS: u32 = 8;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

fn connect_options(database_url: &str) -> Result<SqliteConnectOptions, sqlx::Error> {
    Ok(SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT))
}

impl DatabasePool {
    /// Connect to `database_url` and bring the schema up to date.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = connect_options(database_url)?;

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options.clone())
            .await?;
        // Migrate before the reader opens: it cannot create tables.
        sqlx::migrate!("../../migrations").run(&writer).await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(READER_CONNECTIONS)
            .connect_with(options.read_only(true))
            .await?;

        tracing::debug!(database_url, "Database pools ready");
        Ok(Self { reader, writer })
    }

    /// Open (or create) the database file at `path`.
    pub async fn open(path: &Path) -> Result<Self, sqlx::Error> {
        Self::new(&database_url(path)).await
    }

    /// Close both pools. In-flight queries finish first.
    pub async fn close(&self) {
        self.writer.close().await;
        self.reader.close().await;
    }
}

pub fn database_url(path: &Path) -> String {
    format!("sqlite://{}?mode=rwc", path.display())
}

pub fn default_database_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DATABASE_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_pool(name: &str) -> (tempfile::TempDir, DatabasePool) {
        let dir = tempfile::tempdir().unwrap();
        let pool = DatabasePool::open(&dir.path().join(name)).await.unwrap();
        (dir, pool)
    }

    #[tokio::test]
    async fn test_schema_has_dialog_messages() {
        let (_dir, pool) = temp_pool("schema.db").await;

        let names: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' AND name != '_sqlx_migrations'",
        )
        .fetch_all(&pool.reader)
        .await
        .unwrap();

        assert_eq!(names, vec!["dialog_messages".to_string()]);
    }

    #[tokio::test]
    async fn test_journal_mode_is_wal() {
        let (_dir, pool) = temp_pool("wal.db").await;

        let mode: String = sqlx::query_scalar("PRAGMA journal_mode")
            .fetch_one(&pool.writer)
            .await
            .unwrap();

        assert!(mode.eq_ignore_ascii_case("wal"));
    }

    #[tokio::test]
    async fn test_reopen_existing_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reopen.db");

        DatabasePool::open(&path).await.unwrap().close().await;
        assert!(DatabasePool::open(&path).await.is_ok());
    }

    #[test]
    fn test_paths() {
        let path = default_database_path(Path::new("/tmp/parley"));
        assert_eq!(path, PathBuf::from("/tmp/parley/parley.db"));
        assert_eq!(database_url(&path), "sqlite:///tmp/parley/parley.db?mode=rwc");
    }
}
