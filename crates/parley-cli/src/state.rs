//! Application state wiring settings, storage and the agent registry.

use std::path::PathBuf;
use std::sync::Arc;

use parley_core::agent::AgentRegistry;
use parley_infra::agents::build_registry;
use parley_infra::config::{load_dotenv, load_settings, resolve_data_dir};
use parley_infra::sqlite::pool::default_database_path;
use parley_infra::sqlite::{DatabasePool, SqliteConversationMemory};
use parley_types::config::Settings;

/// Everything a command needs, built once at startup.
pub struct AppState {
    pub registry: AgentRegistry,
    pub durable: Arc<SqliteConversationMemory>,
    pub settings: Arc<Settings>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Load settings, open the conversation database, and register agents.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        load_dotenv()?;
        let settings = Arc::new(load_settings(&data_dir).await?);

        let db_path = default_database_path(&data_dir);
        let pool = DatabasePool::open(&db_path).await?;
        tracing::debug!(path = %db_path.display(), "Opened conversation database");

        let durable = Arc::new(SqliteConversationMemory::new(pool));
        let registry = build_registry(Arc::clone(&settings), Arc::clone(&durable));

        Ok(Self {
            registry,
            durable,
            settings,
            data_dir,
        })
    }

    /// Close the database pools.
    pub async fn shutdown(&self) {
        self.durable.pool().close().await;
    }
}
