use thiserror::Error;

/// Errors raised while resolving or constructing an agent.
///
/// These are the only errors that reach the caller of the registry. Anything
/// that goes wrong inside `chat` is folded into the reply text instead.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent '{0}' is not registered")]
    NotFound(String),

    #[error("missing required configuration value: {0}")]
    ConfigurationMissing(String),
}

/// Errors from repository operations (used by trait definitions in parley-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,
}
