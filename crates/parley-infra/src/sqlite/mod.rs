//! SQLite storage for Parley.

pub mod conversation;
pub mod pool;
pub mod seed;

pub use conversation::SqliteConversationMemory;
pub use pool::DatabasePool;
