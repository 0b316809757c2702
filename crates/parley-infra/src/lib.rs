//! Infrastructure layer for Parley.
//!
//! Contains implementations of the ports defined in `parley-core`: the
//! SQLite-backed durable conversation memory, the OpenAI-compatible LLM
//! provider, settings loading, and the wiring that registers every agent.

pub mod agents;
pub mod config;
pub mod llm;
pub mod sqlite;
