//! Agent registry, conversation memory, and agent variants for Parley.
//!
//! This crate defines the "ports" (provider and memory traits) that the
//! infrastructure layer implements. It depends only on `parley-types` --
//! never on `parley-infra` or any database/IO crate.

pub mod agent;
pub mod llm;
pub mod memory;
