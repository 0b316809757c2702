//! Shared domain types for Parley.
//!
//! This crate contains the core domain types used across the workspace:
//! conversation messages, LLM request/response shapes, tool descriptors,
//! settings, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod config;
pub mod error;
pub mod llm;
pub mod tool;
