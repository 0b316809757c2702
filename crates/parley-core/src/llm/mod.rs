//! Language-model port: the [`provider::LlmProvider`] trait and its boxed
//! form for runtime backend selection.

pub mod box_provider;
pub mod provider;
