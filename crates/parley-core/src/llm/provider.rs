//! The port between an agent and its language-model backend: one request
//! in, one response or error out.

use std::future::Future;

use parley_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// A chat-completion backend.
///
/// Concrete backends live in `parley-infra`. Use
/// [`BoxLlmProvider`](super::box_provider::BoxLlmProvider) where the backend
/// is chosen at runtime.
pub trait LlmProvider: Send + Sync {
    /// Short backend name, e.g. `"openai"`.
    fn name(&self) -> &str;

    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
