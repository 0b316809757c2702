//! LLM provider implementations.
//!
//! Contains the OpenAI-compatible implementation of the [`LlmProvider`]
//! trait defined in `parley-core`, and [`create_provider`], which builds a
//! type-erased provider from validated backend settings.
//!
//! [`LlmProvider`]: parley_core::llm::provider::LlmProvider

pub mod openai_compat;

use parley_core::llm::box_provider::BoxLlmProvider;
use parley_types::config::BackendSettings;

use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::OpenAiCompatConfig;

/// Create a [`BoxLlmProvider`] for the configured endpoint.
pub fn create_provider(backend: &BackendSettings) -> BoxLlmProvider {
    let provider = OpenAiCompatibleProvider::new(OpenAiCompatConfig::from_backend(backend));
    tracing::debug!(
        provider = provider.provider_name(),
        base_url = %backend.api_url,
        model = %backend.model,
        "Created LLM provider"
    );
    BoxLlmProvider::new(provider)
}
