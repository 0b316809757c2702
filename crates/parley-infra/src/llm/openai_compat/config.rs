//! Connection settings for an OpenAI-compatible endpoint.

use secrecy::SecretString;

use parley_types::config::{BackendSettings, DEFAULT_API_URL};

/// Configuration for an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Name reported in logs and spans (e.g., "openai").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    pub api_key: SecretString,
    /// Model used when a request does not name one.
    pub model: String,
}

impl OpenAiCompatConfig {
    /// Configuration for the public OpenAI endpoint.
    pub fn openai(api_key: &str, model: &str) -> Self {
        Self {
            provider_name: "openai".into(),
            base_url: DEFAULT_API_URL.into(),
            api_key: SecretString::from(api_key.to_string()),
            model: model.into(),
        }
    }

    /// Configuration from validated backend settings.
    ///
    /// Any endpoint other than the public one is reported as
    /// "openai_compatible".
    pub fn from_backend(backend: &BackendSettings) -> Self {
        let provider_name = if backend.api_url.trim_end_matches('/') == DEFAULT_API_URL {
            "openai"
        } else {
            "openai_compatible"
        };
        Self {
            provider_name: provider_name.into(),
            base_url: backend.api_url.clone(),
            api_key: SecretString::from(backend.api_key.clone()),
            model: backend.model.clone(),
        }
    }
}
