//! Settings types for Parley.
//!
//! `Settings` is the read-only key-value view of configuration available at
//! startup. It is assembled from `config.toml` and then overlaid with
//! environment variables (see `Settings::apply_env`). `BackendSettings` is the
//! validated subset an LLM-backed agent needs; building it fails fast when a
//! required value is missing.

use serde::{Deserialize, Serialize};

use crate::error::AgentError;

pub const ENV_API_URL: &str = "OPENAI_API_URL";
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_MODEL_NAME: &str = "LLM_MODEL_NAME";
pub const ENV_TEMPERATURE: &str = "LLM_TEMPERATURE";
pub const ENV_MAX_TOKENS: &str = "LLM_MAX_TOKENS";
pub const ENV_SYSTEM_PROMPT: &str = "SYSTEM_PROMPT";
pub const ENV_HISTORY_LIMIT: &str = "LLM_HISTORY_LIMIT";

/// Base URL used when no endpoint is configured.
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1";

/// Top-level settings. All fields have sensible defaults except the backend
/// credential and model, which have none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api_url: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub model: Option<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// How many prior messages an agent reads back per turn.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_system_prompt() -> String {
    "You are a helpful and concise AI assistant.".to_string()
}

fn default_history_limit() -> usize {
    50
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: None,
            api_key: None,
            model: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            system_prompt: default_system_prompt(),
            history_limit: default_history_limit(),
        }
    }
}

/// A configuration value that is present but cannot be parsed.
#[derive(Debug, thiserror::Error)]
#[error("invalid value for {key}: '{value}'")]
pub struct InvalidSetting {
    pub key: String,
    pub value: String,
}

impl Settings {
    /// Overlay values from an environment-like lookup.
    ///
    /// Keys that the lookup does not know leave the current value untouched.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), InvalidSetting>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_API_URL) {
            self.api_url = Some(v);
        }
        if let Some(v) = lookup(ENV_API_KEY) {
            self.api_key = Some(v);
        }
        if let Some(v) = lookup(ENV_MODEL_NAME) {
            self.model = Some(v);
        }
        if let Some(v) = lookup(ENV_TEMPERATURE) {
            self.temperature = parse_value(ENV_TEMPERATURE, &v)?;
        }
        if let Some(v) = lookup(ENV_MAX_TOKENS) {
            self.max_tokens = parse_value(ENV_MAX_TOKENS, &v)?;
        }
        if let Some(v) = lookup(ENV_SYSTEM_PROMPT) {
            self.system_prompt = v;
        }
        if let Some(v) = lookup(ENV_HISTORY_LIMIT) {
            self.history_limit = parse_value(ENV_HISTORY_LIMIT, &v)?;
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, InvalidSetting> {
    value.trim().parse().map_err(|_| InvalidSetting {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Validated backend connection parameters for an LLM-backed agent.
#[derive(Clone)]
pub struct BackendSettings {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

// Hand-written so the credential never reaches a log line.
impl std::fmt::Debug for BackendSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendSettings")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl BackendSettings {
    /// Extract the backend parameters, failing if a required value is absent.
    ///
    /// Blank strings count as absent. A missing endpoint falls back to
    /// [`DEFAULT_API_URL`].
    pub fn from_settings(settings: &Settings) -> Result<Self, AgentError> {
        let api_key = required(settings.api_key.as_deref(), ENV_API_KEY)?;
        let model = required(settings.model.as_deref(), ENV_MODEL_NAME)?;
        let api_url = settings
            .api_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .to_string();

        Ok(Self {
            api_url,
            api_key,
            model,
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        })
    }
}

fn required(value: Option<&str>, key: &str) -> Result<String, AgentError> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AgentError::ConfigurationMissing(key.to_string()))
}
