//! Settings loading.
//!
//! Precedence, lowest first: built-in defaults, `{data_dir}/config.toml`,
//! a `.env` file in the working directory, then the process environment.
//! `.env` never overrides a variable that is already set.

use std::path::{Path, PathBuf};

use parley_types::config::Settings;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "PARLEY_DATA_DIR";

/// Resolve the data directory: `PARLEY_DATA_DIR`, else `~/.parley`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".parley")
}

/// Load `.env` from the working directory into the process environment.
///
/// A missing file is not an error. Returns whether a file was loaded.
pub fn load_dotenv() -> anyhow::Result<bool> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!("Loaded environment from {}", path.display());
            Ok(true)
        }
        Err(dotenvy::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(anyhow::anyhow!("failed to load .env: {err}")),
    }
}

/// Read `{data_dir}/config.toml`, falling back to defaults when the file is
/// missing or cannot be parsed.
pub async fn load_file_settings(data_dir: &Path) -> Settings {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return Settings::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return Settings::default();
        }
    };

    match toml::from_str::<Settings>(&content) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            Settings::default()
        }
    }
}

/// Build settings from `config.toml` overlaid with `lookup`.
///
/// An unparsable numeric override is an error.
pub async fn load_settings_with<F>(data_dir: &Path, lookup: F) -> anyhow::Result<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = load_file_settings(data_dir).await;
    settings.apply_env(lookup)?;
    Ok(settings)
}

/// Build settings from `config.toml` and the process environment.
///
/// Call [`load_dotenv`] first for `.env` values to take part.
pub async fn load_settings(data_dir: &Path) -> anyhow::Result<Settings> {
    load_settings_with(data_dir, |key| std::env::var(key).ok()).await
}
