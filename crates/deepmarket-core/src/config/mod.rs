//! Configuration management for DeepMarket.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `deepmarket.toml` file
//! 3. User config `~/.config/deepmarket/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Search API configuration.
    pub api: ApiConfig,

    /// Transport retry configuration.
    pub retry: RetryConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./deepmarket.toml` (project local)
    /// 2. `~/.config/deepmarket/config.toml` (user config)
    /// 3. Falls back to defaults
    ///
    /// Environment overrides apply in every case.
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new(LOCAL_CONFIG_FILE).exists() {
            return Self::from_file(LOCAL_CONFIG_FILE);
        }

        if let Some(path) = Self::user_config_path() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Path of the per-user config file, if the platform has a config dir.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(USER_CONFIG_DIR).join("config.toml"))
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Empty values are ignored so an exported-but-blank variable does not
    /// wipe a configured value.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(ENV_API_KEY) {
            self.api.api_key = Some(key);
        }
        if let Some(model) = get(ENV_MODEL) {
            self.api.model = model;
        }
        if let Some(model) = get(ENV_FALLBACK_MODEL) {
            self.api.fallback_model = model;
        }
        if let Some(url) = get(ENV_BASE_URL) {
            self.api.base_url = url;
        }
        if let Some(retries) = get(ENV_MAX_RETRIES) {
            if let Ok(n) = retries.parse() {
                self.retry.max_retries = n;
            }
        }
    }

    /// Reject values the client cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api.base_url must not be empty".into()));
        }
        if self.api.model.trim().is_empty() {
            return Err(ConfigError::Invalid("api.model must not be empty".into()));
        }
        if self.retry.backoff_factor < 0.0 || self.retry.backoff_max_secs < 0.0 {
            return Err(ConfigError::Invalid("retry backoff must not be negative".into()));
        }
        Ok(())
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Search API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL; the chat completions path is appended to it.
    pub base_url: String,

    /// API key (normally supplied through `PERPLEXITY_API_KEY`).
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Model used when a query does not name one.
    pub model: String,

    /// Model retried once after an "invalid model" rejection.
    pub fallback_model: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            fallback_model: DEFAULT_FALLBACK_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    /// Full URL of the chat completions endpoint.
    pub fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            CHAT_COMPLETIONS_PATH
        )
    }

    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Transport retry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries on top of the first attempt.
    pub max_retries: u32,

    /// Exponential backoff factor, in seconds.
    pub backoff_factor: f64,

    /// Cap for a single backoff sleep, in seconds.
    pub backoff_max_secs: f64,

    /// Statuses that trigger a retry.
    pub status_forcelist: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            backoff_max_secs: DEFAULT_BACKOFF_MAX_SECS,
            status_forcelist: DEFAULT_RETRY_STATUSES.to_vec(),
        }
    }
}
