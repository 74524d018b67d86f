//! Default values for DeepMarket configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// API Defaults
// ============================================================================

/// Default search API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.perplexity.ai";

/// Path of the chat completions endpoint, relative to the base URL.
pub const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

/// Default model used for every query.
pub const DEFAULT_MODEL: &str = "sonar-small-chat";

/// Model retried once when the upstream rejects the primary one as invalid.
pub const DEFAULT_FALLBACK_MODEL: &str = "sonar-pro";

/// Maximum answer length requested from the upstream. Not configurable.
pub const ANSWER_MAX_TOKENS: u32 = 1500;

/// Sampling temperature sent with every query. Not configurable.
pub const ANSWER_TEMPERATURE: f64 = 0.7;

/// Per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

// ============================================================================
// Retry Defaults
// ============================================================================

/// Retries on top of the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Exponential backoff factor in seconds.
pub const DEFAULT_BACKOFF_FACTOR: f64 = 1.0;

/// Upper bound for a single backoff sleep in seconds.
pub const DEFAULT_BACKOFF_MAX_SECS: f64 = 120.0;

/// Upstream statuses treated as transient.
pub const DEFAULT_RETRY_STATUSES: &[u16] = &[500, 502, 503, 504];

// ============================================================================
// Environment Variables
// ============================================================================

pub const ENV_API_KEY: &str = "PERPLEXITY_API_KEY";
pub const ENV_MODEL: &str = "PERPLEXITY_MODEL";
pub const ENV_FALLBACK_MODEL: &str = "PERPLEXITY_FALLBACK_MODEL";
pub const ENV_BASE_URL: &str = "PERPLEXITY_BASE_URL";
pub const ENV_MAX_RETRIES: &str = "DEEPMARKET_MAX_RETRIES";

// ============================================================================
// Config Files
// ============================================================================

/// Project-local config file name.
pub const LOCAL_CONFIG_FILE: &str = "deepmarket.toml";

/// Directory under the user config dir holding `config.toml`.
pub const USER_CONFIG_DIR: &str = "deepmarket";

// ============================================================================
// System Prompts
// ============================================================================

/// Persona fixed for every query.
pub const RESEARCH_SYSTEM_PROMPT: &str =
    "You are a market research expert. Provide concise, data-driven responses with citations.";
