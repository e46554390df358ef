//! Configuration loading.
//!
//! Configuration is loaded from TOML files with the following resolution
//! order:
//! 1. explicit path (if provided)
//! 2. `~/.verdandi/config.toml` (user)
//! 3. `/etc/verdandi/config.toml` (system)
//!
//! Every section is optional and every field has a default, so an empty
//! file (or no file at all — [`SimulatorConfig::default`]) is a working
//! configuration. API keys never live in the config file: pass them to the
//! builder or set [`API_KEY_ENV`].

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::types::CompletionOptions;
use crate::{Result, VerdandiError};

/// Environment variable consulted for the OpenRouter API key.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Read the API key from the environment.
pub fn env_api_key() -> Option<String> {
    std::env::var(API_KEY_ENV).ok()
}

/// Engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulatorConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub security: SecurityConfig,
    /// Model identifier → USD per 1000 tokens.
    #[serde(default = "default_costs")]
    pub costs: HashMap<String, f64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            rate_limit: RateLimitConfig::default(),
            cache: CacheSettings::default(),
            security: SecurityConfig::default(),
            costs: default_costs(),
        }
    }
}

/// LLM provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// OpenAI-compatible API base URL (default: OpenRouter).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Candidate models in fallback order (first is primary).
    #[serde(default = "default_models")]
    pub models: Vec<String>,
    /// Maximum tokens per completion (default: 1024).
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
    /// Sampling temperature (default: 0.7).
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Per-request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            models: default_models(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_models() -> Vec<String> {
    vec![
        "anthropic/claude-sonnet-4-5-20250929".to_string(),
        "openai/gpt-4o".to_string(),
        "google/gemini-2.0-flash".to_string(),
    ]
}

fn default_max_tokens() -> usize {
    1024
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout() -> u64 {
    30
}

/// Token-bucket settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Bucket capacity (default: 10).
    #[serde(default = "default_capacity")]
    pub capacity: u32,
    /// Tokens per second (default: 0.5 — one request every two seconds).
    #[serde(default = "default_refill_rate")]
    pub refill_rate: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            refill_rate: default_refill_rate(),
        }
    }
}

fn default_capacity() -> u32 {
    10
}

fn default_refill_rate() -> f64 {
    0.5
}

/// Response cache settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// Maximum live entries (default: 100).
    #[serde(default = "default_cache_entries")]
    pub max_entries: usize,
    /// Entry time-to-live in minutes (default: 15).
    #[serde(default = "default_cache_ttl_minutes")]
    pub ttl_minutes: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            max_entries: default_cache_entries(),
            ttl_minutes: default_cache_ttl_minutes(),
        }
    }
}

fn default_cache_entries() -> usize {
    100
}

fn default_cache_ttl_minutes() -> u64 {
    15
}

impl CacheSettings {
    /// Entry time-to-live as a duration.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_minutes * 60)
    }
}

/// Input handling settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// Maximum decision length before truncation (default: 500).
    #[serde(default = "default_max_input_length")]
    pub max_input_length: usize,
    /// Whether the content-safety gate runs (default: true).
    #[serde(default = "default_true")]
    pub content_filtering: bool,
    /// Whether model output is scrubbed before use (default: true).
    #[serde(default = "default_true")]
    pub sanitize_outputs: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_input_length: default_max_input_length(),
            content_filtering: true,
            sanitize_outputs: true,
        }
    }
}

fn default_max_input_length() -> usize {
    500
}

fn default_true() -> bool {
    true
}

fn default_costs() -> HashMap<String, f64> {
    HashMap::from([
        ("anthropic/claude-sonnet-4-5-20250929".to_string(), 0.003),
        ("openai/gpt-4o".to_string(), 0.005),
        ("google/gemini-2.0-flash".to_string(), 0.0001),
    ])
}

impl SimulatorConfig {
    /// Load configuration from the standard locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = Self::resolve_config_path(explicit_path)?;
        let content = fs::read_to_string(&path).map_err(|e| {
            VerdandiError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            VerdandiError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(path.to_path_buf());
            }
            return Err(VerdandiError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".verdandi").join("config.toml");
            if user_config.exists() {
                return Ok(user_config);
            }
        }

        let system_config = PathBuf::from("/etc/verdandi/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }

        Err(VerdandiError::Configuration(
            "No config file found. Create ~/.verdandi/config.toml or /etc/verdandi/config.toml"
                .to_string(),
        ))
    }

    /// Cost in USD per 1000 tokens for a model; unlisted models cost 0.
    pub fn cost_per_1k(&self, model: &str) -> f64 {
        self.costs.get(model).copied().unwrap_or(0.0)
    }

    /// Completion options derived from the `[llm]` section.
    pub fn completion_options(&self) -> CompletionOptions {
        CompletionOptions::new()
            .max_tokens(self.llm.max_tokens)
            .temperature(self.llm.temperature)
            .timeout(Duration::from_secs(self.llm.timeout_secs))
    }
}
