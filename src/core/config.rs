//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::core::errors::{Result, TranslationError};

/// Default chat completion endpoint
pub const DEFAULT_API_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default token ceiling per chunk
pub const DEFAULT_MAX_TOKENS: usize = 400;

/// Default paragraph separator used when joining translated chunks
pub const DEFAULT_SEPARATOR: &str = "\n\n";

/// Default delay between ceiling-triggered dispatches
pub const DEFAULT_PACING_DELAY_MS: u64 = 10_000;

/// Nucleus sampling probability sent with every request
pub const DEFAULT_TOP_P: f32 = 0.5;

/// Environment variables searched for the API key, in order
const API_KEY_VARS: &[&str] = &["OPENAI_API_KEY", "INPUT_APIKEY"];

/// Configuration for translator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    pub api_key: String,
    pub api_endpoint: String,
    pub model: String,
    pub top_p: f32,
    pub max_tokens: usize,
    pub separator: String,
    pub pacing_delay_ms: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            top_p: DEFAULT_TOP_P,
            max_tokens: DEFAULT_MAX_TOKENS,
            separator: DEFAULT_SEPARATOR.to_string(),
            pacing_delay_ms: DEFAULT_PACING_DELAY_MS,
        }
    }
}

impl TranslatorConfig {
    /// Load configuration from environment variables, with an explicit API
    /// key taking precedence over the environment.
    ///
    /// Fails when no API key is set, so callers halt before any request.
    pub fn from_env_with_key(api_key: Option<String>) -> Result<Self> {
        let api_key = api_key
            .filter(|k| !k.is_empty())
            .or_else(|| {
                API_KEY_VARS
                    .iter()
                    .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
            })
            .ok_or_else(|| {
                TranslationError::config("OPENAI_API_KEY environment variable is required")
            })?;

        let api_endpoint =
            std::env::var("API_ENDPOINT").unwrap_or_else(|_| DEFAULT_API_ENDPOINT.to_string());

        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let max_tokens = env_or("MAX_TOKENS", DEFAULT_MAX_TOKENS)?;
        let pacing_delay_ms = env_or("PACING_DELAY_MS", DEFAULT_PACING_DELAY_MS)?;

        debug!("Loaded configuration for model {} at {}", model, api_endpoint);

        Ok(Self {
            api_key,
            api_endpoint,
            model,
            max_tokens,
            pacing_delay_ms,
            ..Default::default()
        })
    }

    /// Load from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| TranslationError::FileError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(TranslationError::config("API key is required"));
        }

        if self.api_endpoint.is_empty() {
            return Err(TranslationError::config("API endpoint is required"));
        }

        if self.model.is_empty() {
            return Err(TranslationError::config("Model is required"));
        }

        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            return Err(TranslationError::config("top_p must be in (0, 1]"));
        }

        if self.max_tokens == 0 {
            return Err(TranslationError::config("max_tokens must be greater than 0"));
        }

        if self.pacing_delay_ms == 0 {
            warn!("Pacing delay disabled, requests may hit provider rate limits");
        }

        Ok(())
    }
}

/// Parse an optional numeric environment variable
fn env_or<T: FromStr>(var: &str, default: T) -> Result<T> {
    match std::env::var(var) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|_| TranslationError::config(format!("{} is not a valid number: {}", var, raw))),
        Err(_) => Ok(default),
    }
}
