//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development. Adapters are constructed from these
//! values once at startup; nothing reads the process environment afterwards.

use std::net::SocketAddr;
use swipelearn_core::prompt::ProviderProfile;
use swipelearn_core::Dialect;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    /// Base URL of the chat-completion provider used for content generation.
    pub generation_api_base: String,
    pub generation_api_key: String,
    pub generation_model: String,
    /// Human-readable provider label echoed in response metadata.
    pub provider_name: String,
    /// Optional; the transcription route is disabled without it.
    pub openai_api_key: Option<String>,
    pub transcribe_model: String,
    pub prompt_dialect: Dialect,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load Generation Provider Settings ---
        let generation_api_key = std::env::var("GENERATION_API_KEY")
            .map_err(|_| ConfigError::MissingVar("GENERATION_API_KEY".to_string()))?;
        let generation_api_base = std::env::var("GENERATION_API_BASE")
            .unwrap_or_else(|_| "https://api.perplexity.ai".to_string());
        let generation_model = std::env::var("GENERATION_MODEL")
            .unwrap_or_else(|_| "llama-3.1-sonar-small-128k-online".to_string());
        let provider_name =
            std::env::var("PROVIDER_NAME").unwrap_or_else(|_| "Perplexity AI".to_string());

        // --- Load Transcription Settings (optional) ---
        let openai_api_key = std::env::var("OPENAI_API_KEY").ok();
        let transcribe_model =
            std::env::var("TRANSCRIBE_MODEL").unwrap_or_else(|_| "whisper-1".to_string());

        // --- Load Prompt Dialect ---
        let dialect_str =
            std::env::var("PROMPT_DIALECT").unwrap_or_else(|_| "bilingual".to_string());
        let prompt_dialect = dialect_str.parse::<Dialect>().map_err(|_| {
            ConfigError::InvalidValue(
                "PROMPT_DIALECT".to_string(),
                format!("'{}' is not a known dialect", dialect_str),
            )
        })?;

        Ok(Self {
            bind_address,
            log_level,
            generation_api_base,
            generation_api_key,
            generation_model,
            provider_name,
            openai_api_key,
            transcribe_model,
            prompt_dialect,
        })
    }

    /// The provider profile every prompt is rendered against.
    pub fn provider_profile(&self) -> ProviderProfile {
        ProviderProfile {
            model_id: self.generation_model.clone(),
            api_base: self.generation_api_base.clone(),
        }
    }
}
