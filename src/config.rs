//! Runtime configuration for the completion client.

use std::time::Duration;

use crate::types::error::{CsvqlError, Result};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(2);
const DEFAULT_MAX_RETRIES: u32 = 2;

/// Settings for the completion API client.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// Hard per-request timeout.
    pub timeout: Duration,
    /// Retries after the first failed attempt.
    pub max_retries: u32,
    pub retry_backoff: Duration,
}

impl LlmConfig {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }

    /// Read settings from the environment.
    ///
    /// `OPENAI_API_KEY` is required. `CSVQL_MODEL` and `CSVQL_LLM_BASE_URL`
    /// override the defaults, which allows pointing the client at any
    /// OpenAI-compatible endpoint.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the API key is not set.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            CsvqlError::ConfigError("OPENAI_API_KEY environment variable not set".to_string())
        })?;
        let model = std::env::var("CSVQL_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let base_url =
            std::env::var("CSVQL_LLM_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let mut config = Self::new(api_key, model);
        config.base_url = base_url;
        Ok(config)
    }
}
