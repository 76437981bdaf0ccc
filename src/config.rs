use crate::types::{Result, TranslatorError};
use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";
pub const DEFAULT_MODEL: &str = "deepseek-chat";
pub const DEFAULT_FEED_URL: &str = "http://feeds.bbci.co.uk/news/rss.xml";
pub const DEFAULT_DATABASE_PATH: &str = "articles.db";

/// Sampling parameters forwarded verbatim to the translation backend.
#[derive(Debug, Clone, Copy)]
pub struct SamplingConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub presence_penalty: f32,
    pub max_tokens: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            presence_penalty: 0.0,
            max_tokens: 1024,
        }
    }
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub api_key: String,
    pub model: String,
    pub feed_url: String,
    pub database_path: String,
    pub sampling: SamplingConfig,
    /// Summarization input cap, in characters; longer content is truncated.
    pub max_input_chars: usize,
    /// Pause applied before each backend request.
    pub request_delay: Duration,
}

impl Config {
    /// Load configuration from the environment. Only the API credential is
    /// mandatory; everything else falls back to a default.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("DEEPSEEK_API_KEY")
            .map_err(|_| TranslatorError::Config("DEEPSEEK_API_KEY is not set".to_string()))?;

        let request_delay = match env::var("REQUEST_DELAY") {
            Ok(raw) => {
                let seconds: f64 = raw
                    .parse()
                    .map_err(|_| TranslatorError::Config(format!("invalid REQUEST_DELAY: {}", raw)))?;
                Duration::from_secs_f64(seconds)
            }
            Err(_) => Duration::from_millis(500),
        };

        let max_input_chars = match env::var("MAX_INPUT_LENGTH") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| TranslatorError::Config(format!("invalid MAX_INPUT_LENGTH: {}", raw)))?,
            Err(_) => 3000,
        };

        Ok(Self {
            api_base_url: env::var("DEEPSEEK_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            api_key,
            model: env::var("TRANSLATION_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            feed_url: env::var("RSS_URL").unwrap_or_else(|_| DEFAULT_FEED_URL.to_string()),
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| DEFAULT_DATABASE_PATH.to_string()),
            sampling: SamplingConfig::default(),
            max_input_chars,
            request_delay,
        })
    }
}
