use crate::config::{Config, SamplingConfig};
use crate::types::{Result, TranslatorError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const TRANSLATE_SYSTEM_PROMPT: &str =
    "You are a professional translator. Translate English news titles to Chinese. \
     Keep translations concise and accurate.";

const SUMMARIZE_SYSTEM_PROMPT: &str =
    "You are an expert news summarizer. Summarize articles in Chinese in 300-500 \
     characters, covering the key events, people, figures and their impact, in \
     objective and accurate language.";

/// Stateless client abstraction over the text-completion backend.
///
/// Both operations are single-shot: no internal retry, and `translate_batch`
/// either returns exactly one translation per input, in order, or fails as a
/// unit. Callers own retry/backoff policy.
#[async_trait]
pub trait TranslationGateway: Send + Sync {
    async fn translate_batch(&self, texts: &[String]) -> Result<Vec<String>>;
    async fn summarize(&self, title: &str, content: &str) -> Result<String>;
}

/// Gateway over an OpenAI-compatible `/chat/completions` endpoint
/// (DeepSeek by default).
pub struct ChatCompletionsGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    sampling: SamplingConfig,
    max_input_chars: usize,
    request_delay: Duration,
}

impl ChatCompletionsGateway {
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            sampling: config.sampling,
            max_input_chars: config.max_input_chars,
            request_delay: config.request_delay,
        }
    }

    async fn chat(&self, system: &str, user: String) -> std::result::Result<String, String> {
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage { role: "system".to_string(), content: system.to_string() },
                ChatMessage { role: "user".to_string(), content: user },
            ],
            temperature: self.sampling.temperature,
            top_p: self.sampling.top_p,
            presence_penalty: self.sampling.presence_penalty,
            max_tokens: self.sampling.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status));
        }

        let body = response.text().await.map_err(|e| e.to_string())?;
        let body: ChatResponse =
            serde_json::from_str(&body).map_err(|e| format!("unexpected response body: {}", e))?;
        let content = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| "response contained no choices".to_string())?;

        Ok(content.trim().to_string())
    }
}

#[async_trait]
impl TranslationGateway for ChatCompletionsGateway {
    async fn translate_batch(&self, texts: &[String]) -> Result<Vec<String>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let numbered = texts
            .iter()
            .enumerate()
            .map(|(i, text)| format!("{}. {}", i + 1, text))
            .collect::<Vec<_>>()
            .join("\n");

        let user = format!(
            "Please translate these English titles to Chinese. Keep the numbering \
             format and only return the translations:\n\n{}",
            numbered
        );

        debug!("Translating batch of {} titles", texts.len());
        let response = self
            .chat(TRANSLATE_SYSTEM_PROMPT, user)
            .await
            .map_err(TranslatorError::TranslationBackend)?;

        let translations = parse_numbered_list(&response);
        if translations.len() != texts.len() {
            warn!(
                "Numbered-list protocol violated: sent {} titles, parsed {} lines",
                texts.len(),
                translations.len()
            );
            return Err(TranslatorError::TranslationMismatch {
                expected: texts.len(),
                actual: translations.len(),
            });
        }

        Ok(translations)
    }

    async fn summarize(&self, title: &str, content: &str) -> Result<String> {
        let content = truncate_chars(content, self.max_input_chars);

        let user = format!(
            "Please summarize the following article in Chinese, in 300-500 \
             characters:\n\nTitle: {}\n\nContent: {}",
            title, content
        );

        debug!("Summarizing article: {}", title);
        self.chat(SUMMARIZE_SYSTEM_PROMPT, user)
            .await
            .map_err(TranslatorError::SummarizationFailed)
    }
}

/// Strip leading `"<n>. "` markers from a numbered-list response, one
/// translation per non-empty line. Lines without a marker are dropped, which
/// the caller detects as a length mismatch.
fn parse_numbered_list(response: &str) -> Vec<String> {
    response
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            line.split_once('.').map(|(_, rest)| rest.trim().to_string())
        })
        .collect()
}

/// Truncate to at most `max` characters, on a character boundary.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    top_p: f32,
    presence_penalty: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}
