//! LLM client: the text-completion boundary used by résumé derivation.
//!
//! Derivation only sees [`CompletionBackend`]: a prompt goes in, completion text
//! comes out, or the call fails. [`LlmClient`] talks to the Anthropic Messages
//! API; [`sample::SampleCompletionBackend`] answers with canned section
//! payloads when no API key is configured.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

pub mod prompts;
pub mod sample;

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";
const MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("completion request timed out")]
    Timeout,

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("could not decode API response: {0}")]
    Parse(String),

    #[error("still rate limited after {attempts} attempts")]
    RateLimited { attempts: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            BackendError::Timeout
        } else {
            BackendError::Http(e)
        }
    }
}

/// The text-completion boundary. Implementations must settle in bounded time.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// True for backends whose completions are canned rather than derived from the prompt.
    fn produces_sample_data(&self) -> bool {
        false
    }

    async fn complete(&self, prompt: &str, max_output_tokens: u32)
        -> Result<String, BackendError>;
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [UserMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseBlock>,
    usage: TokenUsage,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct TokenUsage {
    input_tokens: u32,
    output_tokens: u32,
}

impl MessagesResponse {
    /// Text of the first text block.
    fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(|block| match block {
            ResponseBlock::Text { text } => Some(text.as_str()),
            ResponseBlock::Other => None,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Outcome of a single HTTP attempt.
enum Attempt {
    Done(MessagesResponse),
    Retry(BackendError),
}

/// Anthropic Messages API client.
/// Constructed once at startup and shared through `AppState`.
#[derive(Clone)]
pub struct LlmClient {
    http: Client,
    api_key: String,
    model: String,
}

impl LlmClient {
    /// `timeout` bounds each HTTP attempt, so every `complete` call settles.
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self, BackendError> {
        Ok(Self {
            http: Client::builder().timeout(timeout).build()?,
            api_key,
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends one Messages request, retrying 429, 5xx and transport failures
    /// with exponential backoff.
    async fn send(
        &self,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<MessagesResponse, BackendError> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens,
            system: JSON_ONLY_SYSTEM,
            messages: [UserMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut last_error = BackendError::RateLimited {
            attempts: MAX_ATTEMPTS,
        };

        for attempt in 1..=MAX_ATTEMPTS {
            match self.attempt(&request).await? {
                Attempt::Done(response) => return Ok(response),
                Attempt::Retry(e) if attempt < MAX_ATTEMPTS => {
                    let delay = backoff_delay(attempt);
                    warn!(
                        "Completion attempt {attempt}/{MAX_ATTEMPTS} failed ({e}), retrying in {}ms",
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                Attempt::Retry(e) => last_error = e,
            }
        }

        Err(last_error)
    }

    async fn attempt(&self, request: &MessagesRequest<'_>) -> Result<Attempt, BackendError> {
        let sent = self
            .http
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(request)
            .send()
            .await;

        let response = match sent {
            Ok(response) => response,
            Err(e) => return Ok(Attempt::Retry(e.into())),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = BackendError::Api {
                status: status.as_u16(),
                message: api_error_message(body),
            };
            return if is_retryable(status) {
                Ok(Attempt::Retry(error))
            } else {
                Err(error)
            };
        }

        let body = response.bytes().await?;
        let parsed: MessagesResponse =
            serde_json::from_slice(&body).map_err(|e| BackendError::Parse(e.to_string()))?;

        debug!(
            "Completion finished: input_tokens={}, output_tokens={}",
            parsed.usage.input_tokens, parsed.usage.output_tokens
        );
        Ok(Attempt::Done(parsed))
    }
}

#[async_trait]
impl CompletionBackend for LlmClient {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn complete(
        &self,
        prompt: &str,
        max_output_tokens: u32,
    ) -> Result<String, BackendError> {
        let response = self.send(prompt, max_output_tokens).await?;
        response
            .first_text()
            .filter(|text| !text.trim().is_empty())
            .map(str::to_string)
            .ok_or(BackendError::EmptyContent)
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// 1s after the first failure, 2s after the second.
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_millis(1000 << (attempt - 1))
}

/// `error.message` from an API error body, or the raw body when it isn't one.
fn api_error_message(body: String) -> String {
    serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_text_skips_other_blocks() {
        let response: MessagesResponse = serde_json::from_str(
            r#"{
                "content": [
                    {"type": "tool_use", "id": "toolu_1", "name": "lookup", "input": {}},
                    {"type": "text", "text": "{\"name\": \"Jane\"}"}
                ],
                "usage": {"input_tokens": 12, "output_tokens": 7}
            }"#,
        )
        .unwrap();
        assert_eq!(response.first_text(), Some("{\"name\": \"Jane\"}"));
    }

    #[test]
    fn test_response_without_text_block_has_no_text() {
        let response: MessagesResponse = serde_json::from_str(
            r#"{"content": [], "usage": {"input_tokens": 1, "output_tokens": 0}}"#,
        )
        .unwrap();
        assert!(response.first_text().is_none());
    }

    #[test]
    fn test_request_body_shape() {
        let request = MessagesRequest {
            model: DEFAULT_MODEL,
            max_tokens: 500,
            system: JSON_ONLY_SYSTEM,
            messages: [UserMessage {
                role: "user",
                content: "Extract contact information",
            }],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["max_tokens"], 500);
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "Extract contact information");
        assert_eq!(value["model"], DEFAULT_MODEL);
    }

    #[test]
    fn test_api_error_message_prefers_structured_body() {
        let body = r#"{"type":"error","error":{"type":"invalid_request_error","message":"max_tokens too large"}}"#;
        assert_eq!(api_error_message(body.to_string()), "max_tokens too large");
        assert_eq!(api_error_message("bad gateway".to_string()), "bad gateway");
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable(StatusCode::BAD_GATEWAY));
        assert!(!is_retryable(StatusCode::BAD_REQUEST));
        assert!(!is_retryable(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn test_backoff_doubles() {
        assert_eq!(backoff_delay(1), Duration::from_millis(1000));
        assert_eq!(backoff_delay(2), Duration::from_millis(2000));
    }

    #[test]
    fn test_client_builds_with_configured_model() {
        let client = LlmClient::new(
            "test-key".to_string(),
            "claude-haiku-4-5".to_string(),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.model(), "claude-haiku-4-5");
        assert_eq!(client.name(), "anthropic");
    }
}
