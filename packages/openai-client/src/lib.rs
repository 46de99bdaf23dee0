//! Pure OpenAI REST API client
//!
//! A clean, minimal client for the OpenAI chat completions API with no
//! domain-specific logic. Transient failures (connection errors, rate limits,
//! 5xx responses) are retried a bounded number of times.
//!
//! # Example
//!
//! ```rust,ignore
//! use openai_client::{OpenAIClient, ChatRequest, Message};
//!
//! let client = OpenAIClient::from_env()?.with_max_retries(2);
//!
//! let response = client.chat_completion(
//!     ChatRequest::new("gpt-4o")
//!         .message(Message::system("You are an expert in names."))
//!         .message(Message::user("Nicknames for Thomas?"))
//!         .temperature(0.2),
//! ).await?;
//! ```

pub mod error;
pub mod types;

pub use error::{OpenAIError, Result};
pub use types::*;

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Pure OpenAI API client.
#[derive(Clone)]
pub struct OpenAIClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    timeout: Option<Duration>,
    max_retries: u32,
    retry_backoff: Duration,
}

impl OpenAIClient {
    /// Create a new OpenAI client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            max_retries: 0,
            retry_backoff: Duration::from_millis(500),
        }
    }

    /// Create from environment variable `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| OpenAIError::Config("OPENAI_API_KEY not set".into()))?;
        if api_key.trim().is_empty() {
            return Err(OpenAIError::Config("OPENAI_API_KEY is empty".into()));
        }
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Retry transient failures up to `max_retries` additional times.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Base delay between retries; attempt `n` waits `n * backoff`.
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Get the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Chat completion.
    ///
    /// Send messages to the chat completion API and get the first choice back.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let mut attempt = 0;
        loop {
            match self.chat_completion_once(&request).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.retry_backoff * attempt;
                    warn!(
                        error = %e,
                        attempt,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis(),
                        "Retrying OpenAI chat completion"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn chat_completion_once(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let start = std::time::Instant::now();

        let mut builder = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, "OpenAI request failed");
            OpenAIError::Network(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "OpenAI API error");
            return Err(classify_status(status, error_text));
        }

        let chat_response: types::ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| OpenAIError::Parse(e.to_string()))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| OpenAIError::Api("No response from OpenAI".into()))?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            "OpenAI chat completion"
        );

        Ok(ChatResponse {
            content,
            usage: chat_response.usage,
        })
    }
}

fn classify_status(status: StatusCode, body: String) -> OpenAIError {
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        OpenAIError::Transient {
            status: status.as_u16(),
            message: body,
        }
    } else {
        OpenAIError::Api(format!("OpenAI API error ({}): {}", status.as_u16(), body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = OpenAIClient::new("sk-test")
            .with_base_url("https://custom.api.com/")
            .with_timeout(Duration::from_secs(5))
            .with_max_retries(3);

        assert_eq!(client.api_key(), "sk-test");
        assert_eq!(client.base_url(), "https://custom.api.com");
        assert_eq!(client.timeout, Some(Duration::from_secs(5)));
        assert_eq!(client.max_retries, 3);
    }

    #[test]
    fn test_classify_status() {
        assert!(classify_status(StatusCode::TOO_MANY_REQUESTS, String::new()).is_retryable());
        assert!(classify_status(StatusCode::BAD_GATEWAY, String::new()).is_retryable());
        assert!(!classify_status(StatusCode::UNAUTHORIZED, String::new()).is_retryable());
        assert!(!classify_status(StatusCode::BAD_REQUEST, String::new()).is_retryable());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        // Port 9 (discard) on localhost is not an HTTP server.
        let client = OpenAIClient::new("sk-test")
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(Duration::from_secs(2));

        let result = client
            .chat_completion(ChatRequest::new("gpt-4o").message(Message::user("Hi")))
            .await;

        assert!(matches!(result, Err(OpenAIError::Network(_))));
    }
}
