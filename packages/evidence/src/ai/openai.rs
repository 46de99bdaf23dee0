//! OpenAI implementation of the TextBackend trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use evidence::{AliasGenerator, OpenAIBackend};
//!
//! let backend = OpenAIBackend::from_env()?.with_model("gpt-4o");
//! let aliases = AliasGenerator::new(backend);
//! ```

use async_trait::async_trait;
use openai_client::{ChatRequest, Message, OpenAIClient, OpenAIError};
use tracing::debug;

use crate::error::{BackendError, BackendResult};
use crate::traits::backend::{CompletionRequest, TextBackend};

/// OpenAI chat-completions backend.
#[derive(Clone)]
pub struct OpenAIBackend {
    client: OpenAIClient,
    model: String,
}

impl OpenAIBackend {
    /// Wrap an existing client. Uses `gpt-4o` until [`with_model`](Self::with_model).
    pub fn new(client: OpenAIClient) -> Self {
        Self {
            client,
            model: "gpt-4o".to_string(),
        }
    }

    /// Create from environment variable `OPENAI_API_KEY`.
    pub fn from_env() -> BackendResult<Self> {
        OpenAIClient::from_env()
            .map(Self::new)
            .map_err(BackendError::from)
    }

    /// Set the chat model (default: gpt-4o).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Get the current model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn chat_request(&self, request: CompletionRequest) -> ChatRequest {
        let mut chat = ChatRequest::new(&self.model)
            .message(Message::system(request.system))
            .message(Message::user(request.user))
            .single_choice();
        if let Some(limit) = request.max_tokens {
            chat = chat.token_limit(limit);
        }
        if let Some(temperature) = request.temperature {
            chat = chat.temperature(temperature);
        }
        chat
    }
}

#[async_trait]
impl TextBackend for OpenAIBackend {
    async fn complete(&self, request: CompletionRequest) -> BackendResult<String> {
        let response = self.client.chat_completion(self.chat_request(request)).await?;

        if let Some(usage) = &response.usage {
            debug!(
                model = %self.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Completion usage"
            );
        }

        let content = response.content.trim();
        if content.is_empty() {
            return Err(BackendError::EmptyResponse);
        }
        Ok(content.to_string())
    }
}

impl From<OpenAIError> for BackendError {
    fn from(err: OpenAIError) -> Self {
        match err {
            OpenAIError::Config(msg) => BackendError::Unconfigured(msg),
            OpenAIError::Network(msg) => BackendError::Network(msg),
            OpenAIError::Api(msg) => BackendError::Api(msg),
            OpenAIError::Transient { status, message } => {
                BackendError::Api(format!("status {}: {}", status, message))
            }
            OpenAIError::Parse(msg) => BackendError::Parse(msg),
        }
    }
}
