//! Generative text backend trait.
//!
//! The alias generator (and, downstream, the narrative writer) talk to an
//! LLM only through this trait. Clients are constructed explicitly and
//! handed in, so tests substitute [`MockBackend`](crate::testing::MockBackend)
//! without touching process-wide state.

use async_trait::async_trait;

use crate::error::{BackendError, BackendResult};

/// A single system + user prompt exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System prompt (role and output rules)
    pub system: String,

    /// User prompt (the task)
    pub user: String,

    /// Upper bound on generated tokens
    pub max_tokens: Option<u32>,

    /// Sampling temperature
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    /// Create a request from a system and user prompt.
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            max_tokens: None,
            temperature: None,
        }
    }

    /// Set the token budget.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Generative text provider.
///
/// Implementations return the raw completion text. Interpretation of that
/// text (alias lists, narrative bodies) belongs to the caller.
#[async_trait]
pub trait TextBackend: Send + Sync {
    /// Run one completion.
    async fn complete(&self, request: CompletionRequest) -> BackendResult<String>;
}

#[async_trait]
impl<T: TextBackend + ?Sized> TextBackend for std::sync::Arc<T> {
    async fn complete(&self, request: CompletionRequest) -> BackendResult<String> {
        (**self).complete(request).await
    }
}

/// Backend used when no credentials are available.
///
/// Every call fails with [`BackendError::Unconfigured`], which the alias
/// generator turns into an empty alias list.
#[derive(Debug, Clone)]
pub struct UnconfiguredBackend {
    reason: String,
}

impl UnconfiguredBackend {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl TextBackend for UnconfiguredBackend {
    async fn complete(&self, _request: CompletionRequest) -> BackendResult<String> {
        Err(BackendError::Unconfigured(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = CompletionRequest::new("sys", "user")
            .with_max_tokens(60)
            .with_temperature(0.2);

        assert_eq!(request.system, "sys");
        assert_eq!(request.user, "user");
        assert_eq!(request.max_tokens, Some(60));
        assert_eq!(request.temperature, Some(0.2));
    }

    #[tokio::test]
    async fn test_unconfigured_backend_always_fails() {
        let backend = UnconfiguredBackend::new("OPENAI_API_KEY not set");
        let result = backend.complete(CompletionRequest::new("s", "u")).await;

        match result {
            Err(BackendError::Unconfigured(reason)) => {
                assert_eq!(reason, "OPENAI_API_KEY not set")
            }
            other => panic!("expected Unconfigured, got {:?}", other),
        }
    }
}
