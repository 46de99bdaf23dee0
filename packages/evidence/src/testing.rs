//! Testing utilities including a mock text backend.
//!
//! Useful for exercising alias generation, aggregation and anything built on
//! [`TextBackend`] without making real LLM calls.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::error::{BackendError, BackendResult};
use crate::traits::backend::{CompletionRequest, TextBackend};

/// A mock backend with canned responses.
///
/// Rules are checked in insertion order; the first rule whose needle appears
/// in the user prompt supplies the response. Unmatched prompts get the
/// default response, or an empty string if none was set.
#[derive(Default, Clone)]
pub struct MockBackend {
    /// (needle, response) pairs
    rules: Arc<RwLock<Vec<(String, String)>>>,

    /// Response when no rule matches
    default_response: Arc<RwLock<Option<String>>>,

    /// Fail every call with a network error
    failing: bool,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<MockCall>>>,
}

/// Record of a call made to the mock backend.
#[derive(Debug, Clone)]
pub enum MockCall {
    Complete {
        system: String,
        user: String,
        max_tokens: Option<u32>,
    },
}

impl MockBackend {
    /// Create a mock that answers every prompt with an empty string.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock whose every call fails as if the backend were unreachable.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Default::default()
        }
    }

    /// Respond with `response` when the user prompt contains `needle`.
    pub fn with_response(self, needle: impl Into<String>, response: impl Into<String>) -> Self {
        self.rules
            .write()
            .unwrap()
            .push((needle.into(), response.into()));
        self
    }

    /// Respond with `response` when no rule matches.
    pub fn with_default_response(self, response: impl Into<String>) -> Self {
        *self.default_response.write().unwrap() = Some(response.into());
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.read().unwrap().clone()
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// Clear call history.
    pub fn clear_calls(&self) {
        self.calls.write().unwrap().clear();
    }
}

#[async_trait]
impl TextBackend for MockBackend {
    async fn complete(&self, request: CompletionRequest) -> BackendResult<String> {
        self.calls.write().unwrap().push(MockCall::Complete {
            system: request.system.clone(),
            user: request.user.clone(),
            max_tokens: request.max_tokens,
        });

        if self.failing {
            return Err(BackendError::Network("mock connection refused".into()));
        }

        let matched = self
            .rules
            .read()
            .unwrap()
            .iter()
            .find(|(needle, _)| request.user.contains(needle.as_str()))
            .map(|(_, response)| response.clone());

        Ok(matched
            .or_else(|| self.default_response.read().unwrap().clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_matching_rule_wins() {
        let backend = MockBackend::new()
            .with_response("Thomas", "Tom")
            .with_response("Thomas Monk", "T. Monk");

        let response = backend
            .complete(CompletionRequest::new("sys", "Aliases for Thomas Monk"))
            .await
            .unwrap();
        assert_eq!(response, "Tom");

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(calls[0], MockCall::Complete { .. }));
    }

    #[tokio::test]
    async fn test_default_and_empty_responses() {
        let empty = MockBackend::new();
        assert_eq!(empty.complete(CompletionRequest::new("s", "u")).await.unwrap(), "");

        let defaulted = MockBackend::new().with_default_response("None");
        assert_eq!(
            defaulted.complete(CompletionRequest::new("s", "u")).await.unwrap(),
            "None"
        );
    }

    #[tokio::test]
    async fn test_failing_mock_records_call() {
        let backend = MockBackend::failing();
        let result = backend.complete(CompletionRequest::new("s", "u")).await;

        assert!(matches!(result, Err(BackendError::Network(_))));
        assert_eq!(backend.call_count(), 1);

        backend.clear_calls();
        assert_eq!(backend.call_count(), 0);
    }
}
