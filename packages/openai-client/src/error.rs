//! Error types for OpenAI client.

use thiserror::Error;

/// Result type for OpenAI client operations.
pub type Result<T> = std::result::Result<T, OpenAIError>;

/// OpenAI client errors.
#[derive(Debug, Error)]
pub enum OpenAIError {
    /// Configuration error (missing API key, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// API error (non-2xx response, invalid request, empty choices)
    #[error("API error: {0}")]
    Api(String),

    /// Rate limited or server-side failure that may succeed on retry
    #[error("API error (status {status}): {message}")]
    Transient { status: u16, message: String },

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl OpenAIError {
    /// Whether repeating the same request could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Transient { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(OpenAIError::Network("reset".into()).is_retryable());
        assert!(OpenAIError::Transient {
            status: 429,
            message: "slow down".into()
        }
        .is_retryable());
        assert!(!OpenAIError::Api("bad request".into()).is_retryable());
        assert!(!OpenAIError::Config("missing key".into()).is_retryable());
        assert!(!OpenAIError::Parse("eof".into()).is_retryable());
    }
}
