//! Typed errors for generative text backends.
//!
//! Uses `thiserror` for library errors (not `anyhow`). Nothing in the
//! evidence pipeline propagates these past the alias generator; they exist
//! so callers and logs can branch on the failure kind instead of on text.

use thiserror::Error;

/// Errors a [`TextBackend`](crate::TextBackend) can report.
#[derive(Debug, Error)]
pub enum BackendError {
    /// No credentials or client configured
    #[error("backend not configured: {0}")]
    Unconfigured(String),

    /// Connection failed or timed out
    #[error("backend unreachable: {0}")]
    Network(String),

    /// Backend rejected the request
    #[error("backend error: {0}")]
    Api(String),

    /// Backend answered with nothing usable
    #[error("backend returned an empty response")]
    EmptyResponse,

    /// Response could not be decoded
    #[error("could not parse backend response: {0}")]
    Parse(String),
}

/// Result type alias for backend operations.
pub type BackendResult<T> = std::result::Result<T, BackendError>;
