//! AI backend implementations.
//!
//! Provides a reference implementation of the [`TextBackend`](crate::TextBackend)
//! trait on top of `openai-client`.

mod openai;

pub use openai::OpenAIBackend;
