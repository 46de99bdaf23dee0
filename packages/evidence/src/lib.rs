//! Alias-Aware Evidence Extraction
//!
//! Given free-text correspondence and a roster of people, find every passage
//! that plausibly discusses each person, including passages that use a
//! nickname, initials, or a shortened form of their name.
//!
//! # Pipeline
//!
//! 1. [`AliasGenerator`] asks a [`TextBackend`] for short forms of a name and
//!    filters out anything that collides with the subject or another roster
//!    member.
//! 2. [`find_mentions`] scans every line of every [`Document`] for word-bounded,
//!    case-insensitive occurrences of the name or an alias and keeps a context
//!    window around each hit.
//! 3. [`Aggregator`] runs both steps for every subject and returns an
//!    [`EvidenceMap`].
//!
//! Backend failures never abort a run. They degrade to "no aliases", which
//! still leaves exact-name matching in place.
//!
//! # Usage
//!
//! ```rust,ignore
//! use evidence::{AliasGenerator, Aggregator, Document};
//! use evidence::testing::MockBackend;
//!
//! let backend = MockBackend::new().with_response("Thomas Monk", "Tom, T. Monk");
//! let aggregator = Aggregator::new(AliasGenerator::new(backend));
//!
//! let roster = vec!["Thomas Monk".to_string()];
//! let corpus = vec![Document::new("Tom is excellent.")];
//! let evidence = aggregator.aggregate(&roster, &corpus).await;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - The [`TextBackend`] seam for generative text providers
//! - [`aliases`] - Alias generation and collision filtering
//! - [`scanner`] - Word-bounded mention scanning with context windows
//! - [`aggregate`] - Per-subject orchestration
//! - [`testing`] - Mock backend for tests

pub mod aggregate;
pub mod aliases;
pub mod error;
pub mod prompts;
pub mod scanner;
pub mod testing;
pub mod traits;
pub mod types;

#[cfg(feature = "openai")]
pub mod ai;

pub use aggregate::{AggregateConfig, Aggregator};
pub use aliases::{parse_alias_response, AliasGenerator};
pub use error::{BackendError, BackendResult};
pub use scanner::{find_mentions, normalize, split_lines, SearchTerms, DEFAULT_WINDOW};
pub use traits::backend::{CompletionRequest, TextBackend, UnconfiguredBackend};
pub use types::{Document, EvidenceMap};

#[cfg(feature = "openai")]
pub use ai::OpenAIBackend;

pub use testing::{MockBackend, MockCall};
