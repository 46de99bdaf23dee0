//! Teaching award recommendations.
//!
//! Reads positive student feedback from survey spreadsheets and colleague
//! opinions from forwarded `.eml` threads, then drafts one recommendation
//! message per teacher.
//!
//! # Stages
//!
//! 1. [`sources`] turns spreadsheets, mailboxes and roster files into plain
//!    text the evidence core can scan
//! 2. [`evidence::Aggregator`] pulls every passage that mentions a teacher,
//!    including by nickname or initials
//! 3. [`narrative::NarrativeWriter`] drafts the message from feedback and
//!    opinions
//! 4. [`output`] writes one markdown file per teacher
//!
//! [`pipeline::Pipeline`] wires the stages together for the `awards` binary.

pub mod config;
pub mod narrative;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod sources;

pub use config::Config;
pub use narrative::{NarrativeError, NarrativeWriter, Recommendation};
pub use output::{save_json, save_markdown, OutputError};
pub use pipeline::{Pipeline, RunSummary};
