//! Corpus and result types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Subject name -> sorted, deduplicated evidence snippets.
///
/// Iteration follows roster order. A subject listed twice keeps its first
/// position and the later result.
pub type EvidenceMap = IndexMap<String, Vec<String>>;

/// One unit of normalized, line-oriented source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Where the text came from (file path, row id). Used for logging only.
    #[serde(default)]
    pub source: Option<String>,

    /// Plain text with line breaks preserved.
    pub text: String,
}

impl Document {
    /// Create a document from plain text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            source: None,
            text: text.into(),
        }
    }

    /// Create a document from lines joined with `\n`.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let text = lines
            .into_iter()
            .map(|l| l.as_ref().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        Self::new(text)
    }

    /// Attach a source label.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// True when the document has no non-whitespace content.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
