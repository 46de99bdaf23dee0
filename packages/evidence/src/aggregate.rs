//! Per-subject evidence aggregation.
//!
//! Runs alias generation and mention scanning for every roster member
//! against a shared, read-only corpus. Subjects are independent, so up to
//! `concurrency` of them are in flight at once; results are reassembled in
//! roster order, so the output does not depend on the concurrency level.

use futures::stream::{self, StreamExt};
use tracing::{debug, info, instrument};

use crate::aliases::AliasGenerator;
use crate::scanner::{find_mentions, DEFAULT_WINDOW};
use crate::traits::backend::TextBackend;
use crate::types::{Document, EvidenceMap};

/// Aggregation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateConfig {
    /// Context lines kept on each side of a match.
    ///
    /// Default: 2.
    pub window: usize,

    /// Subjects processed at once (each holds at most one backend call).
    ///
    /// Default: 1 (strictly sequential).
    pub concurrency: usize,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            concurrency: 1,
        }
    }
}

impl AggregateConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the context window.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Set the number of subjects processed at once (minimum 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}

/// Builds an [`EvidenceMap`] for a roster.
pub struct Aggregator<B> {
    aliases: AliasGenerator<B>,
    config: AggregateConfig,
}

impl<B: TextBackend> Aggregator<B> {
    /// Create an aggregator with default settings.
    pub fn new(aliases: AliasGenerator<B>) -> Self {
        Self {
            aliases,
            config: AggregateConfig::default(),
        }
    }

    /// Replace the settings.
    pub fn with_config(mut self, config: AggregateConfig) -> Self {
        self.config = config;
        self
    }

    /// Current settings.
    pub fn config(&self) -> &AggregateConfig {
        &self.config
    }

    /// The alias generator in use.
    pub fn alias_generator(&self) -> &AliasGenerator<B> {
        &self.aliases
    }

    /// Evidence for every roster member.
    ///
    /// Every distinct roster name gets an entry, empty if nothing was found.
    /// When the corpus has no content the backend is never called.
    #[instrument(skip_all, fields(roster_size = roster.len(), documents = corpus.len()))]
    pub async fn aggregate(&self, roster: &[String], corpus: &[Document]) -> EvidenceMap {
        let mut evidence = EvidenceMap::with_capacity(roster.len());
        if roster.is_empty() {
            return evidence;
        }

        if corpus.iter().all(Document::is_blank) {
            info!("Corpus is empty, skipping alias generation");
            for subject in roster {
                evidence.insert(subject.clone(), Vec::new());
            }
            return evidence;
        }

        let results: Vec<(String, Vec<String>)> = stream::iter(roster)
            .map(|subject| async move {
                let snippets = self.evidence_for(subject, roster, corpus).await;
                (subject.clone(), snippets)
            })
            .buffered(self.config.concurrency)
            .collect()
            .await;

        for (subject, snippets) in results {
            if evidence.insert(subject.clone(), snippets).is_some() {
                debug!(subject = %subject, "Duplicate roster entry overwrote earlier evidence");
            }
        }

        info!(
            subjects = evidence.len(),
            snippets = evidence.values().map(Vec::len).sum::<usize>(),
            "Evidence aggregated"
        );
        evidence
    }

    /// Evidence for a single subject.
    pub async fn evidence_for(
        &self,
        subject: &str,
        roster: &[String],
        corpus: &[Document],
    ) -> Vec<String> {
        let aliases = self.aliases.generate(subject, roster).await;
        let snippets = find_mentions(subject, &aliases, corpus, self.config.window);
        debug!(
            subject = %subject,
            aliases = aliases.len(),
            snippets = snippets.len(),
            "Collected evidence"
        );
        snippets
    }
}
