//! End-to-end recommendation run.
//!
//! Roster -> survey feedback -> email corpus -> evidence -> narratives ->
//! markdown files. Individual teachers never abort a run: a failed draft is
//! replaced by a fallback file and counted as a failure.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use evidence::{Aggregator, AliasGenerator, Document, EvidenceMap, TextBackend};
use futures::stream::{self, StreamExt};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{info, instrument, warn};

use crate::config::Config;
use crate::narrative::{NarrativeWriter, Recommendation};
use crate::output::{save_json, save_markdown};
use crate::sources::{email, spreadsheet};

/// File written by [`Pipeline::write_evidence`].
pub const EVIDENCE_FILE: &str = "evidence.json";

/// Outcome of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// Every file written, fallbacks included.
    pub files: Vec<PathBuf>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Wires sources, evidence aggregation and narrative drafting together.
pub struct Pipeline<B> {
    config: Config,
    backend: B,
}

impl<B: TextBackend + Clone> Pipeline<B> {
    pub fn new(config: Config, backend: B) -> Self {
        Self { config, backend }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Teachers to process: the given names, or every instructor in the surveys.
    ///
    /// Names are trimmed and deduplicated in order. An empty result is an error.
    pub async fn resolve_roster(&self, teachers: Option<Vec<String>>) -> Result<Vec<String>> {
        let names = match teachers {
            Some(names) => names,
            None => {
                let sources = self.config.feedback_sources.clone();
                tokio::task::spawn_blocking(move || spreadsheet::teacher_names(&sources))
                    .await
                    .context("Survey reader task failed")?
            }
        };

        let mut seen = HashSet::new();
        let roster: Vec<String> = names
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty() && seen.insert(name.clone()))
            .collect();

        if roster.is_empty() {
            bail!("No teachers to process: none given and none found in the survey sources");
        }

        info!(teachers = roster.len(), "Resolved roster");
        Ok(roster)
    }

    async fn load_feedback(&self, roster: &[String]) -> Result<IndexMap<String, Vec<String>>> {
        let sources = self.config.feedback_sources.clone();
        let roster = roster.to_vec();
        tokio::task::spawn_blocking(move || spreadsheet::feedback_for(&roster, &sources))
            .await
            .context("Survey reader task failed")
    }

    async fn load_corpus(&self) -> Result<Vec<Document>> {
        let dir = self.config.assets_dir.clone();
        tokio::task::spawn_blocking(move || email::load_messages(&dir))
            .await
            .context("Email reader task failed")
    }

    fn aggregator(&self) -> Aggregator<B> {
        Aggregator::new(AliasGenerator::new(self.backend.clone()))
            .with_config(self.config.aggregate_config())
    }

    /// Email evidence for each teacher.
    #[instrument(skip_all)]
    pub async fn collect_evidence(&self, teachers: Option<Vec<String>>) -> Result<EvidenceMap> {
        let roster = self.resolve_roster(teachers).await?;
        let corpus = self.load_corpus().await?;
        Ok(self.aggregator().aggregate(&roster, &corpus).await)
    }

    /// Collect evidence and write it to `evidence.json` in the output directory.
    pub async fn write_evidence(&self, teachers: Option<Vec<String>>) -> Result<PathBuf> {
        let evidence = self.collect_evidence(teachers).await?;
        save_json(&self.config.output_dir, EVIDENCE_FILE, &evidence)
            .context("Failed to write evidence file")
    }

    /// Draft and save a recommendation for every teacher.
    #[instrument(skip_all, fields(output_dir = %self.config.output_dir.display()))]
    pub async fn run(&self, teachers: Option<Vec<String>>) -> Result<RunSummary> {
        let started_at = Utc::now();

        let roster = self.resolve_roster(teachers).await?;
        let feedback = self.load_feedback(&roster).await?;
        let corpus = self.load_corpus().await?;
        let evidence = self.aggregator().aggregate(&roster, &corpus).await;

        let writer = NarrativeWriter::new(self.backend.clone());
        let drafts: Vec<(&String, Recommendation, bool)> = stream::iter(&roster)
            .map(|teacher| {
                let feedback = feedback.get(teacher).map(Vec::as_slice).unwrap_or_default();
                let opinions = evidence.get(teacher).map(Vec::as_slice).unwrap_or_default();
                let writer = &writer;
                async move {
                    if feedback.is_empty() && opinions.is_empty() {
                        info!(teacher = %teacher, "No feedback or opinions found, drafting a general recommendation");
                    }
                    match writer.write(teacher, feedback, opinions).await {
                        Ok(rec) => (teacher, rec, true),
                        Err(e) => {
                            warn!(teacher = %teacher, error = %e, "Recommendation drafting failed");
                            (teacher, Recommendation::fallback(teacher, &e.to_string()), false)
                        }
                    }
                }
            })
            .buffered(self.config.concurrency.max(1))
            .collect()
            .await;

        let mut succeeded = 0;
        let mut failed = 0;
        let mut files = Vec::with_capacity(drafts.len());

        for (teacher, rec, drafted) in drafts {
            match save_markdown(&self.config.output_dir, teacher, &rec.markdown) {
                Ok(path) => {
                    files.push(path);
                    if drafted {
                        succeeded += 1;
                    } else {
                        failed += 1;
                    }
                }
                Err(e) => {
                    warn!(teacher = %teacher, error = %e, "Failed to save recommendation");
                    failed += 1;
                }
            }
        }

        let summary = RunSummary {
            succeeded,
            failed,
            files,
            started_at,
            finished_at: Utc::now(),
        };
        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            elapsed_ms = summary.elapsed().num_milliseconds(),
            "Recommendation run complete"
        );
        Ok(summary)
    }
}
