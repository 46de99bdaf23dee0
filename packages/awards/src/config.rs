use anyhow::{anyhow, Context, Result};
use dotenvy::dotenv;
use evidence::{AggregateConfig, OpenAIBackend, DEFAULT_WINDOW};
use openai_client::OpenAIClient;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::sources::spreadsheet::{default_sources, FeedbackSource};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    pub request_timeout: Duration,
    pub max_retries: u32,
    pub assets_dir: PathBuf,
    pub output_dir: PathBuf,
    pub concurrency: usize,
    pub context_window: usize,
    pub feedback_sources: Vec<FeedbackSource>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let assets_dir = PathBuf::from(var("AWARDS_ASSETS_DIR").unwrap_or_else(|| "assets".into()));

        Ok(Self {
            openai_api_key: var("OPENAI_API_KEY"),
            openai_model: var("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o".to_string()),
            openai_base_url: var("OPENAI_BASE_URL"),
            request_timeout: Duration::from_secs(parse_or(
                var("AWARDS_REQUEST_TIMEOUT_SECS"),
                "AWARDS_REQUEST_TIMEOUT_SECS",
                60,
            )?),
            max_retries: parse_or(var("AWARDS_MAX_RETRIES"), "AWARDS_MAX_RETRIES", 2)?,
            output_dir: PathBuf::from(
                var("AWARDS_OUTPUT_DIR").unwrap_or_else(|| "recommendation_messages".into()),
            ),
            concurrency: parse_or(var("AWARDS_CONCURRENCY"), "AWARDS_CONCURRENCY", 1)?,
            context_window: parse_or(
                var("AWARDS_CONTEXT_WINDOW"),
                "AWARDS_CONTEXT_WINDOW",
                DEFAULT_WINDOW,
            )?,
            feedback_sources: default_sources(&assets_dir),
            assets_dir,
        })
    }

    /// Point at a different assets directory, rebuilding the default feedback sources.
    pub fn with_assets_dir(mut self, assets_dir: impl Into<PathBuf>) -> Self {
        self.assets_dir = assets_dir.into();
        self.feedback_sources = default_sources(&self.assets_dir);
        self
    }

    /// Evidence aggregation settings.
    pub fn aggregate_config(&self) -> AggregateConfig {
        AggregateConfig::new()
            .with_window(self.context_window)
            .with_concurrency(self.concurrency)
    }

    /// OpenAI backend for alias and narrative generation.
    ///
    /// Fails when `OPENAI_API_KEY` is not set.
    pub fn openai_backend(&self) -> Result<OpenAIBackend> {
        let api_key = self
            .openai_api_key
            .as_deref()
            .ok_or_else(|| anyhow!("OPENAI_API_KEY must be set"))?;

        let mut client = OpenAIClient::new(api_key)
            .with_timeout(self.request_timeout)
            .with_max_retries(self.max_retries);
        if let Some(base_url) = &self.openai_base_url {
            client = client.with_base_url(base_url);
        }

        Ok(OpenAIBackend::new(client).with_model(&self.openai_model))
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a valid number")),
        None => Ok(default),
    }
}
