//! Teaching award recommendation generator.
//!
//! Reads survey spreadsheets and `.eml` threads from the assets directory and
//! writes one markdown recommendation per teacher.

use anyhow::{Context, Result};
use awards_core::config::Config;
use awards_core::pipeline::Pipeline;
use awards_core::sources::roster_file;
use clap::Parser;
use colored::Colorize;
use evidence::{TextBackend, UnconfiguredBackend};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "awards")]
#[command(about = "Generate teaching award recommendations")]
struct Cli {
    /// Teacher names to process (quote names with spaces)
    #[arg(short = 't', long = "teachers", num_args = 1.., value_name = "NAME", conflicts_with = "teachers_file")]
    teachers: Option<Vec<String>>,

    /// .txt (one name per line) or .csv (first column) list of teachers
    #[arg(long = "teachers-file", value_name = "FILE_PATH")]
    teachers_file: Option<PathBuf>,

    /// Context lines kept around each email mention
    #[arg(long)]
    window: Option<usize>,

    /// Teachers processed at once
    #[arg(long)]
    concurrency: Option<usize>,

    /// Directory holding survey workbooks and .eml files
    #[arg(long)]
    assets_dir: Option<PathBuf>,

    /// Directory recommendations are written to
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Chat model
    #[arg(long)]
    model: Option<String>,

    /// Write the collected email evidence to evidence.json and stop
    #[arg(long)]
    evidence_only: bool,
}

impl Cli {
    fn apply(&self, mut config: Config) -> Config {
        if let Some(dir) = &self.assets_dir {
            config = config.with_assets_dir(dir);
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(window) = self.window {
            config.context_window = window;
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency.max(1);
        }
        if let Some(model) = &self.model {
            config.openai_model = model.clone();
        }
        config
    }

    fn teachers(&self) -> Result<Option<Vec<String>>> {
        match &self.teachers_file {
            Some(path) => Ok(Some(roster_file::load(path)?)),
            None => Ok(self.teachers.clone()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,awards_core=debug,evidence=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.apply(Config::from_env().context("Failed to load configuration")?);
    let teachers = cli.teachers()?;

    if cli.evidence_only {
        return match config.openai_backend() {
            Ok(backend) => evidence_only(Pipeline::new(config, backend), teachers).await,
            Err(_) => {
                tracing::warn!("OPENAI_API_KEY not set, matching exact names only");
                let backend = UnconfiguredBackend::new("OPENAI_API_KEY not set");
                evidence_only(Pipeline::new(config, backend), teachers).await
            }
        };
    }

    let backend = config
        .openai_backend()
        .context("Recommendation drafting needs an OpenAI API key")?;
    tracing::info!(model = %config.openai_model, "Starting teaching award run");

    let pipeline = Pipeline::new(config, backend);
    let summary = pipeline.run(teachers).await?;

    println!();
    println!("{}", "Teaching award recommendation run complete".bright_cyan().bold());
    println!(
        "  {} {}",
        "Saved:".bright_green(),
        summary.succeeded.to_string().bold()
    );
    if summary.failed > 0 {
        println!(
            "  {} {}",
            "Failed (fallback written or save error):".bright_red(),
            summary.failed.to_string().bold()
        );
    }
    println!(
        "  {} {}",
        "Output:".dimmed(),
        pipeline.config().output_dir.display()
    );

    Ok(())
}

async fn evidence_only<B: TextBackend + Clone>(
    pipeline: Pipeline<B>,
    teachers: Option<Vec<String>>,
) -> Result<()> {
    let path = pipeline.write_evidence(teachers).await?;
    println!("{} {}", "Evidence written to".bright_green(), path.display());
    Ok(())
}
