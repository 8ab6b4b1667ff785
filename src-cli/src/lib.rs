pub mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use pdfsum_core::pdf::extract_pages_blocking;
use pdfsum_core::summarizer::huggingface;
use pdfsum_core::{
    Config, DocumentPipeline, LopdfExtractor, ProviderConfig, RunStatus, Settings, SummaryJob,
};

const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

#[derive(Parser, Debug)]
#[command(name = "pdfsum")]
#[command(about = "Summarize a PDF document page by page")]
pub struct Args {
    /// PDF file to summarize
    pub input: PathBuf,

    /// Where to save the summary (defaults to the configured output directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Do not save the summary to disk
    #[arg(long)]
    pub no_save: bool,

    /// Settings file (defaults to the per-user settings.json)
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Summarization provider
    #[arg(long, value_enum)]
    pub provider: Option<ProviderKind>,

    /// Model identifier for the provider
    #[arg(long)]
    pub model: Option<String>,

    /// API key for the provider
    #[arg(long, env = "PDFSUM_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL for OpenAI-compatible endpoints
    #[arg(long)]
    pub base_url: Option<String>,

    /// Print progress events as JSON lines
    #[arg(long)]
    pub json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Huggingface,
    Openai,
}

/// Initialize tracing/logging with the given directives
///
/// Logs go to stderr so stdout only carries the rendered progress.
pub fn init_logging(directives: &[&str]) {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for directive in directives {
        match directive.parse() {
            Ok(directive) => filter = filter.add_directive(directive),
            Err(e) => eprintln!("Ignoring invalid log directive '{}': {}", directive, e),
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Merge command-line overrides into the configured provider.
pub fn resolve_provider(args: &Args, settings: &Settings) -> Result<ProviderConfig> {
    let configured = settings.provider.clone().unwrap_or_default();

    let mut config = match (args.provider, configured) {
        (None, configured) => configured,
        (Some(ProviderKind::Huggingface), configured @ ProviderConfig::HuggingFace { .. }) => {
            configured
        }
        (Some(ProviderKind::Openai), configured @ ProviderConfig::OpenAI { .. }) => configured,
        (Some(ProviderKind::Huggingface), _) => ProviderConfig::HuggingFace {
            api_key: String::new(),
            model: huggingface::DEFAULT_MODEL.to_string(),
        },
        (Some(ProviderKind::Openai), _) => ProviderConfig::OpenAI {
            api_key: String::new(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            base_url: None,
        },
    };

    match &mut config {
        ProviderConfig::HuggingFace { api_key, model } => {
            if let Some(key) = &args.api_key {
                *api_key = key.clone();
            }
            if let Some(m) = &args.model {
                *model = m.clone();
            }
        }
        ProviderConfig::OpenAI {
            api_key,
            model,
            base_url,
        } => {
            if let Some(key) = &args.api_key {
                *api_key = key.clone();
            }
            if let Some(m) = &args.model {
                *model = m.clone();
            }
            if args.base_url.is_some() {
                *base_url = args.base_url.clone();
            }
            if api_key.is_empty() && base_url.is_none() {
                anyhow::bail!("The openai provider needs an API key (--api-key or PDFSUM_API_KEY)");
            }
        }
    }

    Ok(config)
}

/// Summarize `args.input` and save the result.
pub async fn run(args: Args) -> Result<()> {
    let config = Config::load_or_default();
    let settings_path = args
        .settings
        .clone()
        .unwrap_or_else(|| config.settings_file.clone());
    let settings = Settings::load(&settings_path);

    let provider = resolve_provider(&args, &settings)?.build()?;
    let pipeline = Arc::new(DocumentPipeline::from_settings(provider, &settings));

    println!("Opening: {}", args.input.display());
    let pages = extract_pages_blocking(Arc::new(LopdfExtractor), args.input.clone())
        .await
        .with_context(|| format!("Could not read {}", args.input.display()))?;
    println!("Summarizing {} pages...", pages.len());

    let mut job = SummaryJob::spawn(pipeline, pages);

    let cancel = job.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, stopping at the next boundary");
            cancel.cancel();
        }
    });

    while let Some(event) = job.next_event().await {
        if args.json {
            println!("{}", render::render_event_json(&event));
        } else {
            println!("{}", render::render_event(&event));
        }
    }

    let outcome = job.finish().await?;
    tracing::debug!(report = ?outcome.report, "Run finished");

    if args.no_save {
        return Ok(());
    }
    if outcome.summary.is_empty() {
        println!("There's no summary to save.");
        return Ok(());
    }

    let output = match &args.output {
        Some(path) => path.clone(),
        None => {
            config
                .ensure_dirs()
                .context("Failed to create output directory")?;
            config.default_output_path(&args.input)
        }
    };
    outcome.summary.save_to(&output)?;

    match outcome.status {
        RunStatus::Completed => println!("Summary saved to: {}", output.display()),
        RunStatus::Cancelled => println!("Partial summary saved to: {}", output.display()),
    }

    Ok(())
}
