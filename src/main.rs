//! # Daily News Report
//!
//! Collects articles from Korean news feeds, sorts them into keyword reports,
//! summarizes each matching article in one sentence with an LLM, and writes
//! every non-empty report as a standalone HTML page.
//!
//! ## Usage
//!
//! ```sh
//! OPENAI_API_KEY=sk-... daily_news_report -o ./reports
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Collecting**: Read each feed and list up to N entries per feed
//! 2. **Fetching**: Download and extract article pages (bounded parallelism, 10 at a time by default)
//! 3. **Classifying**: Match articles against each report's keywords
//! 4. **Summarizing**: One LLM call per matched article, sequentially
//! 5. **Output**: Write one HTML file per non-empty report

use chrono::Local;
use clap::Parser;
use dotenvy::dotenv;
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod http;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;

use api::ChatSummarizer;
use cli::Cli;
use config::Settings;
use http::HttpFetcher;
use pipeline::{PipelineOptions, ReportOutcome};
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("Starting daily report generation");

    // .env supplies OPENAI_API_KEY and friends to the clap env fallbacks
    dotenv().ok();

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.config, %args.output_dir, ?args.publish_dir, "Parsed CLI arguments");

    // ---- Configuration: anything wrong here stops the run before fetching ----
    let Some(api_key) = args.api_key() else {
        error!("OPENAI_API_KEY is not set. Set it in your .env file or pass --api-key");
        return Ok(());
    };

    let settings = match Settings::load(args.config.as_deref()).await {
        Ok(settings) => settings,
        Err(e) => {
            error!(config = ?args.config, error = %e, "Failed to load report settings");
            return Err(e);
        }
    };

    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let timeout = Duration::from_secs(args.request_timeout_secs.max(1));
    let fetcher = HttpFetcher::new(timeout)?;
    let summarizer = ChatSummarizer::new(&args.api_base, api_key, &args.model, timeout)?;
    info!(model = %args.model, api_base = %args.api_base, "Summarization client ready");

    let options = PipelineOptions {
        max_articles_per_feed: args.max_articles_per_feed.max(1),
        max_concurrent_workers: args.max_concurrent_workers.max(1),
        output_dir: PathBuf::from(&args.output_dir),
        publish_dir: args.publish_dir.as_ref().map(PathBuf::from),
        today: Local::now().date_naive(),
    };

    // ---- Run ----
    let summary = pipeline::run(&settings, &fetcher, &summarizer, &options).await;

    for (name, outcome) in &summary.reports {
        match outcome {
            ReportOutcome::Written { path, items } => {
                info!(report = %name, path = %path.display(), items, "Report written")
            }
            ReportOutcome::Skipped { matched } => {
                info!(report = %name, matched, "Report skipped: nothing to render")
            }
            ReportOutcome::Failed { error } => {
                error!(report = %name, %error, "Report could not be written")
            }
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        entries = summary.entries,
        articles = summary.articles,
        reports_written = summary.written(),
        reports_total = summary.reports.len(),
        "All reports processed"
    );

    Ok(())
}
