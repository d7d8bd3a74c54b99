//! # Coinscribe
//!
//! A content-generation pipeline for cryptocurrency news: polls weighted
//! RSS feeds, extracts the top article, researches SEO keywords, drafts and
//! paraphrases an article through an OpenAI-compatible completion API, and
//! exports a self-contained HTML document with embedded SEO metadata.
//!
//! ## Usage
//!
//! ```sh
//! # One pipeline run
//! DEEPSEEK_KEY=... MODEL_ID=... coinscribe -o ./exports
//!
//! # HTTP wrapper (POST /generate, GET /logs)
//! DEEPSEEK_KEY=... MODEL_ID=... coinscribe --serve --bind 0.0.0.0:8000
//! ```
//!
//! ## Architecture
//!
//! One run walks the pipeline in order:
//! 1. **Feeds**: fetch candidates from every configured source, pick the
//!    highest-weight entry
//! 2. **Extraction**: scrape title/body via ordered selector strategies,
//!    falling back to the feed summary
//! 3. **Research**: trend keywords, optional market data, optional
//!    competitor topics
//! 4. **Generation**: draft, then paraphrase, through the completion API
//! 5. **Export**: render and write one timestamp-named HTML file

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, error, info};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod error;
mod feeds;
mod generate;
mod keywords;
mod market;
mod models;
mod outputs;
mod pipeline;
mod prompt;
mod quality;
mod scrapers;
mod sentiment;
mod server;
mod utils;

use api::ChatClient;
use cli::Cli;
use config::AppConfig;
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();

    // --- Tracing init: stdout plus the append-only log file that /logs tails ---
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&args.log_file)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stdout.and(Arc::new(log_file)))
        .init();

    let start_time = std::time::Instant::now();
    info!("coinscribe starting up");
    debug!(?args.output_dir, serve = args.serve, "Parsed CLI arguments");

    let config = match AppConfig::from_cli(&args) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    // Early check: ensure the export directory is writable
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let http = config::build_http_client(&config)?;
    let chat = ChatClient::new(&config);

    if args.serve {
        server::serve(config, http, chat).await?;
    } else {
        let outcome = pipeline::run(&config, &http, &chat).await?;
        info!(
            path = %outcome.document.path.display(),
            title = %outcome.title,
            keywords = outcome.keywords.len(),
            "Run complete"
        );
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
