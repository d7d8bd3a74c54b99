//! Application configuration.
//!
//! The pipeline reads no ambient globals: everything configurable lives in
//! an immutable [`AppConfig`] built once at startup from the CLI (and the
//! env-backed secret flags) and passed by reference into each component.
//! Missing completion-API credentials are a fatal configuration error raised
//! here, before any work begins.

use crate::cli::Cli;
use crate::error::PipelineError;
use crate::models::FeedSource;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Browser user-agent sent with feed, article, and competitor requests.
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
AppleWebKit/605.1.15 (KHTML, like Gecko) Version/18.5 Safari/605.1.15";

/// Immutable runtime configuration, constructed once per process.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub model_id: String,
    pub api_base_url: String,

    pub output_dir: PathBuf,
    pub log_file: PathBuf,
    pub file_prefix: String,
    pub bind_addr: SocketAddr,

    pub feeds: Vec<FeedSource>,
    /// Most-recent entries taken per feed.
    pub entries_per_feed: usize,

    pub max_keywords: usize,
    pub primary_keyword_count: usize,
    pub secondary_keyword_count: usize,

    pub target_word_count: usize,
    pub target_flesch_score: f64,
    /// Scores below this trigger one enhancement pass when scoring is enabled.
    pub quality_threshold: f64,
    pub min_reading_minutes: u64,
    pub max_reading_minutes: u64,

    /// Timeout for feed, article, and competitor requests. Completion calls
    /// deliberately carry no caller-side timeout.
    pub request_timeout: Duration,

    pub enable_market_data: bool,
    pub enable_competitor_analysis: bool,
    pub enable_quality_scoring: bool,
}

impl AppConfig {
    /// Build the configuration from parsed CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Config`] when the API key or model id is
    /// missing or empty, the bind address does not parse, or the feed YAML
    /// file cannot be read or parsed.
    pub fn from_cli(cli: &Cli) -> Result<Self, PipelineError> {
        let api_key = match cli.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => key.to_string(),
            _ => {
                return Err(PipelineError::Config(
                    "DEEPSEEK_KEY must be set (env var or --api-key)".to_string(),
                ));
            }
        };
        let model_id = match cli.model_id.as_deref() {
            Some(model) if !model.trim().is_empty() => model.to_string(),
            _ => {
                return Err(PipelineError::Config(
                    "MODEL_ID must be set as a non-empty string (env var or --model-id)"
                        .to_string(),
                ));
            }
        };

        let bind_addr: SocketAddr = cli
            .bind
            .parse()
            .map_err(|e| PipelineError::Config(format!("invalid bind address {}: {e}", cli.bind)))?;

        let feeds = match cli.feeds.as_deref() {
            Some(path) => load_feeds(path)?,
            None => default_feeds(),
        };
        if feeds.is_empty() {
            return Err(PipelineError::Config(
                "feed list must contain at least one source".to_string(),
            ));
        }

        Ok(Self {
            api_key,
            model_id,
            api_base_url: cli.api_base_url.trim_end_matches('/').to_string(),
            output_dir: PathBuf::from(&cli.output_dir),
            log_file: PathBuf::from(&cli.log_file),
            file_prefix: cli.file_prefix.clone(),
            bind_addr,
            feeds,
            entries_per_feed: 3,
            max_keywords: 20,
            primary_keyword_count: 8,
            secondary_keyword_count: 7,
            target_word_count: 2000,
            target_flesch_score: 65.0,
            quality_threshold: 70.0,
            min_reading_minutes: 8,
            max_reading_minutes: 12,
            request_timeout: Duration::from_secs(15),
            enable_market_data: cli.market_data,
            enable_competitor_analysis: !cli.no_competitor_analysis,
            enable_quality_scoring: cli.quality_scoring,
        })
    }
}

/// The built-in weighted feed list.
pub fn default_feeds() -> Vec<FeedSource> {
    vec![
        FeedSource {
            name: "Cointelegraph".to_string(),
            url: "https://cointelegraph.com/rss".to_string(),
            weight: 1.0,
        },
        FeedSource {
            name: "CoinDesk".to_string(),
            url: "https://www.coindesk.com/arc/outboundfeeds/rss/".to_string(),
            weight: 0.8,
        },
        FeedSource {
            name: "Decrypt".to_string(),
            url: "https://decrypt.co/feed".to_string(),
            weight: 0.7,
        },
    ]
}

fn load_feeds(path: &str) -> Result<Vec<FeedSource>, PipelineError> {
    let raw = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&raw)
        .map_err(|e| PipelineError::Config(format!("invalid feed file {path}: {e}")))
}

/// Build the shared HTTP client used for feeds, scraping, and research calls.
pub fn build_http_client(config: &AppConfig) -> Result<reqwest::Client, PipelineError> {
    Ok(reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(config.request_timeout)
        .build()?)
}
