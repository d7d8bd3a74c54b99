//! Command-line interface definitions.
//!
//! All options can be provided via command-line flags; the completion-API
//! secrets can also come from environment variables.

use clap::Parser;

/// Command-line arguments for the article generator.
///
/// # Examples
///
/// ```sh
/// # Generate one article into ./exports
/// coinscribe --output-dir ./exports
///
/// # Run the HTTP wrapper instead of a single pipeline run
/// coinscribe --serve --bind 0.0.0.0:8000
///
/// # Use a custom feed list
/// coinscribe --feeds ./feeds.yaml --quality-scoring
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for exported HTML articles
    #[arg(short, long, default_value = "exports")]
    pub output_dir: String,

    /// Append-only log file, tailed by the /logs endpoint
    #[arg(long, default_value = "app.log")]
    pub log_file: String,

    /// Filename prefix for exported articles
    #[arg(long, default_value = "article")]
    pub file_prefix: String,

    /// API key for the completion provider
    #[arg(long, env = "DEEPSEEK_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model identifier sent to the completion provider
    #[arg(long, env = "MODEL_ID")]
    pub model_id: Option<String>,

    /// Base URL of the OpenAI-compatible completion API
    #[arg(long, env = "LLM_BASE_URL", default_value = "https://openrouter.ai/api/v1")]
    pub api_base_url: String,

    /// Optional YAML file with the weighted feed list (name/url/weight entries)
    #[arg(long)]
    pub feeds: Option<String>,

    /// Run the HTTP wrapper instead of a single pipeline run
    #[arg(long)]
    pub serve: bool,

    /// Bind address for the HTTP wrapper
    #[arg(long, default_value = "0.0.0.0:8000")]
    pub bind: String,

    /// Fetch live BTC/ETH market data into the prompt and export
    #[arg(long)]
    pub market_data: bool,

    /// Skip the competitor homepage analysis
    #[arg(long)]
    pub no_competitor_analysis: bool,

    /// Score generated content and re-generate once when it scores below
    /// the quality threshold
    #[arg(long)]
    pub quality_scoring: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["coinscribe"]);
        assert_eq!(cli.output_dir, "exports");
        assert_eq!(cli.log_file, "app.log");
        assert_eq!(cli.file_prefix, "article");
        assert!(!cli.serve);
        assert!(!cli.market_data);
        assert!(!cli.no_competitor_analysis);
        assert!(!cli.quality_scoring);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "coinscribe",
            "-o",
            "/tmp/out",
            "--serve",
            "--bind",
            "127.0.0.1:9000",
            "--api-key",
            "sk-test",
            "--model-id",
            "some/model",
        ]);
        assert_eq!(cli.output_dir, "/tmp/out");
        assert!(cli.serve);
        assert_eq!(cli.bind, "127.0.0.1:9000");
        assert_eq!(cli.api_key.as_deref(), Some("sk-test"));
        assert_eq!(cli.model_id.as_deref(), Some("some/model"));
    }
}
