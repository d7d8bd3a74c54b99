//! Error taxonomy for the article pipeline.
//!
//! Configuration problems are fatal and surface before any work begins.
//! Per-source fetch failures are handled (logged and skipped) at the call
//! site and never reach this enum as a run-level failure; the variants here
//! are the ones that abort a run.

use thiserror::Error;

/// Errors that can abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Missing or invalid startup configuration (API key, model id, bind address).
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport-level HTTP failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed XML in a feed body.
    #[error("feed parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Filesystem failure while writing output or reading config.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Completion endpoint returned a non-success status.
    #[error("completion API returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The quote service answered without usable market data.
    #[error("market data error: {0}")]
    MarketData(String),

    /// Every configured feed failed; there is nothing to process.
    #[error("no article candidates available from any feed")]
    NoCandidates,

    /// Extraction and the feed-summary fallback both produced an empty body.
    #[error("no article content after extraction and feed fallback")]
    EmptyContent,

    /// The completion endpoint returned an empty draft.
    #[error("completion endpoint returned an empty draft")]
    EmptyDraft,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_displays_status_and_body() {
        let err = PipelineError::Api {
            status: 429,
            body: "rate limited".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("429"));
        assert!(msg.contains("rate limited"));
    }

    #[test]
    fn config_error_displays_reason() {
        let err = PipelineError::Config("MODEL_ID must be set".to_string());
        assert!(err.to_string().contains("MODEL_ID"));
    }
}
