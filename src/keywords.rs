//! Keyword research: trend suggestions plus a curated high-value list.
//!
//! Two sources feed the keyword set:
//!
//! 1. Rising query suggestions for a fixed topic list, pulled best-effort
//!    from Google's suggest endpoint. Any failure is swallowed and the topic
//!    simply contributes nothing.
//! 2. A static list of high-value crypto SEO phrases.
//!
//! The merged list is deduplicated with set semantics and capped. Sentiment
//! classification per keyword is available for logging and context.

use crate::error::PipelineError;
use crate::models::KeywordSet;
use crate::sentiment::{self, SentimentLabel};
use tracing::{debug, info, instrument, warn};

/// Topics queried against the trend service each run.
pub const TREND_TOPICS: &[&str] = &[
    "bitcoin",
    "ethereum",
    "cryptocurrency",
    "blockchain",
    "defi",
    "nft",
    "web3",
    "crypto trading",
    "altcoin",
    "bitcoin halving",
    "ethereum merge",
    "layer 2",
    "metaverse",
];

/// Curated high-value phrases that anchor the keyword set even when the
/// trend service is unreachable.
pub const HIGH_VALUE_KEYWORDS: &[&str] = &[
    "Bitcoin ETF approval bullish sentiment",
    "Ethereum staking rewards analysis",
    "DeFi yield farming strategies",
    "NFT marketplace trends 2024",
    "Layer 2 scaling solutions comparison",
    "Crypto regulation impact analysis",
    "Web3 gaming platform adoption",
    "Stablecoin market dynamics",
    "Crypto mining profitability trends",
    "Smart contract security audit",
    "Cross-chain bridge technology",
    "Metaverse crypto investment opportunities",
    "Institutional crypto adoption",
    "Central bank digital currency",
    "Crypto tax implications",
];

const TOPICS_PER_RUN: usize = 8;
const TERMS_PER_TOPIC: usize = 5;

/// Gather, deduplicate, and cap the keyword set for one run.
#[instrument(level = "info", skip_all)]
pub async fn research_keywords(http: &reqwest::Client, cap: usize) -> KeywordSet {
    let mut collected: Vec<String> = Vec::new();

    for topic in TREND_TOPICS.iter().take(TOPICS_PER_RUN) {
        match rising_queries(http, topic).await {
            Ok(terms) => {
                debug!(%topic, count = terms.len(), "Trend terms retrieved");
                collected.extend(terms.into_iter().take(TERMS_PER_TOPIC));
            }
            Err(e) => {
                warn!(%topic, error = %e, "Trend lookup failed; topic contributes nothing");
            }
        }
    }

    collected.extend(HIGH_VALUE_KEYWORDS.iter().map(|s| s.to_string()));

    let set = KeywordSet::new(collected, cap);
    for keyword in set.as_slice() {
        debug!(
            keyword = %keyword,
            sentiment = sentiment::classify(keyword).as_str(),
            "Keyword classified"
        );
    }
    info!(count = set.len(), "Keyword research complete");
    set
}

/// Query the suggest endpoint for rising terms related to `topic`.
///
/// The response shape is `[query, [suggestion, ...]]`.
async fn rising_queries(
    http: &reqwest::Client,
    topic: &str,
) -> Result<Vec<String>, PipelineError> {
    let url = format!(
        "https://suggestqueries.google.com/complete/search?client=firefox&q={}",
        urlencoding::encode(topic)
    );
    let (_, suggestions): (String, Vec<String>) = http
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(suggestions
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .collect())
}

/// Classify every keyword and tally the categories, for run logging.
pub fn sentiment_summary(keywords: &KeywordSet) -> (usize, usize, usize) {
    let mut positive = 0;
    let mut negative = 0;
    let mut neutral = 0;
    for keyword in keywords.as_slice() {
        match sentiment::classify(keyword) {
            SentimentLabel::Positive => positive += 1,
            SentimentLabel::Negative => negative += 1,
            SentimentLabel::Neutral => neutral += 1,
        }
    }
    (positive, negative, neutral)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curated_list_alone_fits_the_cap() {
        let set = KeywordSet::new(HIGH_VALUE_KEYWORDS.iter().map(|s| s.to_string()), 20);
        assert_eq!(set.len(), HIGH_VALUE_KEYWORDS.len());
        assert!(set.len() <= 20);
    }

    #[test]
    fn merged_sources_deduplicate_and_cap() {
        let mut merged: Vec<String> = vec![
            "bitcoin price".to_string(),
            "bitcoin price".to_string(),
            "eth gas fees".to_string(),
        ];
        merged.extend(HIGH_VALUE_KEYWORDS.iter().map(|s| s.to_string()));
        merged.push("Bitcoin ETF approval bullish sentiment".to_string());

        let set = KeywordSet::new(merged, 20);
        assert!(set.len() <= 20);
        let slice = set.as_slice();
        let unique: std::collections::HashSet<&String> = slice.iter().collect();
        assert_eq!(unique.len(), slice.len());
        // trend terms come before the curated list
        assert_eq!(slice[0], "bitcoin price");
    }

    #[test]
    fn sentiment_summary_tallies_every_keyword() {
        let set = KeywordSet::new(
            vec![
                "Bitcoin ETF approval bullish sentiment".to_string(),
                "exchange hack losses".to_string(),
                "stablecoin market dynamics".to_string(),
            ],
            20,
        );
        let (positive, negative, neutral) = sentiment_summary(&set);
        assert_eq!(positive + negative + neutral, 3);
        assert_eq!(positive, 1);
        assert_eq!(negative, 1);
        assert_eq!(neutral, 1);
    }
}
