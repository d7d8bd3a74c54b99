//! Competitor homepage analysis.
//!
//! Scrapes heading text from a small set of competitor homepages as a weak
//! signal of current topic coverage, and always appends a fixed list of
//! editorial "content gap" suggestions. The gaps are a nudge for the prompt,
//! not derived data, so they survive even a total scrape failure.

use crate::models::CompetitorInsights;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument};

pub const COMPETITOR_SITES: &[&str] = &[
    "cointelegraph.com",
    "coindesk.com",
    "decrypt.co",
    "bitcoin.com",
    "cryptonews.com",
];

pub const CONTENT_GAPS: &[&str] = &[
    "Technical analysis with AI predictions",
    "Regulatory impact analysis",
    "Institutional adoption trends",
    "Cross-chain interoperability",
    "DeFi risk assessment",
];

/// First N sites scraped per run; keeps the run short and under rate limits.
const SITES_PER_RUN: usize = 3;
const HEADINGS_PER_SITE: usize = 10;
const MIN_HEADING_CHARS: usize = 10;

/// Collect heading topics from competitor homepages. Per-site failures are
/// logged at debug and skipped; this function never fails.
#[instrument(level = "info", skip_all)]
pub async fn analyze_competitors(http: &reqwest::Client) -> CompetitorInsights {
    let mut insights = CompetitorInsights {
        common_topics: Vec::new(),
        content_gaps: CONTENT_GAPS.iter().map(|s| s.to_string()).collect(),
    };

    for site in COMPETITOR_SITES.iter().take(SITES_PER_RUN) {
        match fetch_homepage(http, site).await {
            Ok(html) => {
                let topics = heading_topics(&html);
                debug!(%site, count = topics.len(), "Collected competitor headings");
                insights.common_topics.extend(topics);
            }
            Err(e) => {
                debug!(%site, error = %e, "Competitor analysis failed; skipping site");
            }
        }
    }

    info!(
        sites = SITES_PER_RUN,
        topics = insights.common_topics.len(),
        "Analyzed competitor sites"
    );
    insights
}

async fn fetch_homepage(http: &reqwest::Client, site: &str) -> Result<String, reqwest::Error> {
    http.get(format!("https://{site}"))
        .send()
        .await?
        .error_for_status()?
        .text()
        .await
}

/// Pull the first headings off a homepage and keep the substantial ones.
pub fn heading_topics(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("h1, h2, h3").unwrap();
    document
        .select(&selector)
        .take(HEADINGS_PER_SITE)
        .map(|el| {
            el.text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|t| t.chars().count() > MIN_HEADING_CHARS)
        .collect()
}
