//! Data models for the article-generation pipeline.
//!
//! This module defines the typed records that flow through a single run:
//! - [`FeedSource`]: static weighted feed configuration
//! - [`ArticleCandidate`]: one feed entry, ordered by source weight
//! - [`ExtractedArticle`]: scraped title/body for the selected candidate
//! - [`KeywordSet`]: deduplicated, capped SEO keyword list
//! - [`GenerationContext`]: everything the prompt builder consumes
//! - [`GeneratedArticle`]: the LLM output split into title and body
//! - [`QualityMetrics`]: derived readability/sentiment statistics
//! - [`ExportedDocument`]: the terminal on-disk artifact
//!
//! Every record is created and consumed within one run; nothing here is
//! shared across runs.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A weighted RSS/Atom feed to poll for candidate articles.
///
/// Weights are in `(0.0, 1.0]` and decide which source's article is selected
/// when more than one feed is reachable. The list is fixed for the process
/// lifetime: built once at startup, either from the defaults or from a YAML
/// file, and never mutated.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedSource {
    /// Human-readable source name, used in logs and candidate records.
    pub name: String,
    /// The feed endpoint URL.
    pub url: String,
    /// Selection weight in `(0.0, 1.0]`; higher wins.
    pub weight: f64,
}

/// One entry pulled from a feed, annotated with its source's weight.
///
/// Missing fields are defaulted at parse time: title to `"Untitled"`, link
/// and summary to empty strings. Candidates are sorted descending by weight
/// with a stable sort, so ties keep feed iteration order.
#[derive(Debug, Clone)]
pub struct ArticleCandidate {
    pub title: String,
    pub url: String,
    pub summary: String,
    pub source_name: String,
    pub weight: f64,
    /// Publication timestamp as the feed printed it, if present.
    pub published: Option<String>,
}

impl ArticleCandidate {
    /// Extract the registrable domain label from the candidate URL, e.g.
    /// `https://www.coindesk.com/markets/...` -> `coindesk`. Used for log
    /// fields; `None` when the URL is missing or unparseable.
    pub fn source_domain(&self) -> Option<String> {
        let parsed = url::Url::parse(&self.url).ok()?;
        let host = parsed.host_str()?;
        let parts: Vec<&str> = host.split('.').collect();
        if parts.len() >= 2 {
            Some(parts[parts.len() - 2].to_string())
        } else {
            None
        }
    }
}

/// The selected article after content extraction.
///
/// An empty `body` is a hard failure for the URL and triggers the
/// feed-summary fallback in the extractor; by the time a run proceeds past
/// extraction the body is guaranteed non-empty.
#[derive(Debug, Clone)]
pub struct ExtractedArticle {
    pub title: String,
    pub body: String,
    pub url: String,
}

impl ExtractedArticle {
    /// The worst-case record: extraction and every fallback failed.
    pub fn empty(url: &str) -> Self {
        Self {
            title: "Untitled".to_string(),
            body: String::new(),
            url: url.to_string(),
        }
    }
}

/// A deduplicated, capped sequence of SEO keywords.
///
/// Duplicates are removed with case-sensitive set semantics; the first
/// occurrence wins, and the set is truncated to the configured cap. Callers
/// must not rely on any particular ordering beyond "primary before
/// secondary".
#[derive(Debug, Clone)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    pub fn new(raw: impl IntoIterator<Item = String>, cap: usize) -> Self {
        let keywords = raw.into_iter().unique().take(cap).collect();
        Self { keywords }
    }

    /// The first `k` keywords, woven prominently into the prompt.
    pub fn primary(&self, k: usize) -> &[String] {
        &self.keywords[..self.keywords.len().min(k)]
    }

    /// The `m` keywords after the primary slice.
    pub fn secondary(&self, k: usize, m: usize) -> &[String] {
        let start = self.keywords.len().min(k);
        let end = self.keywords.len().min(k + m);
        &self.keywords[start..end]
    }

    /// The first `n` keywords, for export metadata.
    pub fn top(&self, n: usize) -> &[String] {
        &self.keywords[..self.keywords.len().min(n)]
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.keywords
    }
}

/// Live BTC/ETH quote used to ground the prompt and the export in current
/// market conditions. Best-effort: absent when the quote service is down or
/// market data is disabled.
#[derive(Debug, Clone)]
pub struct MarketSnapshot {
    pub bitcoin: AssetQuote,
    pub ethereum: AssetQuote,
}

/// Price and 24-hour change for one asset.
#[derive(Debug, Clone)]
pub struct AssetQuote {
    pub price: f64,
    pub change_24h: f64,
}

/// Weak topic-coverage signal scraped from competitor homepages, plus the
/// fixed editorial content-gap suggestions. The gaps are always present even
/// when every scrape fails.
#[derive(Debug, Clone, Default)]
pub struct CompetitorInsights {
    pub common_topics: Vec<String>,
    pub content_gaps: Vec<String>,
}

/// Everything the prompt builder needs for one run. Built fresh per run and
/// discarded afterwards.
#[derive(Debug)]
pub struct GenerationContext {
    pub article: ExtractedArticle,
    pub primary_keywords: Vec<String>,
    pub secondary_keywords: Vec<String>,
    pub market: Option<MarketSnapshot>,
    pub competitors: Option<CompetitorInsights>,
}

/// The LLM output split into a headline and body.
///
/// The title is non-empty by construction: [`GeneratedArticle::new`] falls
/// back to `"Untitled"` rather than admit an empty headline.
#[derive(Debug, Clone)]
pub struct GeneratedArticle {
    pub title: String,
    pub body: String,
}

impl GeneratedArticle {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        let title = title.into();
        let title = if title.trim().is_empty() {
            "Untitled".to_string()
        } else {
            title.trim().to_string()
        };
        Self {
            title,
            body: body.into(),
        }
    }

    pub fn word_count(&self) -> usize {
        self.body.split_whitespace().count()
    }
}

/// Readability, sentiment, and variety statistics for a generated body.
///
/// Purely derived and read-only; computation failures degrade to absence,
/// never to a run failure.
#[derive(Debug, Clone, Serialize)]
pub struct QualityMetrics {
    pub flesch_score: f64,
    pub gunning_fog: f64,
    pub smog_index: f64,
    pub word_count: usize,
    pub sentence_count: usize,
    pub avg_sentence_length: f64,
    pub sentiment_score: f64,
    pub subjectivity_score: f64,
    /// Distinct sentence lengths divided by total sentences, in `[0, 1]`.
    pub sentence_variety: f64,
    /// Weighted 0–100 aggregate of readability, variety, and sentiment.
    pub quality_score: f64,
}

/// The terminal artifact of a run: one self-contained HTML file, named by
/// timestamp, never overwritten or deleted by this system.
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub path: PathBuf,
    pub html: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_set_deduplicates_case_sensitively() {
        let set = KeywordSet::new(
            vec![
                "bitcoin".to_string(),
                "Bitcoin".to_string(),
                "bitcoin".to_string(),
                "ethereum".to_string(),
            ],
            20,
        );
        assert_eq!(set.len(), 3);
        assert_eq!(set.as_slice(), &["bitcoin", "Bitcoin", "ethereum"]);
    }

    #[test]
    fn keyword_set_caps_length() {
        let raw = (0..30).map(|i| format!("kw{i}"));
        let set = KeywordSet::new(raw, 20);
        assert_eq!(set.len(), 20);
    }

    #[test]
    fn keyword_partitions_do_not_overlap() {
        let raw = (0..15).map(|i| format!("kw{i}")).collect::<Vec<_>>();
        let set = KeywordSet::new(raw, 20);
        assert_eq!(set.primary(8).len(), 8);
        assert_eq!(set.secondary(8, 7).len(), 7);
        assert_eq!(set.primary(8).last().unwrap(), "kw7");
        assert_eq!(set.secondary(8, 7).first().unwrap(), "kw8");
    }

    #[test]
    fn keyword_partitions_clamp_on_short_sets() {
        let set = KeywordSet::new(vec!["a".to_string(), "b".to_string()], 20);
        assert_eq!(set.primary(8).len(), 2);
        assert!(set.secondary(8, 7).is_empty());
    }

    #[test]
    fn generated_article_title_never_empty() {
        let article = GeneratedArticle::new("   ", "body");
        assert_eq!(article.title, "Untitled");

        let article = GeneratedArticle::new("  Bitcoin Surges  ", "body");
        assert_eq!(article.title, "Bitcoin Surges");
    }

    #[test]
    fn feed_source_deserializes_from_yaml() {
        let yaml = r#"
- name: Cointelegraph
  url: https://cointelegraph.com/rss
  weight: 1.0
- name: Decrypt
  url: https://decrypt.co/feed
  weight: 0.7
"#;
        let feeds: Vec<FeedSource> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(feeds.len(), 2);
        assert_eq!(feeds[0].name, "Cointelegraph");
        assert!((feeds[1].weight - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn source_domain_from_candidate_url() {
        let candidate = ArticleCandidate {
            title: "t".to_string(),
            url: "https://www.coindesk.com/markets/2025/01/06/btc".to_string(),
            summary: String::new(),
            source_name: "CoinDesk".to_string(),
            weight: 0.8,
            published: None,
        };
        assert_eq!(candidate.source_domain(), Some("coindesk".to_string()));

        let empty_url = ArticleCandidate {
            url: String::new(),
            ..candidate
        };
        assert_eq!(empty_url.source_domain(), None);
    }

    #[test]
    fn extracted_article_empty_worst_case() {
        let article = ExtractedArticle::empty("https://example.com/a");
        assert_eq!(article.title, "Untitled");
        assert!(article.body.is_empty());
        assert_eq!(article.url, "https://example.com/a");
    }
}
