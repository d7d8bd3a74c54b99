//! Content extractor for the selected article URL.
//!
//! Extraction is a two-tier strategy and the only resilience mechanism this
//! system has against markup drift on external sites:
//!
//! 1. Fetch the page and try an ordered list of title selectors and an
//!    ordered list of paragraph selectors; the first selector producing a
//!    non-empty match wins.
//! 2. If the fetch fails or no selector matches any content, walk the
//!    configured feeds and return the first feed's first entry summary
//!    (HTML-stripped) in place of the page body.
//!
//! [`extract_article`] never fails; the worst case is an `"Untitled"` record
//! with an empty body, which the pipeline treats as a terminal condition.

use crate::error::PipelineError;
use crate::feeds;
use crate::models::{ExtractedArticle, FeedSource};
use scraper::{Html, Selector};
use tracing::{debug, info, instrument, warn};

/// Title selectors, most specific page layouts first.
pub const TITLE_SELECTORS: &[&str] = &["h1", ".post-title", ".article-title", "title"];

/// Paragraph selectors covering the common article body layouts.
pub const CONTENT_SELECTORS: &[&str] = &[
    "div.post-content p",
    "article p",
    ".article-content p",
    ".post-body p",
    ".entry-content p",
];

const ACCEPT_HEADER: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Extract title and body text for `url`, falling back to the feed summary.
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn extract_article(
    http: &reqwest::Client,
    url: &str,
    feeds: &[FeedSource],
) -> ExtractedArticle {
    match fetch_and_scrape(http, url).await {
        Ok(article) if !article.body.is_empty() => {
            info!(bytes = article.body.len(), "Extracted article content");
            article
        }
        Ok(_) => {
            warn!("Scrape produced no content; falling back to feed summary");
            feed_summary_fallback(http, feeds, url).await
        }
        Err(e) => {
            warn!(error = %e, "Full fetch failed; falling back to feed summary");
            feed_summary_fallback(http, feeds, url).await
        }
    }
}

async fn fetch_and_scrape(
    http: &reqwest::Client,
    url: &str,
) -> Result<ExtractedArticle, PipelineError> {
    let body = http
        .get(url)
        .header(reqwest::header::ACCEPT, ACCEPT_HEADER)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    // Parse in a block so the non-Send document never lives across an await.
    let (title, content) = {
        let document = Html::parse_document(&body);
        (first_title_match(&document), first_content_match(&document))
    };

    Ok(ExtractedArticle {
        title: title.unwrap_or_else(|| "Untitled".to_string()),
        body: content.unwrap_or_default(),
        url: url.to_string(),
    })
}

/// First title selector that yields non-empty text.
pub fn first_title_match(document: &Html) -> Option<String> {
    TITLE_SELECTORS
        .iter()
        .find_map(|css| title_strategy(document, css))
}

/// One title strategy: text of the first element matching `css`, if any.
pub fn title_strategy(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
}

/// First paragraph selector whose matches join into non-empty body text.
pub fn first_content_match(document: &Html) -> Option<String> {
    CONTENT_SELECTORS
        .iter()
        .find_map(|css| content_strategy(document, css))
}

/// One content strategy: all matched paragraph texts joined with blank lines.
pub fn content_strategy(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    let paragraphs: Vec<String> = document
        .select(&selector)
        .map(element_text)
        .filter(|p| !p.is_empty())
        .collect();
    if paragraphs.is_empty() {
        None
    } else {
        Some(paragraphs.join("\n\n"))
    }
}

fn element_text(element: scraper::ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Walk the configured feeds in order and take the first reachable feed's
/// first entry as a stand-in article. Later feeds cover the first one being
/// down.
async fn feed_summary_fallback(
    http: &reqwest::Client,
    sources: &[FeedSource],
    url: &str,
) -> ExtractedArticle {
    for source in sources {
        match first_feed_entry(http, source).await {
            Ok(Some(entry)) => {
                debug!(source = %source.name, "Using feed summary as article body");
                return ExtractedArticle {
                    title: entry.title,
                    body: crate::utils::strip_html(&entry.summary),
                    url: url.to_string(),
                };
            }
            Ok(None) => continue,
            Err(e) => {
                debug!(source = %source.name, error = %e, "Fallback feed failed; trying next");
            }
        }
    }
    ExtractedArticle::empty(url)
}

async fn first_feed_entry(
    http: &reqwest::Client,
    source: &FeedSource,
) -> Result<Option<crate::models::ArticleCandidate>, PipelineError> {
    let body = http
        .get(&source.url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(feeds::parse_feed(&body, source, 1)?.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn h1_wins_over_later_title_selectors() {
        let html = r#"<html><head><title>Page Title</title></head>
<body><h1>Headline</h1><div class="post-title">Other</div></body></html>"#;
        let document = Html::parse_document(html);
        assert_eq!(first_title_match(&document).unwrap(), "Headline");
    }

    #[test]
    fn title_falls_through_to_document_title() {
        let html = "<html><head><title>Only Title</title></head><body><p>x</p></body></html>";
        let document = Html::parse_document(html);
        assert_eq!(first_title_match(&document).unwrap(), "Only Title");
    }

    #[test]
    fn no_title_anywhere_is_none() {
        let document = Html::parse_document("<html><body><p>x</p></body></html>");
        assert_eq!(first_title_match(&document), None);
    }

    #[test]
    fn post_content_wins_over_article_paragraphs() {
        let html = r#"<html><body>
<div class="post-content"><p>First para.</p><p>Second para.</p></div>
<article><p>Should not appear</p></article>
</body></html>"#;
        let document = Html::parse_document(html);
        let body = first_content_match(&document).unwrap();
        assert_eq!(body, "First para.\n\nSecond para.");
    }

    #[test]
    fn empty_paragraphs_are_dropped() {
        let html = r#"<article><p>  </p><p>Real text</p><p></p></article>"#;
        let document = Html::parse_document(html);
        assert_eq!(first_content_match(&document).unwrap(), "Real text");
    }

    #[test]
    fn content_strategy_miss_returns_none() {
        let document = Html::parse_document("<html><body><div>no paragraphs</div></body></html>");
        assert_eq!(first_content_match(&document), None);
    }

    #[test]
    fn whitespace_inside_elements_is_collapsed() {
        let html = "<article><p>Bitcoin\n   surges   again</p></article>";
        let document = Html::parse_document(html);
        assert_eq!(
            first_content_match(&document).unwrap(),
            "Bitcoin surges again"
        );
    }
}
