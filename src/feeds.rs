//! Source fetcher: polls the weighted feed list for candidate articles.
//!
//! Each feed is fetched sequentially with the shared client and parsed with
//! a small event loop over the XML (RSS `<item>` and Atom `<entry>` both
//! work). A feed that fails to fetch or parse is logged and skipped; only
//! the complete absence of candidates is a run-level failure, decided by the
//! caller.

use crate::error::PipelineError;
use crate::models::{ArticleCandidate, FeedSource};
use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::{debug, info, instrument, warn};

/// Fetch every configured feed and return candidates sorted descending by
/// source weight. The sort is stable: ties keep feed iteration order.
#[instrument(level = "info", skip_all)]
pub async fn fetch_candidates(
    http: &reqwest::Client,
    feeds: &[FeedSource],
    per_feed: usize,
) -> Vec<ArticleCandidate> {
    let mut candidates = Vec::new();

    for source in feeds {
        match fetch_feed(http, source, per_feed).await {
            Ok(entries) => {
                info!(count = entries.len(), source = %source.name, "Retrieved feed entries");
                candidates.extend(entries);
            }
            Err(e) => {
                warn!(source = %source.name, error = %e, "Failed to fetch feed; skipping");
            }
        }
    }

    candidates.sort_by(|a, b| {
        b.weight
            .partial_cmp(&a.weight)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    debug!(total = candidates.len(), "Collected article candidates");
    candidates
}

async fn fetch_feed(
    http: &reqwest::Client,
    source: &FeedSource,
    limit: usize,
) -> Result<Vec<ArticleCandidate>, PipelineError> {
    let body = http
        .get(&source.url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    parse_feed(&body, source, limit)
}

/// Parse an RSS/Atom feed body into candidates, taking at most `limit`
/// entries in document order (feeds list most-recent first).
///
/// Missing fields are defaulted: title to `"Untitled"`, link and summary to
/// empty strings.
///
/// # Errors
///
/// Returns [`PipelineError::Xml`] if the XML is malformed.
pub fn parse_feed(
    xml: &str,
    source: &FeedSource,
    limit: usize,
) -> Result<Vec<ArticleCandidate>, PipelineError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut candidates = Vec::new();
    let mut in_item = false;
    let mut current_tag = String::new();
    let mut title = String::new();
    let mut link = String::new();
    let mut summary = String::new();
    let mut published = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = std::str::from_utf8(e.name().as_ref())
                    .unwrap_or("")
                    .to_string();
                if name == "item" || name == "entry" {
                    in_item = true;
                    title.clear();
                    link.clear();
                    summary.clear();
                    published.clear();
                } else if in_item && name == "link" {
                    // Atom feeds carry the URL as an attribute
                    if let Some(href) = attr_value(&e, b"href") {
                        link = href;
                    }
                }
                current_tag = name;
            }
            Ok(Event::Empty(e)) => {
                let name = e.name();
                if in_item && name.as_ref() == b"link" {
                    if let Some(href) = attr_value(&e, b"href") {
                        link = href;
                    }
                }
            }
            Ok(Event::End(e)) => {
                let raw = e.name();
                let name = std::str::from_utf8(raw.as_ref()).unwrap_or("");
                if (name == "item" || name == "entry") && in_item {
                    in_item = false;
                    candidates.push(ArticleCandidate {
                        title: if title.is_empty() {
                            "Untitled".to_string()
                        } else {
                            title.clone()
                        },
                        url: link.clone(),
                        summary: summary.clone(),
                        source_name: source.name.clone(),
                        weight: source.weight,
                        published: if published.is_empty() {
                            None
                        } else {
                            Some(published.clone())
                        },
                    });
                    if candidates.len() >= limit {
                        break;
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if in_item {
                    let decoded = e.decode().map(|c| c.into_owned()).unwrap_or_default();
                    let text = quick_xml::escape::unescape(&decoded)
                        .map(|c| c.into_owned())
                        .unwrap_or(decoded);
                    assign_field(&current_tag, text, &mut title, &mut link, &mut summary, &mut published);
                }
            }
            Ok(Event::CData(e)) => {
                if in_item {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    assign_field(&current_tag, text, &mut title, &mut link, &mut summary, &mut published);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(PipelineError::Xml(e)),
            _ => {}
        }
    }

    Ok(candidates)
}

fn assign_field(
    tag: &str,
    text: String,
    title: &mut String,
    link: &mut String,
    summary: &mut String,
    published: &mut String,
) {
    match tag {
        "title" => *title = text,
        "link" => *link = text,
        "description" | "summary" => *summary = text,
        "pubDate" | "published" | "updated" => *published = text,
        _ => {}
    }
}

fn attr_value(e: &quick_xml::events::BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.unescape_value().ok())
        .map(|v| v.into_owned())
}
