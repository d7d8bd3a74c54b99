//! SEO metadata: truncation rules, reading time, meta tags, structured data.
//!
//! Search engines truncate titles around 60 characters and descriptions
//! around 160, so both are cut with a trailing ellipsis at those bounds.
//! Everything here is pure formatting; rendering and file IO live in
//! [`super::html`].

use crate::models::MarketSnapshot;
use crate::utils::{char_len, format_usd, truncate_chars};
use serde_json::{Value, json};

const ROBOTS_DIRECTIVE: &str =
    "index, follow, max-snippet:-1, max-image-preview:large, max-video-preview:-1";

/// Search-facing metadata for one exported article.
#[derive(Debug, Clone)]
pub struct MetaTags {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub robots: &'static str,
}

/// Assemble the meta-tag set. The title is expected pre-truncated to 60
/// chars; the description is cut to 160 here.
pub fn meta_tags(title: &str, description: &str, keywords: &[String]) -> MetaTags {
    MetaTags {
        title: title.to_string(),
        description: truncate_chars(description, 160),
        keywords: keywords.join(", "),
        robots: ROBOTS_DIRECTIVE,
    }
}

/// Cut a string to `max` characters, replacing the tail with `"..."` when it
/// does not fit. A 70-character title at `max = 60` becomes 57 characters
/// plus the ellipsis.
pub fn truncate_with_ellipsis(s: &str, max: usize) -> String {
    let s = s.trim();
    if char_len(s) > max {
        format!("{}...", truncate_chars(s, max.saturating_sub(3)))
    } else {
        s.to_string()
    }
}

/// Estimated reading time in minutes: word count over 200 wpm, clamped to
/// the configured range.
pub fn reading_time_minutes(word_count: usize, min: u64, max: u64) -> u64 {
    ((word_count / 200) as u64).clamp(min, max)
}

/// Meta description for the run: the first 150 characters of the body, with
/// an ellipsis when cut.
pub fn meta_description(body: &str) -> String {
    if char_len(body) > 150 {
        format!("{}...", truncate_chars(body, 150))
    } else {
        body.to_string()
    }
}

/// Article excerpt: the first 30 words, with an ellipsis when cut.
pub fn excerpt(body: &str) -> String {
    let words: Vec<&str> = body.split_whitespace().collect();
    if words.len() > 30 {
        format!("{}...", words[..30].join(" "))
    } else {
        words.join(" ")
    }
}

/// Escape text for interpolation into HTML content and attribute values.
///
/// Generated titles and keywords are untrusted model output; an unescaped
/// quote or angle bracket would corrupt the document.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Build the schema.org Article object embedded as JSON-LD.
#[allow(clippy::too_many_arguments)]
pub fn structured_data(
    meta_title: &str,
    meta_description: &str,
    keywords: &[String],
    word_count: usize,
    reading_time: u64,
    published_iso: &str,
    slug: &str,
    market: Option<&MarketSnapshot>,
) -> Value {
    let mut data = json!({
        "@context": "https://schema.org",
        "@type": "Article",
        "headline": meta_title,
        "description": meta_description,
        "author": {
            "@type": "Person",
            "name": "Crypto Expert",
            "url": "https://example.com/author"
        },
        "publisher": {
            "@type": "Organization",
            "name": "Crypto Insights Pro",
            "logo": {
                "@type": "ImageObject",
                "url": "https://example.com/logo.png"
            }
        },
        "datePublished": published_iso,
        "dateModified": published_iso,
        "mainEntityOfPage": {
            "@type": "WebPage",
            "@id": format!("https://example.com/article/{slug}")
        },
        "articleSection": "Cryptocurrency",
        "keywords": keywords.iter().take(10).cloned().collect::<Vec<_>>().join(", "),
        "wordCount": word_count,
        "timeRequired": format!("PT{reading_time}M"),
    });

    if let Some(market) = market {
        data["about"] = json!({
            "@type": "Thing",
            "name": "Cryptocurrency Market",
            "description": format!(
                "Bitcoin: ${}, Ethereum: ${}",
                format_usd(market.bitcoin.price),
                format_usd(market.ethereum.price)
            ),
        });
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssetQuote;

    #[test]
    fn seventy_char_title_truncates_to_sixty() {
        let title = "t".repeat(70);
        let truncated = truncate_with_ellipsis(&title, 60);
        assert_eq!(truncated.chars().count(), 60);
        assert!(truncated.ends_with("..."));
        assert!(truncated.starts_with(&"t".repeat(57)));
    }

    #[test]
    fn short_title_is_untouched() {
        assert_eq!(truncate_with_ellipsis("Bitcoin Surges", 60), "Bitcoin Surges");
        let exactly = "e".repeat(60);
        assert_eq!(truncate_with_ellipsis(&exactly, 60), exactly);
    }

    #[test]
    fn two_hundred_char_description_truncates_to_160() {
        let description = "d".repeat(200);
        let truncated = truncate_with_ellipsis(&description, 160);
        assert_eq!(truncated.chars().count(), 160);
        assert!(truncated.starts_with(&"d".repeat(157)));
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn reading_time_clamps_to_floor() {
        assert_eq!(reading_time_minutes(100, 8, 12), 8);
    }

    #[test]
    fn reading_time_clamps_to_ceiling() {
        assert_eq!(reading_time_minutes(10_000, 8, 12), 12);
    }

    #[test]
    fn reading_time_in_range_passes_through() {
        assert_eq!(reading_time_minutes(2000, 8, 12), 10);
    }

    #[test]
    fn meta_description_cuts_at_150() {
        let body = "b".repeat(300);
        let description = meta_description(&body);
        assert_eq!(description.chars().count(), 153);
        assert!(description.ends_with("..."));

        assert_eq!(meta_description("short body"), "short body");
    }

    #[test]
    fn excerpt_takes_thirty_words() {
        let body = (0..50).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let ex = excerpt(&body);
        assert!(ex.ends_with("..."));
        assert_eq!(ex.split_whitespace().count(), 30);

        assert_eq!(excerpt("just a few words"), "just a few words");
    }

    #[test]
    fn escape_html_covers_dangerous_chars() {
        assert_eq!(
            escape_html(r#"<script>alert("x")</script> & 'quotes'"#),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; &#39;quotes&#39;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn structured_data_core_fields() {
        let keywords: Vec<String> = (0..12).map(|i| format!("kw{i}")).collect();
        let data = structured_data(
            "Title",
            "Description",
            &keywords,
            1500,
            9,
            "2025-01-06T14:30:00",
            "20250106T143000",
            None,
        );
        assert_eq!(data["@type"], "Article");
        assert_eq!(data["headline"], "Title");
        assert_eq!(data["wordCount"], 1500);
        assert_eq!(data["timeRequired"], "PT9M");
        assert!(data.get("about").is_none());
        // keywords capped at 10
        let kw = data["keywords"].as_str().unwrap();
        assert_eq!(kw.split(", ").count(), 10);
    }

    #[test]
    fn structured_data_market_about_block() {
        let market = MarketSnapshot {
            bitcoin: AssetQuote {
                price: 103245.5,
                change_24h: 1.0,
            },
            ethereum: AssetQuote {
                price: 3456.78,
                change_24h: -0.5,
            },
        };
        let data = structured_data(
            "T",
            "D",
            &[],
            100,
            8,
            "2025-01-06T14:30:00",
            "slug",
            Some(&market),
        );
        let about = data["about"]["description"].as_str().unwrap();
        assert!(about.contains("103,245.50"));
        assert!(about.contains("3,456.78"));
    }

    #[test]
    fn meta_tags_truncate_description() {
        let tags = meta_tags("Title", &"d".repeat(300), &["a".to_string(), "b".to_string()]);
        assert_eq!(tags.description.chars().count(), 160);
        assert_eq!(tags.keywords, "a, b");
        assert!(tags.robots.contains("index, follow"));
    }
}
