//! Utility functions for string manipulation and file system checks.
//!
//! Small helpers shared across the pipeline: char-safe truncation, HTML tag
//! stripping for feed summaries, USD formatting for market context, log-file
//! tailing, and output-directory validation.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` bytes with an ellipsis and byte count
/// indicator appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let cut = s
            .char_indices()
            .take_while(|(i, _)| *i <= max)
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0);
        format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
    }
}

/// Take the first `max` characters of a string, without a marker.
///
/// Character-based rather than byte-based so multi-byte input never splits
/// mid-codepoint.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Count characters rather than bytes.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Strip HTML tags from text and decode the handful of entities that show up
/// in feed summaries.
pub fn strip_html(text: &str) -> String {
    let stripped = TAG_RE.replace_all(text, " ");
    stripped
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format a dollar amount with thousands separators and two decimals,
/// e.g. `103245.1` -> `"103,245.10"`.
pub fn format_usd(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((&formatted, "00"));
    let mut grouped = String::new();
    let digits: Vec<char> = int_part.chars().collect();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// Return the last `n` lines of `content`, joined with newlines.
pub fn tail_lines(content: &str, n: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Small sync write via std fs (simpler error surface)
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("bytes)"));
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo");
        assert_eq!(truncate_chars("short", 100), "short");
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(
            strip_html("<p>Bitcoin <b>surges</b> past $100k</p>"),
            "Bitcoin surges past $100k"
        );
        assert_eq!(strip_html("a &amp; b"), "a & b");
        assert_eq!(strip_html("plain text"), "plain text");
    }

    #[test]
    fn test_strip_html_collapses_whitespace() {
        assert_eq!(
            strip_html("<div>\n  one\n  </div><div>two</div>"),
            "one two"
        );
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(103245.1), "103,245.10");
        assert_eq!(format_usd(0.0), "0.00");
        assert_eq!(format_usd(999.999), "1,000.00");
        assert_eq!(format_usd(1234567.89), "1,234,567.89");
        assert_eq!(format_usd(-42.5), "-42.50");
    }

    #[test]
    fn test_tail_lines() {
        let content = "one\ntwo\nthree\nfour";
        assert_eq!(tail_lines(content, 2), "three\nfour");
        assert_eq!(tail_lines(content, 10), content);
        assert_eq!(tail_lines("", 5), "");
    }
}
