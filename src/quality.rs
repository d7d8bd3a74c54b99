//! Content quality analysis and the optional enhancement pass.
//!
//! Computes readability indices (Flesch reading ease, Gunning fog, SMOG),
//! sentence statistics, lexicon sentiment, and a sentence-variety ratio over
//! generated body text, then folds them into a single 0–100 score:
//!
//! ```text
//! score = clamp(flesch, 0, 100) * 0.4 + variety * 100 * 0.3 + (sentiment + 1) * 50 * 0.3
//! ```
//!
//! Metric computation never aborts a run: degenerate input degrades to
//! `None` with a warning. When scoring is enabled and the score falls below
//! the threshold, one enhancement completion is issued with the metrics
//! embedded as feedback; the enhanced text wins only if its recomputed score
//! is strictly higher.

use crate::api::{ChatClient, ChatMessage};
use crate::error::PipelineError;
use crate::models::QualityMetrics;
use crate::sentiment;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::{instrument, warn};

const ENHANCE_TEMPERATURE: f32 = 0.9;
const ENHANCE_MAX_TOKENS: u32 = 2500;

static SENTENCE_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

/// Compute the full metric set for a body of text.
///
/// Returns `None` (logged, never fatal) when the text has no words or no
/// sentences to measure.
pub fn analyze_content(text: &str) -> Option<QualityMetrics> {
    let word_count = text.split_whitespace().count();
    let sentences = split_sentences(text);
    let sentence_count = sentences.len();
    if word_count == 0 || sentence_count == 0 {
        warn!("Content analysis failed: nothing to measure");
        return None;
    }

    let syllable_count: usize = text.split_whitespace().map(count_syllables).sum();
    let complex_words = text
        .split_whitespace()
        .filter(|w| count_syllables(w) >= 3)
        .count();

    let words_per_sentence = word_count as f64 / sentence_count as f64;
    let syllables_per_word = syllable_count as f64 / word_count as f64;

    let flesch_score = 206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word;
    let gunning_fog =
        0.4 * (words_per_sentence + 100.0 * complex_words as f64 / word_count as f64);
    let smog_index =
        1.043 * (complex_words as f64 * 30.0 / sentence_count as f64).sqrt() + 3.1291;

    let sentence_lengths: Vec<usize> = sentences
        .iter()
        .map(|s| s.split_whitespace().count())
        .collect();
    let distinct_lengths: HashSet<usize> = sentence_lengths.iter().copied().collect();
    let sentence_variety = distinct_lengths.len() as f64 / sentence_lengths.len() as f64;

    let sentiment_score = sentiment::polarity(text);
    let subjectivity_score = sentiment::subjectivity(text);

    Some(QualityMetrics {
        flesch_score,
        gunning_fog,
        smog_index,
        word_count,
        sentence_count,
        avg_sentence_length: words_per_sentence,
        sentiment_score,
        subjectivity_score,
        sentence_variety,
        quality_score: quality_score(flesch_score, sentence_variety, sentiment_score),
    })
}

/// Weighted 0–100 aggregate: 40% readability, 30% variety, 30% sentiment
/// shifted to a positive scale. Rounded to two decimals.
pub fn quality_score(flesch_score: f64, sentence_variety: f64, sentiment_score: f64) -> f64 {
    let flesch_norm = flesch_score.clamp(0.0, 100.0);
    let variety_norm = sentence_variety * 100.0;
    let sentiment_norm = (sentiment_score + 1.0) * 50.0;
    let score = flesch_norm * 0.4 + variety_norm * 0.3 + sentiment_norm * 0.3;
    (score * 100.0).round() / 100.0
}

/// Issue the single enhancement completion with metrics as feedback.
///
/// # Errors
///
/// Completion errors propagate, consistent with the generation stages.
#[instrument(level = "info", skip_all, fields(score = metrics.quality_score))]
pub async fn enhance_content(
    chat: &ChatClient,
    body: &str,
    metrics: &QualityMetrics,
) -> Result<String, PipelineError> {
    let prompt = format!(
        r#"
Enhance this article to improve its quality score (current: {score}/100). Target: 80+.

Current metrics:
- Flesch score: {flesch:.1}
- Sentence variety: {variety:.2}
- Sentiment: {sentiment:.2}

Improve:
- Readability and flow
- Sentence structure variety
- Technical accuracy
- Engagement and insights

Content:
{body}
"#,
        score = metrics.quality_score,
        flesch = metrics.flesch_score,
        variety = metrics.sentence_variety,
        sentiment = metrics.sentiment_score,
    );

    chat.complete(
        &[ChatMessage::user(&prompt)],
        ENHANCE_TEMPERATURE,
        ENHANCE_MAX_TOKENS,
    )
    .await
}

fn split_sentences(text: &str) -> Vec<&str> {
    SENTENCE_SPLIT_RE
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Heuristic syllable counter: vowel groups, minus a silent trailing `e`,
/// floor of one per word.
fn count_syllables(word: &str) -> usize {
    let cleaned: String = word
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_lowercase();
    if cleaned.is_empty() {
        return 0;
    }

    let mut count = 0;
    let mut prev_vowel = false;
    for c in cleaned.chars() {
        let is_vowel = matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
        if is_vowel && !prev_vowel {
            count += 1;
        }
        prev_vowel = is_vowel;
    }
    if cleaned.ends_with('e') && !cleaned.ends_with("le") && count > 1 {
        count -= 1;
    }
    count.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_score_formula() {
        assert_eq!(quality_score(65.0, 0.8, 0.2), 68.0);
    }

    #[test]
    fn quality_score_clamps_flesch() {
        // flesch over 100 contributes at most 40 points
        assert_eq!(quality_score(150.0, 0.0, -1.0), 40.0);
        // negative flesch contributes nothing
        assert_eq!(quality_score(-20.0, 1.0, 1.0), 60.0);
    }

    #[test]
    fn syllable_counts_are_sane() {
        assert_eq!(count_syllables("cat"), 1);
        assert_eq!(count_syllables("bitcoin"), 2);
        assert_eq!(count_syllables("ethereum"), 3);
        assert_eq!(count_syllables("rate"), 1);
        assert_eq!(count_syllables("cryptocurrency"), 5);
        assert_eq!(count_syllables(""), 0);
        assert_eq!(count_syllables("1000"), 0);
    }

    #[test]
    fn sentence_splitting() {
        let sentences = split_sentences("One here. Two there! Three? ");
        assert_eq!(sentences, vec!["One here", "Two there", "Three"]);
    }

    #[test]
    fn analyze_returns_none_for_empty_text() {
        assert!(analyze_content("").is_none());
        assert!(analyze_content("   \n  ").is_none());
    }

    #[test]
    fn analyze_populates_counts() {
        let text = "Bitcoin rose sharply today. Traders cheered the rally across markets. \
Analysts expect further gains soon.";
        let metrics = analyze_content(text).unwrap();
        assert_eq!(metrics.sentence_count, 3);
        assert_eq!(metrics.word_count, 15);
        assert!(metrics.avg_sentence_length > 4.0);
        assert!(metrics.quality_score > 0.0 && metrics.quality_score <= 100.0);
        assert!(metrics.sentence_variety > 0.0 && metrics.sentence_variety <= 1.0);
    }

    #[test]
    fn uniform_sentences_score_low_variety() {
        let text = "One two three four. Five six seven eight. Nine ten eleven twelve.";
        let metrics = analyze_content(text).unwrap();
        // all sentences are four words: one distinct length over three sentences
        assert!((metrics.sentence_variety - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn positive_text_scores_positive_sentiment() {
        let text = "Markets rally on approval. Gains continue. Strong growth ahead.";
        let metrics = analyze_content(text).unwrap();
        assert!(metrics.sentiment_score > 0.0);
    }
}
