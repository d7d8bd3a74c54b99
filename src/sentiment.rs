//! Lexicon-based sentiment scoring for crypto news text.
//!
//! Keys are lowercase single words. Weights in `(0.0, 1.0]` are positive,
//! in `[-1.0, 0.0)` are negative. Polarity is the average weight of matched
//! words so that a single strong word classifies a short keyword phrase.

/// Domain word weights.
pub(crate) const LEXICON: &[(&str, f64)] = &[
    // Positive signals
    ("bullish", 0.6),
    ("surge", 0.5),
    ("surges", 0.5),
    ("rally", 0.5),
    ("gain", 0.4),
    ("gains", 0.4),
    ("growth", 0.4),
    ("adoption", 0.4),
    ("approval", 0.5),
    ("approved", 0.5),
    ("record", 0.3),
    ("soar", 0.6),
    ("soars", 0.6),
    ("breakthrough", 0.5),
    ("opportunity", 0.4),
    ("opportunities", 0.4),
    ("profit", 0.4),
    ("profitability", 0.3),
    ("rewards", 0.3),
    ("win", 0.4),
    ("success", 0.4),
    ("strong", 0.3),
    ("positive", 0.4),
    ("best", 0.5),
    // Negative signals
    ("bearish", -0.6),
    ("crash", -0.7),
    ("crashes", -0.7),
    ("plunge", -0.6),
    ("plunges", -0.6),
    ("dump", -0.5),
    ("selloff", -0.5),
    ("hack", -0.7),
    ("hacked", -0.7),
    ("scam", -0.8),
    ("fraud", -0.8),
    ("ban", -0.6),
    ("banned", -0.6),
    ("lawsuit", -0.5),
    ("collapse", -0.7),
    ("risk", -0.3),
    ("risks", -0.3),
    ("fear", -0.4),
    ("loss", -0.4),
    ("losses", -0.4),
    ("warning", -0.4),
    ("crackdown", -0.5),
    ("weak", -0.3),
    ("negative", -0.4),
    ("worst", -0.6),
];

/// Sentiment category for a keyword, at a fixed ±0.1 polarity threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }
}

/// Average lexicon weight of matched words, in `[-1.0, 1.0]`.
/// `0.0` for empty text or text with no lexicon hits.
pub fn polarity(text: &str) -> f64 {
    let mut total = 0.0_f64;
    let mut matched = 0usize;
    for word in words(text) {
        if let Some(weight) = lookup(&word) {
            total += weight;
            matched += 1;
        }
    }
    if matched == 0 {
        0.0
    } else {
        (total / matched as f64).clamp(-1.0, 1.0)
    }
}

/// Fraction of words carrying any lexicon weight, in `[0.0, 1.0]`. Used as
/// a rough stand-in for subjectivity: opinionated text leans on charged
/// vocabulary.
pub fn subjectivity(text: &str) -> f64 {
    let mut total = 0usize;
    let mut matched = 0usize;
    for word in words(text) {
        total += 1;
        if lookup(&word).is_some() {
            matched += 1;
        }
    }
    if total == 0 {
        0.0
    } else {
        matched as f64 / total as f64
    }
}

/// Classify a keyword phrase into positive/negative/neutral.
pub fn classify(text: &str) -> SentimentLabel {
    let p = polarity(text);
    if p > 0.1 {
        SentimentLabel::Positive
    } else if p < -0.1 {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace().map(|w| {
        w.trim_matches(|c: char| !c.is_alphabetic())
            .to_lowercase()
    })
}

fn lookup(word: &str) -> Option<f64> {
    LEXICON
        .iter()
        .find(|(lex_word, _)| *lex_word == word)
        .map(|(_, weight)| *weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_zero() {
        assert_eq!(polarity(""), 0.0);
        assert_eq!(subjectivity(""), 0.0);
    }

    #[test]
    fn unknown_words_are_neutral() {
        assert_eq!(polarity("the protocol upgrade shipped"), 0.0);
        assert_eq!(classify("blockchain infrastructure"), SentimentLabel::Neutral);
    }

    #[test]
    fn positive_phrase_classifies_positive() {
        assert_eq!(
            classify("Bitcoin ETF approval bullish sentiment"),
            SentimentLabel::Positive
        );
    }

    #[test]
    fn negative_phrase_classifies_negative() {
        assert_eq!(classify("exchange hack and fraud"), SentimentLabel::Negative);
    }

    #[test]
    fn punctuation_does_not_block_matches() {
        assert!(polarity("Markets rally, bulls win!") > 0.0);
    }

    #[test]
    fn polarity_is_clamped() {
        let p = polarity("scam fraud collapse crash");
        assert!((-1.0..=1.0).contains(&p));
        assert!(p < -0.1);
    }

    #[test]
    fn subjectivity_is_a_ratio() {
        // one charged word out of four
        let s = subjectivity("the market saw gains today");
        assert!(s > 0.0 && s < 1.0);
    }
}
