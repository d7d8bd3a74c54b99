//! Prompt builder: assembles the generation instruction set.
//!
//! A pure function from [`GenerationContext`] to a single instruction
//! string. No network or state access; identical inputs produce a
//! byte-identical prompt. Market and competitor blocks appear only when
//! those inputs are present, and the source article is truncated to a fixed
//! prefix to bound prompt size.

use crate::config::AppConfig;
use crate::models::{CompetitorInsights, GenerationContext, MarketSnapshot};
use crate::utils::{format_usd, truncate_chars};
use std::fmt::Write;

/// Characters of the source article carried into the prompt.
const SOURCE_PREFIX_CHARS: usize = 500;

/// Build the full generation prompt for one run.
pub fn build_prompt(ctx: &GenerationContext, config: &AppConfig) -> String {
    let primary = ctx.primary_keywords.join(", ");
    let secondary = ctx.secondary_keywords.join(", ");

    let market_context = ctx
        .market
        .as_ref()
        .map(market_block)
        .unwrap_or_default();
    let competitor_context = ctx
        .competitors
        .as_ref()
        .map(competitor_block)
        .unwrap_or_default();

    format!(
        r#"
You are a professional financial journalist writing for a leading global news outlet (e.g., Reuters, Bloomberg, CoinDesk). Write a comprehensive, objective, and authoritative news article or report on the topic below.

STYLE & TONE:
- Use a formal, journalistic, and objective tone
- Avoid casual language, slang, contractions, and rhetorical questions
- Do not use personal anecdotes or speculation
- Focus on facts, data, and expert analysis
- Use clear, concise, and precise language
- Structure the article as a news report: headline, summary (lede), body with subheadings, data, quotes from experts or sources, and a conclusion
- Attribute information to sources where possible
- Maintain neutrality and avoid personal opinions
- Vary sentence structure and length, occasionally use passive voice

SEO REQUIREMENTS:
- Naturally include these keywords: {primary}
- Sprinkle in these secondary terms: {secondary}
- Target: {word_count} words
- Use 4-5 H2 subheadings naturally
- Start with a clear, informative headline
- Begin with a concise summary paragraph (lede)
- End with a conclusion or outlook

CONTENT REQUIREMENTS:
- Present the latest developments and context
- Integrate relevant data and statistics
- Include at least 3-4 specific cryptocurrency examples
- Mention current market trends and regulatory context
- Add risk warnings in a neutral, factual tone
- Quote or reference industry experts or official sources if possible

{market_context}
{competitor_context}

IMPORTANT: Write like a professional news reporter. Start with a clear headline on the first line, then a summary paragraph, then the main article with subheadings. Do not use casual or conversational language.

Original article context:
{source}...

Create an article that ranks well in search engines while maintaining the highest standards of journalistic integrity and professionalism.
"#,
        primary = primary,
        secondary = secondary,
        word_count = config.target_word_count,
        market_context = market_context,
        competitor_context = competitor_context,
        source = truncate_chars(&ctx.article.body, SOURCE_PREFIX_CHARS),
    )
}

fn market_block(market: &MarketSnapshot) -> String {
    let sentiment = if market.bitcoin.change_24h > 0.0 {
        "Bullish"
    } else {
        "Bearish"
    };
    let mut block = String::new();
    writeln!(block, "MARKET CONTEXT:").unwrap();
    writeln!(
        block,
        "- Bitcoin: ${} ({:+.2}%)",
        format_usd(market.bitcoin.price),
        market.bitcoin.change_24h
    )
    .unwrap();
    writeln!(
        block,
        "- Ethereum: ${} ({:+.2}%)",
        format_usd(market.ethereum.price),
        market.ethereum.change_24h
    )
    .unwrap();
    writeln!(block, "- Market sentiment: {sentiment}").unwrap();
    block
}

fn competitor_block(insights: &CompetitorInsights) -> String {
    let gaps = insights
        .content_gaps
        .iter()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    let mut block = String::new();
    writeln!(block, "COMPETITOR ANALYSIS:").unwrap();
    writeln!(block, "- Content gaps to address: {gaps}").unwrap();
    writeln!(block, "- Focus on unique angles and deep analysis").unwrap();
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssetQuote, ExtractedArticle};
    use clap::Parser;

    fn test_config() -> AppConfig {
        let cli = crate::cli::Cli::parse_from([
            "coinscribe",
            "--api-key",
            "k",
            "--model-id",
            "m",
        ]);
        AppConfig::from_cli(&cli).unwrap()
    }

    fn base_ctx() -> GenerationContext {
        GenerationContext {
            article: ExtractedArticle {
                title: "Bitcoin climbs".to_string(),
                body: "Bitcoin climbed on Tuesday as traders weighed inflows.".to_string(),
                url: "https://example.com/a".to_string(),
            },
            primary_keywords: vec!["bitcoin etf".to_string(), "btc price".to_string()],
            secondary_keywords: vec!["crypto regulation".to_string()],
            market: None,
            competitors: None,
        }
    }

    #[test]
    fn identical_context_builds_identical_prompt() {
        let config = test_config();
        let ctx = base_ctx();
        assert_eq!(build_prompt(&ctx, &config), build_prompt(&ctx, &config));
    }

    #[test]
    fn keywords_and_target_length_are_embedded() {
        let config = test_config();
        let prompt = build_prompt(&base_ctx(), &config);
        assert!(prompt.contains("bitcoin etf, btc price"));
        assert!(prompt.contains("crypto regulation"));
        assert!(prompt.contains("Target: 2000 words"));
    }

    #[test]
    fn market_block_only_when_present() {
        let config = test_config();
        let mut ctx = base_ctx();
        assert!(!build_prompt(&ctx, &config).contains("MARKET CONTEXT"));

        ctx.market = Some(MarketSnapshot {
            bitcoin: AssetQuote {
                price: 103245.5,
                change_24h: 1.25,
            },
            ethereum: AssetQuote {
                price: 3456.78,
                change_24h: -0.4,
            },
        });
        let prompt = build_prompt(&ctx, &config);
        assert!(prompt.contains("MARKET CONTEXT"));
        assert!(prompt.contains("$103,245.50 (+1.25%)"));
        assert!(prompt.contains("$3,456.78 (-0.40%)"));
        assert!(prompt.contains("Market sentiment: Bullish"));
    }

    #[test]
    fn bearish_sentiment_follows_bitcoin_change() {
        let config = test_config();
        let mut ctx = base_ctx();
        ctx.market = Some(MarketSnapshot {
            bitcoin: AssetQuote {
                price: 100000.0,
                change_24h: -2.0,
            },
            ethereum: AssetQuote {
                price: 3000.0,
                change_24h: 1.0,
            },
        });
        assert!(build_prompt(&ctx, &config).contains("Market sentiment: Bearish"));
    }

    #[test]
    fn competitor_block_lists_first_three_gaps() {
        let config = test_config();
        let mut ctx = base_ctx();
        ctx.competitors = Some(CompetitorInsights {
            common_topics: vec![],
            content_gaps: vec![
                "gap one".to_string(),
                "gap two".to_string(),
                "gap three".to_string(),
                "gap four".to_string(),
            ],
        });
        let prompt = build_prompt(&ctx, &config);
        assert!(prompt.contains("gap one, gap two, gap three"));
        assert!(!prompt.contains("gap four"));
    }

    #[test]
    fn source_body_is_truncated() {
        let config = test_config();
        let mut ctx = base_ctx();
        ctx.article.body = "a".repeat(600);
        let prompt = build_prompt(&ctx, &config);
        assert!(prompt.contains(&format!("{}...", "a".repeat(500))));
        assert!(!prompt.contains(&"a".repeat(501)));
    }
}
