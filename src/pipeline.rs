//! The pipeline: one run from feed poll to exported HTML.
//!
//! Strictly sequential and synchronous with respect to its caller: each
//! network call blocks until response or timeout. Phases:
//!
//! 1. Fetch candidates from every configured feed; select the
//!    highest-weight entry
//! 2. Extract title/body (feed-summary fallback inside the extractor)
//! 3. Research keywords, log their sentiment split
//! 4. Optionally fetch market data and competitor insights
//! 5. Build the prompt and run the two-stage generation
//! 6. Split the headline, optionally score and enhance once
//! 7. Export the document
//!
//! Per-source failures inside phases 1–4 degrade to empty contributions;
//! the errors that escape this function are the ones that end the run.

use crate::api::ChatClient;
use crate::config::AppConfig;
use crate::error::PipelineError;
use crate::models::{ExportedDocument, GenerationContext, KeywordSet};
use crate::outputs::{html, seo};
use crate::{feeds, generate, keywords, market, prompt, quality, scrapers};
use tracing::{error, info, instrument};

/// Result of a successful run.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub document: ExportedDocument,
    pub title: String,
    pub keywords: KeywordSet,
}

/// Execute one full pipeline run.
#[instrument(level = "info", skip_all)]
pub async fn run(
    config: &AppConfig,
    http: &reqwest::Client,
    chat: &ChatClient,
) -> Result<PipelineOutcome, PipelineError> {
    info!("Starting article pipeline");

    // 1. Candidates
    let candidates = feeds::fetch_candidates(http, &config.feeds, config.entries_per_feed).await;
    let Some(best) = candidates.first() else {
        error!("Failed to get articles from any source");
        return Err(PipelineError::NoCandidates);
    };
    info!(
        title = %best.title,
        source = %best.source_name,
        domain = best.source_domain().unwrap_or_default(),
        "Selected article candidate"
    );

    // 2. Extraction (fallback handled inside)
    let article = scrapers::article::extract_article(http, &best.url, &config.feeds).await;
    if article.body.is_empty() {
        error!(url = %article.url, "Failed to extract article content");
        return Err(PipelineError::EmptyContent);
    }

    // 3. Keywords
    let keyword_set = keywords::research_keywords(http, config.max_keywords).await;
    let (positive, negative, neutral) = keywords::sentiment_summary(&keyword_set);
    info!(
        count = keyword_set.len(),
        positive, negative, neutral, "Keyword research done"
    );

    // 4. Optional context
    let market = if config.enable_market_data {
        market::fetch_market_snapshot(http).await
    } else {
        None
    };
    let competitors = if config.enable_competitor_analysis {
        Some(scrapers::competitors::analyze_competitors(http).await)
    } else {
        None
    };

    // 5. Prompt + generation
    let ctx = GenerationContext {
        article,
        primary_keywords: keyword_set.primary(config.primary_keyword_count).to_vec(),
        secondary_keywords: keyword_set
            .secondary(config.primary_keyword_count, config.secondary_keyword_count)
            .to_vec(),
        market,
        competitors,
    };
    let prompt = prompt::build_prompt(&ctx, config);
    let content = generate::draft_and_humanize(chat, &prompt).await?;

    // 6. Title split + optional quality gate
    let mut generated = generate::split_headline(&content);
    let mut metrics = None;
    if config.enable_quality_scoring {
        metrics = quality::analyze_content(&generated.body);
        if let Some(current) = metrics.clone() {
            info!(score = current.quality_score, "Content quality scored");
            if current.quality_score < config.quality_threshold {
                let enhanced = quality::enhance_content(chat, &generated.body, &current).await?;
                if let Some(better) = quality::analyze_content(&enhanced) {
                    if better.quality_score > current.quality_score {
                        info!(
                            from = current.quality_score,
                            to = better.quality_score,
                            "Quality improved; keeping enhanced content"
                        );
                        generated.body = enhanced;
                        metrics = Some(better);
                    }
                }
            }
        }
    }

    // 7. Export
    let meta_description = seo::meta_description(&generated.body);
    let document = html::export(
        config,
        &generated,
        keyword_set.top(10),
        &meta_description,
        ctx.market.as_ref(),
        metrics.as_ref(),
    )
    .await?;

    info!(
        path = %document.path.display(),
        words = generated.word_count(),
        "Article exported"
    );

    Ok(PipelineOutcome {
        document,
        title: generated.title,
        keywords: keyword_set,
    })
}
