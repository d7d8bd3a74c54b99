//! HTML document rendering and export.
//!
//! Renders the complete self-contained article document (meta tags, Open
//! Graph and Twitter cards, JSON-LD, inline CSS, optional market and quality
//! panels, body paragraphs) and writes it to a timestamp-named file under
//! the output directory. Every interpolated string is escaped; the JSON-LD
//! block is emitted by the JSON serializer.

use crate::config::AppConfig;
use crate::error::PipelineError;
use crate::models::{ExportedDocument, GeneratedArticle, MarketSnapshot, QualityMetrics};
use crate::outputs::seo;
use crate::utils::format_usd;
use chrono::{DateTime, Local};
use std::fmt::Write as _;
use tokio::fs;
use tracing::{info, instrument};

const STYLE: &str = r#"        body { font-family: 'Arial', sans-serif; line-height: 1.7; max-width: 900px; margin: 0 auto; padding: 20px; color: #333; }
        h1 { color: #2c3e50; border-bottom: 3px solid #3498db; padding-bottom: 15px; font-size: 2.2em; }
        h2 { color: #34495e; margin-top: 40px; margin-bottom: 20px; font-size: 1.6em; border-left: 4px solid #3498db; padding-left: 15px; }
        p { margin-bottom: 20px; text-align: justify; font-size: 16px; }
        .meta { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 20px; border-radius: 10px; margin-bottom: 30px; }
        .reading-time { font-style: italic; margin-bottom: 10px; }
        .keywords { font-size: 14px; opacity: 0.9; }
        .quality-metrics { background: #f8f9fa; padding: 15px; border-radius: 8px; margin: 20px 0; border-left: 4px solid #28a745; }
        .market-data { background: #e8f5e8; padding: 15px; border-radius: 8px; margin: 20px 0; border-left: 4px solid #28a745; }
        .disclaimer { background: #fff3cd; padding: 15px; border-radius: 8px; margin: 20px 0; border-left: 4px solid #ffc107; font-size: 14px; }
        a { color: #3498db; text-decoration: none; }
        a:hover { text-decoration: underline; }
        .meta-section { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 20px; border-radius: 10px; margin-bottom: 30px; }
        .excerpt-section { background: #eaf6ff; border-left: 4px solid #3498db; padding: 12px 18px; margin-bottom: 24px; font-style: italic; color: #2c3e50; }"#;

const DISCLAIMER: &str = "This article is for informational purposes only and does not \
constitute financial advice. Cryptocurrency investments carry significant risks. Always \
conduct your own research and consult with financial advisors before making investment \
decisions.";

/// Inputs for one document render.
pub struct RenderOptions<'a> {
    pub article: &'a GeneratedArticle,
    pub keywords: &'a [String],
    pub meta_description: &'a str,
    pub market: Option<&'a MarketSnapshot>,
    pub metrics: Option<&'a QualityMetrics>,
    pub published: DateTime<Local>,
    pub slug: &'a str,
    pub min_reading_minutes: u64,
    pub max_reading_minutes: u64,
}

/// Render the article, write it under the output directory, and return the
/// terminal artifact. The directory is created if absent; filenames carry a
/// second-resolution timestamp, so files from earlier runs are never touched.
#[instrument(level = "info", skip_all)]
pub async fn export(
    config: &AppConfig,
    article: &GeneratedArticle,
    keywords: &[String],
    meta_description: &str,
    market: Option<&MarketSnapshot>,
    metrics: Option<&QualityMetrics>,
) -> Result<ExportedDocument, PipelineError> {
    fs::create_dir_all(&config.output_dir).await?;

    let published = Local::now();
    let slug = published.format("%Y%m%dT%H%M%S").to_string();
    let path = config
        .output_dir
        .join(format!("{}_{}.html", config.file_prefix, slug));

    let html = render_document(&RenderOptions {
        article,
        keywords,
        meta_description,
        market,
        metrics,
        published,
        slug: &slug,
        min_reading_minutes: config.min_reading_minutes,
        max_reading_minutes: config.max_reading_minutes,
    });

    fs::write(&path, &html).await?;
    info!(path = %path.display(), bytes = html.len(), "Wrote article HTML");

    Ok(ExportedDocument { path, html })
}

/// Render the complete document as a string. Pure; no IO.
pub fn render_document(opts: &RenderOptions<'_>) -> String {
    let meta_title = seo::truncate_with_ellipsis(&opts.article.title, 60);
    let description = seo::truncate_with_ellipsis(opts.meta_description, 160);
    let tags = seo::meta_tags(&meta_title, &description, opts.keywords);
    let word_count = opts.article.word_count();
    let reading_time = seo::reading_time_minutes(
        word_count,
        opts.min_reading_minutes,
        opts.max_reading_minutes,
    );
    let excerpt = seo::excerpt(&opts.article.body);
    let published_iso = opts.published.to_rfc3339();
    let structured = seo::structured_data(
        &meta_title,
        &tags.description,
        opts.keywords,
        word_count,
        reading_time,
        &published_iso,
        opts.slug,
        opts.market,
    );

    let esc_title = seo::escape_html(&opts.article.title);
    let esc_meta_title = seo::escape_html(&tags.title);
    let esc_description = seo::escape_html(&tags.description);
    let esc_keywords = seo::escape_html(&tags.keywords);

    let mut html = String::new();
    writeln!(html, "<!DOCTYPE html>").unwrap();
    writeln!(html, "<html lang=\"en\">").unwrap();
    writeln!(html, "<head>").unwrap();
    writeln!(html, "    <meta charset=\"UTF-8\">").unwrap();
    writeln!(
        html,
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
    )
    .unwrap();
    writeln!(html, "    <title>{esc_meta_title}</title>").unwrap();
    writeln!(
        html,
        "    <meta name=\"description\" content=\"{esc_description}\">"
    )
    .unwrap();
    writeln!(html, "    <meta name=\"keywords\" content=\"{esc_keywords}\">").unwrap();
    writeln!(html, "    <meta name=\"robots\" content=\"{}\">", tags.robots).unwrap();
    writeln!(html, "    <meta name=\"author\" content=\"Crypto Expert\">").unwrap();
    writeln!(
        html,
        "    <meta name=\"article:published_time\" content=\"{published_iso}\">"
    )
    .unwrap();
    writeln!(
        html,
        "    <meta name=\"article:modified_time\" content=\"{published_iso}\">"
    )
    .unwrap();
    writeln!(html).unwrap();
    writeln!(html, "    <!-- Open Graph -->").unwrap();
    writeln!(
        html,
        "    <meta property=\"og:title\" content=\"{esc_meta_title}\">"
    )
    .unwrap();
    writeln!(
        html,
        "    <meta property=\"og:description\" content=\"{esc_description}\">"
    )
    .unwrap();
    writeln!(html, "    <meta property=\"og:type\" content=\"article\">").unwrap();
    writeln!(
        html,
        "    <meta property=\"og:site_name\" content=\"Crypto Insights Pro\">"
    )
    .unwrap();
    writeln!(html).unwrap();
    writeln!(html, "    <!-- Twitter Card -->").unwrap();
    writeln!(
        html,
        "    <meta name=\"twitter:card\" content=\"summary_large_image\">"
    )
    .unwrap();
    writeln!(
        html,
        "    <meta name=\"twitter:title\" content=\"{esc_meta_title}\">"
    )
    .unwrap();
    writeln!(
        html,
        "    <meta name=\"twitter:description\" content=\"{esc_description}\">"
    )
    .unwrap();
    writeln!(html).unwrap();
    writeln!(html, "    <!-- Structured Data -->").unwrap();
    writeln!(html, "    <script type=\"application/ld+json\">").unwrap();
    writeln!(
        html,
        "    {}",
        serde_json::to_string_pretty(&structured).unwrap_or_default()
    )
    .unwrap();
    writeln!(html, "    </script>").unwrap();
    writeln!(html).unwrap();
    writeln!(html, "    <style>").unwrap();
    writeln!(html, "{STYLE}").unwrap();
    writeln!(html, "    </style>").unwrap();
    writeln!(html, "</head>").unwrap();
    writeln!(html, "<body>").unwrap();
    writeln!(html, "    <article>").unwrap();
    writeln!(html, "        <div class=\"meta-section\">").unwrap();
    writeln!(
        html,
        "            <div><strong>Meta Title:</strong> {esc_meta_title}</div>"
    )
    .unwrap();
    writeln!(
        html,
        "            <div><strong>Meta Description:</strong> {esc_description}</div>"
    )
    .unwrap();
    writeln!(
        html,
        "            <div><strong>Keywords:</strong> {}</div>",
        seo::escape_html(&opts.keywords.iter().take(5).cloned().collect::<Vec<_>>().join(", "))
    )
    .unwrap();
    writeln!(html, "        </div>").unwrap();
    writeln!(html, "        <h1>{esc_title}</h1>").unwrap();
    writeln!(
        html,
        "        <div class=\"excerpt-section\"><strong>Excerpt:</strong> {}</div>",
        seo::escape_html(&excerpt)
    )
    .unwrap();
    writeln!(html, "        <div class=\"meta\">").unwrap();
    writeln!(
        html,
        "            <div class=\"reading-time\">Reading time: {reading_time} minutes</div>"
    )
    .unwrap();
    writeln!(
        html,
        "            <div>Published: {}</div>",
        opts.published.format("%B %d, %Y")
    )
    .unwrap();
    writeln!(html, "        </div>").unwrap();

    if let Some(market) = opts.market {
        writeln!(
            html,
            "        <div class=\"market-data\"><h3>Market Update</h3><p>Bitcoin: ${} ({:+.2}%) | Ethereum: ${} ({:+.2}%)</p></div>",
            format_usd(market.bitcoin.price),
            market.bitcoin.change_24h,
            format_usd(market.ethereum.price),
            market.ethereum.change_24h
        )
        .unwrap();
    }

    if let Some(metrics) = opts.metrics {
        writeln!(
            html,
            "        <div class=\"quality-metrics\"><h3>Content Quality</h3><p>Quality Score: {:.2}/100 | Readability: {:.1} | Word Count: {}</p></div>",
            metrics.quality_score, metrics.flesch_score, metrics.word_count
        )
        .unwrap();
    }

    writeln!(html, "        <div class=\"content\">").unwrap();
    for paragraph in opts.article.body.split("\n\n") {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }
        if let Some(heading) = paragraph.strip_prefix("##") {
            writeln!(
                html,
                "            <h2>{}</h2>",
                seo::escape_html(heading.trim())
            )
            .unwrap();
        } else {
            writeln!(html, "            <p>{}</p>", seo::escape_html(paragraph)).unwrap();
        }
    }
    writeln!(
        html,
        "            <div class=\"disclaimer\"><strong>Disclaimer:</strong> {DISCLAIMER}</div>"
    )
    .unwrap();
    writeln!(html, "        </div>").unwrap();
    writeln!(html, "    </article>").unwrap();
    writeln!(html, "</body>").unwrap();
    writeln!(html, "</html>").unwrap();
    html
}
