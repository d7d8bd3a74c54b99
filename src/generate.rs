//! Generation orchestrator: two sequential completion calls plus
//! post-processing.
//!
//! Stage 1 drafts the article from the built prompt in a formal news style.
//! Stage 2 paraphrases the draft with a distinct editor instruction at a
//! higher temperature to vary structure; an empty paraphrase keeps the
//! draft. Completion errors propagate to the caller uncaught, so the run
//! aborts rather than mask quota or auth failures.

use crate::api::{ChatClient, ChatMessage};
use crate::error::PipelineError;
use crate::models::GeneratedArticle;
use tracing::{info, instrument};

const DRAFT_TEMPERATURE: f32 = 0.7;
const PARAPHRASE_TEMPERATURE: f32 = 0.8;
const MAX_COMPLETION_TOKENS: u32 = 2500;

const DRAFT_SYSTEM: &str = "You are a professional financial journalist for a major news \
outlet. Write in a formal, objective, and authoritative tone. Avoid casual language, \
contractions, and personal opinions. Structure the article as a news report: headline, \
summary (lede), body with subheadings, data, quotes, and a conclusion.";

const PARAPHRASE_SYSTEM: &str = "You are a professional news editor. Paraphrase the article \
to vary its structure and rhythm, but keep it professional and news-like.";

/// Run the draft and paraphrase stages and return the final article text.
///
/// # Errors
///
/// Completion transport/API errors from either stage propagate unchanged.
/// An empty draft after stage 1 is [`PipelineError::EmptyDraft`].
#[instrument(level = "info", skip_all)]
pub async fn draft_and_humanize(
    chat: &ChatClient,
    prompt: &str,
) -> Result<String, PipelineError> {
    let raw = chat
        .complete(
            &[ChatMessage::system(DRAFT_SYSTEM), ChatMessage::user(prompt)],
            DRAFT_TEMPERATURE,
            MAX_COMPLETION_TOKENS,
        )
        .await?;

    let draft = normalize_headings(&raw);
    if draft.is_empty() {
        return Err(PipelineError::EmptyDraft);
    }
    info!(bytes = draft.len(), "Draft stage complete");

    let paraphrased = chat
        .complete(
            &[
                ChatMessage::system(PARAPHRASE_SYSTEM),
                ChatMessage::user(&paraphrase_prompt(&draft)),
            ],
            PARAPHRASE_TEMPERATURE,
            MAX_COMPLETION_TOKENS,
        )
        .await?;

    if paraphrased.trim().is_empty() {
        info!("Paraphrase stage returned nothing; keeping draft");
        Ok(draft)
    } else {
        info!(bytes = paraphrased.len(), "Paraphrase stage complete");
        Ok(paraphrased.trim().to_string())
    }
}

fn paraphrase_prompt(content: &str) -> String {
    format!(
        r#"
Paraphrase the following news article:
- Increase sentence and paragraph variety, occasionally use passive voice.
- Vary paragraph length (mix short and long paragraphs, including some single-sentence paragraphs).
- Break up formulaic transitions and avoid repetitive section structures.
- Reference real-world events, dates, or sources where possible.
- Add at least one direct or paraphrased quote from an expert or organization.
- Keep the tone professional, objective, and news-like. Do not add casual language or personal opinions.

Article:
{content}

Return the full paraphrased article.
"#
    )
}

/// Clean raw completion output: drop blank lines, strip a single leading
/// `# ` heading marker, canonicalize `## ` subheadings, and rejoin with
/// blank-line separation.
pub fn normalize_headings(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            if let Some(rest) = line.strip_prefix("# ") {
                rest.to_string()
            } else if let Some(rest) = line.strip_prefix("## ") {
                format!("## {rest}")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Split generated content into headline and body.
///
/// Lines are scanned for a case-insensitive `headline:` marker (optionally
/// bold-wrapped); the text after the colon, trimmed of whitespace and `*`,
/// becomes the title and the marker line is excluded from the body. With no
/// marker (or a marker yielding empty text), the first non-empty line is the
/// title and the remaining lines form the body. Body lines rejoin with
/// blank-line separation.
pub fn split_headline(content: &str) -> GeneratedArticle {
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut title: Option<String> = None;
    let mut body_lines: Vec<&str> = Vec::new();

    for line in &lines {
        if title.is_none() {
            let lower = line.to_lowercase();
            if lower.starts_with("**headline:**") || lower.starts_with("headline:") {
                let extracted = line
                    .split_once(':')
                    .map(|(_, after)| after.trim_matches([' ', '*']).to_string())
                    .unwrap_or_default();
                if !extracted.is_empty() {
                    title = Some(extracted);
                    continue;
                }
            }
        }
        body_lines.push(line);
    }

    match title {
        Some(title) => GeneratedArticle::new(title, body_lines.join("\n\n")),
        None => {
            let title = lines.first().copied().unwrap_or("Untitled");
            let body = if lines.len() > 1 {
                lines[1..].join("\n\n")
            } else {
                String::new()
            };
            GeneratedArticle::new(title, body)
        }
    }
}
