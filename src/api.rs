//! Chat-completion API client.
//!
//! A minimal client for an OpenAI-compatible completions endpoint. Requests
//! are plain JSON POSTs with bearer auth; the first choice's message content
//! is the response.
//!
//! Two deliberate omissions:
//! - no retry or backoff: quota and auth failures must surface to the
//!   caller, not get masked by retries
//! - no client-side timeout on completion calls: the call blocks until the
//!   provider answers or errors

use crate::config::AppConfig;
use crate::error::PipelineError;
use crate::utils::truncate_for_log;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// One message in a chat conversation.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// Role: "system", "user", or "assistant".
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for one configured completion provider and model.
#[derive(Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ChatClient {
    /// Build a client from the validated configuration. The HTTP client here
    /// is separate from the scraping client: completion calls carry no
    /// timeout.
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api_base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model_id.clone(),
        }
    }

    /// Send a conversation and return the trimmed completion text.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Http`] on transport failure, [`PipelineError::Api`]
    /// on a non-success status. An empty completion is returned as an empty
    /// string; callers decide whether that is fatal.
    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, PipelineError> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature,
            max_tokens,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        debug!(
            bytes = content.len(),
            preview = %truncate_for_log(&content, 120),
            "Completion received"
        );
        Ok(content.trim().to_string())
    }
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_messages_carry_roles() {
        assert_eq!(ChatMessage::system("x").role, "system");
        assert_eq!(ChatMessage::user("y").role, "user");
    }

    #[test]
    fn request_serializes_openai_shape() {
        let messages = [ChatMessage::system("sys"), ChatMessage::user("hello")];
        let request = ChatRequest {
            model: "deepseek/test",
            messages: &messages,
            temperature: 0.7,
            max_tokens: 2500,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "deepseek/test");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hello");
        assert_eq!(json["max_tokens"], 2500);
    }

    #[test]
    fn response_parses_first_choice() {
        let json = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "  Generated text  "}}
            ]
        }"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        assert_eq!(content.trim(), "Generated text");
    }

    #[test]
    fn missing_choices_yield_empty_content() {
        let parsed: ChatResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.choices.is_empty());
    }
}
