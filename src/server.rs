//! HTTP wrapper around the pipeline.
//!
//! Two routes:
//! - `POST /generate`: runs one full pipeline inline and returns the file
//!   path and document HTML. The optional request body (topic, keywords,
//!   article type, length) is accepted and currently ignored by the
//!   pipeline. A failed run returns a null `html_file` and empty
//!   `article_html`; the failure itself lands in the log.
//! - `GET /logs`: the last 50 lines of the process log as plain text.
//!
//! Requests are handled with no queueing or coalescing: each `/generate`
//! call blocks its task for the full pipeline duration, including the
//! untimed completion calls. Callers needing throughput run multiple
//! processes.

use crate::api::ChatClient;
use crate::config::AppConfig;
use crate::pipeline;
use crate::utils::tail_lines;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{debug, error, info, instrument};

const LOG_TAIL_LINES: usize = 50;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub http: reqwest::Client,
    pub chat: ChatClient,
}

/// Request body for `POST /generate`. Typed but not yet consumed by the
/// pipeline.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    pub topic: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub article_type: Option<String>,
    pub length: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub html_file: Option<String>,
    pub article_html: String,
}

/// Build the router with CORS for browser frontends.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/generate", post(generate_article))
        .route("/logs", get(get_logs))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until ctrl-c.
pub async fn serve(
    config: AppConfig,
    http: reqwest::Client,
    chat: ChatClient,
) -> Result<(), Box<dyn Error>> {
    let bind_addr = config.bind_addr;
    let state = AppState {
        config: Arc::new(config),
        http,
        chat,
    };
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!(%bind_addr, "HTTP wrapper listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Received shutdown signal");
    }
}

#[instrument(level = "info", skip_all)]
async fn generate_article(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Json<GenerateResponse> {
    if let Ok(Json(request)) = payload {
        debug!(?request, "Generate request received");
    }

    match pipeline::run(&state.config, &state.http, &state.chat).await {
        Ok(outcome) => Json(GenerateResponse {
            html_file: Some(outcome.document.path.display().to_string()),
            article_html: outcome.document.html,
        }),
        Err(e) => {
            error!(error = %e, "Pipeline run failed");
            Json(GenerateResponse {
                html_file: None,
                article_html: String::new(),
            })
        }
    }
}

async fn get_logs(State(state): State<AppState>) -> String {
    match tokio::fs::read_to_string(&state.config.log_file).await {
        Ok(content) => tail_lines(&content, LOG_TAIL_LINES),
        Err(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_request_accepts_partial_bodies() {
        let request: GenerateRequest = serde_json::from_str("{}").unwrap();
        assert!(request.topic.is_none());

        let request: GenerateRequest =
            serde_json::from_str(r#"{"topic": "bitcoin", "length": 1500}"#).unwrap();
        assert_eq!(request.topic.as_deref(), Some("bitcoin"));
        assert_eq!(request.length, Some(1500));
    }

    #[test]
    fn failure_response_serializes_null_file() {
        let response = GenerateResponse {
            html_file: None,
            article_html: String::new(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json["html_file"].is_null());
        assert_eq!(json["article_html"], "");
    }

    #[test]
    fn success_response_carries_path_and_html() {
        let response = GenerateResponse {
            html_file: Some("exports/article_20250106T143000.html".to_string()),
            article_html: "<html></html>".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json["html_file"],
            "exports/article_20250106T143000.html"
        );
    }
}
