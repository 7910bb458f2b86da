use application::answer_service::AnswerMatcher;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use domain::embedding::TextEmbedder;
use serde::{Deserialize, Serialize};
use shared::types::Result;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

pub struct AppState<E> {
    matcher: Arc<AnswerMatcher<E>>,
}

impl<E> Clone for AppState<E> {
    fn clone(&self) -> Self {
        Self {
            matcher: Arc::clone(&self.matcher),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
}

/// Request body sent by the Android client.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub is_voice: bool,
}

fn default_language() -> String {
    "english".to_string()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub entries: usize,
}

/// Per-request failure, rendered as a 500 with a JSON `error` body.
pub struct ApiError(anyhow::Error);

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = ?self.0, "request failed");
        let body = serde_json::json!({ "error": format!("{:#}", self.0) });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

pub fn router<E: TextEmbedder + 'static>(matcher: Arc<AnswerMatcher<E>>) -> Router {
    Router::new()
        .route("/", get(health::<E>))
        .route("/generate", post(generate::<E>))
        .route("/api/chat", post(chat::<E>))
        .layer(CorsLayer::permissive())
        .with_state(AppState { matcher })
}

pub async fn serve<E: TextEmbedder + 'static>(
    listener: TcpListener,
    matcher: Arc<AnswerMatcher<E>>,
) -> Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, entries = matcher.index().len(), "serving answers");
    axum::serve(listener, router(matcher))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

async fn health<E: TextEmbedder + 'static>(State(state): State<AppState<E>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        entries: state.matcher.index().len(),
    })
}

async fn generate<E: TextEmbedder + 'static>(
    State(state): State<AppState<E>>,
    Json(request): Json<GenerateRequest>,
) -> std::result::Result<Json<GenerateResponse>, ApiError> {
    let prompt = request.prompt.unwrap_or_default();
    let response = state.matcher.answer(prompt.trim()).await?;
    Ok(Json(GenerateResponse { response }))
}

async fn chat<E: TextEmbedder + 'static>(
    State(state): State<AppState<E>>,
    Json(request): Json<ChatRequest>,
) -> std::result::Result<Json<ChatResponse>, ApiError> {
    tracing::debug!(language = %request.language, is_voice = request.is_voice, "chat request");
    let response = state.matcher.answer(request.message.trim()).await?;
    Ok(Json(ChatResponse {
        response,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}
