//! HTTP boundary.
//!
//! Thin axum layer over the orchestrator: (de)serialization, validation,
//! CORS and status codes live here, never in the core. A well-formed chat
//! message always produces a reply object, not an error payload.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use sqlx::sqlite::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use validator::Validate;

use crate::agent::OrchestratorHandle;
use crate::database;
use crate::error::AppError;
use crate::models::{ChatRequest, ChatResponse};

/// Shared state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: OrchestratorHandle,
    pub pool: Option<SqlitePool>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Config(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/chat", post(chat))
        .route("/history/{user_id}", get(history))
        .route("/metrics", get(metrics))
        .route("/reload", post(reload))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({ "status": "online", "service": "CyberGuard API" }))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    request.validate()?;

    let user_id = request.user_id.unwrap_or_else(|| "anonymous".to_string());
    info!("Chat request from {}", user_id);

    let reply = state
        .orchestrator
        .answer(user_id.clone(), request.message)
        .await?;

    Ok(Json(ChatResponse::from_reply(user_id, reply)))
}

#[derive(Debug, Deserialize)]
struct HistoryParams {
    limit: Option<i64>,
}

async fn history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let pool = state
        .pool
        .as_ref()
        .ok_or_else(|| AppError::Config("Database not initialized".to_string()))?;

    let limit = params.limit.unwrap_or(10).clamp(1, 100);
    let history = database::get_history(pool, &user_id, limit).await?;
    Ok(Json(json!({ "user_id": user_id, "history": history })))
}

async fn metrics(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let pool = state
        .pool
        .as_ref()
        .ok_or_else(|| AppError::Config("Database not initialized".to_string()))?;

    let summary = database::get_metrics_summary(pool).await?;
    Ok(Json(json!({ "metrics": summary })))
}

async fn reload(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let entries = state.orchestrator.reload().await?;
    Ok(Json(json!({ "status": "reloaded", "entries": entries })))
}
