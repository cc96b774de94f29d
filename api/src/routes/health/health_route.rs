use std::sync::Arc;

use ai_llm_service::health_service::HealthStatus;
use axum::{extract::State, http::StatusCode, response::Response};
use serde::Serialize;

use crate::core::{app_state::AppState, http::response_envelope::ApiResponse};

#[derive(Debug, Serialize)]
pub struct HealthReport {
    /// `ok` whenever the process is serving.
    pub status: &'static str,
    /// Best-effort probe of the configured LLM provider.
    pub llm: HealthStatus,
}

/// GET /health
///
/// Always `200`: an unhealthy LLM shows up as `llm.ok = false`.
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    let llm = state.reviewer.llm().health().await;
    ApiResponse::success(HealthReport { status: "ok", llm })
        .into_response_with_status(StatusCode::OK)
}
