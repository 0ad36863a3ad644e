use axum::{extract::State, Json};

use crate::api::dto::{HealthResponse, RootResponse};
use crate::api::state::AppState;

use super::iso_timestamp;

const SERVICE_NAME: &str = "Kutum Family Chatbot API";

/// `GET /`
#[utoipa::path(
    get,
    path = "/",
    tag = "status",
    responses(
        (status = 200, description = "Service banner and answer mode", body = RootResponse),
    )
)]
pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    let openai_enabled = state.llm_enabled();
    Json(RootResponse {
        message: SERVICE_NAME.to_string(),
        status: "running".to_string(),
        openai_enabled,
        mode: if openai_enabled { "OpenAI GPT" } else { "Rule-based" }.to_string(),
    })
}

/// `GET /health`
#[utoipa::path(
    get,
    path = "/health",
    tag = "status",
    responses(
        (status = 200, description = "Liveness probe", body = HealthResponse),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: iso_timestamp(),
        openai_enabled: state.llm_enabled(),
    })
}
