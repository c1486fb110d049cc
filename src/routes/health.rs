//! Health Route
//!
//! Reports process liveness and whether the AI credential is loaded, so
//! deployments can tell "up" apart from "up but unable to extract".

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    api_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'static str>,
}

/// GET /api/v1/health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    match state.config().missing_credential() {
        None => Json(HealthResponse {
            status: "healthy",
            version: env!("CARGO_PKG_VERSION"),
            api_configured: true,
            error: None,
        }),
        Some(message) => Json(HealthResponse {
            status: "degraded",
            version: env!("CARGO_PKG_VERSION"),
            api_configured: false,
            error: Some(message),
        }),
    }
}
