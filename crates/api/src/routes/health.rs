use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether a Gemini key is configured.
    pub image_model_configured: bool,
    /// Whether an ElevenLabs key is configured.
    pub tts_configured: bool,
}

/// GET /health -- reports which upstreams are configured.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let image_model_configured = state.pipeline.is_some();
    let tts_configured = state.speech.is_some();

    let status = if image_model_configured && tts_configured {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        image_model_configured,
        tts_configured,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
