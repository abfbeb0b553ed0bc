//! Router for the health API

use axum::{Json, Router, extract::State, routing::get};
use chrono::{SecondsFormat, Utc};

use super::public;
use crate::api::state::SharedState;

async fn health(State(state): State<SharedState>) -> Json<public::HealthResponse> {
    Json(public::HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        session_cache: state.sessions.backend_name().to_string(),
    })
}

/// Create the health router
pub fn router() -> Router<SharedState> {
    Router::new().route("/health", get(health))
}
