//! API module for the siggate HTTP adapter

pub mod error;
pub mod handlers;

use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use siggate_core::cipher::MAX_ENCODED_LEN;

use handlers::AppState;

/// Request body limit: the largest ciphertext plus JSON framing
pub const MAX_BODY_LEN: usize = MAX_ENCODED_LEN + 4096;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Readiness check response
#[derive(Serialize)]
pub struct ReadyResponse {
    /// True only when the running signer is verified
    pub ready: bool,
    pub integrity: String,
    pub source: String,
    pub uptime_seconds: i64,
}

/// Health check endpoint
///
/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

/// Readiness check endpoint
///
/// GET /ready
pub async fn ready(State(state): State<Arc<AppState>>) -> Json<ReadyResponse> {
    let result = state.service.check_integrity();

    Json(ReadyResponse {
        ready: result.is_verified(),
        integrity: result.status().to_string(),
        source: state.service.source().kind().to_string(),
        uptime_seconds: (Utc::now() - state.started_at).num_seconds(),
    })
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health endpoints
        .route("/health", get(health))
        .route("/ready", get(ready))
        // Integrity endpoints
        .route("/v1/fingerprint", get(handlers::get_fingerprint))
        .route("/v1/integrity", get(handlers::get_integrity))
        // Cipher endpoints
        .route("/v1/encrypt", post(handlers::encrypt))
        .route("/v1/decrypt", post(handlers::decrypt))
        .route("/v1/sign", post(handlers::sign))
        // Middleware
        .layer(DefaultBodyLimit::max(MAX_BODY_LEN))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
