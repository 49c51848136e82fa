//! Integrity Handlers
//!
//! Report the running signer fingerprint and the integrity check outcome.

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use siggate_core::Mismatch;

use crate::api::handlers::AppState;

/// Fingerprint of the running signer
#[derive(Debug, Serialize)]
pub struct FingerprintResponse {
    /// Whether signing information could be read
    pub available: bool,

    /// Textual fingerprint, when available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,

    /// Algorithm used to compute it
    pub algorithm: String,

    /// Why the fingerprint is unavailable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Integrity check outcome
#[derive(Debug, Serialize)]
pub struct IntegrityResponse {
    /// `verified`, `mismatched` or `unavailable`
    pub status: String,

    /// Cause of a mismatch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mismatch: Option<Mismatch>,

    /// Legacy integer status (`1` when verified)
    pub legacy_code: i32,
}

/// Get the running signer fingerprint
///
/// GET /v1/fingerprint
pub async fn get_fingerprint(State(state): State<Arc<AppState>>) -> Json<FingerprintResponse> {
    let algorithm = state.service.guard().expected().fingerprint.algorithm();

    let response = match state.service.get_signature_fingerprint() {
        Ok(fingerprint) => FingerprintResponse {
            available: true,
            fingerprint: Some(fingerprint.to_string()),
            algorithm: fingerprint.algorithm().to_string(),
            reason: None,
        },
        Err(unavailable) => FingerprintResponse {
            available: false,
            fingerprint: None,
            algorithm: algorithm.to_string(),
            reason: Some(unavailable.reason),
        },
    };

    Json(response)
}

/// Run the integrity check
///
/// GET /v1/integrity
pub async fn get_integrity(State(state): State<Arc<AppState>>) -> Json<IntegrityResponse> {
    let result = state.service.check_integrity();

    Json(IntegrityResponse {
        status: result.status().to_string(),
        mismatch: result.mismatch(),
        legacy_code: result.legacy_code(),
    })
}
