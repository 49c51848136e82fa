//! Cipher Handlers
//!
//! Gated encrypt, decrypt and sign. Integrity failures surface as 403.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::api::error::ApiError;
use crate::api::handlers::AppState;

/// Request to encrypt text
#[derive(Debug, Deserialize)]
pub struct EncryptRequest {
    /// UTF-8 plaintext
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct EncryptResponse {
    /// Base64 ciphertext
    pub ciphertext: String,
}

/// Request to decrypt text
#[derive(Debug, Deserialize)]
pub struct DecryptRequest {
    /// Base64 ciphertext from `/v1/encrypt`
    pub ciphertext: String,
}

#[derive(Debug, Serialize)]
pub struct DecryptResponse {
    pub text: String,
}

/// Request to sign text
#[derive(Debug, Deserialize)]
pub struct SignRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SignResponse {
    /// Hex HMAC-SHA256 digest
    pub digest: String,
}

/// Encrypt text
///
/// POST /v1/encrypt
pub async fn encrypt(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EncryptRequest>,
) -> Result<Json<EncryptResponse>, ApiError> {
    let ciphertext = state.service.encrypt(&request.text)?;

    info!(plaintext_len = request.text.len(), "Encrypted text");

    Ok(Json(EncryptResponse { ciphertext }))
}

/// Decrypt text
///
/// POST /v1/decrypt
pub async fn decrypt(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DecryptRequest>,
) -> Result<Json<DecryptResponse>, ApiError> {
    let text = state.service.decrypt(&request.ciphertext)?;

    info!(ciphertext_len = request.ciphertext.len(), "Decrypted text");

    Ok(Json(DecryptResponse { text }))
}

/// Sign text
///
/// POST /v1/sign
pub async fn sign(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignRequest>,
) -> Result<Json<SignResponse>, ApiError> {
    let digest = state.service.sign(&request.text)?;
    Ok(Json(SignResponse { digest }))
}
