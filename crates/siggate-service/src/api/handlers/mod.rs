//! API request handlers

pub mod cipher;
pub mod integrity;

use chrono::{DateTime, Utc};

use crate::service::SignatureService;

pub use cipher::{
    decrypt, encrypt, sign, DecryptRequest, DecryptResponse, EncryptRequest, EncryptResponse,
    SignRequest, SignResponse,
};
pub use integrity::{get_fingerprint, get_integrity, FingerprintResponse, IntegrityResponse};

/// Application state shared across handlers
pub struct AppState {
    /// Signature-gated cipher service
    pub service: SignatureService,

    /// Server start time
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(service: SignatureService) -> Self {
        Self {
            service,
            started_at: Utc::now(),
        }
    }
}
