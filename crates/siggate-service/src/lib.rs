//! siggate Service
//!
//! Host-facing API over the signature-gated cipher, plus an HTTP adapter.
//!
//! ## Host Operations
//!
//! - `get_signature_fingerprint`: fingerprint of the running signer
//! - `check_integrity`: three-way check, with a legacy integer form
//! - `encrypt` / `decrypt`: gated authenticated encryption of text
//! - `sign`: gated HMAC-SHA256 digest of text
//!
//! ## HTTP Endpoints
//!
//! - `GET /v1/fingerprint` - Running signer fingerprint
//! - `GET /v1/integrity` - Integrity check result
//! - `POST /v1/encrypt` - Encrypt text
//! - `POST /v1/decrypt` - Decrypt text
//! - `POST /v1/sign` - Sign text

pub mod api;
pub mod config;
pub mod error;
pub mod service;

pub use api::create_router;
pub use api::handlers::AppState;
pub use config::{ConfigError, RawConfig, ServiceConfig};
pub use error::{Result, ServiceError};
pub use service::SignatureService;
