//! # siggate Core
//!
//! Signature-gated symmetric cipher primitives.
//!
//! ## Key Concepts
//!
//! - **SigningIdentity**: bytes of the code-signing certificate of the calling application
//! - **Fingerprint**: deterministic identifier derived from the first signer
//! - **Integrity Guard**: compares the observed fingerprint with the configured one
//! - **Gate**: the `CheckResult` every cipher call must present
//!
//! ## Gate Policy
//!
//! Cipher and digest operations fail closed: any gate other than
//! `CheckResult::Verified` is refused with `CoreError::Integrity` and no
//! ciphertext, plaintext or digest is produced.

pub mod cipher;
pub mod digest;
pub mod error;
pub mod fingerprint;
pub mod guard;
pub mod types;

pub use cipher::{CipherEngine, CipherText, KeyMaterial, MAX_PLAINTEXT_LEN};
pub use digest::DigestSigner;
pub use error::{CoreError, Result};
pub use fingerprint::{extract, Fingerprint, FingerprintAlgorithm, Observation, Unavailable};
pub use guard::{check, CheckResult, ExpectedFingerprint, IntegrityGuard, Mismatch};
pub use types::{SigningIdentity, SigningInfo};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the library version
pub fn version() -> &'static str {
    VERSION
}
