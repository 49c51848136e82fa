//! Error types for the siggate core

use thiserror::Error;

use crate::guard::CheckResult;

/// Result type alias using CoreError
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur in fingerprinting and gated cipher operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Cipher operation refused because the integrity gate is not verified
    #[error("Integrity gate not verified: {0}")]
    Integrity(CheckResult),

    /// Ciphertext could not be parsed into its components
    #[error("Malformed ciphertext: {0}")]
    MalformedCipherText(String),

    /// Authentication tag did not verify (tampered payload or foreign key)
    #[error("Ciphertext authentication failed")]
    Authentication,

    /// Payload authenticated but did not recover the expected plaintext framing
    #[error("Key mismatch: {0}")]
    KeyMismatch(String),

    /// Plaintext exceeds the accepted upper bound
    #[error("Input too large: {len} bytes exceeds limit of {max} bytes")]
    InputTooLarge { len: usize, max: usize },

    /// Fingerprint text could not be parsed
    #[error("Invalid fingerprint: {0}")]
    InvalidFingerprint(String),

    /// Secret key material is unusable
    #[error("Invalid key material: {0}")]
    InvalidKeyMaterial(String),
}

impl CoreError {
    /// Short machine-readable code for this error kind
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::Integrity(_) => "INTEGRITY_ERROR",
            CoreError::MalformedCipherText(_) => "MALFORMED_CIPHERTEXT",
            CoreError::Authentication => "AUTHENTICATION_ERROR",
            CoreError::KeyMismatch(_) => "KEY_MISMATCH",
            CoreError::InputTooLarge { .. } => "INPUT_TOO_LARGE",
            CoreError::InvalidFingerprint(_) => "INVALID_FINGERPRINT",
            CoreError::InvalidKeyMaterial(_) => "INVALID_KEY_MATERIAL",
        }
    }
}

impl From<base64::DecodeError> for CoreError {
    fn from(err: base64::DecodeError) -> Self {
        CoreError::MalformedCipherText(format!("invalid base64 encoding: {}", err))
    }
}
