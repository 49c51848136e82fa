//! Error types for signer sources

use thiserror::Error;

/// Result type for signer source operations
pub type Result<T> = std::result::Result<T, SourceError>;

/// Errors that can occur while retrieving signing information
#[derive(Error, Debug)]
pub enum SourceError {
    /// Signing material location does not exist
    #[error("Signing material not found: {0}")]
    NotFound(String),

    /// Location exists but holds no signers
    #[error("No signers found: {0}")]
    NoSigners(String),

    /// Certificate could not be decoded
    #[error("Invalid certificate: {0}")]
    InvalidCertificate(String),

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(String),

    /// Chain has no sources registered
    #[error("No signer sources configured")]
    NoSources,

    /// Source reported a failure of its own
    #[error("Source failed: {0}")]
    Failed(String),
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => SourceError::NotFound(err.to_string()),
            _ => SourceError::Io(err.to_string()),
        }
    }
}

impl From<base64::DecodeError> for SourceError {
    fn from(err: base64::DecodeError) -> Self {
        SourceError::InvalidCertificate(format!("invalid PEM body: {}", err))
    }
}
