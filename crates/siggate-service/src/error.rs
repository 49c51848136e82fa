//! Service error types

use thiserror::Error;

use siggate_core::{CheckResult, CoreError};
use siggate_source::SourceError;

use crate::config::ConfigError;

/// Errors returned by the host-facing service
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Caller passed empty text
    #[error("Empty input: {0}")]
    EmptyInput(&'static str),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Signer source error: {0}")]
    Source(#[from] SourceError),
}

impl ServiceError {
    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::EmptyInput(_) => "EMPTY_INPUT",
            ServiceError::Core(err) => err.code(),
            ServiceError::Config(_) => "CONFIG_ERROR",
            ServiceError::Source(_) => "SOURCE_ERROR",
        }
    }

    /// Gate that refused the operation, if any
    pub fn integrity(&self) -> Option<CheckResult> {
        match self {
            ServiceError::Core(CoreError::Integrity(result)) => Some(*result),
            _ => None,
        }
    }
}

/// Result type for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;
