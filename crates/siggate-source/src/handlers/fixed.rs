//! Static signer source
//!
//! For embedding and testing - returns fixed signing info or a fixed failure.

use siggate_core::SigningInfo;

use crate::error::{Result, SourceError};
use crate::source::{SignerSource, SourceKind};

/// Static signer source
pub struct StaticSource {
    outcome: std::result::Result<SigningInfo, String>,
}

impl StaticSource {
    /// Always return `info`
    pub fn new(info: SigningInfo) -> Self {
        Self { outcome: Ok(info) }
    }

    /// Always fail with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
        }
    }
}

impl SignerSource for StaticSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Static
    }

    fn description(&self) -> &str {
        "static signer source"
    }

    fn signing_info(&self) -> Result<SigningInfo> {
        self.outcome
            .clone()
            .map_err(SourceError::Failed)
    }
}
