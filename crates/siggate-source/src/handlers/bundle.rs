//! Legacy-signatures source
//!
//! Reads a single bundle file listing every signature as concatenated PEM
//! `CERTIFICATE` blocks (or one raw DER certificate). Block order is signer
//! order.

use std::path::{Path, PathBuf};
use tracing::debug;

use siggate_core::SigningInfo;

use crate::certificate::{decode_certificates, read_bounded};
use crate::error::{Result, SourceError};
use crate::source::{SignerSource, SourceKind};

/// Bundle of PEM certificates
pub struct PemBundleSource {
    package_name: String,
    path: PathBuf,
    description: String,
}

impl PemBundleSource {
    pub fn new(package_name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let description = format!("certificate bundle {}", path.display());
        Self {
            package_name: package_name.into(),
            path,
            description,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SignerSource for PemBundleSource {
    fn kind(&self) -> SourceKind {
        SourceKind::LegacySignatures
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn signing_info(&self) -> Result<SigningInfo> {
        let bytes = read_bounded(&self.path)?;
        let signers = decode_certificates(&bytes)?;

        if signers.is_empty() {
            return Err(SourceError::NoSigners(format!(
                "no certificates in {}",
                self.path.display()
            )));
        }

        debug!(
            bundle = %self.path.display(),
            signers = signers.len(),
            "Loaded signature bundle"
        );

        Ok(SigningInfo {
            package_name: self.package_name.clone(),
            signers,
        })
    }
}
