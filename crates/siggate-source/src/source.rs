//! Signer sources - retrieve signing information and route between branches

use std::sync::Arc;
use tracing::{debug, info, warn};

use siggate_core::{extract, FingerprintAlgorithm, Observation, SigningInfo, Unavailable};

use crate::error::{Result, SourceError};

/// Retrieval branch a source implements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Current mechanism: one certificate per file in a directory
    SigningCertificates,
    /// Older mechanism: a single bundle listing every signature
    LegacySignatures,
    /// In-memory signing info
    Static,
    /// Ordered chain of other sources
    Chain,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::SigningCertificates => write!(f, "signing-certificates"),
            SourceKind::LegacySignatures => write!(f, "legacy-signatures"),
            SourceKind::Static => write!(f, "static"),
            SourceKind::Chain => write!(f, "chain"),
        }
    }
}

/// Trait for signing information sources
///
/// Each source reads the code-signing metadata of the running application
/// through one platform mechanism. Calls are bounded and are not retried:
/// signing information cannot change within a process lifetime.
pub trait SignerSource: Send + Sync {
    /// Get the retrieval branch this source implements
    fn kind(&self) -> SourceKind;

    /// Retrieve package name and signers
    ///
    /// # Returns
    /// * `Ok(SigningInfo)` - Signing info, possibly with no signers
    /// * `Err(SourceError)` - If the metadata could not be read
    fn signing_info(&self) -> Result<SigningInfo>;

    /// Get a description of this source (for logging)
    fn description(&self) -> &str {
        "signer source"
    }
}

/// Retrieve signing info and fingerprint the first signer
///
/// Any retrieval failure becomes `Unavailable`.
pub fn extract_fingerprint(source: &dyn SignerSource, algorithm: FingerprintAlgorithm) -> Observation {
    let info = source.signing_info().map_err(|e| {
        warn!(
            source = %source.kind(),
            error = %e,
            "Signing information unavailable"
        );
        Unavailable::new(e.to_string())
    })?;

    extract(&info, algorithm)
}

/// Source chain - tries each branch in order
///
/// Returns the first signing info that carries at least one signer. When
/// every branch fails, the last error is returned.
pub struct SourceChain {
    sources: Vec<Arc<dyn SignerSource>>,
}

impl SourceChain {
    /// Create a new empty chain
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Append a source
    pub fn register_source<S: SignerSource + 'static>(&mut self, source: S) {
        info!(
            kind = %source.kind(),
            description = source.description(),
            "Registered signer source"
        );
        self.sources.push(Arc::new(source));
    }

    /// Number of registered sources
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Kinds of the registered sources, in order
    pub fn registered_kinds(&self) -> Vec<SourceKind> {
        self.sources.iter().map(|s| s.kind()).collect()
    }
}

impl Default for SourceChain {
    fn default() -> Self {
        Self::new()
    }
}

impl SignerSource for SourceChain {
    fn kind(&self) -> SourceKind {
        SourceKind::Chain
    }

    fn description(&self) -> &str {
        "ordered signer source chain"
    }

    fn signing_info(&self) -> Result<SigningInfo> {
        let mut last_error = SourceError::NoSources;

        for source in &self.sources {
            match source.signing_info() {
                Ok(info) if !info.signers.is_empty() => {
                    debug!(
                        kind = %source.kind(),
                        package = %info.package_name,
                        signers = info.signers.len(),
                        "Signing information retrieved"
                    );
                    return Ok(info);
                }
                Ok(info) => {
                    debug!(kind = %source.kind(), "Source reported no signers");
                    last_error = SourceError::NoSigners(format!(
                        "{} source has no signers for '{}'",
                        source.kind(),
                        info.package_name
                    ));
                }
                Err(e) => {
                    debug!(kind = %source.kind(), error = %e, "Source failed");
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}

/// Builder for creating a SourceChain
pub struct SourceChainBuilder {
    chain: SourceChain,
}

impl SourceChainBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            chain: SourceChain::new(),
        }
    }

    /// Add a source
    pub fn with_source<S: SignerSource + 'static>(mut self, source: S) -> Self {
        self.chain.register_source(source);
        self
    }

    /// Build the chain
    pub fn build(self) -> SourceChain {
        self.chain
    }
}

impl Default for SourceChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use siggate_core::Fingerprint;

    struct FixedSource {
        kind: SourceKind,
        info: Option<SigningInfo>,
    }

    impl SignerSource for FixedSource {
        fn kind(&self) -> SourceKind {
            self.kind
        }

        fn signing_info(&self) -> Result<SigningInfo> {
            self.info
                .clone()
                .ok_or_else(|| SourceError::NotFound("fixed source".into()))
        }
    }

    fn signed(cert: &[u8]) -> Option<SigningInfo> {
        Some(SigningInfo::new("com.example.app").with_signer(cert.to_vec()))
    }

    #[test]
    fn test_empty_chain() {
        let chain = SourceChain::new();
        assert!(matches!(chain.signing_info(), Err(SourceError::NoSources)));
    }

    #[test]
    fn test_first_successful_source_wins() {
        let chain = SourceChainBuilder::new()
            .with_source(FixedSource {
                kind: SourceKind::SigningCertificates,
                info: signed(b"modern"),
            })
            .with_source(FixedSource {
                kind: SourceKind::LegacySignatures,
                info: signed(b"legacy"),
            })
            .build();

        let info = chain.signing_info().unwrap();
        assert_eq!(info.first_signer().unwrap().as_bytes(), b"modern");
    }

    #[test]
    fn test_falls_back_to_next_branch() {
        let chain = SourceChainBuilder::new()
            .with_source(FixedSource {
                kind: SourceKind::SigningCertificates,
                info: None,
            })
            .with_source(FixedSource {
                kind: SourceKind::LegacySignatures,
                info: signed(b"legacy"),
            })
            .build();

        assert_eq!(
            chain.registered_kinds(),
            vec![SourceKind::SigningCertificates, SourceKind::LegacySignatures]
        );
        let info = chain.signing_info().unwrap();
        assert_eq!(info.first_signer().unwrap().as_bytes(), b"legacy");
    }

    #[test]
    fn test_skips_source_without_signers() {
        let chain = SourceChainBuilder::new()
            .with_source(FixedSource {
                kind: SourceKind::SigningCertificates,
                info: Some(SigningInfo::new("com.example.app")),
            })
            .build();

        assert!(matches!(chain.signing_info(), Err(SourceError::NoSigners(_))));
    }

    #[test]
    fn test_extract_fingerprint_maps_failure_to_unavailable() {
        let source = FixedSource {
            kind: SourceKind::Static,
            info: None,
        };
        let observed = extract_fingerprint(&source, FingerprintAlgorithm::Sha256);
        assert!(observed.is_err());
    }

    #[test]
    fn test_extract_fingerprint_first_signer() {
        let source = FixedSource {
            kind: SourceKind::Static,
            info: signed(b"cert"),
        };
        let observed = extract_fingerprint(&source, FingerprintAlgorithm::Sha256);
        assert_eq!(observed, Ok(Fingerprint::sha256(b"cert")));
    }
}
