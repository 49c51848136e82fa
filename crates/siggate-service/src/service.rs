//! Host-facing signature service
//!
//! Wires a signer source, the integrity guard and the gated cipher together
//! and exposes the four host operations. Every cipher call re-checks the
//! running signer before touching the engine.

use std::sync::Arc;
use tracing::{debug, info, warn};

use siggate_core::{
    CheckResult, CipherEngine, CipherText, DigestSigner, FingerprintAlgorithm, IntegrityGuard,
    Observation,
};
use siggate_source::{
    extract_fingerprint, CertificateDirSource, PemBundleSource, SignerSource, SourceChainBuilder,
    SourceError,
};

use crate::config::ServiceConfig;
use crate::error::{Result, ServiceError};

/// Signature-gated cipher service
pub struct SignatureService {
    source: Arc<dyn SignerSource>,
    guard: IntegrityGuard,
    algorithm: FingerprintAlgorithm,
    engine: CipherEngine,
    signer: DigestSigner,
}

impl SignatureService {
    /// Build the service over an explicit signer source
    pub fn new(config: &ServiceConfig, source: Arc<dyn SignerSource>) -> Result<Self> {
        let guard = IntegrityGuard::new(config.expected.clone());
        let binding = config.expected.fingerprint;

        let engine = CipherEngine::new(&config.secret, &binding)?;
        let signer = match config.sign_key {
            Some(ref key) => DigestSigner::new(key.as_bytes())?,
            None => DigestSigner::derive(&config.secret, &binding)?,
        };

        info!(
            source = %source.kind(),
            description = source.description(),
            algorithm = %config.algorithm,
            "Signature service initialized"
        );

        Ok(Self {
            source,
            guard,
            algorithm: config.algorithm,
            engine,
            signer,
        })
    }

    /// Build the service with sources named by the configuration
    ///
    /// The certificate directory is tried before the bundle.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let package_name = config.package_name.clone().unwrap_or_default();
        let mut builder = SourceChainBuilder::new();

        if let Some(ref dir) = config.certificate_dir {
            builder = builder.with_source(CertificateDirSource::new(package_name.clone(), dir));
        }
        if let Some(ref bundle) = config.certificate_bundle {
            builder = builder.with_source(PemBundleSource::new(package_name, bundle));
        }

        let chain = builder.build();
        if chain.is_empty() {
            return Err(ServiceError::Source(SourceError::NoSources));
        }

        Self::new(config, Arc::new(chain))
    }

    /// Source used to observe the running signer
    pub fn source(&self) -> &dyn SignerSource {
        self.source.as_ref()
    }

    pub fn guard(&self) -> &IntegrityGuard {
        &self.guard
    }

    /// Fingerprint of the first signer of the running application
    pub fn get_signature_fingerprint(&self) -> Observation {
        extract_fingerprint(self.source.as_ref(), self.algorithm)
    }

    /// Verify the running signer against the expected identity
    pub fn check_integrity(&self) -> CheckResult {
        match self.source.signing_info() {
            Ok(info) => self.guard.check_info(&info),
            Err(e) => {
                warn!(
                    source = %self.source.kind(),
                    error = %e,
                    "Signing information unavailable"
                );
                CheckResult::Unavailable
            }
        }
    }

    /// `check_integrity` narrowed to the legacy integer status
    pub fn check_integrity_code(&self) -> i32 {
        self.check_integrity().legacy_code()
    }

    /// Encrypt text, refusing when the integrity gate is not verified
    pub fn encrypt(&self, text: &str) -> Result<String> {
        if text.is_empty() {
            return Err(ServiceError::EmptyInput("text to encrypt"));
        }

        let gate = self.check_integrity();
        let ciphertext = self.engine.encode_str(text, &gate)?;
        debug!(len = text.len(), "Text encrypted");
        Ok(ciphertext.into_string())
    }

    /// Decrypt text produced by `encrypt`
    pub fn decrypt(&self, ciphertext: &str) -> Result<String> {
        if ciphertext.trim().is_empty() {
            return Err(ServiceError::EmptyInput("ciphertext to decrypt"));
        }

        let gate = self.check_integrity();
        let text = self.engine.decode_str(&CipherText::new(ciphertext), &gate)?;
        debug!(len = text.len(), "Text decrypted");
        Ok(text)
    }

    /// Hex HMAC-SHA256 digest of text
    pub fn sign(&self, text: &str) -> Result<String> {
        if text.is_empty() {
            return Err(ServiceError::EmptyInput("text to sign"));
        }

        let gate = self.check_integrity();
        Ok(self.signer.sign(text.as_bytes(), &gate)?)
    }
}
