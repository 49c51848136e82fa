//! Service configuration
//!
//! Loaded once at start-up: JSON file first, then environment overrides, then
//! validation into an immutable `ServiceConfig`.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use siggate_core::{ExpectedFingerprint, Fingerprint, FingerprintAlgorithm, KeyMaterial};

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "SIGGATE_";

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Missing required config field: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Configuration as written in `config.json`
///
/// Unknown keys (including `_comment*` annotations and build-only fields)
/// are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfig {
    /// Expected package name
    #[serde(default)]
    pub package_name: Option<String>,

    /// Expected fingerprint; a JSON number is read as a legacy hash
    #[serde(default)]
    pub signature_hash: Option<serde_json::Value>,

    /// Base64 cipher secret
    #[serde(default)]
    pub cipher_secret: Option<String>,

    /// Raw text key from older configurations
    #[serde(default)]
    pub aes_key: Option<String>,

    /// Optional HMAC key for `sign`
    #[serde(default)]
    pub sign_key: Option<String>,

    /// `sha256` or `legacy`
    #[serde(default)]
    pub fingerprint_algorithm: Option<String>,

    /// Signing-certificates branch location
    #[serde(default)]
    pub certificate_dir: Option<PathBuf>,

    /// Legacy-signatures branch location
    #[serde(default)]
    pub certificate_bundle: Option<PathBuf>,
}

impl RawConfig {
    /// Read a JSON config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Apply `SIGGATE_*` overrides from `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(v) = var("PACKAGE_NAME") {
            self.package_name = Some(v);
        }
        if let Some(v) = var("SIGNATURE_HASH") {
            self.signature_hash = Some(serde_json::Value::String(v));
        }
        if let Some(v) = var("CIPHER_SECRET") {
            self.cipher_secret = Some(v);
        }
        if let Some(v) = var("SIGN_KEY") {
            self.sign_key = Some(v);
        }
        if let Some(v) = var("FINGERPRINT_ALGORITHM") {
            self.fingerprint_algorithm = Some(v);
        }
        if let Some(v) = var("CERTIFICATE_DIR") {
            self.certificate_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = var("CERTIFICATE_BUNDLE") {
            self.certificate_bundle = Some(PathBuf::from(v));
        }
    }

    /// Validate into a `ServiceConfig`
    pub fn validate(self) -> Result<ServiceConfig, ConfigError> {
        let fingerprint = match self.signature_hash {
            None | Some(serde_json::Value::Null) => return Err(ConfigError::Missing("signature_hash")),
            Some(serde_json::Value::Number(n)) => n.to_string().parse::<Fingerprint>(),
            Some(serde_json::Value::String(s)) => s.parse::<Fingerprint>(),
            Some(other) => {
                return Err(ConfigError::Invalid {
                    field: "signature_hash",
                    reason: format!("expected string or number, got {}", other),
                })
            }
        }
        .map_err(|e| ConfigError::Invalid {
            field: "signature_hash",
            reason: e.to_string(),
        })?;

        let algorithm = match self.fingerprint_algorithm {
            Some(ref name) => name.parse::<FingerprintAlgorithm>().map_err(|e| {
                ConfigError::Invalid {
                    field: "fingerprint_algorithm",
                    reason: e.to_string(),
                }
            })?,
            None => fingerprint.algorithm(),
        };

        if algorithm != fingerprint.algorithm() {
            return Err(ConfigError::Invalid {
                field: "fingerprint_algorithm",
                reason: format!(
                    "signature_hash is a {} fingerprint but {} was requested",
                    fingerprint.algorithm(),
                    algorithm
                ),
            });
        }

        let secret = match (self.cipher_secret, self.aes_key) {
            (Some(encoded), _) => KeyMaterial::from_base64(&encoded),
            (None, Some(raw)) => {
                warn!("Using raw aes_key from configuration; prefer a base64 cipher_secret");
                KeyMaterial::new(raw.into_bytes())
            }
            (None, None) => return Err(ConfigError::Missing("cipher_secret")),
        }
        .map_err(|e| ConfigError::Invalid {
            field: "cipher_secret",
            reason: e.to_string(),
        })?;

        let sign_key = match self.sign_key {
            Some(key) if key.is_empty() => {
                return Err(ConfigError::Invalid {
                    field: "sign_key",
                    reason: "cannot be empty".into(),
                })
            }
            other => other,
        };

        let package_name = self.package_name.filter(|name| !name.is_empty());

        let mut expected = ExpectedFingerprint::new(fingerprint);
        if let Some(ref name) = package_name {
            expected = expected.with_package(name.clone());
        }

        info!(
            expected = %expected.fingerprint,
            package = ?package_name,
            algorithm = %algorithm,
            "Configuration loaded"
        );

        Ok(ServiceConfig {
            expected,
            algorithm,
            secret,
            sign_key,
            package_name,
            certificate_dir: self.certificate_dir,
            certificate_bundle: self.certificate_bundle,
        })
    }
}

/// Validated, immutable service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Expected signer (and package)
    pub expected: ExpectedFingerprint,

    /// Algorithm used to fingerprint observed signers
    pub algorithm: FingerprintAlgorithm,

    /// Cipher secret
    pub secret: KeyMaterial,

    /// HMAC key for `sign`; derived from `secret` when absent
    pub sign_key: Option<String>,

    /// Package name reported for file-based sources
    pub package_name: Option<String>,

    pub certificate_dir: Option<PathBuf>,
    pub certificate_bundle: Option<PathBuf>,
}

impl ServiceConfig {
    /// Load from an optional file plus process environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut raw = match path {
            Some(path) => RawConfig::from_file(path)?,
            None => RawConfig::default(),
        };
        raw.apply_env(|name| std::env::var(name).ok());
        raw.validate()
    }
}
