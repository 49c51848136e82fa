//! Fingerprint extraction from signing identities
//!
//! A fingerprint is a fixed-width value derived deterministically from the
//! bytes of the authoritative signer. Two algorithms are supported:
//!
//! - `Sha256`: SHA-256 over the certificate bytes. Collision resistant and the
//!   only algorithm suitable as a security gate.
//! - `LegacyHash`: the 32-bit array hash the Android platform reports for a
//!   `Signature` (`h = 31 * h + b` over signed bytes, seeded with 1). Existing
//!   deployments configure this value as `signature_hash`.
//!
//! Textual forms are `sha256:<hex>` and `legacy:<decimal>`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::{CoreError, Result};
use crate::types::{SigningIdentity, SigningInfo};

/// Fingerprint algorithm selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FingerprintAlgorithm {
    /// SHA-256 digest of the certificate
    #[default]
    Sha256,
    /// 32-bit platform array hash
    Legacy,
}

impl fmt::Display for FingerprintAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FingerprintAlgorithm::Sha256 => write!(f, "sha256"),
            FingerprintAlgorithm::Legacy => write!(f, "legacy"),
        }
    }
}

impl FromStr for FingerprintAlgorithm {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(FingerprintAlgorithm::Sha256),
            "legacy" | "hashcode" => Ok(FingerprintAlgorithm::Legacy),
            other => Err(CoreError::InvalidFingerprint(format!(
                "unknown fingerprint algorithm: {}",
                other
            ))),
        }
    }
}

/// Deterministic identifier derived from a signing identity
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fingerprint {
    /// SHA-256 digest of the certificate bytes
    Sha256([u8; 32]),
    /// Legacy 32-bit platform hash
    LegacyHash(i32),
}

impl Fingerprint {
    /// Compute a fingerprint of `identity` with the given algorithm
    pub fn compute(identity: &SigningIdentity, algorithm: FingerprintAlgorithm) -> Self {
        match algorithm {
            FingerprintAlgorithm::Sha256 => Self::sha256(identity.as_bytes()),
            FingerprintAlgorithm::Legacy => Self::legacy_hash(identity.as_bytes()),
        }
    }

    /// SHA-256 fingerprint of raw certificate bytes
    pub fn sha256(bytes: &[u8]) -> Self {
        Fingerprint::Sha256(Sha256::digest(bytes).into())
    }

    /// Legacy platform hash of raw certificate bytes
    pub fn legacy_hash(bytes: &[u8]) -> Self {
        let hash = bytes.iter().fold(1i32, |h, &b| {
            h.wrapping_mul(31).wrapping_add(b as i8 as i32)
        });
        Fingerprint::LegacyHash(hash)
    }

    /// Legacy fingerprint from a configured 32-bit value such as `0xDEADBEEF`
    pub fn legacy(value: u32) -> Self {
        Fingerprint::LegacyHash(value as i32)
    }

    pub fn algorithm(&self) -> FingerprintAlgorithm {
        match self {
            Fingerprint::Sha256(_) => FingerprintAlgorithm::Sha256,
            Fingerprint::LegacyHash(_) => FingerprintAlgorithm::Legacy,
        }
    }

    /// Canonical byte form: algorithm tag followed by the value
    ///
    /// Distinct fingerprints always have distinct canonical bytes, including
    /// across algorithms.
    pub fn to_canonical_bytes(&self) -> Vec<u8> {
        match self {
            Fingerprint::Sha256(digest) => {
                let mut out = Vec::with_capacity(33);
                out.push(0x01);
                out.extend_from_slice(digest);
                out
            }
            Fingerprint::LegacyHash(hash) => {
                let mut out = Vec::with_capacity(5);
                out.push(0x02);
                out.extend_from_slice(&hash.to_be_bytes());
                out
            }
        }
    }

    /// Whether this algorithm is collision resistant
    pub fn is_collision_resistant(&self) -> bool {
        matches!(self, Fingerprint::Sha256(_))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fingerprint::Sha256(digest) => write!(f, "sha256:{}", hex::encode(digest)),
            Fingerprint::LegacyHash(hash) => write!(f, "legacy:{}", hash),
        }
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self)
    }
}

impl FromStr for Fingerprint {
    type Err = CoreError;

    /// Parse a fingerprint from text
    ///
    /// Accepted forms:
    /// - `sha256:<64 hex>` or bare 64 hex digits (colons allowed between bytes)
    /// - `legacy:<i32>` or a bare decimal integer
    /// - `0x` followed by up to 8 hex digits (legacy)
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CoreError::InvalidFingerprint("empty fingerprint".into()));
        }

        if let Some(rest) = s.strip_prefix("sha256:") {
            return parse_sha256(rest);
        }
        if let Some(rest) = s.strip_prefix("legacy:") {
            return parse_legacy(rest);
        }
        if let Some(hex_digits) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            return u32::from_str_radix(hex_digits, 16)
                .map(Fingerprint::legacy)
                .map_err(|e| CoreError::InvalidFingerprint(format!("invalid legacy hex: {}", e)));
        }

        let compact: String = s.chars().filter(|c| *c != ':').collect();
        if compact.len() == 64 {
            return parse_sha256(s);
        }
        parse_legacy(s)
    }
}

fn parse_sha256(text: &str) -> Result<Fingerprint> {
    let compact: String = text.chars().filter(|c| *c != ':').collect();
    let bytes = hex::decode(&compact)
        .map_err(|e| CoreError::InvalidFingerprint(format!("invalid sha256 hex: {}", e)))?;
    let digest: [u8; 32] = bytes.try_into().map_err(|_| {
        CoreError::InvalidFingerprint("sha256 fingerprint must be 32 bytes".into())
    })?;
    Ok(Fingerprint::Sha256(digest))
}

fn parse_legacy(text: &str) -> Result<Fingerprint> {
    // Accept both the signed form the platform reports and its unsigned spelling.
    if let Ok(value) = text.parse::<i32>() {
        return Ok(Fingerprint::LegacyHash(value));
    }
    text.parse::<u32>()
        .map(Fingerprint::legacy)
        .map_err(|e| CoreError::InvalidFingerprint(format!("invalid legacy hash '{}': {}", text, e)))
}

impl Serialize for Fingerprint {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Signing information could not be retrieved
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Signing information unavailable: {reason}")]
pub struct Unavailable {
    pub reason: String,
}

impl Unavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Observed fingerprint, or the reason it could not be observed
pub type Observation = std::result::Result<Fingerprint, Unavailable>;

/// Extract the fingerprint of the authoritative (first) signer
///
/// Returns `Unavailable` when the signing info carries no signers or the
/// first signer is empty.
pub fn extract(info: &SigningInfo, algorithm: FingerprintAlgorithm) -> Observation {
    let signer = info
        .first_signer()
        .ok_or_else(|| Unavailable::new(format!("no signers for package '{}'", info.package_name)))?;

    if signer.is_empty() {
        return Err(Unavailable::new("first signer has no certificate bytes"));
    }

    Ok(Fingerprint::compute(signer, algorithm))
}
