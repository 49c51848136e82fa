//! Gated keyed digest
//!
//! HMAC-SHA256 over caller text, hex encoded. Like the cipher, it refuses to
//! run unless the integrity gate is verified.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;
use zeroize::Zeroizing;

use crate::cipher::{authorize, KeyMaterial};
use crate::error::{CoreError, Result};
use crate::fingerprint::Fingerprint;
use crate::guard::CheckResult;

type HmacSha256 = Hmac<Sha256>;

const SIGN_KEY_INFO: &[u8] = b"siggate/sign/v1";

/// Keyed digest over text
pub struct DigestSigner {
    key: Zeroizing<Vec<u8>>,
}

impl fmt::Debug for DigestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestSigner")
            .field("key", &"[redacted]")
            .finish()
    }
}

impl DigestSigner {
    /// Use an explicit signing key
    pub fn new(key: &[u8]) -> Result<Self> {
        if key.is_empty() {
            return Err(CoreError::InvalidKeyMaterial("sign key cannot be empty".into()));
        }
        Ok(Self {
            key: Zeroizing::new(key.to_vec()),
        })
    }

    /// Derive the signing key from the cipher secret and signer binding
    pub fn derive(secret: &KeyMaterial, binding: &Fingerprint) -> Result<Self> {
        let key = Zeroizing::new(secret.derive(binding, SIGN_KEY_INFO)?);
        Self::new(key.as_slice())
    }

    /// Hex HMAC-SHA256 digest of `text`
    pub fn sign(&self, text: &[u8], gate: &CheckResult) -> Result<String> {
        authorize(gate, "sign")?;
        let mut mac = self.mac()?;
        mac.update(text);
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Verify a hex digest in constant time
    pub fn verify(&self, text: &[u8], digest_hex: &str, gate: &CheckResult) -> Result<bool> {
        authorize(gate, "verify")?;
        let expected = match hex::decode(digest_hex.trim()) {
            Ok(bytes) => bytes,
            Err(_) => return Ok(false),
        };
        let mut mac = self.mac()?;
        mac.update(text);
        Ok(mac.verify_slice(&expected).is_ok())
    }

    fn mac(&self) -> Result<HmacSha256> {
        HmacSha256::new_from_slice(&self.key)
            .map_err(|e| CoreError::InvalidKeyMaterial(e.to_string()))
    }
}
