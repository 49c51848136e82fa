//! Gated AES-256-GCM cipher engine
//!
//! The engine holds a key derived once, at construction, from the configured
//! secret and the expected signer fingerprint. Every operation takes the
//! integrity gate as an explicit argument and fails closed unless the gate is
//! `Verified`.
//!
//! Wire format (before base64):
//!
//! ```text
//! +---------+-----------+---------------------------+----------+
//! | version | nonce(12) | AES-256-GCM ciphertext    | tag(16)  |
//! +---------+-----------+---------------------------+----------+
//! ```
//!
//! The version byte is authenticated as associated data. A fresh random nonce
//! is generated for every `encode`.

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::{engine::general_purpose::STANDARD, Engine};
use hkdf::Hkdf;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use std::fmt;
use tracing::{debug, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CoreError, Result};
use crate::fingerprint::Fingerprint;
use crate::guard::CheckResult;

/// Current ciphertext format version
pub const FORMAT_VERSION: u8 = 0x01;

/// AES-GCM nonce length in bytes
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes
pub const TAG_LEN: usize = 16;

/// Version byte plus nonce
pub const HEADER_LEN: usize = 1 + NONCE_LEN;

/// Largest plaintext accepted by `encode`
pub const MAX_PLAINTEXT_LEN: usize = 16 * 1024 * 1024;

/// Largest encoded ciphertext accepted by `decode`
pub const MAX_ENCODED_LEN: usize = (HEADER_LEN + MAX_PLAINTEXT_LEN + TAG_LEN).div_ceil(3) * 4;

/// Minimum length of the configured secret
pub const MIN_SECRET_LEN: usize = 16;

const CIPHER_KEY_INFO: &[u8] = b"siggate/cipher/v1";

/// Secret key material supplied by configuration
///
/// Zeroized on drop; never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial {
    secret: Vec<u8>,
}

impl KeyMaterial {
    /// Wrap raw secret bytes (at least `MIN_SECRET_LEN` bytes)
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self> {
        let secret = secret.into();
        if secret.len() < MIN_SECRET_LEN {
            return Err(CoreError::InvalidKeyMaterial(format!(
                "secret must be at least {} bytes, got {}",
                MIN_SECRET_LEN,
                secret.len()
            )));
        }
        Ok(Self { secret })
    }

    /// Decode a base64 secret
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let secret = STANDARD.decode(encoded.trim()).map_err(|e| {
            CoreError::InvalidKeyMaterial(format!("invalid base64 secret: {}", e))
        })?;
        Self::new(secret)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.secret
    }

    /// Derive a 32-byte subkey bound to `binding`
    pub(crate) fn derive(&self, binding: &Fingerprint, info: &[u8]) -> Result<[u8; 32]> {
        let salt = binding.to_canonical_bytes();
        let hk = Hkdf::<Sha256>::new(Some(&salt), &self.secret);
        let mut okm = [0u8; 32];
        hk.expand(info, &mut okm)
            .map_err(|e| CoreError::InvalidKeyMaterial(format!("key derivation failed: {}", e)))?;
        Ok(okm)
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("secret", &"[redacted]")
            .finish()
    }
}

/// Encoded ciphertext: base64 text of version, nonce and sealed payload
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CipherText(String);

impl CipherText {
    /// Wrap encoded text without validating it
    ///
    /// Validation happens in `CipherEngine::decode`.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encode raw ciphertext bytes
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(STANDARD.encode(bytes))
    }

    /// Decode to raw ciphertext bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        if self.0.len() > MAX_ENCODED_LEN {
            return Err(CoreError::MalformedCipherText(format!(
                "encoded ciphertext exceeds {} bytes",
                MAX_ENCODED_LEN
            )));
        }
        Ok(STANDARD.decode(&self.0)?)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CipherText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CipherText {
    fn from(encoded: String) -> Self {
        Self(encoded)
    }
}

/// Refuse unless the gate is verified
pub(crate) fn authorize(gate: &CheckResult, operation: &'static str) -> Result<()> {
    if gate.is_verified() {
        Ok(())
    } else {
        warn!(gate = %gate, operation, "SECURITY: Operation refused by integrity gate");
        Err(CoreError::Integrity(*gate))
    }
}

/// Symmetric cipher bound to one signer
///
/// Immutable after construction and safe to share across threads.
pub struct CipherEngine {
    cipher: Aes256Gcm,
    binding: Fingerprint,
}

impl fmt::Debug for CipherEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherEngine")
            .field("binding", &self.binding)
            .field("key", &"[redacted]")
            .finish()
    }
}

impl CipherEngine {
    /// Derive the cipher key from `secret` and the expected signer fingerprint
    pub fn new(secret: &KeyMaterial, binding: &Fingerprint) -> Result<Self> {
        let mut key = secret.derive(binding, CIPHER_KEY_INFO)?;
        let cipher = Aes256Gcm::new_from_slice(&key)
            .map_err(|e| CoreError::InvalidKeyMaterial(e.to_string()));
        key.zeroize();

        debug!(binding = %binding, "Cipher engine initialized");

        Ok(Self {
            cipher: cipher?,
            binding: *binding,
        })
    }

    /// Fingerprint the key is bound to
    pub fn binding(&self) -> &Fingerprint {
        &self.binding
    }

    /// Encrypt `plaintext` under a fresh nonce
    pub fn encode(&self, plaintext: &[u8], gate: &CheckResult) -> Result<CipherText> {
        authorize(gate, "encode")?;
        Ok(CipherText::from_bytes(&self.seal(plaintext)?))
    }

    /// Decrypt an encoded ciphertext
    pub fn decode(&self, ciphertext: &CipherText, gate: &CheckResult) -> Result<Vec<u8>> {
        authorize(gate, "decode")?;
        let bytes = ciphertext.to_bytes()?;
        self.open(&bytes)
    }

    /// Decrypt raw ciphertext bytes
    pub fn decode_bytes(&self, bytes: &[u8], gate: &CheckResult) -> Result<Vec<u8>> {
        authorize(gate, "decode")?;
        self.open(bytes)
    }

    /// Encrypt UTF-8 text
    pub fn encode_str(&self, text: &str, gate: &CheckResult) -> Result<CipherText> {
        self.encode(text.as_bytes(), gate)
    }

    /// Decrypt to UTF-8 text
    ///
    /// A payload that authenticates but is not UTF-8 was not produced by
    /// `encode_str` and is reported as `KeyMismatch`.
    pub fn decode_str(&self, ciphertext: &CipherText, gate: &CheckResult) -> Result<String> {
        let bytes = self.decode(ciphertext, gate)?;
        String::from_utf8(bytes).map_err(|_| {
            CoreError::KeyMismatch("recovered payload is not UTF-8 text".into())
        })
    }

    fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        if plaintext.len() > MAX_PLAINTEXT_LEN {
            return Err(CoreError::InputTooLarge {
                len: plaintext.len(),
                max: MAX_PLAINTEXT_LEN,
            });
        }

        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let header = [FORMAT_VERSION];
        let sealed = self
            .cipher
            .encrypt(
                Nonce::from_slice(&nonce),
                Payload {
                    msg: plaintext,
                    aad: &header,
                },
            )
            .map_err(|_| CoreError::InputTooLarge {
                len: plaintext.len(),
                max: MAX_PLAINTEXT_LEN,
            })?;

        let mut out = Vec::with_capacity(HEADER_LEN + sealed.len());
        out.extend_from_slice(&header);
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&sealed);
        Ok(out)
    }

    fn open(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        if bytes.len() < HEADER_LEN + TAG_LEN {
            return Err(CoreError::MalformedCipherText(format!(
                "ciphertext too short: {} bytes, need at least {}",
                bytes.len(),
                HEADER_LEN + TAG_LEN
            )));
        }
        if bytes.len() > HEADER_LEN + MAX_PLAINTEXT_LEN + TAG_LEN {
            return Err(CoreError::MalformedCipherText(
                "ciphertext exceeds maximum payload size".into(),
            ));
        }
        if bytes[0] != FORMAT_VERSION {
            return Err(CoreError::MalformedCipherText(format!(
                "unsupported format version: {:#04x}",
                bytes[0]
            )));
        }

        let (header, sealed) = bytes.split_at(HEADER_LEN);
        let nonce = &header[1..];

        self.cipher
            .decrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: sealed,
                    aad: &header[..1],
                },
            )
            .map_err(|_| {
                warn!("SECURITY: Ciphertext failed authentication");
                CoreError::Authentication
            })
    }
}
