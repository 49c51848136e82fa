//! Signing material as reported by a platform source

use std::fmt;

/// Opaque bytes of a single code-signing certificate
///
/// Sources normalize certificates to their DER encoding so the same
/// certificate yields the same bytes regardless of how it was retrieved.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SigningIdentity(Vec<u8>);

impl SigningIdentity {
    /// Wrap raw certificate bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Raw certificate bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningIdentity")
            .field("len", &self.0.len())
            .finish()
    }
}

impl From<Vec<u8>> for SigningIdentity {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for SigningIdentity {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

/// Signing information for the calling application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningInfo {
    /// Package (application) name the signers belong to
    pub package_name: String,

    /// Signers in platform order; the first one is authoritative
    pub signers: Vec<SigningIdentity>,
}

impl SigningInfo {
    /// Create signing info with no signers
    pub fn new(package_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            signers: Vec::new(),
        }
    }

    /// Add a signer
    pub fn with_signer(mut self, signer: impl Into<SigningIdentity>) -> Self {
        self.signers.push(signer.into());
        self
    }

    /// The authoritative signer, if any
    pub fn first_signer(&self) -> Option<&SigningIdentity> {
        self.signers.first()
    }
}
