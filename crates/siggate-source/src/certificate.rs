//! Certificate decoding
//!
//! Signers are compared by their DER bytes. PEM input is unwrapped to DER so
//! a certificate yields the same identity whichever branch retrieved it.

use base64::{engine::general_purpose::STANDARD, Engine};
use std::fs;
use std::path::Path;

use siggate_core::SigningIdentity;

use crate::error::{Result, SourceError};

/// Largest certificate file read from disk
pub const MAX_CERTIFICATE_FILE_LEN: u64 = 1024 * 1024;

const PEM_BEGIN: &str = "-----BEGIN CERTIFICATE-----";
const PEM_END: &str = "-----END CERTIFICATE-----";

/// Read a certificate file with a size bound
pub fn read_bounded(path: &Path) -> Result<Vec<u8>> {
    let metadata = fs::metadata(path)
        .map_err(|e| SourceError::NotFound(format!("{}: {}", path.display(), e)))?;

    if metadata.len() > MAX_CERTIFICATE_FILE_LEN {
        return Err(SourceError::InvalidCertificate(format!(
            "{} is {} bytes, limit is {}",
            path.display(),
            metadata.len(),
            MAX_CERTIFICATE_FILE_LEN
        )));
    }

    Ok(fs::read(path)?)
}

/// Whether the bytes look like PEM text
pub fn is_pem(bytes: &[u8]) -> bool {
    std::str::from_utf8(bytes)
        .map(|text| text.contains(PEM_BEGIN))
        .unwrap_or(false)
}

/// Decode every PEM `CERTIFICATE` block, in order
pub fn decode_pem(text: &str) -> Result<Vec<SigningIdentity>> {
    let mut identities = Vec::new();
    let mut body: Option<String> = None;

    for line in text.lines() {
        let line = line.trim();
        if line == PEM_BEGIN {
            if body.is_some() {
                return Err(SourceError::InvalidCertificate(
                    "nested BEGIN CERTIFICATE".into(),
                ));
            }
            body = Some(String::new());
        } else if line == PEM_END {
            let encoded = body.take().ok_or_else(|| {
                SourceError::InvalidCertificate("END CERTIFICATE without BEGIN".into())
            })?;
            let der = STANDARD.decode(encoded.as_bytes())?;
            if der.is_empty() {
                return Err(SourceError::InvalidCertificate("empty certificate block".into()));
            }
            identities.push(SigningIdentity::new(der));
        } else if let Some(ref mut encoded) = body {
            encoded.push_str(line);
        }
    }

    if body.is_some() {
        return Err(SourceError::InvalidCertificate(
            "unterminated certificate block".into(),
        ));
    }

    Ok(identities)
}

/// Decode certificate bytes that are either PEM or raw DER
pub fn decode_certificates(bytes: &[u8]) -> Result<Vec<SigningIdentity>> {
    if is_pem(bytes) {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| SourceError::InvalidCertificate(e.to_string()))?;
        decode_pem(text)
    } else if bytes.is_empty() {
        Ok(Vec::new())
    } else {
        Ok(vec![SigningIdentity::new(bytes.to_vec())])
    }
}

/// Encode DER bytes as a PEM certificate block
pub fn encode_pem(der: &[u8]) -> String {
    let encoded = STANDARD.encode(der);
    let mut out = String::with_capacity(encoded.len() + 80);
    out.push_str(PEM_BEGIN);
    out.push('\n');
    for chunk in encoded.as_bytes().chunks(64) {
        out.push_str(&String::from_utf8_lossy(chunk));
        out.push('\n');
    }
    out.push_str(PEM_END);
    out.push('\n');
    out
}
