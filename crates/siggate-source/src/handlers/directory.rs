//! Signing-certificates source
//!
//! Reads one certificate per file from a directory. Files are ordered by file
//! name; the first file is the first signer.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use siggate_core::SigningInfo;

use crate::certificate::{decode_certificates, read_bounded};
use crate::error::{Result, SourceError};
use crate::source::{SignerSource, SourceKind};

/// File extensions recognized as certificates
pub const CERTIFICATE_EXTENSIONS: &[&str] = &["der", "cer", "crt", "pem"];

/// Most certificate files considered in one directory
pub const MAX_SIGNERS: usize = 16;

/// Directory of certificate files
pub struct CertificateDirSource {
    package_name: String,
    dir: PathBuf,
    description: String,
}

impl CertificateDirSource {
    /// Create a source for `package_name` reading certificates from `dir`
    pub fn new(package_name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let description = format!("certificate directory {}", dir.display());
        Self {
            package_name: package_name.into(),
            dir,
            description,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn certificate_files(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.is_dir() {
            return Err(SourceError::NotFound(format!(
                "{} is not a directory",
                self.dir.display()
            )));
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.is_file() && has_certificate_extension(&path) {
                files.push(path);
            }
        }
        files.sort();

        if files.len() > MAX_SIGNERS {
            warn!(
                dir = %self.dir.display(),
                found = files.len(),
                limit = MAX_SIGNERS,
                "Too many certificate files, ignoring the rest"
            );
            files.truncate(MAX_SIGNERS);
        }

        Ok(files)
    }
}

fn has_certificate_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            CERTIFICATE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

impl SignerSource for CertificateDirSource {
    fn kind(&self) -> SourceKind {
        SourceKind::SigningCertificates
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn signing_info(&self) -> Result<SigningInfo> {
        let mut info = SigningInfo::new(self.package_name.clone());

        for path in self.certificate_files()? {
            let bytes = read_bounded(&path)?;
            let mut certificates = decode_certificates(&bytes)?.into_iter();

            match certificates.next() {
                Some(identity) => {
                    debug!(file = %path.display(), len = identity.len(), "Loaded signer certificate");
                    info.signers.push(identity);
                }
                None => {
                    warn!(file = %path.display(), "Certificate file is empty");
                    continue;
                }
            }

            if certificates.next().is_some() {
                warn!(
                    file = %path.display(),
                    "Certificate file holds several blocks, only the first is used"
                );
            }
        }

        if info.signers.is_empty() {
            return Err(SourceError::NoSigners(format!(
                "no certificates in {}",
                self.dir.display()
            )));
        }

        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificate::encode_pem;

    #[test]
    fn test_reads_files_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b-second.der"), b"second").unwrap();
        fs::write(dir.path().join("a-first.pem"), encode_pem(b"first")).unwrap();
        fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

        let source = CertificateDirSource::new("com.example.app", dir.path());
        let info = source.signing_info().unwrap();

        assert_eq!(info.package_name, "com.example.app");
        assert_eq!(info.signers.len(), 2);
        assert_eq!(info.signers[0].as_bytes(), b"first");
        assert_eq!(info.signers[1].as_bytes(), b"second");
    }

    #[test]
    fn test_missing_directory() {
        let source = CertificateDirSource::new("com.example.app", "/nonexistent/siggate/certs");
        assert!(matches!(source.signing_info(), Err(SourceError::NotFound(_))));
    }

    #[test]
    fn test_directory_without_certificates() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("readme.md"), b"nothing here").unwrap();

        let source = CertificateDirSource::new("com.example.app", dir.path());
        assert!(matches!(source.signing_info(), Err(SourceError::NoSigners(_))));
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert!(has_certificate_extension(Path::new("release.CER")));
        assert!(!has_certificate_extension(Path::new("release")));
    }
}
