//! Signer Sources
//!
//! Sources retrieve the code-signing metadata of the running application and
//! hand it to the siggate core for fingerprinting.
//!
//! ## Retrieval Branches
//!
//! Platforms expose signing information through an older and a newer
//! mechanism. Both branches are supported and must agree on the fingerprint
//! for the same certificate:
//!
//! - **Signing certificates**: a directory with one certificate per file
//! - **Legacy signatures**: a single bundle of concatenated PEM blocks
//! - **Static**: fixed signing info, for embedding and tests
//!
//! ## Usage
//!
//! ```ignore
//! use siggate_source::{handlers::*, SourceChainBuilder, extract_fingerprint};
//!
//! let chain = SourceChainBuilder::new()
//!     .with_source(CertificateDirSource::new("com.example.app", "/etc/app/signers"))
//!     .with_source(PemBundleSource::new("com.example.app", "/etc/app/signatures.pem"))
//!     .build();
//!
//! let observed = extract_fingerprint(&chain, FingerprintAlgorithm::Sha256);
//! ```

pub mod certificate;
pub mod error;
pub mod handlers;
pub mod source;

pub use error::{Result, SourceError};
pub use handlers::{CertificateDirSource, PemBundleSource, StaticSource};
pub use source::{extract_fingerprint, SignerSource, SourceChain, SourceChainBuilder, SourceKind};
