//! Signer source implementations

pub mod bundle;
pub mod directory;
pub mod fixed;

pub use bundle::PemBundleSource;
pub use directory::CertificateDirSource;
pub use fixed::StaticSource;
