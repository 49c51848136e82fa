//! Integrity guard
//!
//! Compares an observed fingerprint against the configured expectation and
//! produces a three-way `CheckResult`. The guard is a pure, total function:
//! every observation maps to exactly one result and nothing here panics.
//!
//! Legacy hosts expect an integer status where `1` means "passed". The
//! mapping lives in [`CheckResult::legacy_code`] and is used only at the
//! outer boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use crate::fingerprint::{extract, Fingerprint, Observation};
use crate::types::SigningInfo;

/// Legacy status code for a verified identity
pub const LEGACY_CODE_VERIFIED: i32 = 1;
/// Legacy status code for a package name mismatch
pub const LEGACY_CODE_PACKAGE_MISMATCH: i32 = -1;
/// Legacy status code for a signer fingerprint mismatch
pub const LEGACY_CODE_FINGERPRINT_MISMATCH: i32 = -2;
/// Legacy status code for unavailable signing information
pub const LEGACY_CODE_UNAVAILABLE: i32 = -3;

/// What did not match during a verification that ran
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mismatch {
    /// The package name differs from the expected one
    Package,
    /// The signer fingerprint differs from the expected one
    Fingerprint,
}

/// Outcome of an integrity check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckResult {
    /// The observed identity matches the expectation
    Verified,
    /// Verification ran and failed
    Mismatched(Mismatch),
    /// Verification could not be performed
    Unavailable,
}

impl CheckResult {
    pub fn is_verified(&self) -> bool {
        matches!(self, CheckResult::Verified)
    }

    /// Narrow to the legacy integer status code
    ///
    /// | result                   | code |
    /// |--------------------------|------|
    /// | `Verified`               | `1`  |
    /// | `Mismatched(Package)`    | `-1` |
    /// | `Mismatched(Fingerprint)`| `-2` |
    /// | `Unavailable`            | `-3` |
    pub fn legacy_code(&self) -> i32 {
        match self {
            CheckResult::Verified => LEGACY_CODE_VERIFIED,
            CheckResult::Mismatched(Mismatch::Package) => LEGACY_CODE_PACKAGE_MISMATCH,
            CheckResult::Mismatched(Mismatch::Fingerprint) => LEGACY_CODE_FINGERPRINT_MISMATCH,
            CheckResult::Unavailable => LEGACY_CODE_UNAVAILABLE,
        }
    }

    /// Inverse of [`CheckResult::legacy_code`]
    pub fn from_legacy_code(code: i32) -> Option<Self> {
        match code {
            LEGACY_CODE_VERIFIED => Some(CheckResult::Verified),
            LEGACY_CODE_PACKAGE_MISMATCH => Some(CheckResult::Mismatched(Mismatch::Package)),
            LEGACY_CODE_FINGERPRINT_MISMATCH => {
                Some(CheckResult::Mismatched(Mismatch::Fingerprint))
            }
            LEGACY_CODE_UNAVAILABLE => Some(CheckResult::Unavailable),
            _ => None,
        }
    }

    /// Status name without the mismatch cause
    pub fn status(&self) -> &'static str {
        match self {
            CheckResult::Verified => "verified",
            CheckResult::Mismatched(_) => "mismatched",
            CheckResult::Unavailable => "unavailable",
        }
    }

    pub fn mismatch(&self) -> Option<Mismatch> {
        match self {
            CheckResult::Mismatched(cause) => Some(*cause),
            _ => None,
        }
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckResult::Verified => write!(f, "verified"),
            CheckResult::Mismatched(Mismatch::Package) => write!(f, "mismatched (package)"),
            CheckResult::Mismatched(Mismatch::Fingerprint) => {
                write!(f, "mismatched (fingerprint)")
            }
            CheckResult::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Expected signing identity, loaded once from configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedFingerprint {
    /// Fingerprint of the authoritative signer
    pub fingerprint: Fingerprint,

    /// Package name the signer must belong to, if bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
}

impl ExpectedFingerprint {
    pub fn new(fingerprint: Fingerprint) -> Self {
        Self {
            fingerprint,
            package_name: None,
        }
    }

    /// Also require the given package name
    pub fn with_package(mut self, package_name: impl Into<String>) -> Self {
        self.package_name = Some(package_name.into());
        self
    }
}

/// Compare an observation against the expected fingerprint
///
/// Fingerprints of different algorithms never match. Comparison of the
/// fingerprint value is constant time.
pub fn check(observed: &Observation, expected: &ExpectedFingerprint) -> CheckResult {
    match observed {
        Err(_) => CheckResult::Unavailable,
        Ok(fingerprint) => {
            let lhs = fingerprint.to_canonical_bytes();
            let rhs = expected.fingerprint.to_canonical_bytes();
            if bool::from(lhs.as_slice().ct_eq(rhs.as_slice())) {
                CheckResult::Verified
            } else {
                CheckResult::Mismatched(Mismatch::Fingerprint)
            }
        }
    }
}

/// Integrity guard bound to one expected identity
#[derive(Debug, Clone)]
pub struct IntegrityGuard {
    expected: ExpectedFingerprint,
}

impl IntegrityGuard {
    pub fn new(expected: ExpectedFingerprint) -> Self {
        if !expected.fingerprint.is_collision_resistant() {
            warn!(
                algorithm = %expected.fingerprint.algorithm(),
                "Expected fingerprint uses a non collision-resistant algorithm"
            );
        }
        Self { expected }
    }

    pub fn expected(&self) -> &ExpectedFingerprint {
        &self.expected
    }

    /// Check a fingerprint observation
    pub fn check(&self, observed: &Observation) -> CheckResult {
        let result = check(observed, &self.expected);
        self.log_result(observed, &result);
        result
    }

    /// Check full signing info: package name first, then the first signer
    ///
    /// The signer fingerprint is computed with the algorithm of the expected
    /// fingerprint.
    pub fn check_info(&self, info: &SigningInfo) -> CheckResult {
        if let Some(ref package_name) = self.expected.package_name {
            if info.package_name != *package_name {
                warn!(
                    expected = %package_name,
                    actual = %info.package_name,
                    "SECURITY: Package name mismatch"
                );
                return CheckResult::Mismatched(Mismatch::Package);
            }
        }

        let observed = extract(info, self.expected.fingerprint.algorithm());
        self.check(&observed)
    }

    fn log_result(&self, observed: &Observation, result: &CheckResult) {
        match (observed, result) {
            (Ok(fingerprint), CheckResult::Verified) => {
                debug!(fingerprint = %fingerprint, "Signer fingerprint verified");
            }
            (Ok(fingerprint), _) => {
                warn!(
                    observed = %fingerprint,
                    expected = %self.expected.fingerprint,
                    "SECURITY: Signer fingerprint mismatch"
                );
            }
            (Err(unavailable), _) => {
                warn!(reason = %unavailable.reason, "Signer fingerprint unavailable");
            }
        }
    }
}
