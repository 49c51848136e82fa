//! Attack Scenario Tests
//!
//! Each test represents a way of getting plaintext or ciphertext out of a
//! build that is not the genuine, correctly signed application.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use siggate_core::{CheckResult, CipherText, CoreError, Fingerprint, Mismatch, SigningInfo};
use siggate_service::api::handlers::{decrypt, encrypt, DecryptRequest, EncryptRequest};
use siggate_service::{AppState, RawConfig, ServiceConfig, ServiceError, SignatureService};
use siggate_source::StaticSource;

// =============================================================================
// Test Helpers
// =============================================================================

const PACKAGE: &str = "com.example.myapp";
const RELEASE_CERT: &[u8] = b"release signing certificate";
const ATTACKER_CERT: &[u8] = b"attacker signing certificate";

fn config_with_secret(secret_b64: &str) -> ServiceConfig {
    let json = format!(
        r#"{{"package_name": "{}", "signature_hash": "{}", "cipher_secret": "{}"}}"#,
        PACKAGE,
        Fingerprint::sha256(RELEASE_CERT),
        secret_b64
    );
    RawConfig::from_json(&json).unwrap().validate().unwrap()
}

fn config() -> ServiceConfig {
    config_with_secret("MDEyMzQ1Njc4OWFiY2RlZg==")
}

fn service(package: &str, cert: &[u8]) -> SignatureService {
    SignatureService::new(
        &config(),
        Arc::new(StaticSource::new(
            SigningInfo::new(package).with_signer(cert.to_vec()),
        )),
    )
    .unwrap()
}

fn genuine() -> SignatureService {
    service(PACKAGE, RELEASE_CERT)
}

// =============================================================================
// ATTACK: Re-signed build
// =============================================================================

/// A repackaged copy signed with another key must not encrypt or decrypt,
/// even with the same secret compiled in.
#[tokio::test]
async fn attack_resigned_build_refused() {
    let ciphertext = genuine().encrypt("secret").unwrap();
    let resigned = service(PACKAGE, ATTACKER_CERT);

    assert_eq!(
        resigned.check_integrity(),
        CheckResult::Mismatched(Mismatch::Fingerprint)
    );
    assert_eq!(resigned.check_integrity_code(), -2);

    let err = resigned.decrypt(&ciphertext).unwrap_err();
    assert_eq!(
        err.integrity(),
        Some(CheckResult::Mismatched(Mismatch::Fingerprint))
    );
    assert!(resigned.encrypt("secret").is_err());
    assert!(resigned.sign("secret").is_err());

    let state = Arc::new(AppState::new(resigned));
    let err = decrypt(State(state), Json(DecryptRequest { ciphertext }))
        .await
        .unwrap_err();
    assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
}

// =============================================================================
// ATTACK: Renamed package
// =============================================================================

#[tokio::test]
async fn attack_renamed_package_refused() {
    let renamed = service("com.evil.clone", RELEASE_CERT);
    assert_eq!(renamed.check_integrity_code(), -1);

    let state = Arc::new(AppState::new(renamed));
    let err = encrypt(State(state), Json(EncryptRequest { text: "x".into() }))
        .await
        .unwrap_err();
    assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
}

// =============================================================================
// ATTACK: Hidden signing information
// =============================================================================

/// Making signing information unreadable must not open the gate.
#[tokio::test]
async fn attack_unavailable_signer_fails_closed() {
    let blind = SignatureService::new(&config(), Arc::new(StaticSource::failing("denied"))).unwrap();
    assert_eq!(blind.check_integrity_code(), -3);
    assert!(matches!(
        blind.encrypt("secret"),
        Err(ServiceError::Core(CoreError::Integrity(CheckResult::Unavailable)))
    ));

    let unsigned = SignatureService::new(
        &config(),
        Arc::new(StaticSource::new(SigningInfo::new(PACKAGE))),
    )
    .unwrap();
    assert_eq!(unsigned.check_integrity(), CheckResult::Unavailable);
}

// =============================================================================
// ATTACK: Ciphertext tampering
// =============================================================================

#[tokio::test]
async fn attack_tampered_ciphertext_rejected() {
    let service = genuine();
    let ciphertext = CipherText::new(service.encrypt("transfer 10 coins").unwrap());

    let mut bytes = ciphertext.to_bytes().unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0x01;
    let tampered = CipherText::from_bytes(&bytes).into_string();

    assert!(matches!(
        service.decrypt(&tampered),
        Err(ServiceError::Core(CoreError::Authentication))
    ));

    let state = Arc::new(AppState::new(service));
    let err = decrypt(State(state), Json(DecryptRequest { ciphertext: tampered }))
        .await
        .unwrap_err();
    assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn attack_garbage_ciphertext_is_bad_request() {
    let state = Arc::new(AppState::new(genuine()));
    for garbage in ["not base64!", "AAAA", "UNSIGNATURE"] {
        let err = decrypt(
            State(state.clone()),
            Json(DecryptRequest {
                ciphertext: garbage.into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}

// =============================================================================
// ATTACK: Foreign key
// =============================================================================

/// Ciphertext from a deployment with another secret does not decrypt.
#[tokio::test]
async fn attack_foreign_secret_rejected() {
    let other = SignatureService::new(
        &config_with_secret("ZmVkY2JhOTg3NjU0MzIxMA=="),
        Arc::new(StaticSource::new(
            SigningInfo::new(PACKAGE).with_signer(RELEASE_CERT.to_vec()),
        )),
    )
    .unwrap();

    let ciphertext = other.encrypt("hello").unwrap();
    assert!(matches!(
        genuine().decrypt(&ciphertext),
        Err(ServiceError::Core(CoreError::Authentication))
    ));
}
