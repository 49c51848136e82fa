//! Property-Based Tests for the gated cipher
//!
//! These tests verify the guarantees the core makes for arbitrary inputs:
//! 1. FINGERPRINT: distinct signers produce distinct fingerprints
//! 2. GUARD: `check` is total and pure
//! 3. CIPHER: round trip, fresh nonces, fail-closed gating, tamper detection
//!
//! Uses proptest for property-based testing with arbitrary inputs.

use std::collections::HashSet;

use proptest::prelude::*;
use siggate_core::{
    check, CheckResult, CipherEngine, CipherText, CoreError, ExpectedFingerprint, Fingerprint,
    FingerprintAlgorithm, KeyMaterial, Mismatch, SigningIdentity, Unavailable,
};

// =============================================================================
// Test Helpers
// =============================================================================

fn engine() -> CipherEngine {
    let secret = KeyMaterial::new(b"property-test-secret-0001".to_vec()).unwrap();
    CipherEngine::new(&secret, &Fingerprint::sha256(b"test-signer")).unwrap()
}

fn arb_gate() -> impl Strategy<Value = CheckResult> {
    prop_oneof![
        Just(CheckResult::Unavailable),
        Just(CheckResult::Mismatched(Mismatch::Fingerprint)),
        Just(CheckResult::Mismatched(Mismatch::Package)),
    ]
}

// =============================================================================
// FINGERPRINT: collision property
// =============================================================================

proptest! {
    /// Distinct signing identities yield distinct SHA-256 fingerprints
    #[test]
    fn prop_distinct_identities_distinct_fingerprints(
        a in prop::collection::vec(any::<u8>(), 1..512),
        b in prop::collection::vec(any::<u8>(), 1..512),
    ) {
        prop_assume!(a != b);

        let fa = Fingerprint::compute(&SigningIdentity::new(a), FingerprintAlgorithm::Sha256);
        let fb = Fingerprint::compute(&SigningIdentity::new(b), FingerprintAlgorithm::Sha256);

        prop_assert_ne!(fa, fb);
    }

    /// Identical bytes always yield identical fingerprints, for both algorithms
    #[test]
    fn prop_fingerprint_deterministic(
        bytes in prop::collection::vec(any::<u8>(), 0..512),
    ) {
        let identity = SigningIdentity::new(bytes.clone());
        let copy = SigningIdentity::new(bytes);

        for algorithm in [FingerprintAlgorithm::Sha256, FingerprintAlgorithm::Legacy] {
            prop_assert_eq!(
                Fingerprint::compute(&identity, algorithm),
                Fingerprint::compute(&copy, algorithm)
            );
        }
    }

    /// Textual form parses back to the same fingerprint
    #[test]
    fn prop_fingerprint_text_form_parses_back(
        bytes in prop::collection::vec(any::<u8>(), 0..64),
        legacy in any::<i32>(),
    ) {
        let sha = Fingerprint::sha256(&bytes);
        prop_assert_eq!(sha.to_string().parse::<Fingerprint>().unwrap(), sha);

        let legacy = Fingerprint::LegacyHash(legacy);
        prop_assert_eq!(legacy.to_string().parse::<Fingerprint>().unwrap(), legacy);
    }
}

#[test]
fn fixture_identities_have_no_collisions() {
    let fixtures: Vec<SigningIdentity> = (0u32..2000)
        .map(|i| SigningIdentity::new(format!("CN=fixture-{},O=siggate", i).into_bytes()))
        .collect();

    let fingerprints: HashSet<Fingerprint> = fixtures
        .iter()
        .map(|id| Fingerprint::compute(id, FingerprintAlgorithm::Sha256))
        .collect();

    assert_eq!(fingerprints.len(), fixtures.len());
}

// =============================================================================
// GUARD: totality and purity
// =============================================================================

proptest! {
    /// Same inputs always produce the same result
    #[test]
    fn prop_check_is_pure(observed in any::<u32>(), expected in any::<u32>()) {
        let observed = Ok(Fingerprint::legacy(observed));
        let expected = ExpectedFingerprint::new(Fingerprint::legacy(expected));

        let first = check(&observed, &expected);
        let second = check(&observed, &expected);
        prop_assert_eq!(first, second);
    }

    /// Equal fingerprints verify, different ones mismatch
    #[test]
    fn prop_check_equality_semantics(observed in any::<u32>(), expected in any::<u32>()) {
        let result = check(
            &Ok(Fingerprint::legacy(observed)),
            &ExpectedFingerprint::new(Fingerprint::legacy(expected)),
        );

        if observed == expected {
            prop_assert_eq!(result, CheckResult::Verified);
        } else {
            prop_assert_eq!(result, CheckResult::Mismatched(Mismatch::Fingerprint));
        }
    }

    /// Unavailable observations are always Unavailable
    #[test]
    fn prop_unavailable_always_unavailable(
        expected in prop::collection::vec(any::<u8>(), 0..64),
        reason in "[a-z ]{0,20}",
    ) {
        let expected = ExpectedFingerprint::new(Fingerprint::sha256(&expected));
        let result = check(&Err(Unavailable::new(reason)), &expected);
        prop_assert_eq!(result, CheckResult::Unavailable);
    }
}

// =============================================================================
// CIPHER: round trip, nonce freshness, fail-closed, tamper detection
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// decode(encode(p)) == p for arbitrary byte strings
    #[test]
    fn prop_roundtrip(plaintext in prop::collection::vec(any::<u8>(), 0..8192)) {
        let engine = engine();
        let ct = engine.encode(&plaintext, &CheckResult::Verified).unwrap();
        let pt = engine.decode(&ct, &CheckResult::Verified).unwrap();
        prop_assert_eq!(pt, plaintext);
    }

    /// Non-verified gates never produce ciphertext
    #[test]
    fn prop_encode_fails_closed(
        plaintext in prop::collection::vec(any::<u8>(), 0..256),
        gate in arb_gate(),
    ) {
        let result = engine().encode(&plaintext, &gate);
        prop_assert_eq!(result, Err(CoreError::Integrity(gate)));
    }

    /// Non-verified gates never produce plaintext
    #[test]
    fn prop_decode_fails_closed(
        plaintext in prop::collection::vec(any::<u8>(), 0..256),
        gate in arb_gate(),
    ) {
        let engine = engine();
        let ct = engine.encode(&plaintext, &CheckResult::Verified).unwrap();
        prop_assert_eq!(engine.decode(&ct, &gate), Err(CoreError::Integrity(gate)));
    }

    /// Flipping bits in any byte is detected
    #[test]
    fn prop_tamper_detected(
        plaintext in prop::collection::vec(any::<u8>(), 0..256),
        index in any::<prop::sample::Index>(),
        mask in 1u8..=255,
    ) {
        let engine = engine();
        let mut bytes = engine
            .encode(&plaintext, &CheckResult::Verified)
            .unwrap()
            .to_bytes()
            .unwrap();

        let i = index.index(bytes.len());
        bytes[i] ^= mask;

        let result = engine.decode(&CipherText::from_bytes(&bytes), &CheckResult::Verified);
        prop_assert!(
            matches!(result, Err(CoreError::Authentication) | Err(CoreError::MalformedCipherText(_))),
            "tampered byte {} produced {:?}",
            i,
            result
        );
    }
}

#[test]
fn roundtrip_hundred_varied_lengths() {
    let engine = engine();
    let mut lengths: Vec<usize> = (0..98).map(|i| i * 37).collect();
    lengths.push(1024 * 1024 + 1);
    lengths.push(2 * 1024 * 1024 + 17);

    for (i, len) in lengths.into_iter().enumerate() {
        let plaintext: Vec<u8> = (0..len).map(|j| (j.wrapping_mul(31) ^ i) as u8).collect();
        let ct = engine.encode(&plaintext, &CheckResult::Verified).unwrap();
        assert_eq!(engine.decode(&ct, &CheckResult::Verified).unwrap(), plaintext);
    }
}

#[test]
fn nonce_never_repeats_over_many_trials() {
    let engine = engine();
    let mut seen = HashSet::new();

    for _ in 0..1000 {
        let ct = engine.encode(b"same plaintext", &CheckResult::Verified).unwrap();
        assert!(seen.insert(ct.into_string()), "ciphertext repeated");
    }
}

#[test]
fn every_single_byte_flip_is_detected() {
    let engine = engine();
    let original = engine
        .encode(b"hello", &CheckResult::Verified)
        .unwrap()
        .to_bytes()
        .unwrap();

    for i in 0..original.len() {
        for mask in [0x01u8, 0x80, 0xFF] {
            let mut bytes = original.clone();
            bytes[i] ^= mask;
            let result = engine.decode_bytes(&bytes, &CheckResult::Verified);
            assert!(
                matches!(result, Err(CoreError::Authentication) | Err(CoreError::MalformedCipherText(_))),
                "byte {} mask {:#x} produced {:?}",
                i,
                mask,
                result
            );
        }
    }
}

#[test]
fn truncation_is_detected() {
    let engine = engine();
    let original = engine
        .encode(b"hello", &CheckResult::Verified)
        .unwrap()
        .to_bytes()
        .unwrap();

    for len in 0..original.len() {
        let result = engine.decode_bytes(&original[..len], &CheckResult::Verified);
        assert!(result.is_err(), "truncated to {} bytes decoded", len);
    }
}
