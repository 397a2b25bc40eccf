//! Property-based tests for the symmetric strategies
//!
//! These tests verify the invariants every ciphertext must uphold:
//!
//! 1. **Round-trip**: decrypt(encrypt(m, aad), aad) == m
//! 2. **Tamper detection**: any bit flip after the version header fails
//!    authentication
//! 3. **AAD binding**: different associated data fails authentication
//! 4. **Key commitment**: a ciphertext does not open under another key
//! 5. **Length floor**: inputs below the minimum are rejected up front

use natrium_crypto::{
    Algorithm, BinaryString, CryptoError, Entropy, SharedKey, SystemEntropy,
    aead::{MIN_CIPHERTEXT_BYTES, VERSION},
};
use proptest::prelude::*;

// Entropy that fills every buffer with one byte value
struct FixedEntropy(u8);

impl Entropy for FixedEntropy {
    fn fill(&self, buffer: &mut [u8]) {
        buffer.fill(self.0);
    }
}

fn key_strategy() -> impl Strategy<Value = [u8; 32]> {
    prop::collection::vec(any::<u8>(), 32..=32).prop_map(|v| {
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&v);
        arr
    })
}

fn available_algorithms() -> Vec<Algorithm> {
    Algorithm::ALL.into_iter().filter(|algorithm| algorithm.is_available()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_roundtrip_every_algorithm(
        key in key_strategy(),
        plaintext in prop::collection::vec(any::<u8>(), 0..1000),
        aad in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let key = SharedKey::from_bytes(&key).unwrap();

        for algorithm in available_algorithms() {
            let aad: &[u8] = if algorithm.strategy().supports_aad() { &aad } else { &[] };

            let ciphertext = algorithm.encrypt(&key, &plaintext, aad, &SystemEntropy).unwrap();
            prop_assert_eq!(ciphertext.len(), algorithm.min_ciphertext_len() + plaintext.len());

            let decrypted = algorithm.decrypt(&key, ciphertext.as_bytes(), aad).unwrap();
            prop_assert_eq!(&decrypted, &plaintext, "algorithm {}", algorithm);
        }
    }

    #[test]
    fn prop_tamper_after_header_fails(
        key in key_strategy(),
        plaintext in prop::collection::vec(any::<u8>(), 0..256),
        position in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let key = SharedKey::from_bytes(&key).unwrap();
        let algorithm = Algorithm::XChaCha20Blake2b;

        let ciphertext = algorithm.encrypt(&key, &plaintext, b"", &SystemEntropy).unwrap();
        let mut bytes = ciphertext.into_bytes();
        let position = VERSION.len() + position.index(bytes.len() - VERSION.len());
        bytes[position] ^= 1 << bit;

        prop_assert_eq!(
            algorithm.decrypt(&key, &bytes, b"").unwrap_err(),
            CryptoError::AuthenticationFailure
        );
    }

    #[test]
    fn prop_aad_is_bound(
        key in key_strategy(),
        plaintext in prop::collection::vec(any::<u8>(), 0..256),
        aad in prop::collection::vec(any::<u8>(), 0..64),
        other in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        prop_assume!(aad != other);
        let key = SharedKey::from_bytes(&key).unwrap();

        for algorithm in available_algorithms() {
            if !algorithm.strategy().supports_aad() {
                continue;
            }
            let ciphertext = algorithm.encrypt(&key, &plaintext, &aad, &SystemEntropy).unwrap();
            prop_assert_eq!(
                algorithm.decrypt(&key, ciphertext.as_bytes(), &other).unwrap_err(),
                CryptoError::AuthenticationFailure
            );
        }
    }

    #[test]
    fn prop_ciphertext_commits_to_key(
        key in key_strategy(),
        other in key_strategy(),
        plaintext in prop::collection::vec(any::<u8>(), 0..256),
    ) {
        prop_assume!(key != other);
        let key = SharedKey::from_bytes(&key).unwrap();
        let other = SharedKey::from_bytes(&other).unwrap();
        let algorithm = Algorithm::XChaCha20Blake2b;

        let ciphertext = algorithm.encrypt(&key, &plaintext, b"", &SystemEntropy).unwrap();
        prop_assert_eq!(
            algorithm.decrypt(&other, ciphertext.as_bytes(), b"").unwrap_err(),
            CryptoError::AuthenticationFailure
        );
    }

    #[test]
    fn prop_short_input_rejected(
        key in key_strategy(),
        len in 0usize..MIN_CIPHERTEXT_BYTES,
    ) {
        let key = SharedKey::from_bytes(&key).unwrap();
        let input = vec![0u8; len];

        prop_assert_eq!(
            Algorithm::XChaCha20Blake2b.decrypt(&key, &input, b"").unwrap_err(),
            CryptoError::MessageTooShort { minimum: MIN_CIPHERTEXT_BYTES, actual: len }
        );
    }
}

#[test]
fn encryption_is_not_deterministic() {
    let key = SharedKey::generate(&SystemEntropy);

    for algorithm in available_algorithms() {
        let a = algorithm.encrypt(&key, b"same message", b"", &SystemEntropy).unwrap();
        let b = algorithm.encrypt(&key, b"same message", b"", &SystemEntropy).unwrap();
        assert_ne!(a, b, "algorithm {algorithm}");
    }
}

#[test]
fn fixed_entropy_reproduces_ciphertext() {
    let key = SharedKey::from_bytes(&[3u8; 32]).unwrap();
    let algorithm = Algorithm::XChaCha20Blake2b;

    let a = algorithm.encrypt(&key, b"message", b"aad", &FixedEntropy(0x5A)).unwrap();
    let b = algorithm.encrypt(&key, b"message", b"aad", &FixedEntropy(0x5A)).unwrap();
    assert_eq!(a, b);

    // Salt and nonce come straight from the entropy source
    assert!(a.as_bytes()[4..60].iter().all(|&byte| byte == 0x5A));
}

#[test]
fn corrupted_version_header() {
    let key = SharedKey::generate(&SystemEntropy);
    let algorithm = Algorithm::XChaCha20Blake2b;

    for index in 0..VERSION.len() {
        let mut bytes = algorithm.encrypt(&key, b"data", b"", &SystemEntropy).unwrap().into_bytes();
        bytes[index] ^= 0x01;
        assert_eq!(
            algorithm.decrypt(&key, &bytes, b"").unwrap_err(),
            CryptoError::InvalidVersionHeader
        );
    }
}

#[test]
fn ninety_one_bytes_is_too_short() {
    let key = SharedKey::generate(&SystemEntropy);
    let err = Algorithm::XChaCha20Blake2b.decrypt(&key, &[0u8; 91], b"").unwrap_err();

    assert_eq!(err, CryptoError::MessageTooShort { minimum: 92, actual: 91 });
    assert!(err.is_tampering());
}

#[test]
fn legacy_secretbox_rejects_aad() {
    let key = SharedKey::generate(&SystemEntropy);

    assert_eq!(
        Algorithm::XSalsa20Poly1305.encrypt(&key, b"data", b"aad", &SystemEntropy).unwrap_err(),
        CryptoError::UnsupportedAssociatedData { algorithm: "xsalsa20-poly1305" }
    );
}

#[test]
fn strategies_do_not_read_each_others_output() {
    let key = SharedKey::generate(&SystemEntropy);
    let ciphertext =
        Algorithm::XChaCha20Poly1305.encrypt(&key, &[0u8; 100], b"", &SystemEntropy).unwrap();

    assert!(Algorithm::XChaCha20Blake2b.decrypt(&key, ciphertext.as_bytes(), b"").is_err());
}
