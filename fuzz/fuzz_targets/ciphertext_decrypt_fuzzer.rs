//! Fuzz target for symmetric decryption
//!
//! Feeds adversarial ciphertexts to every algorithm and mutates valid ones.
//!
//! # Strategy
//!
//! - Fully arbitrary ciphertext bytes (short, header-only, oversized)
//! - Valid ciphertexts with one or more bytes flipped
//! - Valid ciphertexts truncated or extended
//! - Arbitrary associated data
//!
//! # Invariants
//!
//! - Decryption never panics
//! - Arbitrary bytes never authenticate (tag forgery)
//! - Any mutation of a valid ciphertext fails
//! - Unmodified ciphertexts always round-trip

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use natrium_crypto::{Algorithm, BinaryString, SharedKey, SystemEntropy};

#[derive(Debug, Clone, Arbitrary)]
struct DecryptScenario {
    key: [u8; 32],
    algorithm: u8,
    plaintext: Vec<u8>,
    aad: Vec<u8>,
    mutation: Mutation,
}

#[derive(Debug, Clone, Arbitrary)]
enum Mutation {
    /// Decrypt these bytes as-is
    Raw(Vec<u8>),
    /// Flip bits at the given positions of a valid ciphertext
    Flip(Vec<(u16, u8)>),
    /// Drop bytes from the end of a valid ciphertext
    Truncate(u16),
    /// Append bytes to a valid ciphertext
    Extend(Vec<u8>),
    /// Leave a valid ciphertext unchanged
    None,
}

fuzz_target!(|scenario: DecryptScenario| {
    let Ok(key) = SharedKey::from_bytes(&scenario.key) else {
        return;
    };
    let algorithms = Algorithm::ALL;
    let algorithm = algorithms[scenario.algorithm as usize % algorithms.len()];
    if !algorithm.is_available() {
        return;
    }
    let aad: &[u8] = if algorithm.strategy().supports_aad() { &scenario.aad } else { &[] };

    if let Mutation::Raw(bytes) = &scenario.mutation {
        // Forging a tag from random bytes must be infeasible
        assert!(algorithm.decrypt(&key, bytes, aad).is_err(), "random bytes authenticated");
        return;
    }

    let ciphertext = algorithm
        .encrypt(&key, &scenario.plaintext, aad, &SystemEntropy)
        .expect("encryption of valid input must succeed");
    let mut bytes = ciphertext.as_bytes().to_vec();

    let modified = match &scenario.mutation {
        Mutation::Raw(_) => unreachable!(),
        Mutation::Flip(flips) => {
            for &(position, mask) in flips {
                let index = position as usize % bytes.len();
                bytes[index] ^= mask;
            }
            // Flips can cancel out
            bytes != ciphertext.as_bytes()
        },
        Mutation::Truncate(count) => {
            let count = (*count as usize % bytes.len()).max(1);
            bytes.truncate(bytes.len() - count);
            true
        },
        Mutation::Extend(extra) => {
            bytes.extend_from_slice(extra);
            !extra.is_empty()
        },
        Mutation::None => false,
    };

    let result = algorithm.decrypt(&key, &bytes, aad);
    if modified {
        assert!(result.is_err(), "modified ciphertext authenticated");
    } else {
        assert_eq!(result.expect("valid ciphertext must decrypt"), scenario.plaintext);
    }
});
