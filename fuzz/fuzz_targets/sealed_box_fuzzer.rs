//! Fuzz target for anonymous sealing
//!
//! # Strategy
//!
//! - Arbitrary sealed payloads, including low-order ephemeral keys
//! - Valid sealed payloads with the ephemeral key or body corrupted
//!
//! # Invariants
//!
//! - Unsealing never panics
//! - Arbitrary payloads never open
//! - Corrupting any byte of a valid payload fails

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use natrium_crypto::{Asymmetric, BinaryString, EncryptionKeyPair, SystemEntropy};

#[derive(Debug, Clone, Arbitrary)]
struct SealScenario {
    seed: [u8; 32],
    plaintext: Vec<u8>,
    forged: Vec<u8>,
    corrupt_at: u16,
    mask: u8,
}

fuzz_target!(|scenario: SealScenario| {
    let recipient = EncryptionKeyPair::from_seed(&scenario.seed);
    let asymmetric = Asymmetric::default();

    assert!(asymmetric.unseal(&recipient, &scenario.forged).is_err(), "forged payload opened");

    let sealed = asymmetric
        .seal(&recipient.public(), &scenario.plaintext, &SystemEntropy)
        .expect("sealing to a valid public key must succeed");
    let mut bytes = sealed.as_bytes().to_vec();

    assert_eq!(
        asymmetric.unseal(&recipient, &bytes).expect("valid payload must open"),
        scenario.plaintext
    );

    if scenario.mask != 0 {
        let index = scenario.corrupt_at as usize % bytes.len();
        bytes[index] ^= scenario.mask;
        assert!(asymmetric.unseal(&recipient, &bytes).is_err(), "corrupted payload opened");
    }
});
