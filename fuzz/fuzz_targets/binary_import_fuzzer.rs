//! Fuzz target for text import of keys and binary strings
//!
//! # Strategy
//!
//! - Arbitrary UTF-8 and non-UTF-8 key material
//! - Inputs carrying `hex:`, `base64:` and `base64url:` prefixes
//! - Every encoding for fixed- and variable-length binary strings
//!
//! # Invariants
//!
//! - Import never panics
//! - Any successfully imported value re-exports and re-imports to itself
//! - Fixed-length types only ever hold their declared length

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use natrium_crypto::{
    BinaryString, Ciphertext, Digest, Encoding, EncryptionKeyPair, Key, MessageSignature,
    SharedKey, SignatureKeyPair,
};

#[derive(Debug, Clone, Arbitrary)]
struct ImportScenario {
    prefix: Prefix,
    body: String,
    raw: Vec<u8>,
    encoding: u8,
}

#[derive(Debug, Clone, Copy, Arbitrary)]
enum Prefix {
    None,
    Hex,
    Base64,
    Base64Url,
}

impl Prefix {
    fn as_str(self) -> &'static str {
        match self {
            Prefix::None => "",
            Prefix::Hex => "hex:",
            Prefix::Base64 => "base64:",
            Prefix::Base64Url => "base64url:",
        }
    }
}

fuzz_target!(|scenario: ImportScenario| {
    let text = format!("{}{}", scenario.prefix.as_str(), scenario.body);
    let encoding = Encoding::ALL[scenario.encoding as usize % Encoding::ALL.len()];

    if let Ok(key) = SharedKey::import(&scenario.raw) {
        assert_eq!(key.length(), 32);
    }
    if let Ok(key) = SharedKey::import(text.as_bytes()) {
        let exported = key.export(encoding, true);
        assert_eq!(SharedKey::import(exported.as_bytes()).expect("re-import"), key);
    }
    if let Ok(pair) = EncryptionKeyPair::import(text.as_bytes()) {
        assert_eq!(pair.length(), 64);
    }
    if let Ok(pair) = SignatureKeyPair::import(&scenario.raw) {
        assert_eq!(pair.length(), 64);
    }

    if let Ok(digest) = Digest::import(&text, Some(encoding)) {
        assert_eq!(digest.as_bytes().len(), 32);
        let exported = digest.export(encoding, true);
        assert_eq!(Digest::import(&exported, None).expect("re-import"), digest);
    }
    if let Ok(signature) = MessageSignature::import(&text, None) {
        assert_eq!(signature.as_bytes().len(), 64);
    }
    if let Ok(ciphertext) = Ciphertext::import(&text, Some(encoding)) {
        let exported = ciphertext.export(encoding, true);
        assert_eq!(Ciphertext::import(&exported, None).expect("re-import"), ciphertext);
    }
});
