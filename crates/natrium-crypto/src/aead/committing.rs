//! Key-committing XChaCha20 + keyed BLAKE2b engine
//!
//! # Wire Format
//!
//! ```text
//! ┌─────────┬──────────┬───────────┬────────────────┬──────────┐
//! │ VERSION │ SALT     │ NONCE     │ ENCRYPTED      │ TAG      │
//! │ 4 bytes │ 32 bytes │ 24 bytes  │ len(plaintext) │ 32 bytes │
//! └─────────┴──────────┴───────────┴────────────────┴──────────┘
//! ```
//!
//! # Key Schedule
//!
//! ```text
//! PRK     = BLAKE2b-256(key, key = zeros)
//! encKey  = BLAKE2b-256("EncryptionKey"     ‖ salt ‖ 0x01, key = PRK)
//! authKey = BLAKE2b-256("AuthenticationKey" ‖ salt ‖ 0x01, key = PRK)
//! tag     = BLAKE2b-256(PAE(VERSION, salt, nonce, aad, encrypted), key = authKey)
//! ```
//!
//! The tag is a collision-resistant keyed hash over everything, so a
//! ciphertext cannot be crafted that verifies under two different keys.
//!
//! Decryption verifies the tag before deriving the encryption key; a
//! forged ciphertext never reaches the stream cipher.

use chacha20::{
    XChaCha20,
    cipher::{KeyIvInit, StreamCipher},
};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use super::{AeadStrategy, Algorithm, check_min_len};
use crate::{
    encoding::Ciphertext,
    entropy::Entropy,
    error::CryptoError,
    kdf,
    keys::{Key, SharedKey},
    pae,
};

/// Version header of every ciphertext
pub const VERSION: [u8; 4] = *b"nt01";

/// Per-message salt length
pub const SALT_BYTES: usize = 32;

/// XChaCha20 nonce length
pub const NONCE_BYTES: usize = 24;

/// Keyed BLAKE2b tag length
pub const TAG_BYTES: usize = 32;

/// Length of a ciphertext for the empty plaintext
pub const MIN_CIPHERTEXT_BYTES: usize = VERSION.len() + SALT_BYTES + NONCE_BYTES + TAG_BYTES;

const ENCRYPTION_KEY_INFO: &[u8] = b"EncryptionKey";
const AUTHENTICATION_KEY_INFO: &[u8] = b"AuthenticationKey";

/// Default strategy: key-committing XChaCha20 with a keyed BLAKE2b tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct XChaCha20Blake2bStrategy;

impl XChaCha20Blake2bStrategy {
    /// Encrypt with caller-supplied salt and nonce.
    ///
    /// Salt and nonce MUST be fresh random values for every message.
    pub(crate) fn seal_with(
        key: &SharedKey,
        plaintext: &[u8],
        aad: &[u8],
        salt: &[u8; SALT_BYTES],
        nonce: &[u8; NONCE_BYTES],
    ) -> Ciphertext {
        let prk = kdf::extract(key.bytes());
        let encryption_key = kdf::expand(&prk, ENCRYPTION_KEY_INFO, salt);
        let authentication_key = kdf::expand(&prk, AUTHENTICATION_KEY_INFO, salt);

        let mut out = Vec::with_capacity(MIN_CIPHERTEXT_BYTES + plaintext.len());
        out.extend_from_slice(&VERSION);
        out.extend_from_slice(salt);
        out.extend_from_slice(nonce);

        let body_start = out.len();
        out.extend_from_slice(plaintext);
        apply_keystream(&encryption_key, nonce, &mut out[body_start..]);

        let tag = compute_tag(&authentication_key, salt, nonce, aad, &out[body_start..]);
        out.extend_from_slice(tag.as_slice());

        Ciphertext::new(out)
    }
}

impl AeadStrategy for XChaCha20Blake2bStrategy {
    fn algorithm(&self) -> Algorithm {
        Algorithm::XChaCha20Blake2b
    }

    fn min_ciphertext_len(&self) -> usize {
        MIN_CIPHERTEXT_BYTES
    }

    fn encrypt(
        &self,
        key: &SharedKey,
        plaintext: &[u8],
        aad: &[u8],
        entropy: &dyn Entropy,
    ) -> Result<Ciphertext, CryptoError> {
        let mut salt = [0u8; SALT_BYTES];
        let mut nonce = [0u8; NONCE_BYTES];
        entropy.fill(&mut salt);
        entropy.fill(&mut nonce);

        Ok(Self::seal_with(key, plaintext, aad, &salt, &nonce))
    }

    fn decrypt(
        &self,
        key: &SharedKey,
        ciphertext: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        check_min_len(ciphertext, MIN_CIPHERTEXT_BYTES)?;

        let Some((version, rest)) = ciphertext.split_first_chunk::<4>() else {
            unreachable!("length checked above");
        };
        if !bool::from(version.ct_eq(&VERSION)) {
            return Err(CryptoError::InvalidVersionHeader);
        }

        let Some((salt, rest)) = rest.split_first_chunk::<SALT_BYTES>() else {
            unreachable!("length checked above");
        };
        let Some((nonce, rest)) = rest.split_first_chunk::<NONCE_BYTES>() else {
            unreachable!("length checked above");
        };
        let Some((encrypted, tag)) = rest.split_last_chunk::<TAG_BYTES>() else {
            unreachable!("length checked above");
        };

        let prk = kdf::extract(key.bytes());
        let authentication_key = kdf::expand(&prk, AUTHENTICATION_KEY_INFO, salt);
        let expected = compute_tag(&authentication_key, salt, nonce, aad, encrypted);

        if !bool::from(expected.as_slice().ct_eq(tag.as_slice())) {
            return Err(CryptoError::AuthenticationFailure);
        }

        let encryption_key = kdf::expand(&prk, ENCRYPTION_KEY_INFO, salt);
        let mut plaintext = encrypted.to_vec();
        apply_keystream(&encryption_key, nonce, &mut plaintext);

        Ok(plaintext)
    }
}

fn apply_keystream(key: &[u8; kdf::OUTPUT_BYTES], nonce: &[u8; NONCE_BYTES], buffer: &mut [u8]) {
    let mut cipher = XChaCha20::new(key.into(), nonce.into());
    cipher.apply_keystream(buffer);
}

fn compute_tag(
    authentication_key: &[u8; kdf::OUTPUT_BYTES],
    salt: &[u8; SALT_BYTES],
    nonce: &[u8; NONCE_BYTES],
    aad: &[u8],
    encrypted: &[u8],
) -> Zeroizing<[u8; TAG_BYTES]> {
    let input = pae::encode(&[&VERSION, salt, nonce, aad, encrypted]);
    kdf::keyed_hash(authentication_key, &[input.as_slice()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encoding::BinaryString, entropy::SystemEntropy};

    const SALT: [u8; SALT_BYTES] = [0x11; SALT_BYTES];
    const NONCE: [u8; NONCE_BYTES] = [0x22; NONCE_BYTES];

    fn test_key() -> SharedKey {
        SharedKey::from_array([0x42; 32])
    }

    #[test]
    fn layout() {
        let ciphertext =
            XChaCha20Blake2bStrategy::seal_with(&test_key(), b"hello", b"", &SALT, &NONCE);
        let bytes = ciphertext.as_bytes();

        assert_eq!(bytes.len(), MIN_CIPHERTEXT_BYTES + 5);
        assert_eq!(&bytes[..4], b"nt01");
        assert_eq!(&bytes[4..36], &SALT);
        assert_eq!(&bytes[36..60], &NONCE);
        assert_ne!(&bytes[60..65], b"hello");
    }

    #[test]
    fn min_length_is_92() {
        assert_eq!(MIN_CIPHERTEXT_BYTES, 92);
    }

    #[test]
    fn seal_with_is_deterministic() {
        let a = XChaCha20Blake2bStrategy::seal_with(&test_key(), b"data", b"aad", &SALT, &NONCE);
        let b = XChaCha20Blake2bStrategy::seal_with(&test_key(), b"data", b"aad", &SALT, &NONCE);
        assert_eq!(a, b);
    }

    #[test]
    fn stream_matches_raw_xchacha20() {
        let key = test_key();
        let ciphertext = XChaCha20Blake2bStrategy::seal_with(&key, &[0u8; 16], b"", &SALT, &NONCE);

        // Encrypting zeros exposes the keystream under encKey
        let prk = kdf::extract(key.bytes());
        let encryption_key = kdf::expand(&prk, ENCRYPTION_KEY_INFO, &SALT);
        let mut keystream = [0u8; 16];
        apply_keystream(&encryption_key, &NONCE, &mut keystream);

        assert_eq!(&ciphertext.as_bytes()[60..76], &keystream);
    }

    #[test]
    fn round_trip_with_aad() {
        let key = SharedKey::generate(&SystemEntropy);
        let strategy = XChaCha20Blake2bStrategy;

        let ciphertext = strategy.encrypt(&key, b"secret", b"header", &SystemEntropy).unwrap();
        let plaintext = strategy.decrypt(&key, ciphertext.as_bytes(), b"header").unwrap();

        assert_eq!(plaintext, b"secret");
    }

    #[test]
    fn empty_plaintext() {
        let key = test_key();
        let strategy = XChaCha20Blake2bStrategy;

        let ciphertext = strategy.encrypt(&key, b"", b"", &SystemEntropy).unwrap();
        assert_eq!(ciphertext.len(), MIN_CIPHERTEXT_BYTES);
        assert!(strategy.decrypt(&key, ciphertext.as_bytes(), b"").unwrap().is_empty());
    }

    #[test]
    fn encryption_is_randomized() {
        let key = test_key();
        let strategy = XChaCha20Blake2bStrategy;

        let a = strategy.encrypt(&key, b"same", b"", &SystemEntropy).unwrap();
        let b = strategy.encrypt(&key, b"same", b"", &SystemEntropy).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_aad_fails() {
        let key = test_key();
        let ciphertext = XChaCha20Blake2bStrategy::seal_with(&key, b"data", b"a", &SALT, &NONCE);

        assert_eq!(
            XChaCha20Blake2bStrategy.decrypt(&key, ciphertext.as_bytes(), b"b").unwrap_err(),
            CryptoError::AuthenticationFailure
        );
    }

    #[test]
    fn wrong_key_fails() {
        let ciphertext =
            XChaCha20Blake2bStrategy::seal_with(&test_key(), b"data", b"", &SALT, &NONCE);
        let other = SharedKey::from_array([0x43; 32]);

        assert_eq!(
            XChaCha20Blake2bStrategy.decrypt(&other, ciphertext.as_bytes(), b"").unwrap_err(),
            CryptoError::AuthenticationFailure
        );
    }

    #[test]
    fn corrupted_version_is_rejected() {
        let key = test_key();
        let mut bytes =
            XChaCha20Blake2bStrategy::seal_with(&key, b"data", b"", &SALT, &NONCE).into_bytes();
        bytes[0] = b'x';

        assert_eq!(
            XChaCha20Blake2bStrategy.decrypt(&key, &bytes, b"").unwrap_err(),
            CryptoError::InvalidVersionHeader
        );
    }

    #[test]
    fn short_input_is_rejected_before_version_check() {
        assert_eq!(
            XChaCha20Blake2bStrategy.decrypt(&test_key(), &[0u8; 91], b"").unwrap_err(),
            CryptoError::MessageTooShort { minimum: 92, actual: 91 }
        );
    }

    #[test]
    fn tag_tampering_is_detected() {
        let key = test_key();
        let mut bytes =
            XChaCha20Blake2bStrategy::seal_with(&key, b"data", b"", &SALT, &NONCE).into_bytes();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x80;

        assert_eq!(
            XChaCha20Blake2bStrategy.decrypt(&key, &bytes, b"").unwrap_err(),
            CryptoError::AuthenticationFailure
        );
    }
}
