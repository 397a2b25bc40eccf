//! XSalsa20-Poly1305 secretbox strategy
//!
//! Layout: `nonce(24) ‖ box`, where `box` is the NaCl secretbox output.
//! Kept for reading data written by older deployments. The construction has
//! no associated data input, so a non-empty `aad` is refused instead of
//! being silently dropped.

use crypto_secretbox::{
    Nonce, XSalsa20Poly1305,
    aead::{Aead, KeyInit},
};

use super::{AeadStrategy, Algorithm, check_min_len};
use crate::{encoding::Ciphertext, entropy::Entropy, error::CryptoError, keys::SharedKey};

const NONCE_BYTES: usize = 24;
const TAG_BYTES: usize = 16;

/// Legacy XSalsa20-Poly1305 secretbox.
#[derive(Debug, Clone, Copy, Default)]
pub struct XSalsa20Poly1305Strategy;

fn reject_aad(aad: &[u8]) -> Result<(), CryptoError> {
    if !aad.is_empty() {
        return Err(CryptoError::UnsupportedAssociatedData {
            algorithm: Algorithm::XSalsa20Poly1305.name(),
        });
    }
    Ok(())
}

impl AeadStrategy for XSalsa20Poly1305Strategy {
    fn algorithm(&self) -> Algorithm {
        Algorithm::XSalsa20Poly1305
    }

    fn min_ciphertext_len(&self) -> usize {
        NONCE_BYTES + TAG_BYTES
    }

    fn supports_aad(&self) -> bool {
        false
    }

    fn encrypt(
        &self,
        key: &SharedKey,
        plaintext: &[u8],
        aad: &[u8],
        entropy: &dyn Entropy,
    ) -> Result<Ciphertext, CryptoError> {
        reject_aad(aad)?;

        let mut nonce = [0u8; NONCE_BYTES];
        entropy.fill(&mut nonce);

        let cipher = XSalsa20Poly1305::new(key.as_array().into());
        let Ok(sealed) = cipher.encrypt(Nonce::from_slice(&nonce), plaintext) else {
            unreachable!("secretbox encryption cannot fail with valid inputs");
        };

        let mut out = Vec::with_capacity(NONCE_BYTES + sealed.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&sealed);
        Ok(Ciphertext::new(out))
    }

    fn decrypt(
        &self,
        key: &SharedKey,
        ciphertext: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        reject_aad(aad)?;
        check_min_len(ciphertext, self.min_ciphertext_len())?;

        let (nonce, sealed) = ciphertext.split_at(NONCE_BYTES);
        let cipher = XSalsa20Poly1305::new(key.as_array().into());
        cipher
            .decrypt(Nonce::from_slice(nonce), sealed)
            .map_err(|_| CryptoError::AuthenticationFailure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encoding::BinaryString, entropy::SystemEntropy};

    #[test]
    fn round_trip() {
        let key = SharedKey::generate(&SystemEntropy);
        let strategy = XSalsa20Poly1305Strategy;

        let ciphertext = strategy.encrypt(&key, b"legacy", b"", &SystemEntropy).unwrap();
        assert_eq!(ciphertext.len(), NONCE_BYTES + 6 + TAG_BYTES);
        assert_eq!(strategy.decrypt(&key, ciphertext.as_bytes(), b"").unwrap(), b"legacy");
    }

    #[test]
    fn associated_data_is_refused() {
        let key = SharedKey::generate(&SystemEntropy);
        let strategy = XSalsa20Poly1305Strategy;
        let expected = CryptoError::UnsupportedAssociatedData { algorithm: "xsalsa20-poly1305" };

        let err = strategy.encrypt(&key, b"legacy", b"aad", &SystemEntropy).unwrap_err();
        assert_eq!(err, expected);

        let ciphertext = strategy.encrypt(&key, b"legacy", b"", &SystemEntropy).unwrap();
        assert_eq!(strategy.decrypt(&key, ciphertext.as_bytes(), b"aad").unwrap_err(), expected);
    }

    #[test]
    fn tampering_is_detected() {
        let key = SharedKey::generate(&SystemEntropy);
        let strategy = XSalsa20Poly1305Strategy;
        let ciphertext = strategy.encrypt(&key, b"legacy", b"", &SystemEntropy).unwrap();
        let mut bytes = ciphertext.into_bytes();
        bytes[NONCE_BYTES + 2] ^= 0x10;

        assert_eq!(
            strategy.decrypt(&key, &bytes, b"").unwrap_err(),
            CryptoError::AuthenticationFailure
        );
    }
}
