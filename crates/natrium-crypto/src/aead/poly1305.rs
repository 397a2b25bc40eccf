//! XChaCha20-Poly1305 strategy
//!
//! Layout: `nonce(24) ‖ ciphertext ‖ tag(16)`. Not key-committing; offered
//! for interoperability with libraries that speak the IETF construction.

use chacha20poly1305::{
    XChaCha20Poly1305, XNonce,
    aead::{Aead, KeyInit, Payload},
};

use super::{AeadStrategy, Algorithm, check_min_len};
use crate::{encoding::Ciphertext, entropy::Entropy, error::CryptoError, keys::SharedKey};

const NONCE_BYTES: usize = 24;
const TAG_BYTES: usize = 16;

/// XChaCha20-Poly1305 with a random 192-bit nonce.
#[derive(Debug, Clone, Copy, Default)]
pub struct XChaCha20Poly1305Strategy;

impl AeadStrategy for XChaCha20Poly1305Strategy {
    fn algorithm(&self) -> Algorithm {
        Algorithm::XChaCha20Poly1305
    }

    fn min_ciphertext_len(&self) -> usize {
        NONCE_BYTES + TAG_BYTES
    }

    fn encrypt(
        &self,
        key: &SharedKey,
        plaintext: &[u8],
        aad: &[u8],
        entropy: &dyn Entropy,
    ) -> Result<Ciphertext, CryptoError> {
        let mut nonce = [0u8; NONCE_BYTES];
        entropy.fill(&mut nonce);

        let cipher = XChaCha20Poly1305::new(key.as_array().into());
        let Ok(sealed) =
            cipher.encrypt(XNonce::from_slice(&nonce), Payload { msg: plaintext, aad })
        else {
            unreachable!("XChaCha20-Poly1305 encryption cannot fail with valid inputs");
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
        check_min_len(ciphertext, self.min_ciphertext_len())?;

        let (nonce, sealed) = ciphertext.split_at(NONCE_BYTES);
        let cipher = XChaCha20Poly1305::new(key.as_array().into());
        cipher
            .decrypt(XNonce::from_slice(nonce), Payload { msg: sealed, aad })
            .map_err(|_| CryptoError::AuthenticationFailure)
    }
}
