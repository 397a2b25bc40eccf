//! AES-256-GCM strategy
//!
//! Layout: `nonce(12) ‖ ciphertext ‖ tag(16)`.
//!
//! Only offered where the CPU has AES and carry-less multiply instructions;
//! the software fallback is not constant time.

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit, Payload},
};

use super::{AeadStrategy, Algorithm, check_min_len};
use crate::{encoding::Ciphertext, entropy::Entropy, error::CryptoError, keys::SharedKey};

const NONCE_BYTES: usize = 12;
const TAG_BYTES: usize = 16;

/// AES-256-GCM with a random 96-bit nonce.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aes256GcmStrategy;

impl Aes256GcmStrategy {
    fn require_hardware(&self) -> Result<(), CryptoError> {
        if !self.is_available() {
            return Err(CryptoError::AlgorithmUnavailable {
                algorithm: Algorithm::Aes256Gcm.name(),
            });
        }
        Ok(())
    }
}

impl AeadStrategy for Aes256GcmStrategy {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Aes256Gcm
    }

    fn min_ciphertext_len(&self) -> usize {
        NONCE_BYTES + TAG_BYTES
    }

    fn is_available(&self) -> bool {
        hardware_support()
    }

    fn encrypt(
        &self,
        key: &SharedKey,
        plaintext: &[u8],
        aad: &[u8],
        entropy: &dyn Entropy,
    ) -> Result<Ciphertext, CryptoError> {
        self.require_hardware()?;

        let mut nonce = [0u8; NONCE_BYTES];
        entropy.fill(&mut nonce);

        let cipher = Aes256Gcm::new(key.as_array().into());
        let Ok(sealed) =
            cipher.encrypt(Nonce::from_slice(&nonce), Payload { msg: plaintext, aad })
        else {
            unreachable!("AES-256-GCM encryption cannot fail for in-range inputs");
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
        self.require_hardware()?;
        check_min_len(ciphertext, self.min_ciphertext_len())?;

        let (nonce, sealed) = ciphertext.split_at(NONCE_BYTES);
        let cipher = Aes256Gcm::new(key.as_array().into());
        cipher
            .decrypt(Nonce::from_slice(nonce), Payload { msg: sealed, aad })
            .map_err(|_| CryptoError::AuthenticationFailure)
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
fn hardware_support() -> bool {
    std::arch::is_x86_feature_detected!("aes") && std::arch::is_x86_feature_detected!("pclmulqdq")
}

#[cfg(target_arch = "aarch64")]
fn hardware_support() -> bool {
    std::arch::is_aarch64_feature_detected!("aes")
        && std::arch::is_aarch64_feature_detected!("pmull")
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
fn hardware_support() -> bool {
    false
}
