//! Authenticated encryption strategies
//!
//! # Registry
//!
//! ```text
//! Algorithm::XChaCha20Blake2b   "xchacha20-blake2b"   default, key-committing
//! Algorithm::Aes256Gcm          "aes256-gcm"          needs AES + CLMUL hardware
//! Algorithm::XChaCha20Poly1305  "xchacha20-poly1305"  interoperability
//! Algorithm::XSalsa20Poly1305   "xsalsa20-poly1305"   legacy secretbox, no AAD
//! ```
//!
//! The set is closed. Each [`Algorithm`] resolves to a stateless
//! [`AeadStrategy`] through [`Algorithm::strategy`]; callers pick an
//! algorithm explicitly and nothing is negotiated from ciphertext contents.
//!
//! # Failure Modes
//!
//! Every strategy fails closed: input shorter than
//! [`AeadStrategy::min_ciphertext_len`] is `MessageTooShort`, any
//! authentication failure is `AuthenticationFailure`, and no partial
//! plaintext is ever returned.

mod committing;
mod gcm;
mod poly1305;
mod secretbox;

use std::{fmt, str::FromStr};

pub use committing::{
    MIN_CIPHERTEXT_BYTES, NONCE_BYTES, SALT_BYTES, TAG_BYTES, VERSION, XChaCha20Blake2bStrategy,
};
pub use gcm::Aes256GcmStrategy;
pub use poly1305::XChaCha20Poly1305Strategy;
pub use secretbox::XSalsa20Poly1305Strategy;
use serde::{Deserialize, Serialize};

use crate::{
    encoding::Ciphertext,
    entropy::Entropy,
    error::CryptoError,
    keys::{Key, SharedKey},
};

/// Contract shared by every symmetric encryption strategy.
///
/// Implementations are stateless; all randomness comes from the supplied
/// [`Entropy`].
pub trait AeadStrategy: Send + Sync {
    /// Registry entry this strategy implements.
    fn algorithm(&self) -> Algorithm;

    /// Smallest ciphertext this strategy can produce (empty plaintext).
    fn min_ciphertext_len(&self) -> usize;

    /// Whether the strategy can run on this platform.
    fn is_available(&self) -> bool {
        true
    }

    /// Whether the strategy authenticates associated data.
    fn supports_aad(&self) -> bool {
        true
    }

    /// Encrypt `plaintext`, binding `aad`.
    fn encrypt(
        &self,
        key: &SharedKey,
        plaintext: &[u8],
        aad: &[u8],
        entropy: &dyn Entropy,
    ) -> Result<Ciphertext, CryptoError>;

    /// Authenticate and decrypt `ciphertext`.
    fn decrypt(&self, key: &SharedKey, ciphertext: &[u8], aad: &[u8])
    -> Result<Vec<u8>, CryptoError>;
}

/// Closed set of supported encryption algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Algorithm {
    /// XChaCha20 with a keyed BLAKE2b tag; key-committing
    #[default]
    #[serde(rename = "xchacha20-blake2b")]
    XChaCha20Blake2b,
    /// AES-256-GCM
    #[serde(rename = "aes256-gcm")]
    Aes256Gcm,
    /// XChaCha20-Poly1305
    #[serde(rename = "xchacha20-poly1305")]
    XChaCha20Poly1305,
    /// XSalsa20-Poly1305 secretbox; rejects associated data
    #[serde(rename = "xsalsa20-poly1305")]
    XSalsa20Poly1305,
}

impl Algorithm {
    /// Every registered algorithm.
    pub const ALL: [Self; 4] =
        [Self::XChaCha20Blake2b, Self::Aes256Gcm, Self::XChaCha20Poly1305, Self::XSalsa20Poly1305];

    /// Stable name, as used in configuration and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::XChaCha20Blake2b => "xchacha20-blake2b",
            Self::Aes256Gcm => "aes256-gcm",
            Self::XChaCha20Poly1305 => "xchacha20-poly1305",
            Self::XSalsa20Poly1305 => "xsalsa20-poly1305",
        }
    }

    /// Strategy implementing this algorithm.
    pub fn strategy(self) -> &'static dyn AeadStrategy {
        match self {
            Self::XChaCha20Blake2b => &XChaCha20Blake2bStrategy,
            Self::Aes256Gcm => &Aes256GcmStrategy,
            Self::XChaCha20Poly1305 => &XChaCha20Poly1305Strategy,
            Self::XSalsa20Poly1305 => &XSalsa20Poly1305Strategy,
        }
    }

    /// Whether this algorithm can run on this platform.
    pub fn is_available(self) -> bool {
        self.strategy().is_available()
    }

    /// Smallest valid ciphertext for this algorithm.
    pub fn min_ciphertext_len(self) -> usize {
        self.strategy().min_ciphertext_len()
    }

    /// Encrypt with this algorithm's strategy.
    pub fn encrypt(
        self,
        key: &SharedKey,
        plaintext: &[u8],
        aad: &[u8],
        entropy: &dyn Entropy,
    ) -> Result<Ciphertext, CryptoError> {
        let ciphertext = self.strategy().encrypt(key, plaintext, aad, entropy)?;
        tracing::trace!(
            algorithm = %self,
            key_id = %key.id(),
            plaintext_len = plaintext.len(),
            ciphertext_len = ciphertext.len(),
            "encrypted"
        );
        Ok(ciphertext)
    }

    /// Decrypt with this algorithm's strategy.
    pub fn decrypt(
        self,
        key: &SharedKey,
        ciphertext: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        self.strategy().decrypt(key, ciphertext, aad).inspect_err(|error| {
            tracing::debug!(
                algorithm = %self,
                key_id = %key.id(),
                ciphertext_len = ciphertext.len(),
                %error,
                "decryption rejected"
            );
        })
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == s)
            .ok_or_else(|| CryptoError::UnknownAlgorithm { name: s.to_string() })
    }
}

/// Reject ciphertexts shorter than `minimum`.
fn check_min_len(ciphertext: &[u8], minimum: usize) -> Result<(), CryptoError> {
    if ciphertext.len() < minimum {
        return Err(CryptoError::MessageTooShort { minimum, actual: ciphertext.len() });
    }
    Ok(())
}
