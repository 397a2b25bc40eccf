//! Symmetric shared key

use std::fmt;

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use super::{Key, decode_key_material};
use crate::{encoding::binary::fixed, entropy::Entropy, error::CryptoError, kdf};

/// Length of a shared key
pub const SHARED_KEY_BYTES: usize = 32;

/// A 32-byte symmetric key.
///
/// Used as the root of a [`crate::KeyChain`], as a derived sub-key and as the
/// key input to every AEAD strategy.
///
/// # Security
///
/// - Zeroed on drop
/// - `Debug` shows only the key id
/// - Refuses serde serialization
pub struct SharedKey {
    bytes: [u8; SHARED_KEY_BYTES],
}

impl SharedKey {
    /// Generate a key from the CSPRNG.
    pub fn generate(entropy: &dyn Entropy) -> Self {
        let mut bytes = [0u8; SHARED_KEY_BYTES];
        entropy.fill(&mut bytes);
        Self { bytes }
    }

    /// Create a key from exactly 32 raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        fixed(bytes).map(Self::from_array)
    }

    /// Import a key from raw bytes, `base64:` text or 64 hex digits.
    pub fn import(input: impl AsRef<[u8]>) -> Result<Self, CryptoError> {
        let bytes = decode_key_material::<SHARED_KEY_BYTES>(input.as_ref(), Self::KEY_TYPE)?;
        Ok(Self::from_array(*bytes))
    }

    /// Derive a new key from `key`.
    ///
    /// ```text
    /// PRK = BLAKE2b-256(key.bytes(), key = zero bytes of key.length())
    /// out = BLAKE2b-256(info ‖ salt ‖ 0x01, key = PRK)
    /// ```
    ///
    /// Output is always exactly one 32-byte block.
    pub fn derive(key: &impl Key, info: &[u8], salt: &[u8]) -> Self {
        let prk = kdf::extract(key.bytes());
        let derived = kdf::expand(&prk, info, salt);
        Self::from_array(*derived)
    }

    pub(crate) fn from_array(bytes: [u8; SHARED_KEY_BYTES]) -> Self {
        Self { bytes }
    }

    pub(crate) fn as_array(&self) -> &[u8; SHARED_KEY_BYTES] {
        &self.bytes
    }
}

impl Key for SharedKey {
    const KEY_TYPE: &'static str = "SharedKey";

    fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Drop for SharedKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl PartialEq for SharedKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes.ct_eq(&other.bytes).into()
    }
}

impl Eq for SharedKey {}

impl fmt::Debug for SharedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedKey").field("id", &self.id()).finish_non_exhaustive()
    }
}

super::prohibit_serde!(SharedKey);
