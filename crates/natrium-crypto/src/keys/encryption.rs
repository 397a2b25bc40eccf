//! X25519 encryption key pairs

use std::fmt;

use sha2::{Digest as _, Sha512};
use subtle::ConstantTimeEq;
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};
use zeroize::{Zeroize, Zeroizing};

use super::{KEY_HALF_BYTES, KEY_PAIR_BYTES, Key, SignatureKeyPair, decode_key_material};
use crate::{
    encoding::{BinaryString, Encoding, binary::fixed},
    entropy::Entropy,
    error::CryptoError,
};

/// X25519 key pair stored as `secret(32) ‖ public(32)`.
///
/// # Security
///
/// - Zeroed on drop, including the temporary `StaticSecret` values built for
///   each agreement
/// - `Debug` shows only the public key
/// - Refuses serde serialization
pub struct EncryptionKeyPair {
    bytes: [u8; KEY_PAIR_BYTES],
}

impl EncryptionKeyPair {
    /// Generate a key pair from the CSPRNG.
    pub fn generate(entropy: &dyn Entropy) -> Self {
        let mut secret = Zeroizing::new([0u8; KEY_HALF_BYTES]);
        entropy.fill(secret.as_mut_slice());
        Self::from_secret(&secret)
    }

    /// Deterministically derive a key pair from a 32-byte seed.
    ///
    /// The secret half is the first 32 bytes of SHA-512(seed); the public
    /// half follows from it.
    pub fn from_seed(seed: &[u8; KEY_HALF_BYTES]) -> Self {
        let mut digest = Sha512::digest(seed);

        let mut secret = Zeroizing::new([0u8; KEY_HALF_BYTES]);
        secret.copy_from_slice(&digest[..KEY_HALF_BYTES]);
        digest.as_mut_slice().zeroize();

        Self::from_secret(&secret)
    }

    /// Convert an Ed25519 signature key pair into an X25519 key pair.
    ///
    /// The Ed25519 signing scalar is the first half of SHA-512(seed), so the
    /// converted secret equals [`from_seed`](Self::from_seed) applied to the
    /// signature seed. X25519 clamps it on use.
    pub fn from_secret_key(signature_key_pair: &SignatureKeyPair) -> Self {
        Self::from_seed(signature_key_pair.seed())
    }

    /// Build a key pair from its 32-byte secret half.
    pub fn from_secret(secret: &[u8; KEY_HALF_BYTES]) -> Self {
        let static_secret = StaticSecret::from(*secret);
        let public = X25519PublicKey::from(&static_secret);

        let mut bytes = [0u8; KEY_PAIR_BYTES];
        bytes[..KEY_HALF_BYTES].copy_from_slice(secret);
        bytes[KEY_HALF_BYTES..].copy_from_slice(public.as_bytes());
        Self { bytes }
    }

    /// Create a key pair from exactly 64 raw bytes.
    ///
    /// The public half must match the secret half.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let bytes = Zeroizing::new(fixed::<KEY_PAIR_BYTES>(bytes)?);
        Self::from_pair(&bytes)
    }

    /// Import a key pair from raw bytes, `base64:` text or 128 hex digits.
    pub fn import(input: impl AsRef<[u8]>) -> Result<Self, CryptoError> {
        let bytes = decode_key_material::<KEY_PAIR_BYTES>(input.as_ref(), Self::KEY_TYPE)?;
        Self::from_pair(&bytes)
    }

    fn from_pair(bytes: &[u8; KEY_PAIR_BYTES]) -> Result<Self, CryptoError> {
        let mut secret = Zeroizing::new([0u8; KEY_HALF_BYTES]);
        secret.copy_from_slice(&bytes[..KEY_HALF_BYTES]);

        let pair = Self::from_secret(&secret);
        if !bool::from(pair.bytes.ct_eq(bytes)) {
            return Err(CryptoError::KeyDecodeFailure { key_type: Self::KEY_TYPE });
        }
        Ok(pair)
    }

    /// Public half.
    pub fn public(&self) -> EncryptionPublicKey {
        let mut public = [0u8; KEY_HALF_BYTES];
        public.copy_from_slice(&self.bytes[KEY_HALF_BYTES..]);
        EncryptionPublicKey(public)
    }

    /// X25519 agreement between this secret and `their_public`.
    ///
    /// Fails if the result is all zeros, which happens for low-order public
    /// keys.
    pub(crate) fn agree(
        &self,
        their_public: &EncryptionPublicKey,
    ) -> Result<Zeroizing<[u8; KEY_HALF_BYTES]>, CryptoError> {
        let mut secret = Zeroizing::new([0u8; KEY_HALF_BYTES]);
        secret.copy_from_slice(&self.bytes[..KEY_HALF_BYTES]);
        let static_secret = StaticSecret::from(*secret);

        let shared = static_secret.diffie_hellman(&X25519PublicKey::from(their_public.0));
        if !shared.was_contributory() {
            return Err(CryptoError::KeyAgreementFailure);
        }
        Ok(Zeroizing::new(*shared.as_bytes()))
    }
}

impl Key for EncryptionKeyPair {
    const KEY_TYPE: &'static str = "EncryptionKeyPair";

    fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Drop for EncryptionKeyPair {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl PartialEq for EncryptionKeyPair {
    fn eq(&self, other: &Self) -> bool {
        self.bytes.ct_eq(&other.bytes).into()
    }
}

impl Eq for EncryptionKeyPair {}

impl fmt::Debug for EncryptionKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionKeyPair").field("public", &self.public()).finish_non_exhaustive()
    }
}

super::prohibit_serde!(EncryptionKeyPair);

/// X25519 public key.
#[derive(Clone, Copy)]
pub struct EncryptionPublicKey([u8; KEY_HALF_BYTES]);

impl EncryptionPublicKey {
    /// Wrap raw public key bytes.
    pub fn new(bytes: [u8; KEY_HALF_BYTES]) -> Self {
        Self(bytes)
    }

    pub(crate) fn as_array(&self) -> &[u8; KEY_HALF_BYTES] {
        &self.0
    }
}

impl BinaryString for EncryptionPublicKey {
    const LENGTH: Option<usize> = Some(KEY_HALF_BYTES);

    fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        fixed(bytes).map(Self)
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl PartialEq for EncryptionPublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for EncryptionPublicKey {}

impl fmt::Debug for EncryptionPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncryptionPublicKey({})", Encoding::Hex.encode(&self.0))
    }
}
