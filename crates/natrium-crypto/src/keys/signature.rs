//! Ed25519 signature key pairs

use std::fmt;

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, Zeroizing};

use super::{KEY_HALF_BYTES, KEY_PAIR_BYTES, Key, decode_key_material};
use crate::{
    encoding::{BinaryString, Encoding, MessageSignature, binary::fixed},
    entropy::Entropy,
    error::CryptoError,
};

/// Ed25519 key pair stored as `seed(32) ‖ public(32)`.
///
/// # Security
///
/// - Zeroed on drop
/// - `Debug` shows only the public key
/// - Refuses serde serialization
pub struct SignatureKeyPair {
    bytes: [u8; KEY_PAIR_BYTES],
}

impl SignatureKeyPair {
    /// Generate a key pair from the CSPRNG.
    pub fn generate(entropy: &dyn Entropy) -> Self {
        let mut seed = Zeroizing::new([0u8; KEY_HALF_BYTES]);
        entropy.fill(seed.as_mut_slice());
        Self::from_seed(&seed)
    }

    /// Deterministically build a key pair from a 32-byte seed.
    pub fn from_seed(seed: &[u8; KEY_HALF_BYTES]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);

        let mut bytes = [0u8; KEY_PAIR_BYTES];
        bytes[..KEY_HALF_BYTES].copy_from_slice(seed);
        bytes[KEY_HALF_BYTES..].copy_from_slice(signing_key.verifying_key().as_bytes());
        Self { bytes }
    }

    /// Create a key pair from exactly 64 raw bytes.
    ///
    /// The public half must match the seed.
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
        let mut seed = Zeroizing::new([0u8; KEY_HALF_BYTES]);
        seed.copy_from_slice(&bytes[..KEY_HALF_BYTES]);

        let pair = Self::from_seed(&seed);
        if !bool::from(pair.bytes.ct_eq(bytes)) {
            return Err(CryptoError::KeyDecodeFailure { key_type: Self::KEY_TYPE });
        }
        Ok(pair)
    }

    /// Public half.
    pub fn public(&self) -> SignaturePublicKey {
        let mut public = [0u8; KEY_HALF_BYTES];
        public.copy_from_slice(&self.bytes[KEY_HALF_BYTES..]);
        SignaturePublicKey(public)
    }

    /// Produce a detached signature over `message`.
    ///
    /// Ed25519 signing is deterministic: the same key and message always
    /// yield the same signature.
    pub fn sign(&self, message: &[u8]) -> MessageSignature {
        let signing_key = SigningKey::from_bytes(self.seed());
        MessageSignature::new(signing_key.sign(message).to_bytes())
    }

    pub(crate) fn seed(&self) -> &[u8; KEY_HALF_BYTES] {
        let Some((seed, _)) = self.bytes.split_first_chunk::<KEY_HALF_BYTES>() else {
            unreachable!("key pair holds two halves");
        };
        seed
    }
}

impl Key for SignatureKeyPair {
    const KEY_TYPE: &'static str = "SignatureKeyPair";

    fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Drop for SignatureKeyPair {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl PartialEq for SignatureKeyPair {
    fn eq(&self, other: &Self) -> bool {
        self.bytes.ct_eq(&other.bytes).into()
    }
}

impl Eq for SignatureKeyPair {}

impl fmt::Debug for SignatureKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureKeyPair").field("public", &self.public()).finish_non_exhaustive()
    }
}

super::prohibit_serde!(SignatureKeyPair);

/// Ed25519 public key.
#[derive(Clone, Copy)]
pub struct SignaturePublicKey([u8; KEY_HALF_BYTES]);

impl SignaturePublicKey {
    /// Wrap raw public key bytes.
    pub fn new(bytes: [u8; KEY_HALF_BYTES]) -> Self {
        Self(bytes)
    }

    /// Verify a detached signature over `message`.
    ///
    /// Uses strict verification, which rejects small-order public keys and
    /// non-canonical signatures. Never errors: a public key that is not a
    /// valid curve point simply fails verification.
    pub fn verify(&self, signature: &MessageSignature, message: &[u8]) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.0) else {
            return false;
        };
        let signature = Signature::from_bytes(&signature.to_array());
        verifying_key.verify_strict(message, &signature).is_ok()
    }
}

impl BinaryString for SignaturePublicKey {
    const LENGTH: Option<usize> = Some(KEY_HALF_BYTES);

    fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        fixed(bytes).map(Self)
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl PartialEq for SignaturePublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for SignaturePublicKey {}

impl fmt::Debug for SignaturePublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignaturePublicKey({})", Encoding::Hex.encode(&self.0))
    }
}
