//! The Natrium facade
//!
//! # Key Hierarchy
//!
//! ```text
//!                    root SharedKey
//!                          │
//!          ┌───────────────┴───────────────┐
//!          ▼                               ▼
//!   derive(root, context)     derive(root, "natrium.signature")
//!          │                               │
//!          ▼                               ▼
//!   HMAC-SHA-512/256 or              Ed25519 seed
//!   Algorithm strategy
//! ```
//!
//! Every operation derives its sub-key from the root for that one call, as
//! `SharedKey::derive(root, context, "")`. The caller-supplied context is the
//! only separation between domains: a ciphertext produced under context
//! `"cookies"` does not decrypt under context `"sessions"`. Subsystems that
//! need both a MAC and an encryption key pick distinct contexts for them.

use std::fmt;

use crate::{
    aead::Algorithm,
    asymmetric::Asymmetric,
    config::NatriumConfig,
    encoding::{BinaryString, Ciphertext, Digest, MessageSignature},
    entropy::{Entropy, SystemEntropy},
    error::CryptoError,
    kdf,
    keys::{
        EncryptionKeyPair, EncryptionPublicKey, Key, SharedKey, SignatureKeyPair,
        SignaturePublicKey,
    },
};

/// Context under which the facade's signature key pair is derived
pub const SIGNATURE_CONTEXT: &[u8] = b"natrium.signature";

/// Root key holder deriving per-context sub-keys.
///
/// Sub-keys are derived on every call and never cached.
pub struct KeyChain {
    root: SharedKey,
}

impl KeyChain {
    /// Wrap a root key.
    pub fn new(root: SharedKey) -> Self {
        Self { root }
    }

    /// Fingerprint of the root key.
    pub fn root_id(&self) -> String {
        self.root.id()
    }

    /// Derive the sub-key for `context`.
    ///
    /// Equal to `SharedKey::derive(root, context, b"")`.
    pub fn derive(&self, context: &[u8]) -> Result<SharedKey, CryptoError> {
        if context.is_empty() {
            return Err(CryptoError::InvalidContext);
        }
        Ok(self.derive_unchecked(context))
    }

    fn derive_unchecked(&self, context: &[u8]) -> SharedKey {
        let key = SharedKey::derive(&self.root, context, b"");
        tracing::trace!(
            context_len = context.len(),
            root_id = %self.root.id(),
            key_id = %key.id(),
            "derived sub-key"
        );
        key
    }
}

impl fmt::Debug for KeyChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyChain").field("root_id", &self.root.id()).finish()
    }
}

/// Single entry point for hashing, MACs, encryption and signatures.
///
/// Generic over the randomness source so tests can run with deterministic
/// entropy; production code uses the default [`SystemEntropy`].
pub struct Natrium<E: Entropy = SystemEntropy> {
    keys: KeyChain,
    asymmetric: Asymmetric,
    entropy: E,
}

impl Natrium<SystemEntropy> {
    /// Create a facade over `root` encrypting with `algorithm`.
    pub fn new(root: SharedKey, algorithm: Algorithm) -> Self {
        Self::with_entropy(root, algorithm, SystemEntropy)
    }

    /// Create a facade from configuration.
    pub fn from_config(config: &NatriumConfig) -> Result<Self, CryptoError> {
        let root = config.root_key()?;
        if !config.algorithm.is_available() {
            return Err(CryptoError::AlgorithmUnavailable { algorithm: config.algorithm.name() });
        }
        Ok(Self::new(root, config.algorithm))
    }
}

impl<E: Entropy> Natrium<E> {
    /// Create a facade with an explicit randomness source.
    pub fn with_entropy(root: SharedKey, algorithm: Algorithm, entropy: E) -> Self {
        tracing::debug!(%algorithm, key_id = %root.id(), "natrium initialized");
        Self { keys: KeyChain::new(root), asymmetric: Asymmetric::new(algorithm), entropy }
    }

    /// Symmetric algorithm in use.
    pub fn algorithm(&self) -> Algorithm {
        self.asymmetric.algorithm()
    }

    /// Fingerprint of the root key.
    pub fn key_id(&self) -> String {
        self.keys.root_id()
    }

    /// The key chain backing this facade.
    pub fn key_chain(&self) -> &KeyChain {
        &self.keys
    }

    /// Unkeyed BLAKE2b-256 digest of `data`.
    pub fn hash(&self, data: &[u8]) -> Digest {
        Digest::new(kdf::hash(data))
    }

    /// HMAC-SHA-512/256 of `data` under the `context` MAC key.
    pub fn hmac(&self, data: &[u8], context: &[u8]) -> Result<Digest, CryptoError> {
        let key = self.keys.derive(context)?;
        Ok(Digest::new(kdf::hmac_sha512_256(key.bytes(), data)))
    }

    /// Check `mac` against `data` in constant time.
    pub fn verify_hmac(
        &self,
        data: &[u8],
        mac: &Digest,
        context: &[u8],
    ) -> Result<bool, CryptoError> {
        let expected = self.hmac(data, context)?;
        Ok(expected == *mac)
    }

    /// Encrypt `data` under the `context` encryption key.
    pub fn encrypt(
        &self,
        data: &[u8],
        context: &[u8],
        aad: &[u8],
    ) -> Result<Ciphertext, CryptoError> {
        let key = self.keys.derive(context)?;
        self.algorithm().encrypt(&key, data, aad, &self.entropy)
    }

    /// Decrypt a ciphertext produced by [`encrypt`](Self::encrypt).
    pub fn decrypt(
        &self,
        ciphertext: &[u8],
        context: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let key = self.keys.derive(context)?;
        self.algorithm().decrypt(&key, ciphertext, aad)
    }

    /// Anonymously encrypt `data` to `public`.
    pub fn encrypt_with_public_key(
        &self,
        public: &EncryptionPublicKey,
        data: &[u8],
    ) -> Result<Ciphertext, CryptoError> {
        self.asymmetric.seal(public, data, &self.entropy)
    }

    /// Open a message sealed to `pair`.
    pub fn decrypt_with_secret_key(
        &self,
        pair: &EncryptionKeyPair,
        sealed: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        self.asymmetric.unseal(pair, sealed)
    }

    /// Sign `message` with the root-derived signature key pair.
    pub fn sign(&self, message: &[u8]) -> MessageSignature {
        self.asymmetric.sign(&self.signature_key_pair(), message)
    }

    /// Verify a signature made by [`sign`](Self::sign).
    ///
    /// Empty signature bytes are `InvalidSignature`; any other wrong length
    /// is `InvalidLength`.
    pub fn verify(&self, signature: &[u8], message: &[u8]) -> Result<bool, CryptoError> {
        self.verify_with_public_key(&self.signature_public_key(), signature, message)
    }

    /// Public half of the root-derived signature key pair.
    pub fn signature_public_key(&self) -> SignaturePublicKey {
        self.signature_key_pair().public()
    }

    /// Sign `message` with an explicit key pair.
    pub fn sign_with_secret_key(
        &self,
        pair: &SignatureKeyPair,
        message: &[u8],
    ) -> MessageSignature {
        self.asymmetric.sign(pair, message)
    }

    /// Verify a signature against an explicit public key.
    pub fn verify_with_public_key(
        &self,
        public: &SignaturePublicKey,
        signature: &[u8],
        message: &[u8],
    ) -> Result<bool, CryptoError> {
        let signature = MessageSignature::from_bytes(signature)?;
        Ok(self.asymmetric.verify(public, &signature, message))
    }

    fn signature_key_pair(&self) -> SignatureKeyPair {
        let seed = self.keys.derive_unchecked(SIGNATURE_CONTEXT);
        SignatureKeyPair::from_seed(seed.as_array())
    }
}

impl<E: Entropy> fmt::Debug for Natrium<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Natrium")
            .field("key_id", &self.key_id())
            .field("algorithm", &self.algorithm())
            .finish_non_exhaustive()
    }
}
