//! Public-key encryption and signatures
//!
//! # Agreement
//!
//! ```text
//! shared  = X25519(my_secret, their_public)          reject all-zero output
//! session = HKDF-SHA256(shared, "natrium.asymmetric.session" ‖ min(pk) ‖ max(pk))
//! ```
//!
//! Both parties compute the same session key; it then keys the configured
//! [`Algorithm`].
//!
//! # Sealing
//!
//! Anonymous sealing uses a fresh ephemeral key pair per message:
//!
//! ```text
//! ┌──────────────────────┬──────────────────────────────────────┐
//! │ ephemeral public (32)│ ciphertext under session(eph, recv)  │
//! └──────────────────────┴──────────────────────────────────────┘
//! AAD = ephemeral public ‖ recipient public
//! ```
//!
//! The ephemeral key pair is dropped (and zeroed) before `seal` returns.

use crate::{
    aead::Algorithm,
    encoding::{Ciphertext, MessageSignature},
    entropy::Entropy,
    error::CryptoError,
    kdf,
    keys::{
        EncryptionKeyPair, EncryptionPublicKey, KEY_HALF_BYTES, SharedKey, SignatureKeyPair,
        SignaturePublicKey,
    },
};

/// Asymmetric operations over a chosen symmetric algorithm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Asymmetric {
    algorithm: Algorithm,
}

impl Asymmetric {
    /// Create a facade encrypting with `algorithm`.
    pub fn new(algorithm: Algorithm) -> Self {
        Self { algorithm }
    }

    /// Symmetric algorithm used for session keys.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Encrypt from `my_pair` to `their_public`.
    pub fn encrypt(
        &self,
        my_pair: &EncryptionKeyPair,
        their_public: &EncryptionPublicKey,
        plaintext: &[u8],
        aad: &[u8],
        entropy: &dyn Entropy,
    ) -> Result<Ciphertext, CryptoError> {
        let session = session_key(my_pair, their_public)?;
        self.algorithm.encrypt(&session, plaintext, aad, entropy)
    }

    /// Decrypt a ciphertext `their_public` encrypted to `my_pair`.
    pub fn decrypt(
        &self,
        my_pair: &EncryptionKeyPair,
        their_public: &EncryptionPublicKey,
        ciphertext: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let session = session_key(my_pair, their_public)?;
        self.algorithm.decrypt(&session, ciphertext, aad)
    }

    /// Anonymously encrypt to `recipient`.
    pub fn seal(
        &self,
        recipient: &EncryptionPublicKey,
        plaintext: &[u8],
        entropy: &dyn Entropy,
    ) -> Result<Ciphertext, CryptoError> {
        let ephemeral = EncryptionKeyPair::generate(entropy);
        let ephemeral_public = ephemeral.public();

        let session = session_key(&ephemeral, recipient)?;
        let aad = self.seal_aad(&ephemeral_public, recipient);
        let ciphertext = self.algorithm.encrypt(&session, plaintext, &aad, entropy)?;

        let mut out = Vec::with_capacity(KEY_HALF_BYTES + ciphertext.len());
        out.extend_from_slice(ephemeral_public.as_array());
        out.extend_from_slice(&ciphertext.into_bytes());
        Ok(Ciphertext::new(out))
    }

    /// Open a message produced by [`seal`](Self::seal) for `my_pair`.
    pub fn unseal(
        &self,
        my_pair: &EncryptionKeyPair,
        sealed: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let minimum = KEY_HALF_BYTES + self.algorithm.min_ciphertext_len();
        if sealed.len() < minimum {
            tracing::debug!(minimum, actual = sealed.len(), "sealed message too short");
            return Err(CryptoError::MessageTooShort { minimum, actual: sealed.len() });
        }

        let Some((ephemeral, ciphertext)) = sealed.split_first_chunk::<KEY_HALF_BYTES>() else {
            unreachable!("length checked above");
        };
        let ephemeral_public = EncryptionPublicKey::new(*ephemeral);

        let session = session_key(my_pair, &ephemeral_public)?;
        let aad = self.seal_aad(&ephemeral_public, &my_pair.public());
        self.algorithm.decrypt(&session, ciphertext, &aad)
    }

    /// Detached signature over `message`.
    pub fn sign(&self, pair: &SignatureKeyPair, message: &[u8]) -> MessageSignature {
        pair.sign(message)
    }

    /// Strictly verify a detached signature.
    pub fn verify(
        &self,
        public: &SignaturePublicKey,
        signature: &MessageSignature,
        message: &[u8],
    ) -> bool {
        let valid = public.verify(signature, message);
        if !valid {
            tracing::debug!(message_len = message.len(), "signature rejected");
        }
        valid
    }

    /// Associated data binding a sealed message to both public keys.
    ///
    /// Empty for strategies without associated data; the session key already
    /// binds both keys there.
    fn seal_aad(
        &self,
        ephemeral: &EncryptionPublicKey,
        recipient: &EncryptionPublicKey,
    ) -> Vec<u8> {
        if !self.algorithm.strategy().supports_aad() {
            return Vec::new();
        }
        let mut aad = Vec::with_capacity(2 * KEY_HALF_BYTES);
        aad.extend_from_slice(ephemeral.as_array());
        aad.extend_from_slice(recipient.as_array());
        aad
    }
}

fn session_key(
    my_pair: &EncryptionKeyPair,
    their_public: &EncryptionPublicKey,
) -> Result<SharedKey, CryptoError> {
    let shared = my_pair.agree(their_public).inspect_err(|_| {
        tracing::debug!("key agreement produced a non-contributory secret");
    })?;
    let session = kdf::session_key(&shared, my_pair.public().as_array(), their_public.as_array());
    Ok(SharedKey::from_array(*session))
}
