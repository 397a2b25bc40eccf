//! Natrium Cryptographic Core
//!
//! Key-committing authenticated encryption, key management, public-key
//! sealing and signatures behind a single facade. Randomness comes from an
//! injectable [`Entropy`] source so every operation can be exercised
//! deterministically in tests.
//!
//! # Architecture
//!
//! ```text
//!                  ┌───────────────────────────────┐
//!                  │ Natrium (facade)              │
//!                  │ hash · hmac · encrypt · sign  │
//!                  └──────┬──────────────┬─────────┘
//!                         │              │
//!                 ┌───────▼──────┐ ┌─────▼───────┐
//!                 │ KeyChain     │ │ Asymmetric  │
//!                 │ per-context  │ │ X25519      │
//!                 │ sub-keys     │ │ Ed25519     │
//!                 └───────┬──────┘ └─────┬───────┘
//!                         │              │
//!                  ┌──────▼──────────────▼─────────┐
//!                  │ Algorithm → AeadStrategy      │
//!                  │ xchacha20-blake2b (default)   │
//!                  │ aes256-gcm                    │
//!                  │ xchacha20-poly1305            │
//!                  │ xsalsa20-poly1305             │
//!                  └───────────────────────────────┘
//! ```
//!
//! # Security
//!
//! Key Commitment:
//! - The default engine tags ciphertexts with keyed BLAKE2b over a
//!   pre-authentication encoding of every field
//! - A ciphertext cannot be constructed that authenticates under two keys
//!
//! Fail-Closed Decryption:
//! - Length, version and tag are checked before any plaintext is produced
//! - Tags are compared in constant time
//! - Errors carry no partial output and no secret bytes
//!
//! Secret Hygiene:
//! - Key types zero their buffers on drop
//! - Derived keys and intermediate buffers are held in `Zeroizing`
//! - `Debug` shows key ids only; serde refuses key types outright
//! - Hex and base64 codecs are constant time

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod aead;
pub mod asymmetric;
pub mod config;
pub mod encoding;
pub mod entropy;
pub mod error;
pub mod kdf;
pub mod keys;
pub mod natrium;
pub mod pae;

pub use aead::{AeadStrategy, Algorithm};
pub use asymmetric::Asymmetric;
pub use config::{NatriumConfig, RootKeyMaterial};
pub use encoding::{BinaryString, Ciphertext, Digest, Encoding, MessageSignature};
pub use entropy::{Entropy, SystemEntropy};
pub use error::CryptoError;
pub use keys::{
    EncryptionKeyPair, EncryptionPublicKey, Key, SharedKey, SignatureKeyPair, SignaturePublicKey,
};
pub use natrium::{KeyChain, Natrium};
