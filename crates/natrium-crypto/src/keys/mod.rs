//! Key material
//!
//! # Key Types
//!
//! ```text
//! SharedKey (32 bytes)
//!   symmetric root and sub-keys, input to the AEAD strategies
//!
//! EncryptionKeyPair (64 bytes = X25519 secret ‖ public)
//!   Diffie-Hellman agreement, sealing
//!
//! SignatureKeyPair (64 bytes = Ed25519 seed ‖ public)
//!   detached signatures
//! ```
//!
//! # Lifecycle
//!
//! - Immutable after construction
//! - Backing buffers are zeroed on `Drop`, so leaving scope wipes the key on
//!   every path (return, `?`, unwinding)
//! - `Debug` prints the key id, never the bytes
//! - serde serialization and deserialization are refused; persisting key
//!   material requires an explicit [`Key::export`]

mod encryption;
mod shared;
mod signature;

pub use encryption::{EncryptionKeyPair, EncryptionPublicKey};
pub use shared::SharedKey;
pub use signature::{SignatureKeyPair, SignaturePublicKey};

use sha2::{Digest as _, Sha256};
use zeroize::Zeroizing;

use crate::{
    encoding::{BASE64_PREFIX, BASE64URL_PREFIX, Encoding, HEX_PREFIX},
    error::CryptoError,
};

/// Length of an X25519 or Ed25519 secret or public half
pub const KEY_HALF_BYTES: usize = 32;

/// Length of a key pair (secret half followed by public half)
pub const KEY_PAIR_BYTES: usize = 2 * KEY_HALF_BYTES;

/// Prefix of key fingerprints returned by [`Key::id`]
pub const KEY_ID_PREFIX: &str = "sha256:";

/// Common capability of all key material.
pub trait Key {
    /// Human-readable key type, used in errors and logs
    const KEY_TYPE: &'static str;

    /// Raw key bytes.
    fn bytes(&self) -> &[u8];

    /// Key length in bytes.
    fn length(&self) -> usize {
        self.bytes().len()
    }

    /// Non-secret fingerprint, `sha256:` followed by the lowercase hex
    /// SHA-256 of the key bytes.
    ///
    /// Safe to log and to use for auditing which key protected a value.
    fn id(&self) -> String {
        let digest = Sha256::digest(self.bytes());
        let mut id = String::from(KEY_ID_PREFIX);
        id.push_str(&Encoding::Hex.encode(&digest));
        id
    }

    /// Explicitly export the key bytes as text.
    ///
    /// The returned string is wiped on drop.
    fn export(&self, encoding: Encoding, with_prefix: bool) -> Zeroizing<String> {
        Zeroizing::new(if with_prefix {
            encoding.encode_prefixed(self.bytes())
        } else {
            encoding.encode(self.bytes())
        })
    }
}

/// Decode key material of exactly `N` bytes.
///
/// Accepted shapes, checked in order:
///
/// 1. exactly `N` raw bytes
/// 2. `base64:` or `base64url:` prefixed base64 decoding to `N` bytes
/// 3. exactly `2N` hex digits, optionally prefixed `hex:`
///
/// Prefixed base64 of the wrong length is `InvalidLength`; every other
/// shape is `KeyDecodeFailure`.
pub(crate) fn decode_key_material<const N: usize>(
    input: &[u8],
    key_type: &'static str,
) -> Result<Zeroizing<[u8; N]>, CryptoError> {
    let failure = CryptoError::KeyDecodeFailure { key_type };

    if input.len() == N {
        let mut raw = Zeroizing::new([0u8; N]);
        raw.copy_from_slice(input);
        return Ok(raw);
    }

    let text = std::str::from_utf8(input).map_err(|_| failure.clone())?;

    if text.starts_with(BASE64_PREFIX) || text.starts_with(BASE64URL_PREFIX) {
        let decoded = Encoding::Base64.decode(text).map_err(|_| failure)?;
        return copy_exact(&decoded);
    }

    let hex_body = text.strip_prefix(HEX_PREFIX).unwrap_or(text);
    if hex_body.len() == 2 * N {
        let decoded = Encoding::Hex.decode(hex_body).map_err(|_| failure)?;
        return copy_exact(&decoded);
    }

    Err(failure)
}

fn copy_exact<const N: usize>(decoded: &[u8]) -> Result<Zeroizing<[u8; N]>, CryptoError> {
    if decoded.len() != N {
        return Err(CryptoError::InvalidLength { expected: N, actual: decoded.len() });
    }
    let mut out = Zeroizing::new([0u8; N]);
    out.copy_from_slice(decoded);
    Ok(out)
}

/// Refuse serde (de)serialization for a secret key type.
macro_rules! prohibit_serde {
    ($ty:ty) => {
        impl serde::Serialize for $ty {
            fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
                Err(serde::ser::Error::custom(
                    $crate::error::CryptoError::SerializationProhibited {
                        type_name: <$ty as $crate::keys::Key>::KEY_TYPE,
                    },
                ))
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(_: D) -> Result<Self, D::Error> {
                Err(serde::de::Error::custom(
                    $crate::error::CryptoError::SerializationProhibited {
                        type_name: <$ty as $crate::keys::Key>::KEY_TYPE,
                    },
                ))
            }
        }
    };
}

pub(crate) use prohibit_serde;
