//! Typed binary strings

use std::fmt;

use subtle::ConstantTimeEq;

use super::Encoding;
use crate::error::CryptoError;

/// Length of a detached Ed25519 signature
pub const SIGNATURE_BYTES: usize = 64;

/// Length of a BLAKE2b-256 or HMAC-SHA-512/256 digest
pub const DIGEST_BYTES: usize = 32;

/// An opaque byte sequence with encoded import and export.
///
/// The internal buffer is never handed out mutably; values are built once
/// from bytes and read back through [`as_bytes`](Self::as_bytes) or an
/// [`Encoding`].
pub trait BinaryString: Sized {
    /// Exact byte count for fixed-length types, `None` for variable length
    const LENGTH: Option<usize>;

    /// Build a value from raw bytes, checking the length for fixed-length
    /// types.
    fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError>;

    /// Raw bytes of this value.
    fn as_bytes(&self) -> &[u8];

    /// Decode `input` and build a value from it.
    ///
    /// With `encoding` set to `None`, a scheme prefix decides the encoding
    /// and unprefixed input is read as base64 in either alphabet.
    fn import(input: &str, encoding: Option<Encoding>) -> Result<Self, CryptoError> {
        let decoded = match encoding {
            Some(encoding) => encoding.decode(input)?,
            None => Encoding::decode_any(input)?,
        };
        Self::from_bytes(&decoded)
    }

    /// Like [`import`](Self::import) but returns `None` instead of failing.
    fn try_import(input: &str, encoding: Option<Encoding>) -> Option<Self> {
        Self::import(input, encoding).ok()
    }

    /// Encode this value, optionally with the encoding's scheme prefix.
    fn export(&self, encoding: Encoding, with_prefix: bool) -> String {
        if with_prefix {
            encoding.encode_prefixed(self.as_bytes())
        } else {
            encoding.encode(self.as_bytes())
        }
    }
}

/// Copy `bytes` into a fixed-size array, rejecting any other length.
pub(crate) fn fixed<const N: usize>(bytes: &[u8]) -> Result<[u8; N], CryptoError> {
    <[u8; N]>::try_from(bytes)
        .map_err(|_| CryptoError::InvalidLength { expected: N, actual: bytes.len() })
}

/// Encrypted payload produced by an AEAD strategy.
///
/// Variable length; the minimum length depends on the algorithm and is
/// enforced when decrypting.
#[derive(Clone)]
pub struct Ciphertext(Vec<u8>);

impl Ciphertext {
    /// Wrap an already-assembled ciphertext.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Ciphertext length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the ciphertext holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the ciphertext and return its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl BinaryString for Ciphertext {
    const LENGTH: Option<usize> = None;

    fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        Ok(Self(bytes.to_vec()))
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ciphertext").field("len", &self.0.len()).finish()
    }
}

impl PartialEq for Ciphertext {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for Ciphertext {}

/// Detached 64-byte signature.
#[derive(Clone, Copy)]
pub struct MessageSignature([u8; SIGNATURE_BYTES]);

impl MessageSignature {
    /// Wrap raw signature bytes.
    pub fn new(bytes: [u8; SIGNATURE_BYTES]) -> Self {
        Self(bytes)
    }

    /// Signature bytes as an array.
    pub fn to_array(&self) -> [u8; SIGNATURE_BYTES] {
        self.0
    }
}

impl BinaryString for MessageSignature {
    const LENGTH: Option<usize> = Some(SIGNATURE_BYTES);

    /// Empty input is rejected as an invalid signature rather than a length
    /// mismatch, so "no signature" can never be mistaken for a valid one.
    fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.is_empty() {
            return Err(CryptoError::InvalidSignature);
        }
        fixed(bytes).map(Self)
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for MessageSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageSignature({})", Encoding::Hex.encode(&self.0))
    }
}

impl PartialEq for MessageSignature {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for MessageSignature {}

/// 32-byte hash or MAC output.
#[derive(Clone, Copy)]
pub struct Digest([u8; DIGEST_BYTES]);

impl Digest {
    /// Wrap raw digest bytes.
    pub fn new(bytes: [u8; DIGEST_BYTES]) -> Self {
        Self(bytes)
    }

    /// Digest bytes as an array.
    pub fn to_array(&self) -> [u8; DIGEST_BYTES] {
        self.0
    }
}

impl BinaryString for Digest {
    const LENGTH: Option<usize> = Some(DIGEST_BYTES);

    fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        fixed(bytes).map(Self)
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", Encoding::Hex.encode(&self.0))
    }
}

impl PartialEq for Digest {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for Digest {}
