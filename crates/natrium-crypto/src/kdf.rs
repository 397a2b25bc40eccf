//! Hash-based key derivation
//!
//! # Extract / Expand
//!
//! ```text
//! source key bytes
//!        │
//!        ▼ BLAKE2b-256(ikm, key = zero bytes of len(ikm))
//! PRK
//!        │
//!        ▼ BLAKE2b-256(info ‖ salt ‖ 0x01, key = PRK)
//! 32-byte output key
//! ```
//!
//! This is a single-block expand: every output is exactly one BLAKE2b-256
//! block. [`crate::SharedKey::derive`] and the committing AEAD engine share
//! both steps.
//!
//! Diffie-Hellman outputs go through HKDF-SHA256 instead, with both public
//! keys bound into the info string.

use blake2::{
    Blake2b, Blake2bMac,
    digest::{Digest as _, Mac, consts::U32},
};
use hkdf::Hkdf;
use hmac::Hmac;
use sha2::{Sha256, Sha512};
use zeroize::Zeroizing;

/// Output length of every derivation in this module
pub const OUTPUT_BYTES: usize = 32;

/// Label for Diffie-Hellman session key derivation
const SESSION_LABEL: &[u8] = b"natrium.asymmetric.session";

/// Expansion counter for the single output block
const BLOCK_COUNTER: [u8; 1] = [0x01];

type Blake2b256 = Blake2b<U32>;
type Blake2bMac256 = Blake2bMac<U32>;
type HmacSha512 = Hmac<Sha512>;

/// Unkeyed BLAKE2b-256.
pub fn hash(data: &[u8]) -> [u8; OUTPUT_BYTES] {
    let digest = Blake2b256::digest(data);

    let mut out = [0u8; OUTPUT_BYTES];
    out.copy_from_slice(&digest);
    out
}

/// Keyed BLAKE2b-256 over the concatenation of `parts`.
///
/// `key` must be at most 64 bytes; all callers pass 32- or 64-byte keys.
pub(crate) fn keyed_hash(key: &[u8], parts: &[&[u8]]) -> Zeroizing<[u8; OUTPUT_BYTES]> {
    let Ok(mut mac) = <Blake2bMac256 as Mac>::new_from_slice(key) else {
        unreachable!("BLAKE2b accepts keys up to 64 bytes");
    };
    for part in parts {
        mac.update(part);
    }
    let result = mac.finalize().into_bytes();

    let mut out = Zeroizing::new([0u8; OUTPUT_BYTES]);
    out.copy_from_slice(&result);
    out
}

/// Extract a pseudo-random key from source key bytes.
pub(crate) fn extract(ikm: &[u8]) -> Zeroizing<[u8; OUTPUT_BYTES]> {
    let zero_key = Zeroizing::new(vec![0u8; ikm.len()]);
    keyed_hash(&zero_key, &[ikm])
}

/// Expand a pseudo-random key into one 32-byte output key.
pub(crate) fn expand(
    prk: &[u8; OUTPUT_BYTES],
    info: &[u8],
    salt: &[u8],
) -> Zeroizing<[u8; OUTPUT_BYTES]> {
    keyed_hash(prk, &[info, salt, &BLOCK_COUNTER])
}

/// Derive a session key from a Diffie-Hellman shared secret.
///
/// The public keys are bound in sorted order so both parties derive the same
/// key regardless of which side they are on.
pub(crate) fn session_key(
    shared_secret: &[u8; OUTPUT_BYTES],
    public_a: &[u8; OUTPUT_BYTES],
    public_b: &[u8; OUTPUT_BYTES],
) -> Zeroizing<[u8; OUTPUT_BYTES]> {
    let (low, high) =
        if public_a <= public_b { (public_a, public_b) } else { (public_b, public_a) };

    let hkdf = Hkdf::<Sha256>::new(None, shared_secret);

    // Capacity: label + two public keys
    let mut info = Vec::with_capacity(SESSION_LABEL.len() + 2 * OUTPUT_BYTES);
    info.extend_from_slice(SESSION_LABEL);
    info.extend_from_slice(low);
    info.extend_from_slice(high);

    let mut key = Zeroizing::new([0u8; OUTPUT_BYTES]);
    let Ok(()) = hkdf.expand(&info, key.as_mut_slice()) else {
        unreachable!("32 bytes is a valid HKDF-SHA256 output length");
    };
    key
}

/// HMAC-SHA-512 truncated to 32 bytes.
pub(crate) fn hmac_sha512_256(key: &[u8], data: &[u8]) -> [u8; OUTPUT_BYTES] {
    let Ok(mut mac) = <HmacSha512 as Mac>::new_from_slice(key) else {
        unreachable!("HMAC accepts any key size");
    };
    mac.update(data);
    let result = mac.finalize().into_bytes();

    let mut out = [0u8; OUTPUT_BYTES];
    out.copy_from_slice(&result[..OUTPUT_BYTES]);
    out
}
