//! Pre-authentication encoding
//!
//! Length-prefixed concatenation of byte strings, MACed in place of a plain
//! concatenation so that moving bytes between adjacent pieces always changes
//! the MAC input.
//!
//! ```text
//! LE64(count) ‖ LE64(len(p0)) ‖ p0 ‖ LE64(len(p1)) ‖ p1 ‖ ...
//! ```
//!
//! `LE64` is a little-endian `u64` with the most significant bit cleared.

use zeroize::Zeroizing;

const LENGTH_BYTES: usize = 8;

/// Encode `pieces` for authentication.
///
/// The buffer may hold plaintext-derived data and is wiped on drop.
pub fn encode(pieces: &[&[u8]]) -> Zeroizing<Vec<u8>> {
    let body: usize = pieces.iter().map(|piece| LENGTH_BYTES + piece.len()).sum();

    let mut out = Zeroizing::new(Vec::with_capacity(LENGTH_BYTES + body));
    out.extend_from_slice(&le64(pieces.len()));
    for piece in pieces {
        out.extend_from_slice(&le64(piece.len()));
        out.extend_from_slice(piece);
    }
    out
}

fn le64(n: usize) -> [u8; LENGTH_BYTES] {
    (n as u64 & (u64::MAX >> 1)).to_le_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list() {
        assert_eq!(encode(&[]).as_slice(), b"\x00\x00\x00\x00\x00\x00\x00\x00");
    }

    #[test]
    fn single_empty_piece() {
        assert_eq!(
            encode(&[b""]).as_slice(),
            b"\x01\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00"
        );
    }

    #[test]
    fn two_empty_pieces() {
        assert_eq!(
            encode(&[b"", b""]).as_slice(),
            b"\x02\x00\x00\x00\x00\x00\x00\x00\
              \x00\x00\x00\x00\x00\x00\x00\x00\
              \x00\x00\x00\x00\x00\x00\x00\x00"
        );
    }

    #[test]
    fn single_piece() {
        assert_eq!(
            encode(&[b"test"]).as_slice(),
            b"\x01\x00\x00\x00\x00\x00\x00\x00\x04\x00\x00\x00\x00\x00\x00\x00test"
        );
    }

    #[test]
    fn boundaries_are_unambiguous() {
        assert_ne!(*encode(&[b"ab", b"c"]), *encode(&[b"a", b"bc"]));
        assert_ne!(*encode(&[b"abc"]), *encode(&[b"abc", b""]));
    }

    #[test]
    fn most_significant_bit_is_cleared() {
        assert_eq!(le64(usize::MAX)[7] & 0x80, 0);
    }
}
