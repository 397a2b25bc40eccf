//! Constant-time text encodings for binary values
//!
//! Every encoder and decoder here runs in time independent of the byte
//! values (`base16ct`, `base64ct`), so the same functions are used for key
//! material, ciphertexts and public values alike.
//!
//! Decoding is lenient about shape but strict about content:
//!
//! - a scheme prefix (`hex:`, `base64:`, `base64url:`) overrides the
//!   requested encoding
//! - base64 input may use either alphabet and any amount of `=` padding
//! - hex input may use either case

pub(crate) mod binary;

use std::{fmt, str::FromStr};

use base64ct::{Base64, Base64Unpadded, Base64Url, Base64UrlUnpadded, Encoding as _};
use subtle::{ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroizing;

pub use binary::{BinaryString, Ciphertext, DIGEST_BYTES, Digest, MessageSignature, SIGNATURE_BYTES};

use crate::error::CryptoError;

/// Prefix marking hex-encoded values
pub const HEX_PREFIX: &str = "hex:";

/// Prefix marking standard-alphabet base64 values
pub const BASE64_PREFIX: &str = "base64:";

/// Prefix marking URL-safe base64 values
pub const BASE64URL_PREFIX: &str = "base64url:";

/// Text encoding for binary values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    /// Lowercase hexadecimal
    Hex,
    /// Standard alphabet, padded
    Base64,
    /// Standard alphabet, unpadded
    Base64Unpadded,
    /// URL-safe alphabet, padded
    Base64Url,
    /// URL-safe alphabet, unpadded
    #[default]
    Base64UrlUnpadded,
}

impl Encoding {
    /// Every supported encoding.
    pub const ALL: [Self; 5] = [
        Self::Hex,
        Self::Base64,
        Self::Base64Unpadded,
        Self::Base64Url,
        Self::Base64UrlUnpadded,
    ];

    /// Scheme prefix used for self-describing output.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Hex => HEX_PREFIX,
            Self::Base64 | Self::Base64Unpadded => BASE64_PREFIX,
            Self::Base64Url | Self::Base64UrlUnpadded => BASE64URL_PREFIX,
        }
    }

    /// Stable name of this encoding.
    pub fn name(self) -> &'static str {
        match self {
            Self::Hex => "hex",
            Self::Base64 => "base64",
            Self::Base64Unpadded => "base64-unpadded",
            Self::Base64Url => "base64url",
            Self::Base64UrlUnpadded => "base64url-unpadded",
        }
    }

    /// Encoding named by the scheme prefix of `input`, if any.
    pub fn detect(input: &str) -> Option<Self> {
        split_prefix(input).map(|(encoding, _)| encoding)
    }

    /// Encode `bytes` without a prefix.
    pub fn encode(self, bytes: &[u8]) -> String {
        match self {
            Self::Hex => base16ct::lower::encode_string(bytes),
            Self::Base64 => Base64::encode_string(bytes),
            Self::Base64Unpadded => Base64Unpadded::encode_string(bytes),
            Self::Base64Url => Base64Url::encode_string(bytes),
            Self::Base64UrlUnpadded => Base64UrlUnpadded::encode_string(bytes),
        }
    }

    /// Encode `bytes` with this encoding's scheme prefix.
    pub fn encode_prefixed(self, bytes: &[u8]) -> String {
        let mut out = String::from(self.prefix());
        out.push_str(&self.encode(bytes));
        out
    }

    /// Decode `input`, honouring a scheme prefix if present.
    ///
    /// The returned buffer is wiped on drop since callers may decode secret
    /// material through it.
    pub fn decode(self, input: &str) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        match split_prefix(input) {
            Some((encoding, body)) => encoding.decode_body(body),
            None => self.decode_body(input),
        }
    }

    /// Decode `input` whose encoding is named by its prefix, falling back to
    /// base64 in either alphabet.
    pub fn decode_any(input: &str) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        Self::Base64UrlUnpadded.decode(input)
    }

    fn decode_body(self, body: &str) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        match self {
            Self::Hex => decode_hex(body),
            Self::Base64 | Self::Base64Unpadded | Self::Base64Url | Self::Base64UrlUnpadded => {
                decode_base64(body)
            },
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|encoding| encoding.name() == s)
            .ok_or(CryptoError::InvalidEncoding { encoding: "encoding name" })
    }
}

fn split_prefix(input: &str) -> Option<(Encoding, &str)> {
    if let Some(body) = input.strip_prefix(HEX_PREFIX) {
        Some((Encoding::Hex, body))
    } else if let Some(body) = input.strip_prefix(BASE64URL_PREFIX) {
        Some((Encoding::Base64Url, body))
    } else {
        input.strip_prefix(BASE64_PREFIX).map(|body| (Encoding::Base64, body))
    }
}

fn decode_hex(body: &str) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let body = body.trim();
    let mut out = Zeroizing::new(vec![0u8; body.len() / 2]);
    let decoded = base16ct::mixed::decode(body, &mut out)
        .map_err(|_| CryptoError::InvalidEncoding { encoding: "hex" })?
        .len();
    out.truncate(decoded);
    Ok(out)
}

fn decode_base64(body: &str) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let trimmed = body.trim().trim_end_matches('=');

    // Map the standard alphabet onto the URL-safe one without branching on
    // the byte values
    let normalized: Zeroizing<Vec<u8>> =
        Zeroizing::new(trimmed.bytes().map(to_url_safe).collect());

    let mut out = Zeroizing::new(vec![0u8; normalized.len() * 3 / 4]);
    let decoded = Base64UrlUnpadded::decode(normalized.as_slice(), &mut out)
        .map_err(|_| CryptoError::InvalidEncoding { encoding: "base64" })?
        .len();
    out.truncate(decoded);
    Ok(out)
}

fn to_url_safe(byte: u8) -> u8 {
    let is_plus = byte.ct_eq(&b'+');
    let is_slash = byte.ct_eq(&b'/');
    let byte = u8::conditional_select(&byte, &b'-', is_plus);
    u8::conditional_select(&byte, &b'_', is_slash)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 0xfb 0xff 0xbf encodes to characters that differ between alphabets
    const ALPHABET_SENSITIVE: [u8; 3] = [0xfb, 0xff, 0xbf];

    #[test]
    fn prefixes() {
        assert_eq!(Encoding::Hex.prefix(), "hex:");
        assert_eq!(Encoding::Base64.prefix(), "base64:");
        assert_eq!(Encoding::Base64Unpadded.prefix(), "base64:");
        assert_eq!(Encoding::Base64Url.prefix(), "base64url:");
        assert_eq!(Encoding::Base64UrlUnpadded.prefix(), "base64url:");
    }

    #[test]
    fn encode_known_values() {
        assert_eq!(Encoding::Hex.encode(b"\x00\xab\xff"), "00abff");
        assert_eq!(Encoding::Base64.encode(b"ab"), "YWI=");
        assert_eq!(Encoding::Base64Unpadded.encode(b"ab"), "YWI");
        assert_eq!(Encoding::Base64.encode(&ALPHABET_SENSITIVE), "+/+/");
        assert_eq!(Encoding::Base64Url.encode(&ALPHABET_SENSITIVE), "-_-_");
    }

    #[test]
    fn encode_prefixed() {
        assert_eq!(Encoding::Hex.encode_prefixed(b"\x01"), "hex:01");
        assert_eq!(Encoding::Base64.encode_prefixed(b"ab"), "base64:YWI=");
    }

    #[test]
    fn base64_decoding_accepts_either_alphabet() {
        for input in ["+/+/", "-_-_", "base64:+/+/", "base64url:-_-_", "base64:-_-_"] {
            let decoded = Encoding::Base64Url.decode(input).unwrap();
            assert_eq!(decoded.as_slice(), &ALPHABET_SENSITIVE, "input {input}");
        }
    }

    #[test]
    fn base64_decoding_tolerates_padding() {
        for input in ["YWI", "YWI=", "YWI==", "YWI==="] {
            let decoded = Encoding::Base64.decode(input).unwrap();
            assert_eq!(decoded.as_slice(), b"ab", "input {input}");
        }
    }

    #[test]
    fn hex_decoding_is_case_insensitive() {
        let lower = Encoding::Hex.decode("00abff").unwrap();
        let upper = Encoding::Hex.decode("00ABFF").unwrap();
        assert_eq!(lower.as_slice(), &[0x00, 0xab, 0xff]);
        assert_eq!(*lower, *upper);
    }

    #[test]
    fn prefix_overrides_requested_encoding() {
        let decoded = Encoding::Base64.decode("hex:6162").unwrap();
        assert_eq!(decoded.as_slice(), b"ab");

        let decoded = Encoding::Hex.decode("base64:YWI=").unwrap();
        assert_eq!(decoded.as_slice(), b"ab");
    }

    #[test]
    fn malformed_input_is_rejected() {
        assert_eq!(
            Encoding::Hex.decode("abc").unwrap_err(),
            CryptoError::InvalidEncoding { encoding: "hex" }
        );
        assert_eq!(
            Encoding::Hex.decode("zz").unwrap_err(),
            CryptoError::InvalidEncoding { encoding: "hex" }
        );
        assert_eq!(
            Encoding::Base64.decode("a").unwrap_err(),
            CryptoError::InvalidEncoding { encoding: "base64" }
        );
        assert_eq!(
            Encoding::Base64.decode("YW*=").unwrap_err(),
            CryptoError::InvalidEncoding { encoding: "base64" }
        );
    }

    #[test]
    fn empty_input_decodes_to_empty() {
        assert!(Encoding::Hex.decode("").unwrap().is_empty());
        assert!(Encoding::Base64.decode("").unwrap().is_empty());
    }

    #[test]
    fn detect_reads_prefix() {
        assert_eq!(Encoding::detect("hex:00"), Some(Encoding::Hex));
        assert_eq!(Encoding::detect("base64:AA=="), Some(Encoding::Base64));
        assert_eq!(Encoding::detect("base64url:AA"), Some(Encoding::Base64Url));
        assert_eq!(Encoding::detect("AA"), None);
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for encoding in Encoding::ALL {
            assert_eq!(encoding.name().parse::<Encoding>().unwrap(), encoding);
        }
        assert!("base32".parse::<Encoding>().is_err());
    }

    #[test]
    fn decode_any_defaults_to_base64() {
        assert_eq!(Encoding::decode_any("YWI").unwrap().as_slice(), b"ab");
        assert_eq!(Encoding::decode_any("hex:6162").unwrap().as_slice(), b"ab");
    }
}
