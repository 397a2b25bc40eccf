//! Error types for Natrium cryptographic operations

use thiserror::Error;

/// Errors from key handling, encoding, encryption and signature operations.
///
/// Variants never carry secret bytes. Decryption failures carry no partial
/// output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Key or fixed-length binary string does not match its byte count
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Required byte count
        expected: usize,
        /// Byte count that was supplied
        actual: usize,
    },

    /// Input is not valid in the requested encoding
    #[error("invalid {encoding} encoding")]
    InvalidEncoding {
        /// Name of the encoding that failed to decode
        encoding: &'static str,
    },

    /// Key import string is not raw, hex or base64 of the expected shape
    #[error("cannot decode {key_type} from the supplied material")]
    KeyDecodeFailure {
        /// Key type being imported
        key_type: &'static str,
    },

    /// Ciphertext shorter than the minimum for its algorithm
    #[error("message too short: need at least {minimum} bytes, got {actual}")]
    MessageTooShort {
        /// Minimum ciphertext length
        minimum: usize,
        /// Supplied ciphertext length
        actual: usize,
    },

    /// Ciphertext version tag does not match
    #[error("invalid version header")]
    InvalidVersionHeader,

    /// Authentication tag verification failed
    #[error("authentication failed")]
    AuthenticationFailure,

    /// Non-AEAD algorithm was given associated data
    #[error("{algorithm} does not support associated data")]
    UnsupportedAssociatedData {
        /// Algorithm that rejected the input
        algorithm: &'static str,
    },

    /// Algorithm is not supported on this platform
    #[error("{algorithm} is not available on this platform")]
    AlgorithmUnavailable {
        /// Algorithm that is unavailable
        algorithm: &'static str,
    },

    /// Secret key material refused generic serialization
    #[error("{type_name} cannot be serialized")]
    SerializationProhibited {
        /// Type that refused serialization
        type_name: &'static str,
    },

    /// Signature is empty or malformed
    #[error("invalid signature")]
    InvalidSignature,

    /// Diffie-Hellman agreement produced a non-contributory shared secret
    #[error("key agreement failed")]
    KeyAgreementFailure,

    /// Context label for key derivation is empty
    #[error("key derivation context must not be empty")]
    InvalidContext,

    /// Algorithm name is not in the registry
    #[error("unknown algorithm: {name}")]
    UnknownAlgorithm {
        /// Name that failed to parse
        name: String,
    },

    /// Configuration carries no root key
    #[error("no root key configured")]
    MissingRootKey,
}

impl CryptoError {
    /// Returns true if this error indicates a forged or corrupted input.
    ///
    /// Callers typically discard the input on tampering and surface other
    /// errors (configuration, platform support) to operators.
    pub fn is_tampering(&self) -> bool {
        match self {
            Self::MessageTooShort { .. }
            | Self::InvalidVersionHeader
            | Self::AuthenticationFailure
            | Self::InvalidSignature => true,

            Self::InvalidLength { .. }
            | Self::InvalidEncoding { .. }
            | Self::KeyDecodeFailure { .. }
            | Self::UnsupportedAssociatedData { .. }
            | Self::AlgorithmUnavailable { .. }
            | Self::SerializationProhibited { .. }
            | Self::KeyAgreementFailure
            | Self::InvalidContext
            | Self::UnknownAlgorithm { .. }
            | Self::MissingRootKey => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_failure_is_tampering() {
        assert!(CryptoError::AuthenticationFailure.is_tampering());
        assert!(CryptoError::InvalidVersionHeader.is_tampering());
        assert!(CryptoError::MessageTooShort { minimum: 92, actual: 91 }.is_tampering());
    }

    #[test]
    fn configuration_errors_are_not_tampering() {
        assert!(!CryptoError::AlgorithmUnavailable { algorithm: "aes256-gcm" }.is_tampering());
        assert!(!CryptoError::MissingRootKey.is_tampering());
        assert!(!CryptoError::InvalidContext.is_tampering());
    }

    #[test]
    fn error_display() {
        let err = CryptoError::InvalidLength { expected: 32, actual: 31 };
        assert_eq!(err.to_string(), "invalid length: expected 32 bytes, got 31");

        let err = CryptoError::MessageTooShort { minimum: 92, actual: 91 };
        assert_eq!(err.to_string(), "message too short: need at least 92 bytes, got 91");
    }
}
