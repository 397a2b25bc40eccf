//! Facade configuration

use std::fmt;

use serde::Deserialize;
use zeroize::Zeroizing;

use crate::{aead::Algorithm, error::CryptoError, keys::SharedKey};

/// Configuration for a [`crate::Natrium`] instance.
///
/// Loading the values (files, environment, secret stores) is the caller's
/// concern; this type only describes them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NatriumConfig {
    /// Symmetric algorithm for encryption operations
    pub algorithm: Algorithm,
    /// Root key in any [`SharedKey::import`] format
    pub root_key: Option<RootKeyMaterial>,
}

impl NatriumConfig {
    /// Configuration with the given root key and the default algorithm.
    pub fn with_root_key(root_key: impl Into<String>) -> Self {
        Self { algorithm: Algorithm::default(), root_key: Some(RootKeyMaterial::new(root_key)) }
    }

    /// Decode the configured root key.
    pub fn root_key(&self) -> Result<SharedKey, CryptoError> {
        let material = self.root_key.as_ref().ok_or(CryptoError::MissingRootKey)?;
        SharedKey::import(material.0.as_bytes())
    }
}

/// Encoded root key text, wiped on drop and redacted in `Debug`.
#[derive(Clone, Deserialize)]
#[serde(transparent)]
pub struct RootKeyMaterial(Zeroizing<String>);

impl RootKeyMaterial {
    /// Wrap encoded key text.
    pub fn new(material: impl Into<String>) -> Self {
        Self(Zeroizing::new(material.into()))
    }
}

impl fmt::Debug for RootKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RootKeyMaterial([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::Key;

    const HEX_KEY: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    #[test]
    fn defaults() {
        let config = NatriumConfig::default();
        assert_eq!(config.algorithm, Algorithm::XChaCha20Blake2b);
        assert_eq!(config.root_key().unwrap_err(), CryptoError::MissingRootKey);
    }

    #[test]
    fn deserializes_from_json() {
        let json = format!(r#"{{"algorithm": "xchacha20-poly1305", "root_key": "{HEX_KEY}"}}"#);
        let config: NatriumConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config.algorithm, Algorithm::XChaCha20Poly1305);
        assert_eq!(config.root_key().unwrap().length(), 32);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config: NatriumConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.algorithm, Algorithm::default());
        assert!(config.root_key.is_none());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<NatriumConfig>(r#"{"cipher": "aes"}"#).is_err());
    }

    #[test]
    fn unknown_algorithm_is_rejected() {
        assert!(serde_json::from_str::<NatriumConfig>(r#"{"algorithm": "rot13"}"#).is_err());
    }

    #[test]
    fn debug_redacts_root_key() {
        let config = NatriumConfig::with_root_key(HEX_KEY);
        let debug = format!("{config:?}");

        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains(HEX_KEY));
    }

    #[test]
    fn malformed_root_key_is_reported() {
        let config = NatriumConfig::with_root_key("not a key");
        assert_eq!(
            config.root_key().unwrap_err(),
            CryptoError::KeyDecodeFailure { key_type: "SharedKey" }
        );
    }
}
