//! Subcommand implementations
//!
//! Every command writes its result to the supplied writer, one value per
//! line. Binary output (digests, ciphertexts, signatures, keys) is printed
//! with a scheme prefix so it can be fed back into `import` unchanged.

use std::io::{self, Write};

use clap::{Subcommand, ValueEnum};
use natrium_crypto::{
    BinaryString, Ciphertext, CryptoError, Digest, Encoding, EncryptionKeyPair, Key, Natrium,
    NatriumConfig, SharedKey, SignatureKeyPair, SystemEntropy, kdf,
};
use thiserror::Error;

/// Errors surfaced by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Cryptographic operation failed
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Writing output failed
    #[error("output error: {0}")]
    Io(#[from] io::Error),

    /// Signature or MAC did not verify
    #[error("{what} verification failed")]
    VerificationFailed {
        /// What was being verified
        what: &'static str,
    },
}

/// Kind of key to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KeyKind {
    /// 32-byte symmetric root key
    Shared,
    /// X25519 key pair
    Encryption,
    /// Ed25519 key pair
    Signature,
}

/// Natrium subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Generate a new key
    Keygen {
        /// Kind of key to generate
        #[arg(long, value_enum, default_value = "shared")]
        kind: KeyKind,

        /// Output encoding (hex, base64, base64url, ...)
        #[arg(long, default_value = "base64")]
        encoding: Encoding,
    },

    /// Print the fingerprint of the root key
    KeyId,

    /// BLAKE2b-256 digest of the input
    Hash {
        /// Input text
        data: String,
    },

    /// HMAC of the input under a context-derived key
    Hmac {
        /// Key derivation context
        #[arg(long)]
        context: String,

        /// Input text
        data: String,

        /// Expected MAC; verifies instead of printing
        #[arg(long)]
        verify: Option<String>,
    },

    /// Encrypt the input under a context-derived key
    Encrypt {
        /// Key derivation context
        #[arg(long)]
        context: String,

        /// Associated data bound to the ciphertext
        #[arg(long, default_value = "")]
        aad: String,

        /// Plaintext
        data: String,
    },

    /// Decrypt a ciphertext produced by `encrypt`
    Decrypt {
        /// Key derivation context
        #[arg(long)]
        context: String,

        /// Associated data bound to the ciphertext
        #[arg(long, default_value = "")]
        aad: String,

        /// Encoded ciphertext
        ciphertext: String,
    },

    /// Sign the input with the root-derived signature key
    Sign {
        /// Message text
        message: String,
    },

    /// Verify a signature made by `sign`
    Verify {
        /// Encoded signature
        #[arg(long)]
        signature: String,

        /// Message text
        message: String,
    },

    /// Print the root-derived signature public key
    PublicKey,
}

/// Run `command` against `config`, writing results to `out`.
pub fn run(
    command: &Command,
    config: &NatriumConfig,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        Command::Keygen { kind, encoding } => keygen(*kind, *encoding, out),
        Command::Hash { data } => {
            let digest = Digest::new(kdf::hash(data.as_bytes()));
            writeln!(out, "{}", digest.export(Encoding::Hex, true))?;
            Ok(())
        },
        Command::KeyId => {
            writeln!(out, "{}", config.root_key()?.id())?;
            Ok(())
        },
        Command::Hmac { context, data, verify } => {
            let natrium = natrium(config)?;
            match verify {
                Some(expected) => {
                    let expected = Digest::import(expected, None)?;
                    if !natrium.verify_hmac(data.as_bytes(), &expected, context.as_bytes())? {
                        return Err(CliError::VerificationFailed { what: "hmac" });
                    }
                    writeln!(out, "valid")?;
                },
                None => {
                    let mac = natrium.hmac(data.as_bytes(), context.as_bytes())?;
                    writeln!(out, "{}", mac.export(Encoding::Hex, true))?;
                },
            }
            Ok(())
        },
        Command::Encrypt { context, aad, data } => {
            let natrium = natrium(config)?;
            let ciphertext = natrium.encrypt(data.as_bytes(), context.as_bytes(), aad.as_bytes())?;
            writeln!(out, "{}", ciphertext.export(Encoding::Base64UrlUnpadded, true))?;
            Ok(())
        },
        Command::Decrypt { context, aad, ciphertext } => {
            let natrium = natrium(config)?;
            let ciphertext = Ciphertext::import(ciphertext, None)?;
            let plaintext =
                natrium.decrypt(ciphertext.as_bytes(), context.as_bytes(), aad.as_bytes())?;
            out.write_all(&plaintext)?;
            writeln!(out)?;
            Ok(())
        },
        Command::Sign { message } => {
            let signature = natrium(config)?.sign(message.as_bytes());
            writeln!(out, "{}", signature.export(Encoding::Base64UrlUnpadded, true))?;
            Ok(())
        },
        Command::Verify { signature, message } => {
            let signature = Encoding::decode_any(signature)?;
            if !natrium(config)?.verify(&signature, message.as_bytes())? {
                return Err(CliError::VerificationFailed { what: "signature" });
            }
            writeln!(out, "valid")?;
            Ok(())
        },
        Command::PublicKey => {
            let public = natrium(config)?.signature_public_key();
            writeln!(out, "{}", public.export(Encoding::Base64UrlUnpadded, true))?;
            Ok(())
        },
    }
}

fn natrium(config: &NatriumConfig) -> Result<Natrium, CliError> {
    Ok(Natrium::from_config(config)?)
}

fn keygen(kind: KeyKind, encoding: Encoding, out: &mut impl Write) -> Result<(), CliError> {
    tracing::debug!(?kind, %encoding, "generating key");
    match kind {
        KeyKind::Shared => {
            let key = SharedKey::generate(&SystemEntropy);
            writeln!(out, "{}", key.export(encoding, true).as_str())?;
        },
        KeyKind::Encryption => {
            let pair = EncryptionKeyPair::generate(&SystemEntropy);
            writeln!(out, "{}", pair.export(encoding, true).as_str())?;
            writeln!(out, "{}", pair.public().export(encoding, true))?;
        },
        KeyKind::Signature => {
            let pair = SignatureKeyPair::generate(&SystemEntropy);
            writeln!(out, "{}", pair.export(encoding, true).as_str())?;
            writeln!(out, "{}", pair.public().export(encoding, true))?;
        },
    }
    Ok(())
}
