//! Natrium command line interface.
//!
//! # Usage
//!
//! ```bash
//! # Generate a root key
//! natrium keygen > root.key
//!
//! # Encrypt and decrypt under a context
//! export NATRIUM_KEY=$(cat root.key)
//! natrium encrypt --context cookies "session=42"
//! natrium decrypt --context cookies base64url:bnQwM...
//!
//! # Sign with the root-derived key and verify
//! natrium sign "release-1.0.tar.gz"
//! natrium verify --signature base64url:... "release-1.0.tar.gz"
//! ```

mod commands;

use std::io::{self, Write};

use clap::Parser;
use commands::Command;
use natrium_crypto::{Algorithm, NatriumConfig, RootKeyMaterial};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Natrium cryptographic toolkit
#[derive(Parser, Debug)]
#[command(name = "natrium")]
#[command(about = "Key-committing encryption, MACs and signatures")]
#[command(version)]
struct Args {
    /// Root key (raw, hex or base64:)
    #[arg(long, global = true, env = "NATRIUM_KEY", hide_env_values = true)]
    key: Option<String>,

    /// Symmetric algorithm
    #[arg(long, global = true, env = "NATRIUM_ALGORITHM", default_value = "xchacha20-blake2b")]
    algorithm: Algorithm,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

    let config =
        NatriumConfig { algorithm: args.algorithm, root_key: args.key.map(RootKeyMaterial::new) };
    tracing::debug!(algorithm = %config.algorithm, key_set = config.root_key.is_some(), "starting");

    let mut stdout = io::stdout().lock();
    commands::run(&args.command, &config, &mut stdout)?;
    stdout.flush()?;

    Ok(())
}
