//! RSA key pair commands.

use std::path::PathBuf;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use clap::{Args, Subcommand};

use licensehub_auth::codec::{RsaCodec, fingerprint, generate_key_pair, keys};
use licensehub_core::error::AppError;

use crate::output;

/// Arguments for key commands
#[derive(Debug, Args)]
pub struct KeysArgs {
    /// Key subcommand
    #[command(subcommand)]
    pub command: KeysCommand,
}

/// Key subcommands
#[derive(Debug, Subcommand)]
pub enum KeysCommand {
    /// Write a fresh key pair as `private.pem` and `public.pem`
    Generate {
        /// Modulus size in bits
        #[arg(long, default_value_t = 2048)]
        bits: usize,
        /// Output directory
        #[arg(long, default_value = "keys")]
        out: PathBuf,
    },
    /// Encrypt text for the configured public key (base64 output)
    Encrypt {
        /// Plaintext, e.g. a login password
        text: String,
    },
}

/// Execute key commands
pub async fn execute(args: &KeysArgs, config_env: &str) -> Result<(), AppError> {
    match &args.command {
        KeysCommand::Generate { bits, out } => {
            let paths = generate_key_pair(*bits, out)?;
            let public = keys::load_public_key(&paths.public_key)?;
            output::print_success("Key pair written");
            output::print_kv("private key", &paths.private_key.display().to_string());
            output::print_kv("public key", &paths.public_key.display().to_string());
            output::print_kv("key id", &fingerprint(&public)?);
        }
        KeysCommand::Encrypt { text } => {
            let config = super::load_config(config_env)?;
            let public = keys::load_public_key(&config.keys.public_key_path)?;
            let ciphertext = RsaCodec::encrypt(text.as_bytes(), &public)?;
            println!("{}", STANDARD.encode(ciphertext));
        }
    }
    Ok(())
}
