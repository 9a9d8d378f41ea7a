//! PEM key loading, generation and fingerprinting.

use std::fs;
use std::path::{Path, PathBuf};

use rand::rngs::OsRng;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPrivateKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePublicKey, LineEnding};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use tracing::info;

use licensehub_core::config::KeysConfig;

use crate::error::CodecError;

/// Smallest modulus `generate_key_pair` will produce.
pub const MIN_KEY_BITS: usize = 1024;

/// Parse a PKCS#1 (`RSA PRIVATE KEY`) or PKCS#8 (`PRIVATE KEY`) PEM.
pub fn parse_private_key(pem: &str) -> Result<RsaPrivateKey, CodecError> {
    RsaPrivateKey::from_pkcs1_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs8_pem(pem))
        .map_err(|e| CodecError::MalformedKey(format!("private key: {e}")))
}

/// Parse an SPKI (`PUBLIC KEY`) or PKCS#1 (`RSA PUBLIC KEY`) PEM.
pub fn parse_public_key(pem: &str) -> Result<RsaPublicKey, CodecError> {
    RsaPublicKey::from_public_key_pem(pem)
        .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
        .map_err(|e| CodecError::MalformedKey(format!("public key: {e}")))
}

fn read_pem(path: &Path) -> Result<String, CodecError> {
    fs::read_to_string(path)
        .map_err(|e| CodecError::MalformedKey(format!("cannot read {}: {e}", path.display())))
}

/// Load the service private key; an inline PEM wins over the file path.
pub fn load_private_key(config: &KeysConfig) -> Result<RsaPrivateKey, CodecError> {
    match config.private_key_pem.as_deref().filter(|p| !p.trim().is_empty()) {
        Some(pem) => parse_private_key(pem),
        None => parse_private_key(&read_pem(Path::new(&config.private_key_path))?),
    }
}

/// Load a public key from a PEM file.
pub fn load_public_key(path: impl AsRef<Path>) -> Result<RsaPublicKey, CodecError> {
    parse_public_key(&read_pem(path.as_ref())?)
}

/// First 16 hex characters of SHA-256 over the SPKI DER encoding.
pub fn fingerprint(public: &RsaPublicKey) -> Result<String, CodecError> {
    let der = public
        .to_public_key_der()
        .map_err(|e| CodecError::MalformedKey(e.to_string()))?;
    let digest = format!("{:x}", Sha256::digest(der.as_bytes()));
    Ok(digest[..16].to_string())
}

/// Locations of a freshly written key pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPairPaths {
    /// PKCS#1 private key.
    pub private_key: PathBuf,
    /// SPKI public key.
    pub public_key: PathBuf,
}

/// Generate a key pair and write `private.pem` and `public.pem` into `dir`.
pub fn generate_key_pair(bits: usize, dir: &Path) -> Result<KeyPairPaths, CodecError> {
    if bits < MIN_KEY_BITS {
        return Err(CodecError::Operation(format!(
            "key size must be at least {MIN_KEY_BITS} bits"
        )));
    }
    let private = RsaPrivateKey::new(&mut OsRng, bits)
        .map_err(|e| CodecError::Operation(e.to_string()))?;
    let public = RsaPublicKey::from(&private);

    let private_pem = private
        .to_pkcs1_pem(LineEnding::LF)
        .map_err(|e| CodecError::Operation(e.to_string()))?;
    let public_pem = public
        .to_public_key_pem(LineEnding::LF)
        .map_err(|e| CodecError::Operation(e.to_string()))?;

    let io_err = |e: std::io::Error| CodecError::Operation(format!("cannot write key: {e}"));
    fs::create_dir_all(dir).map_err(io_err)?;
    let paths = KeyPairPaths {
        private_key: dir.join("private.pem"),
        public_key: dir.join("public.pem"),
    };
    fs::write(&paths.private_key, private_pem.as_bytes()).map_err(io_err)?;
    fs::write(&paths.public_key, public_pem.as_bytes()).map_err(io_err)?;

    info!(
        bits,
        kid = %fingerprint(&public)?,
        dir = %dir.display(),
        "Generated RSA key pair"
    );
    Ok(paths)
}
