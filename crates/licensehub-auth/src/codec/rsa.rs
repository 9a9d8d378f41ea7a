//! RSA sign/verify and encrypt/decrypt over the service key pair.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::rngs::OsRng;
use ::rsa::traits::PublicKeyParts;
use ::rsa::{Pkcs1v15Encrypt, Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use tracing::info;

use licensehub_core::config::KeysConfig;

use super::keys;
use crate::error::CodecError;

/// PKCS#1 v1.5 encryption padding overhead in bytes.
const PKCS1_PADDING: usize = 11;

/// The loaded service key pair.
///
/// Immutable after construction; share it behind an `Arc`.
#[derive(Clone)]
pub struct RsaCodec {
    private: RsaPrivateKey,
    public: RsaPublicKey,
    key_id: String,
}

impl fmt::Debug for RsaCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaCodec")
            .field("key_id", &self.key_id)
            .field("bits", &(self.public.size() * 8))
            .finish()
    }
}

impl RsaCodec {
    /// Wrap a private key. Without an explicit key id the public key
    /// fingerprint is used.
    pub fn new(private: RsaPrivateKey, key_id: Option<String>) -> Result<Self, CodecError> {
        let public = RsaPublicKey::from(&private);
        let key_id = match key_id.filter(|k| !k.trim().is_empty()) {
            Some(id) => id,
            None => keys::fingerprint(&public)?,
        };
        Ok(Self {
            private,
            public,
            key_id,
        })
    }

    /// Build from a PEM private key.
    pub fn from_pem(private_pem: &str, key_id: Option<String>) -> Result<Self, CodecError> {
        Self::new(keys::parse_private_key(private_pem)?, key_id)
    }

    /// Load the key pair named by configuration.
    pub fn from_config(config: &KeysConfig) -> Result<Self, CodecError> {
        let codec = Self::new(keys::load_private_key(config)?, config.key_id.clone())?;
        info!(kid = %codec.key_id, bits = codec.public.size() * 8, "Loaded RSA key pair");
        Ok(codec)
    }

    /// Identifier carried alongside signatures.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// The public half of the service key.
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public
    }

    /// Largest plaintext `encrypt` accepts for this key.
    pub fn max_payload(&self) -> usize {
        max_payload(&self.public)
    }

    /// PKCS#1 v1.5 signature over SHA-256 of `data`, base64 encoded.
    pub fn sign(&self, data: &[u8]) -> Result<String, CodecError> {
        let digest = Sha256::digest(data);
        let signature = self
            .private
            .sign(Pkcs1v15Sign::new::<Sha256>(), &digest)
            .map_err(|e| CodecError::Operation(e.to_string()))?;
        Ok(STANDARD.encode(signature))
    }

    /// Check a base64 signature over `data`.
    ///
    /// A signature that is not valid base64 simply does not verify.
    pub fn verify(&self, data: &[u8], signature: &str) -> Result<bool, CodecError> {
        let Ok(raw) = STANDARD.decode(signature.trim()) else {
            return Ok(false);
        };
        let digest = Sha256::digest(data);
        Ok(self
            .public
            .verify(Pkcs1v15Sign::new::<Sha256>(), &digest, &raw)
            .is_ok())
    }

    /// Encrypt for an arbitrary recipient.
    pub fn encrypt(plaintext: &[u8], recipient: &RsaPublicKey) -> Result<Vec<u8>, CodecError> {
        let max = max_payload(recipient);
        if plaintext.len() > max {
            return Err(CodecError::PayloadTooLarge {
                len: plaintext.len(),
                max,
            });
        }
        recipient
            .encrypt(&mut OsRng, Pkcs1v15Encrypt, plaintext)
            .map_err(|e| CodecError::Operation(e.to_string()))
    }

    /// Encrypt for the service's own key.
    pub fn encrypt_for_self(&self, plaintext: &[u8]) -> Result<Vec<u8>, CodecError> {
        Self::encrypt(plaintext, &self.public)
    }

    /// Encrypt for the service's own key and base64 the result.
    pub fn encrypt_to_base64(&self, plaintext: &[u8]) -> Result<String, CodecError> {
        Ok(STANDARD.encode(self.encrypt_for_self(plaintext)?))
    }

    /// Decrypt with the service private key.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CodecError> {
        self.private
            .decrypt(Pkcs1v15Encrypt, ciphertext)
            .map_err(|_| CodecError::DecryptFailed)
    }

    /// Base64-decode then decrypt.
    pub fn decrypt_base64(&self, ciphertext: &str) -> Result<Vec<u8>, CodecError> {
        let raw = STANDARD
            .decode(ciphertext.trim())
            .map_err(|_| CodecError::DecryptFailed)?;
        self.decrypt(&raw)
    }
}

fn max_payload(key: &RsaPublicKey) -> usize {
    key.size().saturating_sub(PKCS1_PADDING)
}
