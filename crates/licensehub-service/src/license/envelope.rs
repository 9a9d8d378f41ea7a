//! The `{key, info}` envelope installations send.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use md5::{Digest, Md5};
use rsa::RsaPublicKey;
use subtle::ConstantTimeEq;

use licensehub_auth::codec::RsaCodec;
use licensehub_auth::error::CodecError;
use licensehub_entity::license::SealedLicense;

/// Lowercase hex MD5 of the plaintext payload.
///
/// MD5 is kept only because deployed clients compute it; the ciphertext
/// is what carries confidentiality.
pub fn integrity_key(plaintext: &[u8]) -> String {
    format!("{:x}", Md5::digest(plaintext))
}

/// Constant-time comparison of a presented key against the plaintext digest.
pub fn key_matches(plaintext: &[u8], presented: &str) -> bool {
    integrity_key(plaintext)
        .as_bytes()
        .ct_eq(presented.trim().as_bytes())
        .into()
}

/// Build an envelope the way an installation does.
pub fn seal(plaintext: &[u8], recipient: &RsaPublicKey) -> Result<SealedLicense, CodecError> {
    let ciphertext = RsaCodec::encrypt(plaintext, recipient)?;
    Ok(SealedLicense {
        key: integrity_key(plaintext),
        info: STANDARD.encode(ciphertext),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrity_key_is_lowercase_hex() {
        assert_eq!(integrity_key(b""), "d41d8cd98f00b204e9800998ecf8427e");
        assert!(key_matches(b"", "d41d8cd98f00b204e9800998ecf8427e"));
        assert!(!key_matches(b"", "d41d8cd98f00b204e9800998ecf8427f"));
        assert!(!key_matches(b"", ""));
    }
}
