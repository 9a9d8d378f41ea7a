//! Typed failures raised by the credential primitives.

use thiserror::Error;

use licensehub_core::error::{AppError, ErrorKind};

/// Password hashing failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Cost factor outside the accepted range or not a number.
    #[error("invalid bcrypt cost")]
    InvalidCost,
    /// Salt field is not 22 decodable characters.
    #[error("invalid bcrypt salt")]
    InvalidSalt,
    /// The hash has no salt field at all.
    #[error("bcrypt salt not found")]
    SaltNotFound,
    /// The hash text is not a well-formed bcrypt string.
    #[error("malformed bcrypt digest")]
    MalformedDigest,
}

/// Asymmetric key and payload failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// PEM input could not be parsed as an RSA key.
    #[error("malformed key: {0}")]
    MalformedKey(String),
    /// Plaintext longer than the key can encrypt in one block.
    #[error("payload of {len} bytes exceeds the {max} byte limit")]
    PayloadTooLarge {
        /// Offered length.
        len: usize,
        /// Maximum length for the key.
        max: usize,
    },
    /// Ciphertext is not decodable under the current key.
    #[error("decryption failed")]
    DecryptFailed,
    /// Signing or encryption failed inside the RSA primitive.
    #[error("rsa operation failed: {0}")]
    Operation(String),
}

/// Bearer token failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Bad signature or token shape.
    #[error("token cannot be verified")]
    Unverifiable,
    /// `exp` is in the past.
    #[error("token has expired")]
    Expired,
    /// `nbf` is in the future.
    #[error("token is not yet valid")]
    NotYetValid,
    /// Issuer differs from the configured one.
    #[error("token issuer mismatch")]
    IssuerMismatch,
    /// Token was issued to a different terminal.
    #[error("token terminal mismatch")]
    TerminalMismatch,
    /// Neither subject nor access key is present.
    #[error("token claims invalid")]
    ClaimsInvalid,
}

impl From<CryptoError> for AppError {
    fn from(err: CryptoError) -> Self {
        AppError::with_source(ErrorKind::Crypto, err.to_string(), err)
    }
}

impl From<CodecError> for AppError {
    fn from(err: CodecError) -> Self {
        AppError::with_source(ErrorKind::Codec, err.to_string(), err)
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        AppError::with_source(ErrorKind::Token, err.to_string(), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_errors_survive_conversion() {
        let err: AppError = TokenError::TerminalMismatch.into();
        assert_eq!(err.kind, ErrorKind::Token);
        assert_eq!(
            err.typed_source::<TokenError>(),
            Some(&TokenError::TerminalMismatch)
        );

        let err: AppError = CodecError::DecryptFailed.into();
        assert_eq!(err.kind, ErrorKind::Codec);
    }
}
