//! License verification failures.

use thiserror::Error;

use licensehub_core::error::{AppError, ErrorKind};

/// Message every client-visible verification failure carries.
pub const INVALID_LICENSE: &str = "invalid license";

/// Verification outcomes other than success.
///
/// Only `AlreadyBound` reaches clients as itself. Every other variant is
/// reported as [`INVALID_LICENSE`] and kept as the error source for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LicenseError {
    /// The integrity key does not match the decrypted payload.
    #[error("license integrity check failed")]
    IntegrityFailed,
    /// No live license for the container.
    #[error("license not found")]
    NotFound,
    /// The ip or domain belongs to another container.
    #[error("ip or domain already bound")]
    AlreadyBound,
    /// Generic refusal.
    #[error("invalid license")]
    InvalidLicense,
}

impl From<LicenseError> for AppError {
    fn from(err: LicenseError) -> Self {
        match err {
            LicenseError::AlreadyBound => {
                AppError::with_source(ErrorKind::Conflict, err.to_string(), err)
            }
            _ => AppError::with_source(ErrorKind::License, INVALID_LICENSE, err),
        }
    }
}
