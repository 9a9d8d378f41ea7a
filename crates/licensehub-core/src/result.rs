//! Convenience result type alias for LicenseHub.

use crate::error::AppError;

/// A specialized `Result` type for LicenseHub operations.
pub type AppResult<T> = Result<T, AppError>;
