//! PostgreSQL implementations of the store traits.

pub mod license;
pub mod user;

pub use license::LicenseRepository;
pub use user::UserRepository;

use licensehub_core::error::{AppError, ErrorKind};

/// Map a sqlx error, turning unique violations into `Conflict`.
pub(crate) fn map_write_error(err: sqlx::Error, context: &str, conflict: &str) -> AppError {
    let unique = err
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());
    if unique {
        AppError::with_source(ErrorKind::Conflict, conflict, err)
    } else {
        AppError::with_source(ErrorKind::Database, context.to_string(), err)
    }
}
