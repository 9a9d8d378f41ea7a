//! # licensehub-entity
//!
//! Domain entity models for LicenseHub. Every struct in this crate
//! represents a database table row or a wire-level value object. Database
//! entities additionally derive `sqlx::FromRow`.

pub mod license;
pub mod user;
