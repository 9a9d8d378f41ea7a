//! # licensehub-database
//!
//! Storage collaborators for LicenseHub: the [`LicenseStore`] and
//! [`UserStore`] traits, PostgreSQL repositories built on sqlx, and
//! in-memory stores used by tests and the `memory` developer mode.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{BindingConflict, LicenseStore, Stores, UserStore};
