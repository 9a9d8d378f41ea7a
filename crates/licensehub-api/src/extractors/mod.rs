//! Custom Axum extractors.

pub mod auth;
pub mod client;
pub mod pagination;
pub mod validated;

pub use auth::AuthUser;
pub use client::ClientInfo;
pub use pagination::ListQuery;
pub use validated::{ValidJson, ValidQuery};
