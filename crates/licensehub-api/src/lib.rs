//! # licensehub-api
//!
//! HTTP API layer for LicenseHub built on Axum.
//!
//! Every response body is the `{code, data, msg, error}` envelope. The
//! license endpoints used by installations are open; administrative
//! endpoints require a terminal-bound bearer token.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::AppState;
