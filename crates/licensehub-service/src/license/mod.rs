//! License verification and administration.

pub mod envelope;
pub mod error;
pub mod policy;
pub mod service;

pub use error::LicenseError;
pub use policy::{AdminAllowList, derive_status, is_within_heartbeat_window};
pub use service::LicenseService;
