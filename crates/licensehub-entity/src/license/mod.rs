//! License domain entities.

pub mod expire;
pub mod model;
pub mod payload;
pub mod status;

pub use model::{License, LicenseChanges, NewLicense};
pub use payload::{LicenseGrant, LicensePayload, SealedLicense, SignedLicense};
pub use status::LicenseStatus;
