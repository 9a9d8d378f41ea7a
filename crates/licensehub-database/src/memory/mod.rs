//! In-process stores backed by a lock-guarded map.
//!
//! They enforce the same uniqueness and compare-and-swap rules as the
//! PostgreSQL repositories so services behave identically against either.

pub mod license;
pub mod user;

pub use license::MemoryLicenseStore;
pub use user::MemoryUserStore;
