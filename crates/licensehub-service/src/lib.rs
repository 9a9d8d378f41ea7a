//! # licensehub-service
//!
//! Business logic for LicenseHub. The license verifier owns every license
//! state transition; the login and user services sit on top of the
//! credential primitives in `licensehub-auth`.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod license;
pub mod user;

pub use context::RequestContext;
pub use license::{AdminAllowList, LicenseError, LicenseService};
pub use user::{LoginResult, LoginService, UserService};
