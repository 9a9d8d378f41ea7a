//! Operator login and account services.

pub mod login;
pub mod service;

pub use login::{LoginResult, LoginService};
pub use service::UserService;
