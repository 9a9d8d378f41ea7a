//! # licensehub-auth
//!
//! Credential primitives for LicenseHub.
//!
//! ## Modules
//!
//! - `password`: bcrypt hashing engine, pooled hasher and password policy
//! - `codec`: RSA sign/verify and encrypt/decrypt over a single loaded key pair
//! - `jwt`: bearer token issuance and validation bound to a client terminal
//! - `error`: typed failures for each of the above

pub mod codec;
pub mod error;
pub mod jwt;
pub mod password;

pub use codec::RsaCodec;
pub use error::{CodecError, CryptoError, TokenError};
pub use jwt::{Claims, Principal, TokenService};
pub use password::{PasswordHasher, PasswordValidator};
