//! Bearer tokens bound to the client's ip and terminal.

pub mod claims;
pub mod decoder;
pub mod encoder;
pub mod service;

pub use claims::{Claims, Principal};
pub use decoder::JwtDecoder;
pub use encoder::JwtEncoder;
pub use service::TokenService;
