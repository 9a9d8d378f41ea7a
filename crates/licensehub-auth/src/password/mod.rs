//! Password hashing and policy enforcement.

pub mod bcrypt;
pub mod hasher;
pub mod validator;

pub use bcrypt::{Bcrypt, HashParts, Version};
pub use hasher::PasswordHasher;
pub use validator::PasswordValidator;
