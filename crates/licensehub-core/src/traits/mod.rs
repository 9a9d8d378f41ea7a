//! Core traits defined in `licensehub-core` and implemented by other crates.

pub mod cache;

pub use cache::CacheProvider;
