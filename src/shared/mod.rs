//! Shared Module
//!
//! Cross-cutting utilities and types used across the crate.

pub mod errors;

pub use errors::{CacheError, ConfigError, ConnectionError, DatabaseError, UseCaseError};
