//! Domain Models
//!
//! Value objects describing how the application reaches its stores.

pub mod settings;

pub use settings::{AppConfig, CacheSettings, DatabaseSettings, Secret, ServerSettings};
