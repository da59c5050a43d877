//! Domain Layer
//!
//! Contains the configuration model and gateway traits (ports).
//! This layer has no dependencies on infrastructure.

pub mod gateways;
pub mod models;

pub use gateways::HealthCheck;
pub use models::settings::{AppConfig, CacheSettings, DatabaseSettings, Secret, ServerSettings};
