//! Driven Adapters
//!
//! Implementations of gateway traits for external systems:
//! - Configuration loading
//! - MySQL connection
//! - Redis connection

pub mod cache;
pub mod config;
pub mod database;

pub use cache::RedisCache;
pub use database::{MySqlStore, SchemaMigrations};
