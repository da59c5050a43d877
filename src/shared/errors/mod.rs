//! Error Types
//!
//! Typed failures for configuration loading and store connections. Nothing in
//! the library terminates the process; the hosting binary decides.

use std::time::Duration;

use thiserror::Error;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load environment file: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error("Failed to assemble configuration: {0}")]
    Source(#[from] config::ConfigError),

    #[error("Required variable {0} is not set")]
    MissingVariable(&'static str),

    #[error("Variable {name} must be an integer, got '{value}'")]
    InvalidInteger { name: &'static str, value: String },
}

/// Relational store errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database port '{0}'")]
    InvalidPort(String),

    #[error("Failed to open database connection: {0}")]
    Open(#[source] sqlx::Error),

    #[error("Failed to migrate schema entity '{entity}': {source}")]
    Migration {
        entity: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Database ping failed: {0}")]
    Ping(#[source] sqlx::Error),
}

/// Cache store errors
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Invalid cache address '{0}', expected host:port")]
    InvalidAddress(String),

    #[error("Unsupported cache protocol version {0}, expected 2 or 3")]
    UnsupportedProtocol(i64),

    #[error("Failed to create cache client: {0}")]
    Client(#[source] redis::RedisError),

    #[error("Cache liveness probe failed: {0}")]
    Probe(#[source] redis::RedisError),

    #[error("Cache liveness probe timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors surfaced by a health check on any store
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Use case-level errors
#[derive(Debug, Error)]
pub enum UseCaseError {
    #[error("Dependency '{name}' is unavailable: {source}")]
    Unavailable {
        name: String,
        #[source]
        source: ConnectionError,
    },
}

impl UseCaseError {
    /// Get the error code for this error
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unavailable {
                source: ConnectionError::Database(_),
                ..
            } => "DATABASE_UNAVAILABLE",
            Self::Unavailable {
                source: ConnectionError::Cache(_),
                ..
            } => "CACHE_UNAVAILABLE",
        }
    }
}
