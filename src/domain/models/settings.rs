//! Settings Domain Model
//!
//! The configuration aggregate: the network endpoint plus credentials for the
//! relational store and the cache store.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Sensitive string value, wiped from memory on drop and redacted in debug output
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Secret(String);

impl Secret {
    /// Wrap a plain text value
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the plain text value
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            f.write_str("Secret(\"\")")
        } else {
            f.write_str("Secret(***)")
        }
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Network endpoint the hosting application exposes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    /// Textual, as read from `SERVER_PORT`
    pub port: String,
}

/// Relational store credentials
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub user: String,
    pub password: Secret,
    pub host: String,
    pub port: String,
    pub name: String,
}

/// Cache store credentials
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheSettings {
    /// `host:port`
    pub address: String,
    pub password: Secret,
    /// Logical database index
    pub db: i64,
    /// Wire protocol version (2 = RESP2, 3 = RESP3, 0 = client default)
    pub protocol: i64,
}

/// Application configuration aggregate
///
/// Built fresh on every load; never cached or shared behind a global.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
}
