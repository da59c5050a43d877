//! Application Configuration
//!
//! Loads the configuration aggregate from a `.env` file overlaid with the
//! process environment. Variables already set in the process win over the
//! file, the same way dotenv never overrides an existing variable.

use std::path::Path;

use config::{Config, Environment, Map};
use serde::Deserialize;

use crate::domain::models::settings::{
    AppConfig, CacheSettings, DatabaseSettings, Secret, ServerSettings,
};
use crate::shared::errors::ConfigError;

/// Every variable the loader recognises; anything else is ignored
pub const VARIABLES: [&str; 11] = [
    "SERVER_HOST",
    "SERVER_PORT",
    "DB_USER",
    "DB_PASS",
    "DB_HOST",
    "DB_PORT",
    "DB_NAME",
    "REDIS_ADDR",
    "REDIS_PASS",
    "REDIS_DB",
    "REDIS_PROTOCOL",
];

// Sections mirror the variable prefixes once `_` becomes the key separator,
// e.g. `REDIS_PROTOCOL` lands at `redis.protocol`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawServer {
    host: String,
    port: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDatabase {
    user: String,
    pass: String,
    host: String,
    port: String,
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRedis {
    addr: String,
    pass: String,
    db: Option<String>,
    protocol: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawEnv {
    server: RawServer,
    db: RawDatabase,
    redis: RawRedis,
}

impl AppConfig {
    /// Load configuration from the nearest `.env` file and the process environment
    ///
    /// The file is searched for in the working directory and its ancestors.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EnvFile` if no file is found or it cannot be parsed,
    /// and the errors of [`AppConfig::from_vars`] otherwise.
    pub fn load() -> Result<Self, ConfigError> {
        let entries = dotenvy::dotenv_iter()?;
        Self::from_env_file(entries, process_vars())
    }

    /// Load configuration from an explicit `.env` file and the process environment
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::load`].
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_path(path.as_ref(), process_vars())
    }

    /// Build configuration from an explicit set of variables
    ///
    /// Missing string variables become empty strings. `REDIS_DB` and
    /// `REDIS_PROTOCOL` are required integers.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingVariable` or `ConfigError::InvalidInteger`
    /// for the integer variables, `ConfigError::Source` if assembly fails.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let known: Map<String, String> = vars
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .filter(|(key, _)| VARIABLES.contains(&key.as_str()))
            .collect();

        let raw: RawEnv = Config::builder()
            .add_source(Environment::default().separator("_").source(Some(known)))
            .build()?
            .try_deserialize()?;

        let config = Self {
            server: ServerSettings {
                host: raw.server.host,
                port: raw.server.port,
            },
            database: DatabaseSettings {
                user: raw.db.user,
                password: Secret::from(raw.db.pass),
                host: raw.db.host,
                port: raw.db.port,
                name: raw.db.name,
            },
            cache: CacheSettings {
                address: raw.redis.addr,
                password: Secret::from(raw.redis.pass),
                db: parse_integer("REDIS_DB", raw.redis.db)?,
                protocol: parse_integer("REDIS_PROTOCOL", raw.redis.protocol)?,
            },
        };

        tracing::debug!(
            server_host = %config.server.host,
            db_host = %config.database.host,
            cache_address = %config.cache.address,
            "Configuration assembled"
        );
        Ok(config)
    }

    fn from_path(path: &Path, process: Map<String, String>) -> Result<Self, ConfigError> {
        tracing::debug!(path = %path.display(), "Reading environment file");
        let entries = dotenvy::from_path_iter(path)?;
        Self::from_env_file(entries, process)
    }

    fn from_env_file<E>(entries: E, process: Map<String, String>) -> Result<Self, ConfigError>
    where
        E: IntoIterator<Item = Result<(String, String), dotenvy::Error>>,
    {
        let file = entries.into_iter().collect::<Result<Map<_, _>, _>>()?;
        Self::from_vars(overlay(file, process))
    }
}

fn process_vars() -> Map<String, String> {
    lookup_vars(|name| std::env::var(name).ok())
}

/// Collect the recognised variables that `lookup` knows about
fn lookup_vars(lookup: impl Fn(&str) -> Option<String>) -> Map<String, String> {
    VARIABLES
        .iter()
        .filter_map(|name| lookup(*name).map(|value| ((*name).to_string(), value)))
        .collect()
}

fn overlay(mut base: Map<String, String>, overrides: Map<String, String>) -> Map<String, String> {
    base.extend(overrides);
    base
}

fn parse_integer(name: &'static str, value: Option<String>) -> Result<i64, ConfigError> {
    match value {
        None => Err(ConfigError::MissingVariable(name)),
        Some(value) if value.is_empty() => Err(ConfigError::MissingVariable(name)),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidInteger { name, value }),
    }
}
