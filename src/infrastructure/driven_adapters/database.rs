//! Database Connection Management
//!
//! Opens the MySQL pool from the relational store credentials and applies the
//! registered schema declarations.

use std::collections::BTreeMap;

use async_trait::async_trait;
use log::LevelFilter;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::{ConnectOptions, Connection};

use crate::domain::gateways::HealthCheck;
use crate::domain::models::settings::DatabaseSettings;
use crate::shared::errors::{ConnectionError, DatabaseError};

/// Port used when `DB_PORT` is empty
pub const DEFAULT_PORT: u16 = 3306;

const CHARSET: &str = "utf8mb4";

/// Session time zone; `SYSTEM` makes the server interpret times in its local zone
const SESSION_TIME_ZONE: &str = "SYSTEM";

/// Schema declarations applied right after the connection opens
///
/// Maps a schema entity identifier to the DDL that declares it. Declarations
/// run in identifier order and should be idempotent
/// (`CREATE TABLE IF NOT EXISTS ...`), since they are applied on every connect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaMigrations {
    declarations: BTreeMap<String, String>,
}

impl SchemaMigrations {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the declaration for an entity, replacing any previous one
    #[must_use]
    pub fn register(mut self, entity: impl Into<String>, ddl: impl Into<String>) -> Self {
        self.declarations.insert(entity.into(), ddl.into());
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Entity identifiers in application order
    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.declarations.keys().map(String::as_str)
    }

    /// Run every declaration against the pool, stopping at the first failure
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Migration` naming the entity whose declaration failed.
    pub async fn apply(&self, pool: &MySqlPool) -> Result<(), DatabaseError> {
        for (entity, ddl) in &self.declarations {
            tracing::debug!(entity = %entity, "Applying schema declaration");
            sqlx::query(ddl.as_str())
                .execute(pool)
                .await
                .map_err(|source| {
                    tracing::error!(entity = %entity, error = %source, "Schema declaration failed");
                    DatabaseError::Migration {
                        entity: entity.clone(),
                        source,
                    }
                })?;
        }
        Ok(())
    }
}

impl DatabaseSettings {
    /// Driver options equivalent to
    /// `user:password@tcp(host:port)/name?charset=utf8mb4` with local-time
    /// semantics and statement logging at info level.
    ///
    /// An empty host or port keeps the driver defaults (`localhost`, 3306).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidPort` if the port is not a valid number.
    pub fn connect_options(&self) -> Result<MySqlConnectOptions, DatabaseError> {
        let port = if self.port.is_empty() {
            DEFAULT_PORT
        } else {
            self.port
                .parse()
                .map_err(|_| DatabaseError::InvalidPort(self.port.clone()))?
        };

        let mut options = MySqlConnectOptions::new()
            .port(port)
            .username(&self.user)
            .charset(CHARSET)
            .timezone(Some(SESSION_TIME_ZONE.to_string()))
            .log_statements(LevelFilter::Info);

        if !self.host.is_empty() {
            options = options.host(&self.host);
        }
        if !self.password.is_empty() {
            options = options.password(self.password.expose());
        }
        if !self.name.is_empty() {
            options = options.database(&self.name);
        }

        Ok(options)
    }
}

/// Handle to an open MySQL pool
#[derive(Debug, Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    /// Wrap an already opened pool
    #[must_use]
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    #[must_use]
    pub fn into_pool(self) -> MySqlPool {
        self.pool
    }

    /// Check that a connection can be acquired and answers a ping
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Ping` if the store does not respond.
    pub async fn ping_connection(&self) -> Result<(), DatabaseError> {
        let mut conn = self.pool.acquire().await.map_err(DatabaseError::Ping)?;
        conn.ping().await.map_err(DatabaseError::Ping)
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl HealthCheck for MySqlStore {
    fn name(&self) -> &'static str {
        "mysql"
    }

    async fn ping(&self) -> Result<String, ConnectionError> {
        let version: String = sqlx::query_scalar("SELECT VERSION()")
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::Ping)?;
        Ok(version)
    }
}

/// Open the relational store and apply the default schema declarations
///
/// # Errors
///
/// Returns `DatabaseError::Open` if the connection cannot be established and
/// `DatabaseError::Migration` if a declaration fails.
pub async fn connect(settings: &DatabaseSettings) -> Result<MySqlStore, DatabaseError> {
    connect_with_migrations(settings, &SchemaMigrations::default()).await
}

/// Open the relational store and apply the given schema declarations
///
/// # Errors
///
/// Same as [`connect`], plus `DatabaseError::InvalidPort` for a malformed port.
pub async fn connect_with_migrations(
    settings: &DatabaseSettings,
    migrations: &SchemaMigrations,
) -> Result<MySqlStore, DatabaseError> {
    let options = settings.connect_options()?;

    // Pool sizing stays at the library defaults; connect_with opens one connection up front.
    let pool = MySqlPoolOptions::new()
        .connect_with(options)
        .await
        .map_err(|e| {
            tracing::error!(
                host = %settings.host,
                database = %settings.name,
                error = %e,
                "Failed to open database connection"
            );
            DatabaseError::Open(e)
        })?;
    tracing::info!(host = %settings.host, database = %settings.name, "Database connection opened");

    migrations.apply(&pool).await?;
    tracing::info!(entities = migrations.len(), "Schema migration completed");

    Ok(MySqlStore::new(pool))
}
