//! Common test utilities for e2e tests
//!
//! Provides test infrastructure for spinning up MySQL and Redis containers
//! and building the configuration aggregate that points at them.

use testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::mysql::Mysql;
use testcontainers_modules::redis::{Redis, REDIS_PORT};

use store_bootstrap::domain::models::settings::AppConfig;

/// Port MySQL listens on inside its container
const MYSQL_PORT: u16 = 3306;

/// Database created by the MySQL image on startup
pub const TEST_DATABASE: &str = "test";

/// A running MySQL container and the host port it is published on
pub struct TestMysql {
    pub host: String,
    pub port: u16,
    _container: ContainerAsync<Mysql>,
}

impl TestMysql {
    /// Start a fresh MySQL server (root user, empty password)
    pub async fn start() -> Self {
        let container = Mysql::default()
            .start()
            .await
            .expect("Failed to start MySQL container");

        let host = container.get_host().await.expect("Failed to get host");
        let port = container
            .get_host_port_ipv4(MYSQL_PORT)
            .await
            .expect("Failed to get port");

        Self {
            host: host.to_string(),
            port,
            _container: container,
        }
    }
}

/// A running Redis container and its `host:port` address
pub struct TestRedis {
    pub address: String,
    _container: ContainerAsync<Redis>,
}

impl TestRedis {
    /// Start a fresh Redis server (no password)
    pub async fn start() -> Self {
        let container = Redis::default()
            .with_tag("7.2-alpine")
            .start()
            .await
            .expect("Failed to start Redis container");

        let host = container.get_host().await.expect("Failed to get host");
        let port = container
            .get_host_port_ipv4(REDIS_PORT)
            .await
            .expect("Failed to get port");

        Self {
            address: format!("{}:{}", host, port),
            _container: container,
        }
    }
}

/// Builder for the environment variables the loader reads
#[derive(Debug, Clone)]
pub struct TestVars {
    vars: Vec<(&'static str, String)>,
}

impl Default for TestVars {
    fn default() -> Self {
        Self {
            vars: vec![
                ("SERVER_HOST", "127.0.0.1".to_string()),
                ("SERVER_PORT", "8080".to_string()),
                ("DB_USER", "root".to_string()),
                ("DB_PASS", String::new()),
                ("DB_NAME", TEST_DATABASE.to_string()),
                ("REDIS_PASS", String::new()),
                ("REDIS_DB", "0".to_string()),
                ("REDIS_PROTOCOL", "3".to_string()),
            ],
        }
    }
}

impl TestVars {
    pub fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.vars.retain(|(key, _)| *key != name);
        self.vars.push((name, value.into()));
        self
    }

    pub fn with_mysql(self, mysql: &TestMysql) -> Self {
        self.with("DB_HOST", mysql.host.clone())
            .with("DB_PORT", mysql.port.to_string())
    }

    pub fn with_redis(self, redis: &TestRedis) -> Self {
        self.with("REDIS_ADDR", redis.address.clone())
    }

    /// Run the variables through the environment loader
    pub fn load(self) -> AppConfig {
        AppConfig::from_vars(self.vars).expect("Failed to build test config")
    }
}
