//! Cache Connection Management
//!
//! Builds the Redis client from the cache credentials and verifies it with a
//! bounded liveness probe before handing it out.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{
    Client, ConnectionAddr, ConnectionInfo, ProtocolVersion, RedisConnectionInfo, RedisError,
};

use crate::domain::gateways::HealthCheck;
use crate::domain::models::settings::CacheSettings;
use crate::shared::errors::{CacheError, ConnectionError};

/// Upper bound for opening the connection and answering `PING`
pub const LIVENESS_TIMEOUT: Duration = Duration::from_secs(5);

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 6379;

impl CacheSettings {
    /// Client connection parameters for these credentials
    ///
    /// An empty address means `localhost:6379`. Protocol `2` selects RESP2,
    /// `3` or `0` (unset) selects RESP3.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::InvalidAddress` for an address that is not
    /// `host:port`, and `CacheError::UnsupportedProtocol` for any other
    /// protocol version.
    pub fn connection_info(&self) -> Result<ConnectionInfo, CacheError> {
        let (host, port) = parse_address(&self.address)?;
        let protocol = match self.protocol {
            2 => ProtocolVersion::RESP2,
            0 | 3 => ProtocolVersion::RESP3,
            other => return Err(CacheError::UnsupportedProtocol(other)),
        };
        let password = if self.password.is_empty() {
            None
        } else {
            Some(self.password.expose().to_string())
        };

        Ok(ConnectionInfo {
            addr: ConnectionAddr::Tcp(host, port),
            redis: RedisConnectionInfo {
                db: self.db,
                username: None,
                password,
                protocol,
            },
        })
    }
}

fn parse_address(address: &str) -> Result<(String, u16), CacheError> {
    if address.is_empty() {
        return Ok((DEFAULT_HOST.to_string(), DEFAULT_PORT));
    }

    let invalid = || CacheError::InvalidAddress(address.to_string());
    let (host, port) = address.rsplit_once(':').ok_or_else(invalid)?;
    let port: u16 = port.parse().map_err(|_| invalid())?;
    let host = host.trim_start_matches('[').trim_end_matches(']');
    let host = if host.is_empty() { DEFAULT_HOST } else { host };

    Ok((host.to_string(), port))
}

/// Handle to a verified Redis client
#[derive(Clone)]
pub struct RedisCache {
    client: Client,
    connection: MultiplexedConnection,
}

impl RedisCache {
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// A handle on the shared multiplexed connection
    #[must_use]
    pub fn connection(&self) -> MultiplexedConnection {
        self.connection.clone()
    }

    /// Send `PING` over the shared connection, bounded by [`LIVENESS_TIMEOUT`]
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Probe` if the server answers with an error and
    /// `CacheError::Timeout` if it does not answer in time.
    pub async fn ping_connection(&self) -> Result<String, CacheError> {
        let mut connection = self.connection();
        match tokio::time::timeout(LIVENESS_TIMEOUT, send_ping(&mut connection)).await {
            Ok(reply) => reply.map_err(CacheError::Probe),
            Err(_) => Err(CacheError::Timeout(LIVENESS_TIMEOUT)),
        }
    }
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache")
            .field("addr", &self.client.get_connection_info().addr)
            .field("db", &self.client.get_connection_info().redis.db)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl HealthCheck for RedisCache {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn ping(&self) -> Result<String, ConnectionError> {
        Ok(self.ping_connection().await?)
    }
}

async fn send_ping(connection: &mut MultiplexedConnection) -> Result<String, RedisError> {
    redis::cmd("PING").query_async(connection).await
}

/// Open the cache store and verify it answers a liveness probe
///
/// Opening the connection and the `PING` round trip share one
/// [`LIVENESS_TIMEOUT`] budget.
///
/// # Errors
///
/// Returns `CacheError::InvalidAddress`/`UnsupportedProtocol` for bad
/// settings, `CacheError::Client` if the client cannot be built,
/// `CacheError::Probe` if connecting or `PING` fails and
/// `CacheError::Timeout` if the probe does not finish in time.
pub async fn connect(settings: &CacheSettings) -> Result<RedisCache, CacheError> {
    let info = settings.connection_info()?;
    let client = Client::open(info).map_err(CacheError::Client)?;

    let probe = async {
        let mut connection = client.get_multiplexed_async_connection().await?;
        let reply = send_ping(&mut connection).await?;
        Ok::<_, RedisError>((connection, reply))
    };

    let (connection, reply) = match tokio::time::timeout(LIVENESS_TIMEOUT, probe).await {
        Ok(Ok(probed)) => probed,
        Ok(Err(e)) => {
            tracing::error!(address = %settings.address, error = %e, "Failed to connect to cache");
            return Err(CacheError::Probe(e));
        }
        Err(_) => {
            tracing::error!(
                address = %settings.address,
                timeout_secs = LIVENESS_TIMEOUT.as_secs(),
                "Cache liveness probe timed out"
            );
            return Err(CacheError::Timeout(LIVENESS_TIMEOUT));
        }
    };

    tracing::info!(response = %reply, "Connected to cache");
    Ok(RedisCache { client, connection })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::settings::Secret;

    fn settings(address: &str, protocol: i64) -> CacheSettings {
        CacheSettings {
            address: address.to_string(),
            password: Secret::default(),
            db: 0,
            protocol,
        }
    }

    #[test]
    fn test_connection_info_maps_credentials() {
        let settings = CacheSettings {
            address: "cache.internal:6380".to_string(),
            password: Secret::new("cache-pass"),
            db: 3,
            protocol: 2,
        };

        let info = settings.connection_info().unwrap();

        assert!(matches!(&info.addr, ConnectionAddr::Tcp(host, 6380) if host == "cache.internal"));
        assert_eq!(info.redis.db, 3);
        assert_eq!(info.redis.password.as_deref(), Some("cache-pass"));
        assert!(matches!(info.redis.protocol, ProtocolVersion::RESP2));
    }

    #[test]
    fn test_empty_password_skips_auth() {
        let info = settings("localhost:6379", 3).connection_info().unwrap();

        assert!(info.redis.password.is_none());
        assert!(info.redis.username.is_none());
    }

    #[test]
    fn test_unset_protocol_uses_resp3() {
        let info = settings("localhost:6379", 0).connection_info().unwrap();
        assert!(matches!(info.redis.protocol, ProtocolVersion::RESP3));

        let info = settings("localhost:6379", 3).connection_info().unwrap();
        assert!(matches!(info.redis.protocol, ProtocolVersion::RESP3));
    }

    #[test]
    fn test_unknown_protocol_is_rejected() {
        let result = settings("localhost:6379", 4).connection_info();
        assert!(matches!(result, Err(CacheError::UnsupportedProtocol(4))));
    }

    #[test]
    fn test_parse_address_defaults() {
        assert_eq!(parse_address("").unwrap(), ("localhost".to_string(), 6379));
        assert_eq!(parse_address(":6390").unwrap(), ("localhost".to_string(), 6390));
    }

    #[test]
    fn test_parse_address_ipv6() {
        assert_eq!(parse_address("[::1]:6379").unwrap(), ("::1".to_string(), 6379));
    }

    #[test]
    fn test_parse_address_rejects_malformed() {
        for bad in ["localhost", "localhost:", "localhost:redis", "host:99999"] {
            match parse_address(bad) {
                Err(CacheError::InvalidAddress(address)) => assert_eq!(address, bad),
                other => panic!("expected InvalidAddress for {bad:?}, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_connect_rejects_bad_settings_before_dialing() {
        let result = connect(&settings("no-port", 3)).await;
        assert!(matches!(result, Err(CacheError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn test_connect_to_closed_port_fails() {
        // Port 1 (tcpmux) is not expected to run a Redis server
        let started = std::time::Instant::now();

        let result = connect(&settings("127.0.0.1:1", 3)).await;

        assert!(matches!(
            result,
            Err(CacheError::Probe(_) | CacheError::Timeout(_))
        ));
        assert!(started.elapsed() < LIVENESS_TIMEOUT + Duration::from_secs(1));
    }
}
