//! Health Check Gateway
//!
//! Contract for liveness probes against an external store.

use async_trait::async_trait;

use crate::shared::errors::ConnectionError;

/// A dependency that can answer a liveness probe
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Short name of the dependency, used in logs and reports
    fn name(&self) -> &'static str;

    /// Perform a round trip against the store, returning its textual reply
    async fn ping(&self) -> Result<String, ConnectionError>;
}
