//! Check Connections Use Case
//!
//! Probes every store the application depends on, in order.

use std::sync::Arc;

use crate::domain::gateways::HealthCheck;
use crate::shared::errors::UseCaseError;

/// Outcome of one successful liveness probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub name: String,
    pub response: String,
}

/// Use case for verifying that every dependency is reachable
pub struct CheckConnectionsUseCase {
    dependencies: Vec<Arc<dyn HealthCheck>>,
}

impl CheckConnectionsUseCase {
    /// Create a new CheckConnectionsUseCase
    #[must_use]
    pub fn new(dependencies: Vec<Arc<dyn HealthCheck>>) -> Self {
        Self { dependencies }
    }

    /// Execute the use case
    ///
    /// # Errors
    ///
    /// Returns `UseCaseError::Unavailable` for the first dependency whose probe
    /// fails; later dependencies are not probed.
    pub async fn execute(&self) -> Result<Vec<ProbeReport>, UseCaseError> {
        let mut reports = Vec::with_capacity(self.dependencies.len());

        for dependency in &self.dependencies {
            let name = dependency.name();
            tracing::debug!(dependency = name, "Probing dependency");

            let response = dependency.ping().await.map_err(|source| {
                tracing::warn!(dependency = name, error = %source, "Dependency unavailable");
                UseCaseError::Unavailable {
                    name: name.to_string(),
                    source,
                }
            })?;

            tracing::info!(dependency = name, response = %response, "Dependency reachable");
            reports.push(ProbeReport {
                name: name.to_string(),
                response,
            });
        }

        Ok(reports)
    }
}
