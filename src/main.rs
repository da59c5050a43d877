//! Store Bootstrap - Main Entry Point

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use store_bootstrap::application::use_cases::CheckConnectionsUseCase;
use store_bootstrap::domain::gateways::HealthCheck;
use store_bootstrap::domain::models::settings::AppConfig;
use store_bootstrap::infrastructure::driven_adapters::{cache, database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "store_bootstrap=debug,sqlx=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;
    tracing::info!(
        server_host = %config.server.host,
        server_port = %config.server.port,
        "Configuration loaded successfully"
    );

    // Open stores
    let store = database::connect(&config.database).await?;
    let cache = cache::connect(&config.cache).await?;

    // Verify both answer
    let store_check: Arc<dyn HealthCheck> = Arc::new(store.clone());
    let cache_check: Arc<dyn HealthCheck> = Arc::new(cache);
    let reports = CheckConnectionsUseCase::new(vec![store_check, cache_check])
        .execute()
        .await?;
    for report in &reports {
        tracing::info!(dependency = %report.name, response = %report.response, "Store ready");
    }

    store.close().await;
    Ok(())
}
