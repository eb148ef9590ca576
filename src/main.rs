//! Marketplace server entry point.

use std::error::Error;
use std::sync::Arc;

use reward_tasks::api::routes::create_router;
use reward_tasks::application::MarketStore;
use reward_tasks::infrastructure::{
    AppConfig, AppDependencies, InMemoryMarketStore, PostgresMarketStore,
    RandomReferralCodeGenerator, StorageBackend, init_tracing,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::from_env()?;
    init_tracing(config.log_format)?;

    tracing::info!(
        host = %config.app_host,
        port = config.app_port,
        admins = config.admin_ids.len(),
        "configuration loaded"
    );

    let store: Arc<dyn MarketStore> = match &config.storage {
        StorageBackend::Postgres {
            database_url,
            max_connections,
        } => {
            let store = PostgresMarketStore::connect(database_url, *max_connections).await?;
            store.migrate().await?;
            tracing::info!(max_connections, "connected to PostgreSQL, migrations applied");
            Arc::new(store)
        }
        StorageBackend::Memory => {
            tracing::warn!("using the in-memory store; state is lost on restart");
            Arc::new(InMemoryMarketStore::new())
        }
    };

    let bind_address = format!("{}:{}", config.app_host, config.app_port);
    let dependencies = AppDependencies::new(config, store, Arc::new(RandomReferralCodeGenerator));
    let app = create_router(dependencies);

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!("listening on http://{bind_address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
    tracing::info!("Shutdown signal received");
}
