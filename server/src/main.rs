//! Ratedesk server binary.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ratedesk_fx::{default_rates, seed_if_empty, InMemoryRateStore, SharedRateStore, SqliteRateStore};
use ratedesk_server::{http, AppState, ServerConfig, StaticTokenAuthenticator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Starting Ratedesk server");

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    let addr = config
        .socket_addr()
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    let store: SharedRateStore = match &config.database_url {
        Some(url) => Arc::new(SqliteRateStore::connect(url).await?),
        None => {
            info!("DATABASE_URL not set, rates are kept in memory");
            Arc::new(InMemoryRateStore::new())
        }
    };

    if config.seed {
        let seeded = seed_if_empty(store.as_ref(), &default_rates()).await?;
        info!(seeded, store = store.name(), "Rate table ready");
    }

    let token = config.admin_token.as_deref().unwrap_or_default();
    let state = AppState::new(store, Arc::new(StaticTokenAuthenticator::new(token)));

    let (bound, server) = warp::serve(http::routes::create(state)).try_bind_with_graceful_shutdown(
        addr,
        async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for Ctrl+C");
            }
            info!("Shutdown signal received");
        },
    )?;

    info!(listen_addr = %bound, "Ratedesk server running");

    server.await;

    info!("Ratedesk server shutdown complete");
    Ok(())
}
