mod app;
mod config;
mod errors;
mod external;
mod logging;
mod models;
mod routes;
mod services;
mod state;
mod store;
#[cfg(test)]
mod testing;

use std::sync::Arc;

use anyhow::anyhow;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::AppConfig;
use crate::external::coingecko::CoinGeckoProvider;
use crate::external::yahoofinance::YahooFinanceProvider;
use crate::services::worker_pool::WorkerPool;
use crate::state::AppState;
use crate::store::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;

    logging::init_logging(&config.logging)
        .map_err(|e| anyhow!("failed to initialize logging: {}", e))?;

    let store = Store::connect(config.database_url.as_deref(), config.database_max_connections).await?;

    let worker_pool = WorkerPool::new(config.worker_pool_size);
    let crypto_provider = CoinGeckoProvider::new(&config.coingecko)?;
    let traditional_provider = YahooFinanceProvider::new(&config.yahoo)?;
    info!(
        "📊 Upstreams: CoinGecko at {}, Yahoo Finance at {}",
        config.coingecko.base_url, config.yahoo.base_url
    );

    let state = AppState {
        crypto_provider: Arc::new(crypto_provider),
        traditional_provider: Arc::new(traditional_provider),
        worker_pool: worker_pool.clone(),
    };
    let app = app::create_app(state, &config.cors_origins);

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!("🚀 Performance chart backend running at http://{}/", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down");
    worker_pool.drain().await;
    if store.is_connected() {
        store.close().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
