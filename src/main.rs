use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tradejournal::application::routes::create_router;
use tradejournal::application::state::AppState;
use tradejournal::config::ServerConfig;
use tradejournal::domain::repositories::trade_store::TradeStore;
use tradejournal::persistence::memory::InMemoryTradeStore;
use tradejournal::persistence::repository::SqliteTradeStore;
use tradejournal::persistence::{init_database, DatabaseConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Missing .env is fine; real deployments set the environment directly
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tradejournal=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Trade journal analytics server starting...");

    let config = ServerConfig::from_env();
    let db_config = DatabaseConfig::from_env();

    let store: Arc<dyn TradeStore> = if db_config.url == "memory" {
        info!("Using in-memory trade store (data is lost on shutdown)");
        Arc::new(InMemoryTradeStore::new())
    } else {
        let pool = init_database(&db_config).await?;
        Arc::new(SqliteTradeStore::new(pool))
    };

    let addr = config.bind_address;
    let app = create_router(AppState::new(store, config));

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        let ctrl_c = async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Received Ctrl+C signal"),
                Err(e) => error!("Failed to install Ctrl+C handler: {}", e),
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut sig) => {
                    sig.recv().await;
                    info!("Received SIGTERM signal");
                }
                Err(e) => error!("Failed to install SIGTERM handler: {}", e),
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }
    };

    info!("Server started successfully. Press Ctrl+C to stop.");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Shutdown complete");
    Ok(())
}
