//! # Inn Desk API
//!
//! HTTP server for the inn front desk.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Inn Desk API Server                              │
//! │                                                                         │
//! │  Desk browser ───► HTTP (8080) ───► Routes ───► inn-db ───► SQLite     │
//! │                                       │                                 │
//! │                                       ▼                                 │
//! │                                  JWT session                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;

use inn_api::{create_router, logging, AppState, InnConfig, JwtManager};
use inn_db::{Database, DbConfig};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    info!("Starting Inn Desk API server...");

    // Load configuration
    let config = InnConfig::load()?;
    info!(
        port = config.port,
        db_path = %config.db_path,
        cancellation = %config.policy.cancellation,
        service_attach = %config.policy.service_attach,
        "Configuration loaded"
    );

    if config.uses_dev_secret() {
        warn!("JWT_SECRET not set, using the development secret");
    }

    // Open database (migrations run on connect)
    let db = Database::new(
        DbConfig::new(&config.db_path).max_connections(config.db_max_connections),
    )
    .await?;
    info!("Database ready");

    let jwt = JwtManager::new(config.jwt_secret.clone(), config.jwt_access_lifetime_secs);
    let state = AppState::new(db.clone(), jwt, config.policy);
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
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
                error!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received, starting graceful shutdown...");
}
