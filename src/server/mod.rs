pub mod api;

use std::net::SocketAddr;
use std::time::Duration;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tracing::info;

use crate::services::{Database, TradeRepository};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub database: Database,
    pub repository: TradeRepository,
}

/// Build the router with all routes and middleware layers.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(api::health_handler))
        .route("/api/v1/trades/aggregated", get(api::aggregated_trades_handler))
        .layer(cors)
        .layer(TimeoutLayer::new(Duration::from_secs(15)))
        .with_state(state)
}

/// Start the axum server and block until shutdown.
///
/// Closes the connection pool on the way out, on both the graceful and the
/// bind-failure paths.
pub async fn serve(database: Database, port: u16) -> crate::error::Result<()> {
    let state = AppState {
        repository: TradeRepository::new(database.pool().clone()),
        database: database.clone(),
    };
    let app = router(state);

    info!("Registering routes:");
    info!("  GET /health");
    info!("  GET /api/v1/trades/aggregated?ticker=PETR4&start_date=2024-01-01");

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            database.close().await;
            return Err(e.into());
        }
    };
    info!(%addr, "Server listening");

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    database.close().await;
    info!("Server gracefully stopped");

    result.map_err(Into::into)
}

/// Resolves when the process receives ctrl-c or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down server...");
}
