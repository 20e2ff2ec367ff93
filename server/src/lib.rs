//! HTTP service for todo documents.
//!
//! # Overview
//! Serves list/get/create/replace/update/delete on `/todos` over a document
//! store. Request bodies are whitelisted and validated by `todo-core`; the
//! store is connected lazily on the first request that needs it.
//!
//! # Design
//! - Handlers only translate between HTTP and `TodoStore` calls.
//! - `Database` owns the single connection for the life of the process and
//!   is closed after the server drains on shutdown.
//! - Every response, including errors, uses the `{status, ...}` envelope.

pub mod config;
pub mod error;
pub mod handlers;
pub mod responses;
pub mod routes;
pub mod state;
pub mod store;
pub mod telemetry;

use std::future::Future;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
pub use store::{Database, MemoryStore, SurrealStore, TodoStore};

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .merge(routes::todo_router(state.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until `shutdown` resolves, then close the storage connection.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let database = state.database().clone();
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    database.close().await;
    Ok(())
}

/// Serve until Ctrl+C or SIGTERM.
pub async fn run(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    serve(listener, state, shutdown_signal()).await
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}
