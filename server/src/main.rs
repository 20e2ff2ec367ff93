use anyhow::Context;
use tokio::net::TcpListener;
use todo_server::telemetry::init_tracing;
use todo_server::{AppState, Config, Database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    init_tracing(&config.log_level)?;

    let settings = config.database();
    if let Err(reason) = &settings {
        tracing::warn!(%reason, "database settings incomplete, todo requests will fail");
    }
    let state = AppState::new(Database::new(settings));

    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("listening on {}", listener.local_addr()?);

    todo_server::run(listener, state).await?;
    tracing::info!("server shutdown complete");
    Ok(())
}
