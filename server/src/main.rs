use std::sync::Arc;

use todo_core::SystemClock;
use todo_server::{AppState, Config};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let state = AppState::new(Arc::new(SystemClock));

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!(
        addr = %listener.local_addr()?,
        prefix = %config.api_prefix,
        cors_origin = ?config.frontend_url,
        "todo API listening"
    );

    todo_server::run(listener, state, &config).await?;
    Ok(())
}
