//! HTTP front end for the in-memory todo store.
//!
//! # Overview
//! `app` builds the axum router around an explicitly constructed
//! `AppState`; `run` serves it on a listener the caller already bound. The
//! binary in `main.rs` is the only place that reads the environment, installs
//! logging and picks the real clock.
//!
//! # Design
//! - The store sits behind one `RwLock`, which covers both the records and
//!   the id counter, so every mutation is atomic.
//! - Routes under the configurable prefix; `/health` is always at the root.
//! - Unknown paths and unsupported methods both answer 404 `Route not found`.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};
use tokio::{net::TcpListener, sync::RwLock};
use todo_core::{Clock, TodoStore};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub use config::{Config, ConfigError};
pub use error::{ApiError, ErrorBody};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<TodoStore>>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// An empty store stamped by `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Arc::new(RwLock::new(TodoStore::new(clock.clone()))),
            clock,
        }
    }
}

pub fn app(state: AppState, config: &Config) -> Router {
    app_with(Router::new(), state, config)
}

/// `app` plus `extra` routes, mounted inside the same middleware stack.
pub fn app_with(extra: Router<AppState>, state: AppState, config: &Config) -> Router {
    let prefix = config.api_prefix.as_str();
    Router::new()
        .route(
            &format!("{prefix}/todos"),
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route(
            &format!("{prefix}/todos/stats"),
            get(handlers::todo_stats)
                .put(handlers::stats_is_not_a_todo)
                .delete(handlers::stats_is_not_a_todo),
        )
        .route(
            &format!("{prefix}/todos/{{id}}"),
            put(handlers::update_todo).delete(handlers::delete_todo),
        )
        .route("/health", get(handlers::health))
        .merge(extra)
        .method_not_allowed_fallback(handlers::route_not_found)
        .fallback(handlers::route_not_found)
        .layer(middleware::catch_panic())
        .layer(middleware::cors(&config.frontend_url))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn run(listener: TcpListener, state: AppState, config: &Config) -> std::io::Result<()> {
    axum::serve(listener, app(state, config))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for Ctrl-C, running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
