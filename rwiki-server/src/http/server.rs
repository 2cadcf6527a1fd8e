//! Axum server setup.
//!
//! - Request tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C
//! - Schema migration and talent seeding at startup

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use rwiki_core::AppConfig;

use crate::db::{self, DbError, TalentRepo};
use crate::http::rate_limit::RateLimiter;
use crate::http::routes;
use crate::http::session;

/// Shared application state
pub struct AppState {
    pub pool: SqlitePool,
    pub config: AppConfig,
    pub limiter: RateLimiter,
    /// MAC key for session cookies, derived once from the secret.
    pub session_key: [u8; 32],
}

impl AppState {
    pub fn new(pool: SqlitePool, config: AppConfig) -> Self {
        let session_key = session::derive_key(&config.session_secret);
        let limiter = RateLimiter::new(config.rate_limit_disabled);
        Self {
            pool,
            config,
            limiter,
            session_key,
        }
    }
}

/// Assemble the full router. Split out from [`run_server`] so tests can
/// drive it with `tower::ServiceExt::oneshot`.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::public::router())
        .merge(routes::auth::router())
        .merge(routes::admin_sites::router())
        .merge(routes::admin_talents::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server until shutdown.
pub async fn run_server(config: AppConfig) -> Result<(), ServerError> {
    let pool = db::create_pool(&config.database_url)
        .await
        .map_err(DbError::from)?;
    db::migrations::run(&pool).await?;
    let seeded = TalentRepo::new(&pool).seed_defaults().await?;
    if seeded > 0 {
        tracing::info!(count = seeded, "talent table seeded");
    }

    let bind_addr = config.bind_addr;
    let state = Arc::new(AppState::new(pool, config));
    let app = build_router(state);

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("server listening on {bind_addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
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
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Database(#[from] DbError),
}
