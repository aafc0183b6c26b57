//! HTTP server assembly: shared context, router, and lifecycle.

use anyhow::{Context, Result};
use axum::{
    http::{header, Method, StatusCode},
    middleware,
    response::IntoResponse,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{Config, DEFAULT_ALLOWED_PATHS};
use crate::db::{self, DbPool};
use crate::streaming::AllowList;

pub mod request_id;
pub mod routes_channels;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    /// Database connection pool
    pub db: DbPool,
    pub config: Arc<Config>,
    /// Allow-list snapshot, resolved once at startup
    pub allow_list: Arc<AllowList>,
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/channels",
            get(routes_channels::list_channels).post(routes_channels::create_channel),
        )
        .route(
            "/api/channels/{id}",
            get(routes_channels::get_channel)
                .put(routes_channels::update_channel)
                .delete(routes_channels::delete_channel),
        )
        .route(
            "/api/channels/{id}/stream",
            get(routes_channels::stream_channel),
        )
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Start the HTTP server
pub async fn start_server(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    if let Some(parent) = config.server.db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).context("Failed to create database directory")?;
        }
    }
    let db = db::init_pool(&config.server.db_path)?;

    let allow_list = AllowList::resolve(&config.media.allowed_paths, DEFAULT_ALLOWED_PATHS);
    tracing::info!("Allowed media paths: {:?}", allow_list.bases());

    let ctx = AppContext {
        db,
        config: Arc::new(config),
        allow_list: Arc::new(allow_list),
    };

    let app = create_router(ctx);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
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

    tracing::info!("Shutdown signal received");
}
