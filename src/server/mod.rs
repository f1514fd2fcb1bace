use crate::catalog::{start_refresh_task, Catalog};
use crate::config::Config;
use crate::source::{create_source, MetadataSource};
use anyhow::{Context, Result};
use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::trace::TraceLayer;

pub mod routes_files;
pub mod routes_media;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<Catalog>,
    pub source: Arc<dyn MetadataSource>,
    pub config: Arc<Config>,
}

impl AppContext {
    /// Build a context with an empty catalog and the source selected by `config`.
    pub fn from_config(config: Config) -> Result<Self> {
        let source = create_source(&config.source).context("Failed to create metadata source")?;
        Ok(Self {
            catalog: Arc::new(Catalog::new()),
            source,
            config: Arc::new(config),
        })
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(routes_media::media_routes())
        .merge(routes_files::file_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Start the HTTP server.
///
/// Runs one refresh before binding so the first request already sees data,
/// and starts the periodic refresh task when configured.
pub async fn start_server(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let refresh_interval = config.source.refresh_interval_secs;
    let ctx = AppContext::from_config(config)?;

    ctx.catalog.refresh(ctx.source.as_ref()).await;

    let refresh_handle = (refresh_interval > 0).then(|| {
        tracing::info!("Refreshing media data every {}s", refresh_interval);
        start_refresh_task(ctx.catalog.clone(), ctx.source.clone(), refresh_interval)
    });

    let app = create_router(ctx);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = refresh_handle {
        handle.abort();
    }

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
