// ABOUTME: Server bootstrap for Usertags
// ABOUTME: Opens storage, picks the set store backend, and serves the API router

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use usertags_api::{create_router, AppState, Credentials};
use usertags_storage::{MemorySetStore, SetStore, SqliteSetStore};
use usertags_users::UserStorage;

pub mod config;
pub mod logging;


use config::{Config, SetStoreKind};

/// Builds the application with its storage, middleware, and routes
pub async fn build_app(config: &Config) -> anyhow::Result<Router> {
    let pool = usertags_storage::connect(&config.db_path)
        .await
        .with_context(|| format!("Failed to open database at {}", config.db_path.display()))?;

    let set_store: Arc<dyn SetStore> = match config.set_store {
        SetStoreKind::Sqlite => Arc::new(SqliteSetStore::new(pool.clone())),
        SetStoreKind::Memory => Arc::new(MemorySetStore::new()),
    };

    let state = AppState::new(
        UserStorage::new(pool),
        set_store,
        Credentials::new(&config.api_username, &config.api_password),
    );

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .cors_origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {}", config.cors_origin))?,
        )
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    Ok(create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

pub async fn run_server(config: Config) -> anyhow::Result<()> {
    info!(
        db_path = %config.db_path.display(),
        set_store = ?config.set_store,
        cors_origin = %config.cors_origin,
        "Starting Usertags server"
    );

    let app = build_app(&config).await?;

    let addr = SocketAddr::new(config.host, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
