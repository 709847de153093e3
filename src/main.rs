mod config;
mod dto;
mod handlers;
mod models;
mod repository;
mod service;

use tokio::signal;
use tracing_subscriber::EnvFilter;

use std::sync::Arc;

use repository::Repository;
use service::NoteService;

#[tokio::main]
async fn main() {
    // Config is read before logging exists, so its outcome is reported below
    let loaded = config::load_config();

    // Log setup
    let log_level = loaded
        .as_ref()
        .map_or("info", |(cfg, _)| cfg.log_level.as_str());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let (cfg, source) = loaded.unwrap_or_else(|e| {
        tracing::error!("Failed to load configuration: {e}");
        panic!("failed to load configuration: {e}");
    });
    tracing::info!("Loaded configuration from {source}");

    // Repository creation and migration
    let repo = Repository::new(&cfg.database_path).await.unwrap_or_else(|e| {
        tracing::error!(
            "Failed to open database '{}': {e}",
            cfg.database_path.display()
        );
        panic!("failed to open database: {e}");
    });

    repo.migrate().await.unwrap_or_else(|e| {
        tracing::error!("Failed to migrate database: {e}");
        panic!("failed to migrate database: {e}");
    });

    // Service creation
    let service = Arc::new(NoteService::new(repo));
    let router = handlers::router(service);

    let addr = cfg.socket_addr().unwrap_or_else(|e| {
        tracing::error!("{e}");
        panic!("{e}");
    });
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind to {addr}: {e}");
            panic!("failed to bind to {addr}: {e}");
        });

    tracing::info!("Notes++ server listening on {}", addr);

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("HTTP server error: {e}");
        panic!("HTTP server error: {e}");
    }

    tracing::info!("Server shutdown complete");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, starting graceful shutdown"),
        () = terminate => tracing::info!("Received SIGTERM, starting graceful shutdown"),
    }
}
