//! Registry server entry point.
//!
//! Loads configuration from the environment, opens the configured entity
//! store, and serves the HTTP routes until Ctrl-C.

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use academic_registry::telemetry::init_tracing;
use academic_registry::{
    http, EntityStore, InMemoryEntityStore, Registry, RegistryConfig, SqliteEntityStore,
    StorageConfig, StoreError,
};

/// Reasons the server stops with a failure.
#[derive(Debug, thiserror::Error)]
enum ServerError {
    #[error("failed to open store: {0}")]
    Store(#[from] StoreError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match RegistryConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing("info");
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.log_filter);

    let result = match &config.storage {
        StorageConfig::Memory => {
            tracing::info!("using in-memory entity store");
            run(InMemoryEntityStore::new(), config.bind_addr).await
        }
        StorageConfig::Sqlite(path) => {
            tracing::info!(path = %path.display(), "using sqlite entity store");
            match SqliteEntityStore::open(path) {
                Ok(store) => run(store, config.bind_addr).await,
                Err(e) => Err(e.into()),
            }
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "registry server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run<S: EntityStore + 'static>(store: S, addr: SocketAddr) -> Result<(), ServerError> {
    let app = http::router(Arc::new(Registry::new(store)));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    tracing::info!(%addr, "registry listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await
        .map_err(ServerError::Serve)
}
