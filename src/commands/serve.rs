//! Serve command - Starts the HTTP server.
//!
//! Startup connects the database, checks it answers, applies migrations
//! when `AUTO_MIGRATE` is set, then connects Redis. A
//! missing Redis degrades to running without the response cache and rate
//! limits. Shutdown waits for in-flight requests, then closes the pool.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Cache, Database};

/// Execute the serve command
pub async fn execute(args: ServeArgs, mut config: Config) -> AppResult<()> {
    if let Some(host) = args.host {
        config.server_host = host;
    }
    if let Some(port) = args.port {
        config.server_port = port;
    }

    tracing::info!(mode = ?config.mode, "Starting server...");

    let db = Database::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    db.ping()
        .await
        .map_err(|e| AppError::internal(format!("Database is not answering: {}", e)))?;
    tracing::info!("Database connected");

    if config.auto_migrate {
        tracing::info!("Applying pending migrations");
        db.run_migrations()
            .await
            .map_err(|e| AppError::internal(format!("Migration failed: {}", e)))?;
    }

    let cache = Arc::new(connect_cache(&config).await);
    let db = Arc::new(db);

    let app_state = AppState::from_config(db.clone(), cache, config.clone());
    let app = create_router(app_state);

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    // Handlers are gone once serve returns, so this is normally the last handle
    match Arc::try_unwrap(db) {
        Ok(db) => {
            if let Err(e) = db.close().await {
                tracing::warn!(error = %e, "Closing the database pool failed");
            }
        }
        Err(_) => tracing::debug!("Database pool still shared, dropping it"),
    }

    tracing::info!("Server shut down gracefully");
    Ok(())
}

async fn connect_cache(config: &Config) -> Cache {
    if !config.cache_enabled {
        tracing::info!("Response cache disabled");
        return Cache::disabled();
    }

    let cache = match Cache::connect(config).await {
        Ok(cache) => cache,
        Err(e) => {
            tracing::warn!(error = %e, "Redis unavailable, running without cache");
            return Cache::disabled();
        }
    };

    if let Err(e) = cache.ping().await {
        tracing::warn!(error = %e, "Redis is not answering, running without cache");
        return Cache::disabled();
    }

    cache
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, starting graceful shutdown"),
        _ = terminate => tracing::info!("Received terminate signal, starting graceful shutdown"),
    }
}
