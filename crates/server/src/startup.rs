use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::{AppConfig, ServerConfig};
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, ServerState};
use service::{runtime, storage::blob_store::LocalBlobStore};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn load_bind_addr(server: &ServerConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", server.host, server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {}:{}: {e}", server.host, server.port)))
}

/// Build the router on top of an existing connection pool.
///
/// Creates the upload folder when missing. Does not run migrations.
pub async fn build_app(cfg: &AppConfig, db: DatabaseConnection) -> anyhow::Result<Router> {
    runtime::ensure_env(&cfg.storage.public_dir, &cfg.storage.upload_dir).await?;
    let blobs = LocalBlobStore::new(cfg.storage.upload_dir.as_str(), &cfg.storage.url_prefix).await?;
    let state = ServerState::new(db, Arc::new(blobs));
    Ok(routes::build_router(state, &cfg.storage, build_cors()))
}

/// Serve until Ctrl+C / SIGTERM, then close the pool.
pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    if cfg.database.auto_migrate {
        models::db::migrate(&db).await?;
        info!("database migrations applied");
    }

    let app = build_app(&cfg, db.clone()).await?;

    let addr = load_bind_addr(&cfg.server)?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| StartupError::Runtime(format!("bind {addr}: {e}")))?;
    info!(%addr, upload_dir = %cfg.storage.upload_dir, "starting contact book server");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await?;
    info!("database pool closed");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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
    info!("shutdown signal received, draining connections");
}
