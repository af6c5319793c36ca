use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::Router;
use configs::{AppConfig, Backend};
use migration::MigratorTrait;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::errors::StartupError;
use crate::routes::{self, AppState};
use service::{
    runtime,
    user::{build_adapter, Argon2Hasher, UserManager},
};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Connect the configured backend and wrap it in a manager.
///
/// For the database backend pending migrations are applied first.
pub async fn build_state(cfg: &AppConfig) -> Result<AppState, StartupError> {
    runtime::ensure_storage_dir(&cfg.storage).await?;

    let db = match cfg.storage.backend {
        Backend::Database => {
            let db = models::db::connect_with_config(&cfg.database)
                .await
                .map_err(|e| StartupError::Storage(e.to_string()))?;
            migration::Migrator::up(&db, None)
                .await
                .map_err(|e| StartupError::Storage(format!("migrations failed: {e}")))?;
            Some(db)
        }
        Backend::Json => None,
    };

    let adapter = build_adapter(&cfg.storage, db).map_err(|e| StartupError::Storage(e.to_string()))?;
    info!(backend = adapter.backend(), "user storage ready");

    let users = UserManager::new(adapter, Arc::new(Argon2Hasher::default()));
    Ok(AppState { users: Arc::new(users) })
}

pub fn build_app(state: AppState) -> Router {
    routes::build_router(state, build_cors())
}

/// Resolves on Ctrl+C; a failing signal handler never resolves.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!(event = "shutdown_signal", "received Ctrl+C, draining requests"),
        Err(e) => {
            error!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await
        }
    }
}

/// Serve `app` until `shutdown` resolves, then let in-flight requests finish.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!(event = "stop", "server stopped");
    Ok(())
}

/// Public entry: build the app from an already loaded config and run the HTTP server
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_app(build_state(&cfg).await?);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))?;
    info!(%addr, "starting user api");
    let listener = TcpListener::bind(addr).await?;
    serve(listener, app, shutdown).await
}
