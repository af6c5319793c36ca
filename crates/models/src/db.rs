use std::time::Duration;

use configs::DatabaseConfig;
use log::LevelFilter;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::info;

use crate::errors::ModelError;

/// Open a pooled connection using the `[database]` section of the app config.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> Result<DatabaseConnection, ModelError> {
    let mut opts = ConnectOptions::new(cfg.url.clone());
    opts.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs))
        .sqlx_logging(cfg.sqlx_logging)
        .sqlx_logging_level(LevelFilter::Debug);

    let db = Database::connect(opts).await.map_err(|e| ModelError::Connect(e.to_string()))?;
    info!(backend = ?db.get_database_backend(), "database connected");
    Ok(db)
}

/// Single-connection in-memory SQLite database; each call yields a fresh, empty store.
pub async fn connect_in_memory() -> Result<DatabaseConnection, ModelError> {
    let mut opts = ConnectOptions::new("sqlite::memory:".to_string());
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    Database::connect(opts).await.map_err(|e| ModelError::Connect(e.to_string()))
}
