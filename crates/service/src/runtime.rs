//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` so binaries can prepare the configured
//! storage without depending on `common` directly.

use configs::{Backend, StorageConfig};

/// Make sure the JSON store's directory exists when that backend is active.
pub async fn ensure_storage_dir(cfg: &StorageConfig) -> anyhow::Result<()> {
    match cfg.backend {
        Backend::Json => common::env::ensure_parent_dir(&cfg.json_path).await,
        Backend::Database => Ok(()),
    }
}
