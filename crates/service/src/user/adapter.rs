use std::sync::Arc;

use async_trait::async_trait;
use configs::{Backend, StorageConfig};
use sea_orm::DatabaseConnection;

use super::domain::User;
use crate::errors::StorageError;

pub mod json_file;
pub mod seaorm;

pub use json_file::JsonUserAdapter;
pub use seaorm::SeaOrmUserAdapter;

/// Persistence capability the manager works against.
///
/// Lookups report absence as `Ok(None)`. `delete` of an unknown id is a no-op,
/// `update` of an unknown id fails with [`StorageError::UnknownId`].
#[async_trait]
pub trait UserAdapter: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StorageError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StorageError>;
    async fn find_all(&self) -> Result<Vec<User>, StorageError>;
    async fn create(&self, user: &User) -> Result<(), StorageError>;
    async fn update(&self, user: &User) -> Result<(), StorageError>;
    async fn delete(&self, user: &User) -> Result<(), StorageError>;

    /// Short name for logs.
    fn backend(&self) -> &'static str;
}

#[derive(Debug, thiserror::Error)]
pub enum BuildAdapterError {
    #[error("the database backend was selected but no connection was provided")]
    MissingConnection,
}

/// Pick the concrete adapter for the configured backend.
pub fn build_adapter(
    cfg: &StorageConfig,
    db: Option<DatabaseConnection>,
) -> Result<Arc<dyn UserAdapter>, BuildAdapterError> {
    match cfg.backend {
        Backend::Database => {
            let db = db.ok_or(BuildAdapterError::MissingConnection)?;
            Ok(Arc::new(SeaOrmUserAdapter::new(db)))
        }
        Backend::Json => Ok(Arc::new(JsonUserAdapter::new(cfg.json_path.clone()))),
    }
}
