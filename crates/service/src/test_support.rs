#![cfg(test)]
use std::path::PathBuf;
use std::sync::Arc;

use argon2::Params;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use serde_json::{Map, Value};

use crate::user::password::{Argon2Hasher, PasswordHasher};

/// Fresh migrated in-memory SQLite database, private to the caller.
pub async fn sqlite_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = models::db::connect_in_memory().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Unique, not yet existing file under the system temp dir.
pub fn temp_json_path() -> PathBuf {
    std::env::temp_dir().join(format!("users_{}.json", uuid::Uuid::new_v4()))
}

/// Argon2 with minimal cost so tests stay quick.
pub fn fast_hasher() -> Arc<dyn PasswordHasher> {
    let params = Params::new(256, 1, 1, None).expect("argon2 params");
    Arc::new(Argon2Hasher::with_params(params))
}

pub fn body(v: Value) -> Map<String, Value> {
    v.as_object().cloned().expect("json object")
}
