use std::path::PathBuf;

use async_trait::async_trait;

use super::UserAdapter;
use crate::errors::StorageError;
use crate::storage::json_array_store::JsonArrayStore;
use crate::user::domain::{User, UserRecord};

/// All users as one JSON array of full-view records, in insertion order.
pub struct JsonUserAdapter {
    store: JsonArrayStore<UserRecord>,
}

impl JsonUserAdapter {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { store: JsonArrayStore::new(path) }
    }

    /// Overwrite the file with exactly `users`.
    pub async fn replace_all(&self, users: &[User]) -> Result<(), StorageError> {
        let records: Vec<UserRecord> = users.iter().map(User::full_view).collect();
        self.store.replace_all(&records).await
    }
}

#[async_trait]
impl UserAdapter for JsonUserAdapter {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StorageError> {
        let records = self.store.load().await?;
        Ok(records.into_iter().find(|r| r.id == id).map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let records = self.store.load().await?;
        Ok(records.into_iter().find(|r| r.email == email).map(User::from))
    }

    async fn find_all(&self) -> Result<Vec<User>, StorageError> {
        Ok(self.store.load().await?.into_iter().map(User::from).collect())
    }

    async fn create(&self, user: &User) -> Result<(), StorageError> {
        let record = user.full_view();
        self.store
            .modify(move |records| {
                records.push(record);
                Ok(())
            })
            .await
    }

    async fn update(&self, user: &User) -> Result<(), StorageError> {
        let record = user.full_view();
        self.store
            .modify(move |records| match records.iter().position(|r| r.id == record.id) {
                Some(i) => {
                    records[i] = record;
                    Ok(())
                }
                None => Err(StorageError::UnknownId(record.id)),
            })
            .await
    }

    async fn delete(&self, user: &User) -> Result<(), StorageError> {
        let id = user.id();
        self.store
            .modify(|records| {
                records.retain(|r| r.id != id);
                Ok(())
            })
            .await
    }

    fn backend(&self) -> &'static str {
        "json"
    }
}
