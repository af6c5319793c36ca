use std::{
    io::ErrorKind,
    marker::PhantomData,
    path::{Path, PathBuf},
    sync::Arc,
};

use dashmap::DashMap;
use once_cell::sync::Lazy;
use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, sync::Mutex};
use tracing::debug;

use crate::errors::StorageError;

// One lock per file path, shared by every store instance in the process.
// Entries are never evicted; the table holds one entry per distinct path opened.
static FILE_LOCKS: Lazy<DashMap<PathBuf, Arc<Mutex<()>>>> = Lazy::new(DashMap::new);

fn lock_for(path: &Path) -> Arc<Mutex<()>> {
    let key = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().map(|cwd| cwd.join(path)).unwrap_or_else(|_| path.to_path_buf())
    };
    FILE_LOCKS.entry(key).or_default().clone()
}

/// Generic JSON file holding an ordered array of `T`.
///
/// Nothing is cached: every call reads the whole file, and every mutation
/// re-encodes and overwrites the whole file. Each read-modify-write cycle runs
/// under an exclusive per-path lock, so writers in the same process cannot
/// lose each other's updates. Other processes are not coordinated with, and
/// the overwrite is not atomic: an interrupted write can leave a truncated file.
pub struct JsonArrayStore<T> {
    file_path: PathBuf,
    lock: Arc<Mutex<()>>,
    _items: PhantomData<fn() -> T>,
}

impl<T> JsonArrayStore<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Bind to `path`. The file is not touched until the first operation.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        let file_path = path.into();
        let lock = lock_for(&file_path);
        Self { file_path, lock, _items: PhantomData }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Read every element. A missing file is created holding `[]`.
    pub async fn load(&self) -> Result<Vec<T>, StorageError> {
        let _guard = self.lock.lock().await;
        self.read_all().await
    }

    /// Load, apply `f`, then persist the whole array.
    ///
    /// When `f` fails nothing is written and its error is returned.
    pub async fn modify<F, R>(&self, f: F) -> Result<R, StorageError>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R, StorageError>,
    {
        let _guard = self.lock.lock().await;
        let mut items = self.read_all().await?;
        let out = f(&mut items)?;
        self.write_all(&items).await?;
        Ok(out)
    }

    /// Overwrite the file with exactly `items`.
    pub async fn replace_all(&self, items: &[T]) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        self.write_all(items).await
    }

    async fn read_all(&self) -> Result<Vec<T>, StorageError> {
        let bytes = match fs::read(&self.file_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.file_path.display(), "store file missing; creating empty array");
                self.write_all(&[]).await?;
                return Ok(Vec::new());
            }
            Err(source) => return Err(StorageError::Io { path: self.file_path.clone(), source }),
        };
        serde_json::from_slice(&bytes).map_err(|e| StorageError::Decode {
            path: self.file_path.clone(),
            reason: e.to_string(),
        })
    }

    async fn write_all(&self, items: &[T]) -> Result<(), StorageError> {
        let data = serde_json::to_vec(items).map_err(|e| StorageError::Encode(e.to_string()))?;
        fs::write(&self.file_path, data)
            .await
            .map_err(|source| StorageError::Io { path: self.file_path.clone(), source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        key: String,
        value: u32,
    }

    fn tmp_path() -> PathBuf {
        std::env::temp_dir().join(format!("json_array_store_{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn missing_file_is_created_as_empty_array() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonArrayStore::<Item>::new(&tmp);

        assert!(store.load().await?.is_empty());
        assert_eq!(tokio::fs::read_to_string(&tmp).await?, "[]");

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn modify_persists_whole_array_in_order() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonArrayStore::<Item>::new(&tmp);

        for (i, key) in ["a", "b", "c"].into_iter().enumerate() {
            store
                .modify(|items| {
                    items.push(Item { key: key.into(), value: i as u32 });
                    Ok(())
                })
                .await?;
        }
        store.modify(|items| { items.retain(|it| it.key != "b"); Ok(()) }).await?;

        let reloaded = JsonArrayStore::<Item>::new(&tmp).load().await?;
        let keys: Vec<_> = reloaded.iter().map(|it| it.key.as_str()).collect();
        assert_eq!(keys, ["a", "c"]);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn failing_mutation_writes_nothing() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonArrayStore::<Item>::new(&tmp);
        store.replace_all(&[Item { key: "a".into(), value: 1 }]).await?;

        let res = store
            .modify(|items| {
                items.clear();
                Err::<(), _>(StorageError::UnknownId("zzz".into()))
            })
            .await;
        assert!(matches!(res, Err(StorageError::UnknownId(_))));
        assert_eq!(store.load().await?.len(), 1);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn malformed_content_is_a_decode_error() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        tokio::fs::write(&tmp, b"{not json").await?;
        let store = JsonArrayStore::<Item>::new(&tmp);

        assert!(matches!(store.load().await, Err(StorageError::Decode { .. })));
        let res = store.modify(|_| Ok(())).await;
        assert!(matches!(res, Err(StorageError::Decode { .. })));
        // the broken file is left as it was
        assert_eq!(tokio::fs::read(&tmp).await?, b"{not json");

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn unwritable_location_is_an_io_error() {
        let dir = std::env::temp_dir().join(format!("json_array_store_missing_{}", uuid::Uuid::new_v4()));
        let store = JsonArrayStore::<Item>::new(dir.join("items.json"));
        assert!(matches!(store.load().await, Err(StorageError::Io { .. })));
    }

    #[tokio::test]
    async fn concurrent_writers_do_not_lose_updates() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let mut tasks = Vec::new();
        for i in 0..16u32 {
            // separate instances on the same path still share the file lock
            let store = JsonArrayStore::<Item>::new(&tmp);
            tasks.push(tokio::spawn(async move {
                store.modify(|items| { items.push(Item { key: format!("k{i}"), value: i }); Ok(()) }).await
            }));
        }
        for t in tasks {
            t.await??;
        }
        assert_eq!(JsonArrayStore::<Item>::new(&tmp).load().await?.len(), 16);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
