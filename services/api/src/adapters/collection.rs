//! services/api/src/adapters/collection.rs
//!
//! A JSON-array collection held in memory and optionally mirrored to a file.
//!
//! Every mutation goes through `apply_then_persist`: the cached vector is
//! changed first, then the whole array is written to disk. When the write
//! fails the cache is restored, so readers never see records that were not
//! stored.

use health_tracker_core::ports::{PortError, PortResult};
use health_tracker_core::rollback::{apply_then_persist, RollbackError};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{error, info};
use uuid::Uuid;

/// Records that are addressed by a UUID inside their collection.
pub trait Keyed {
    fn key(&self) -> Uuid;
}

pub struct Collection<T> {
    items: RwLock<Vec<T>>,
    /// `None` keeps the collection purely in memory.
    path: Option<PathBuf>,
    /// Human-readable record name used in `NotFound` messages.
    label: &'static str,
}

impl<T> Collection<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync,
{
    /// Loads the collection from `path`, starting empty if the file does not exist.
    pub async fn open(path: PathBuf, label: &'static str) -> PortResult<Self> {
        let items = match tokio::fs::read_to_string(&path).await {
            Ok(text) if text.trim().is_empty() => Vec::new(),
            Ok(text) => serde_json::from_str(&text).map_err(|e| {
                PortError::Unexpected(format!("Corrupt data file {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(PortError::Unexpected(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        info!("Loaded {} {} record(s) from {}", items.len(), label, path.display());
        Ok(Self {
            items: RwLock::new(items),
            path: Some(path),
            label,
        })
    }

    pub fn in_memory(label: &'static str) -> Self {
        Self {
            items: RwLock::new(Vec::new()),
            path: None,
            label,
        }
    }

    /// Runs `f` against a read-only view of the records.
    pub async fn read<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        let items = self.items.read().await;
        f(&items)
    }

    /// Runs `f` against the records and persists the result.
    ///
    /// Writers are serialised by the lock, which is held until the file write
    /// has finished.
    pub async fn mutate<R>(
        &self,
        f: impl FnOnce(&mut Vec<T>) -> PortResult<R>,
    ) -> PortResult<R> {
        let mut items = self.items.write().await;
        let path = self.path.clone();
        apply_then_persist(&mut *items, f, |tentative| async move {
            match path {
                Some(path) => write_json(&path, &tentative).await,
                None => Ok(()),
            }
        })
        .await
        .map_err(|e| {
            if let RollbackError::Persist(cause) = &e {
                error!("Rolled back {} change: {}", self.label, cause);
            }
            PortError::from(e)
        })
    }

    fn not_found(&self, id: Uuid) -> PortError {
        PortError::NotFound(format!("{} {} not found", self.label, id))
    }
}

impl<T> Collection<T>
where
    T: Keyed + Clone + Serialize + DeserializeOwned + Send + Sync,
{
    pub async fn get(&self, id: Uuid) -> PortResult<T> {
        self.read(|items| items.iter().find(|item| item.key() == id).cloned())
            .await
            .ok_or_else(|| self.not_found(id))
    }

    pub async fn insert(&self, item: T) -> PortResult<T> {
        self.mutate(|items| {
            if items.iter().any(|existing| existing.key() == item.key()) {
                return Err(PortError::Conflict(format!(
                    "{} {} already exists",
                    self.label,
                    item.key()
                )));
            }
            items.push(item.clone());
            Ok(item)
        })
        .await
    }

    /// Replaces the record with the same key, keeping its position.
    pub async fn replace(&self, item: T) -> PortResult<T> {
        self.mutate(|items| {
            let slot = items
                .iter_mut()
                .find(|existing| existing.key() == item.key())
                .ok_or_else(|| self.not_found(item.key()))?;
            *slot = item.clone();
            Ok(item)
        })
        .await
    }

    pub async fn remove(&self, id: Uuid) -> PortResult<()> {
        self.mutate(|items| {
            let before = items.len();
            items.retain(|item| item.key() != id);
            if items.len() == before {
                return Err(self.not_found(id));
            }
            Ok(())
        })
        .await
    }
}

/// Writes the array next to its destination and renames it into place.
async fn write_json<T: Serialize>(path: &Path, items: &[T]) -> PortResult<()> {
    let body = serde_json::to_string_pretty(items)
        .map_err(|e| PortError::Unexpected(format!("Failed to serialise records: {}", e)))?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, body).await.map_err(|e| {
        PortError::Unexpected(format!("Failed to write {}: {}", tmp.display(), e))
    })?;
    tokio::fs::rename(&tmp, path).await.map_err(|e| {
        PortError::Unexpected(format!("Failed to replace {}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: Uuid,
        name: String,
    }

    impl Keyed for Item {
        fn key(&self) -> Uuid {
            self.id
        }
    }

    fn item(name: &str) -> Item {
        Item {
            id: Uuid::new_v4(),
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");

        let first = item("first");
        {
            let collection = Collection::<Item>::open(path.clone(), "Item").await.unwrap();
            collection.insert(first.clone()).await.unwrap();
            collection.insert(item("second")).await.unwrap();
            collection
                .replace(Item {
                    name: "renamed".to_string(),
                    ..first.clone()
                })
                .await
                .unwrap();
        }

        let reopened = Collection::<Item>::open(path, "Item").await.unwrap();
        let names = reopened
            .read(|items| items.iter().map(|i| i.name.clone()).collect::<Vec<_>>())
            .await;
        assert_eq!(names, vec!["renamed", "second"]);
        assert_eq!(reopened.get(first.id).await.unwrap().name, "renamed");
    }

    #[tokio::test]
    async fn failed_write_leaves_cache_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        let collection = Collection::<Item>::open(nested.join("items.json"), "Item")
            .await
            .unwrap();
        collection.insert(item("kept")).await.unwrap();

        // Removing the directory makes every later write fail.
        std::fs::remove_dir_all(&nested).unwrap();
        let err = collection.insert(item("lost")).await.unwrap_err();
        assert!(matches!(err, PortError::Unexpected(_)));

        let names = collection
            .read(|items| items.iter().map(|i| i.name.clone()).collect::<Vec<_>>())
            .await;
        assert_eq!(names, vec!["kept"]);
    }

    #[tokio::test]
    async fn missing_records_are_not_found() {
        let collection = Collection::<Item>::in_memory("Item");
        let id = Uuid::new_v4();
        assert!(matches!(collection.get(id).await, Err(PortError::NotFound(_))));
        assert!(matches!(collection.remove(id).await, Err(PortError::NotFound(_))));
        assert!(matches!(collection.replace(item("x")).await, Err(PortError::NotFound(_))));
    }

    #[tokio::test]
    async fn duplicate_keys_conflict() {
        let collection = Collection::<Item>::in_memory("Item");
        let original = item("a");
        collection.insert(original.clone()).await.unwrap();
        assert!(matches!(
            collection.insert(original).await,
            Err(PortError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");
        std::fs::write(&path, "{not json").unwrap();
        let result = Collection::<Item>::open(path, "Item").await;
        assert!(matches!(result, Err(PortError::Unexpected(_))));
    }
}
