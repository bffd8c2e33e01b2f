//! `Repository<T>` over a `Storage` key holding a JSON array.

use std::marker::PhantomData;
use std::sync::Arc;

use portal_core::{Record, Repository, RepositoryError, RepositoryResult};

use crate::{Keys, Storage};

/// One record collection persisted under `<prefix><T::COLLECTION>`.
///
/// Every mutation reads the whole array, changes it and writes it back.
pub struct StorageRepository<T> {
    storage: Arc<dyn Storage>,
    key: String,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> StorageRepository<T> {
    pub fn new(storage: Arc<dyn Storage>, keys: &Keys) -> Self {
        Self {
            storage,
            key: keys.collection(T::COLLECTION),
            _record: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the collection key is present at all (even if empty).
    pub fn exists(&self) -> RepositoryResult<bool> {
        Ok(self.storage.get_item(&self.key)?.is_some())
    }

    /// Write `records` only when the key is absent. Returns whether it wrote.
    pub fn seed(&self, records: &[T]) -> RepositoryResult<bool> {
        if self.exists()? {
            return Ok(false);
        }
        self.write(records)?;
        Ok(true)
    }

    fn read(&self) -> RepositoryResult<Vec<T>> {
        let Some(raw) = self.storage.get_item(&self.key)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|e| RepositoryError::Malformed {
            collection: T::COLLECTION,
            reason: e.to_string(),
        })
    }

    fn write(&self, records: &[T]) -> RepositoryResult<()> {
        let raw = serde_json::to_string(records).map_err(|e| RepositoryError::Malformed {
            collection: T::COLLECTION,
            reason: e.to_string(),
        })?;
        self.storage.set_item(&self.key, &raw)?;
        tracing::debug!(collection = T::COLLECTION, records = records.len(), "collection written");
        Ok(())
    }
}

impl<T> core::fmt::Debug for StorageRepository<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StorageRepository").field("key", &self.key).finish()
    }
}

impl<T: Record> Repository<T> for StorageRepository<T> {
    fn list(&self) -> RepositoryResult<Vec<T>> {
        self.read()
    }

    fn add(&self, record: T) -> RepositoryResult<T> {
        let mut records = self.read()?;
        if records.iter().any(|r| r.id() == record.id()) {
            return Err(RepositoryError::Duplicate {
                collection: T::COLLECTION,
                id: record.id().to_string(),
            });
        }
        records.push(record.clone());
        self.write(&records)?;
        Ok(record)
    }

    fn update(&self, record: T) -> RepositoryResult<T> {
        let mut records = self.read()?;
        let Some(slot) = records.iter_mut().find(|r| r.id() == record.id()) else {
            return Err(RepositoryError::NotFound {
                collection: T::COLLECTION,
                id: record.id().to_string(),
            });
        };
        *slot = record.clone();
        self.write(&records)?;
        Ok(record)
    }

    fn delete(&self, id: &T::Id) -> RepositoryResult<bool> {
        let mut records = self.read()?;
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Ok(false);
        }
        self.write(&records)?;
        Ok(true)
    }
}
