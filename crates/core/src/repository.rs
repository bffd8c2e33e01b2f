//! Injected repository interface over a named record collection.
//!
//! Callers never reach for an ambient store: every service that needs data
//! receives a `Repository<T>` through its constructor.
//!
//! ## Write semantics
//!
//! A collection is persisted wholesale. Every mutation reads the full
//! collection, changes it in memory and writes the whole sequence back. There
//! is no locking or transaction discipline: two handles over the same backing
//! storage race and the last write wins.

use std::sync::{Arc, RwLock};

use thiserror::Error;

use crate::entity::Record;

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The persisted collection exists but could not be decoded.
    #[error("collection '{collection}' is malformed: {reason}")]
    Malformed {
        collection: &'static str,
        reason: String,
    },

    /// The record targeted by an update does not exist.
    #[error("record '{id}' not found in '{collection}'")]
    NotFound { collection: &'static str, id: String },

    /// A record with the same id is already stored.
    #[error("record '{id}' already exists in '{collection}'")]
    Duplicate { collection: &'static str, id: String },

    /// The backing storage rejected a read or write.
    #[error("storage error: {0}")]
    Storage(String),
}

/// CRUD over one record collection.
///
/// - `list` returns records in insertion order; an absent collection is empty.
/// - `add` appends and rejects duplicate ids.
/// - `update` replaces the record with the same id; a missing id is `NotFound`.
/// - `delete` returns whether a record was removed.
pub trait Repository<T: Record>: Send + Sync {
    fn list(&self) -> RepositoryResult<Vec<T>>;

    fn get(&self, id: &T::Id) -> RepositoryResult<Option<T>> {
        Ok(self.list()?.into_iter().find(|r| r.id() == id))
    }

    /// Linear scan for the first record matching `predicate`.
    fn find(&self, predicate: &dyn Fn(&T) -> bool) -> RepositoryResult<Option<T>> {
        Ok(self.list()?.into_iter().find(|r| predicate(r)))
    }

    fn add(&self, record: T) -> RepositoryResult<T>;

    fn update(&self, record: T) -> RepositoryResult<T>;

    fn delete(&self, id: &T::Id) -> RepositoryResult<bool>;
}

impl<T, R> Repository<T> for Arc<R>
where
    T: Record,
    R: Repository<T> + ?Sized,
{
    fn list(&self) -> RepositoryResult<Vec<T>> {
        (**self).list()
    }

    fn get(&self, id: &T::Id) -> RepositoryResult<Option<T>> {
        (**self).get(id)
    }

    fn find(&self, predicate: &dyn Fn(&T) -> bool) -> RepositoryResult<Option<T>> {
        (**self).find(predicate)
    }

    fn add(&self, record: T) -> RepositoryResult<T> {
        (**self).add(record)
    }

    fn update(&self, record: T) -> RepositoryResult<T> {
        (**self).update(record)
    }

    fn delete(&self, id: &T::Id) -> RepositoryResult<bool> {
        (**self).delete(id)
    }
}

/// In-memory repository for tests/dev.
#[derive(Debug)]
pub struct InMemoryRepository<T> {
    inner: RwLock<Vec<T>>,
}

impl<T> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Vec::new()),
        }
    }

    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            inner: RwLock::new(records),
        }
    }
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> Repository<T> for InMemoryRepository<T> {
    fn list(&self) -> RepositoryResult<Vec<T>> {
        let records = self
            .inner
            .read()
            .map_err(|_| RepositoryError::Storage("lock poisoned".to_string()))?;
        Ok(records.clone())
    }

    fn add(&self, record: T) -> RepositoryResult<T> {
        let mut records = self
            .inner
            .write()
            .map_err(|_| RepositoryError::Storage("lock poisoned".to_string()))?;
        if records.iter().any(|r| r.id() == record.id()) {
            return Err(RepositoryError::Duplicate {
                collection: T::COLLECTION,
                id: record.id().to_string(),
            });
        }
        records.push(record.clone());
        Ok(record)
    }

    fn update(&self, record: T) -> RepositoryResult<T> {
        let mut records = self
            .inner
            .write()
            .map_err(|_| RepositoryError::Storage("lock poisoned".to_string()))?;
        let slot = records
            .iter_mut()
            .find(|r| r.id() == record.id())
            .ok_or_else(|| RepositoryError::NotFound {
                collection: T::COLLECTION,
                id: record.id().to_string(),
            })?;
        *slot = record.clone();
        Ok(record)
    }

    fn delete(&self, id: &T::Id) -> RepositoryResult<bool> {
        let mut records = self
            .inner
            .write()
            .map_err(|_| RepositoryError::Storage("lock poisoned".to_string()))?;
        let before = records.len();
        records.retain(|r| r.id() != id);
        Ok(records.len() != before)
    }
}
