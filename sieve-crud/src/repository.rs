//! Data-access collaborators.
//!
//! A [`Repository`] stores records and evaluates predicates. The service
//! layer never inspects storage directly, so swapping the in-memory
//! repository for a SQL-backed one only means implementing this trait, for
//! example by rendering predicates with [`Predicate::to_sql`].

use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::RwLock;
use sieve_query::Predicate;
use tracing::trace;

use crate::error::{CrudError, CrudResult};
use crate::pagination::Pagination;
use crate::record::Record;

/// Storage for one record type.
#[async_trait]
pub trait Repository<R: Record>: Send + Sync {
    /// Look up a record by key.
    async fn find(&self, key: &R::Key) -> CrudResult<Option<R>>;

    /// Records matching `predicate`, in storage order, windowed by `pagination`.
    async fn query(&self, predicate: &Predicate, pagination: &Pagination) -> CrudResult<Vec<R>>;

    /// Number of records matching `predicate`.
    async fn count(&self, predicate: &Predicate) -> CrudResult<u64>;

    /// Store a new record; fails if the key is taken.
    async fn insert(&self, record: R) -> CrudResult<R>;

    /// Replace an existing record; fails if the key is unknown.
    async fn update(&self, record: R) -> CrudResult<R>;

    /// Remove a record, returning whether it existed.
    async fn remove(&self, key: &R::Key) -> CrudResult<bool>;

    /// Check if a record exists.
    async fn exists(&self, key: &R::Key) -> CrudResult<bool> {
        Ok(self.find(key).await?.is_some())
    }
}

/// In-memory repository, insertion ordered.
///
/// Clones share the same storage.
#[derive(Debug)]
pub struct MemoryRepository<R: Record> {
    rows: Arc<RwLock<IndexMap<R::Key, R>>>,
}

impl<R: Record> MemoryRepository<R> {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    /// Create a repository holding `records`; later duplicates replace earlier ones.
    pub fn with_records(records: impl IntoIterator<Item = R>) -> Self {
        let rows = records.into_iter().map(|r| (r.key(), r)).collect();
        Self {
            rows: Arc::new(RwLock::new(rows)),
        }
    }

    /// Number of stored records, deleted-flagged ones included.
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    /// Check if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    /// Copy of every stored record.
    pub fn snapshot(&self) -> Vec<R> {
        self.rows.read().values().cloned().collect()
    }
}

impl<R: Record> Default for MemoryRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> Clone for MemoryRepository<R> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
        }
    }
}

#[async_trait]
impl<R: Record> Repository<R> for MemoryRepository<R> {
    async fn find(&self, key: &R::Key) -> CrudResult<Option<R>> {
        Ok(self.rows.read().get(key).cloned())
    }

    async fn query(&self, predicate: &Predicate, pagination: &Pagination) -> CrudResult<Vec<R>> {
        let rows = self.rows.read();
        let matched = rows.values().filter(|r| predicate.matches(*r));
        let items: Vec<R> = pagination.apply(matched).cloned().collect();
        trace!(entity = R::entity_name(), returned = items.len(), "memory query");
        Ok(items)
    }

    async fn count(&self, predicate: &Predicate) -> CrudResult<u64> {
        let rows = self.rows.read();
        Ok(rows.values().filter(|r| predicate.matches(*r)).count() as u64)
    }

    async fn insert(&self, record: R) -> CrudResult<R> {
        let key = record.key();
        let mut rows = self.rows.write();
        if rows.contains_key(&key) {
            return Err(CrudError::repository(format!(
                "{} with key `{key}` already exists",
                R::entity_name()
            )));
        }
        rows.insert(key, record.clone());
        Ok(record)
    }

    async fn update(&self, record: R) -> CrudResult<R> {
        let key = record.key();
        let mut rows = self.rows.write();
        match rows.get_mut(&key) {
            Some(slot) => {
                *slot = record.clone();
                Ok(record)
            }
            None => Err(CrudError::not_found(R::entity_name(), key)),
        }
    }

    async fn remove(&self, key: &R::Key) -> CrudResult<bool> {
        Ok(self.rows.write().shift_remove(key).is_some())
    }
}
