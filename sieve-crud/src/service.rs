//! Generic CRUD service.
//!
//! [`CrudService`] pairs a [`Repository`] with a filter registry. Listing
//! compiles the caller's filter request against the record type, hides
//! soft-deleted records, and pages the result.
//!
//! ```rust
//! use sieve_crud::{CrudService, MemoryRepository, Pagination, Record};
//! use sieve_query::{entity, filter_request, FieldType};
//!
//! #[derive(Debug, Clone)]
//! struct Task {
//!     id: i64,
//!     title: String,
//! }
//!
//! entity!(Task {
//!     id: FieldType::Int,
//!     title: FieldType::Text,
//! });
//!
//! impl Record for Task {
//!     type Key = i64;
//!     fn key(&self) -> i64 {
//!         self.id
//!     }
//! }
//!
//! struct TaskSearch {
//!     title: Option<String>,
//! }
//!
//! filter_request!(TaskSearch { title => "Contains" });
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let service = CrudService::new(MemoryRepository::new());
//! service.save(Task { id: 1, title: "Write docs".into() }).await.unwrap();
//! service.save(Task { id: 2, title: "Ship it".into() }).await.unwrap();
//!
//! let search = TaskSearch { title: Some("DOCS".into()) };
//! let page = service.list(Some(&search), &Pagination::new()).await.unwrap();
//! assert_eq!(page.total, 1);
//! assert_eq!(page.items[0].id, 1);
//! # });
//! ```

use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::Arc;

use sieve_query::{FilterAssembler, FilterRegistry, FilterRequest, FilterValue, Predicate};
use tracing::debug;

use crate::error::{CrudError, CrudResult};
use crate::pagination::{Page, Pagination};
use crate::record::Record;
use crate::repository::Repository;

/// How [`CrudService::delete`] removes a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeleteMode {
    /// Flag the record as deleted and keep it in storage.
    Soft,
    /// Remove the record from storage.
    #[default]
    Hard,
}

/// Counts from [`CrudService::upsert_by_key`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertSummary {
    /// Records that did not exist before.
    pub inserted: usize,
    /// Records that replaced an existing one.
    pub updated: usize,
}

impl UpsertSummary {
    /// Total records written.
    pub fn total(&self) -> usize {
        self.inserted + self.updated
    }
}

/// CRUD operations over one record type.
pub struct CrudService<R, Repo> {
    repository: Repo,
    registry: Option<Arc<FilterRegistry>>,
    default_ignore_case: Option<bool>,
    _record: PhantomData<fn() -> R>,
}

impl<R, Repo> CrudService<R, Repo>
where
    R: Record,
    Repo: Repository<R>,
{
    /// Create a service that resolves filters through the global registry.
    pub fn new(repository: Repo) -> Self {
        Self {
            repository,
            registry: None,
            default_ignore_case: None,
            _record: PhantomData,
        }
    }

    /// Resolve filters through a dedicated registry.
    pub fn with_registry(mut self, registry: Arc<FilterRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Case handling for text filters whose `FilterSpec` does not set it.
    pub fn default_ignore_case(mut self, ignore_case: bool) -> Self {
        self.default_ignore_case = Some(ignore_case);
        self
    }

    /// The underlying repository.
    pub fn repository(&self) -> &Repo {
        &self.repository
    }

    fn assembler(&self) -> FilterAssembler<'_> {
        let registry = self.registry.as_deref().unwrap_or_else(|| FilterRegistry::global());
        let assembler = FilterAssembler::new(registry);
        match self.default_ignore_case {
            Some(ignore_case) => assembler.default_ignore_case(ignore_case),
            None => assembler,
        }
    }

    /// The predicate a listing uses: the compiled request, minus
    /// soft-deleted records.
    pub fn predicate_for<Q>(&self, request: Option<&Q>) -> CrudResult<Predicate>
    where
        Q: FilterRequest + ?Sized,
    {
        let predicate = self.assembler().compile_for::<R, Q>(request)?;
        Ok(match live_predicate::<R>() {
            Some(live) => predicate.and_then(live),
            None => predicate,
        })
    }

    /// List records matching a filter request.
    pub async fn list<Q>(&self, request: Option<&Q>, pagination: &Pagination) -> CrudResult<Page<R>>
    where
        Q: FilterRequest + ?Sized,
    {
        let predicate = self.predicate_for(request)?;
        let total = self.repository.count(&predicate).await?;
        let items = self.repository.query(&predicate, pagination).await?;
        debug!(entity = R::entity_name(), total, returned = items.len(), "listed records");
        Ok(Page::new(items, total, pagination))
    }

    /// Count records matching a filter request.
    pub async fn count<Q>(&self, request: Option<&Q>) -> CrudResult<u64>
    where
        Q: FilterRequest + ?Sized,
    {
        let predicate = self.predicate_for(request)?;
        self.repository.count(&predicate).await
    }

    /// Fetch a record by key. Soft-deleted records are reported as not found.
    pub async fn get(&self, key: &R::Key) -> CrudResult<R> {
        let record = self.get_with_deleted(key).await?;
        if is_live(&record) {
            Ok(record)
        } else {
            Err(CrudError::not_found(R::entity_name(), key))
        }
    }

    /// Fetch a record by key, soft-deleted or not.
    pub async fn get_with_deleted(&self, key: &R::Key) -> CrudResult<R> {
        self.repository
            .find(key)
            .await?
            .ok_or_else(|| CrudError::not_found(R::entity_name(), key))
    }

    /// Insert the record if its key is new, otherwise replace the stored one.
    pub async fn save(&self, record: R) -> CrudResult<R> {
        let key = record.key();
        if self.repository.exists(&key).await? {
            debug!(entity = R::entity_name(), %key, "updating record");
            self.repository.update(record).await
        } else {
            debug!(entity = R::entity_name(), %key, "inserting record");
            self.repository.insert(record).await
        }
    }

    /// Delete a record.
    ///
    /// Soft-deleting an already deleted record fails with `NotFound`; a hard
    /// delete removes it either way.
    pub async fn delete(&self, key: &R::Key, mode: DeleteMode) -> CrudResult<()> {
        let mut record = self.get_with_deleted(key).await?;
        match mode {
            DeleteMode::Soft => {
                if R::soft_delete_field().is_none() {
                    return Err(CrudError::SoftDeleteUnsupported {
                        entity: R::entity_name().to_string(),
                    });
                }
                if !is_live(&record) {
                    return Err(CrudError::not_found(R::entity_name(), key));
                }
                record.mark_deleted()?;
                self.repository.update(record).await?;
            }
            DeleteMode::Hard => {
                if !self.repository.remove(key).await? {
                    return Err(CrudError::not_found(R::entity_name(), key));
                }
            }
        }
        debug!(entity = R::entity_name(), %key, ?mode, "deleted record");
        Ok(())
    }

    /// Insert or replace each record by key.
    ///
    /// A batch naming the same key twice is rejected before anything is written.
    pub async fn upsert_by_key(
        &self,
        records: impl IntoIterator<Item = R>,
    ) -> CrudResult<UpsertSummary> {
        let records: Vec<R> = records.into_iter().collect();
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            let key = record.key();
            if !seen.insert(key.clone()) {
                return Err(CrudError::validation(format!(
                    "duplicate {} key `{key}` in upsert batch",
                    R::entity_name()
                )));
            }
        }

        let mut summary = UpsertSummary::default();
        for record in records {
            if self.repository.exists(&record.key()).await? {
                self.repository.update(record).await?;
                summary.updated += 1;
            } else {
                self.repository.insert(record).await?;
                summary.inserted += 1;
            }
        }
        debug!(
            entity = R::entity_name(),
            inserted = summary.inserted,
            updated = summary.updated,
            "upserted records"
        );
        Ok(summary)
    }

    /// Save records in order, stopping at the first failure.
    pub async fn save_many(&self, records: impl IntoIterator<Item = R>) -> CrudResult<Vec<R>> {
        let mut saved = Vec::new();
        for record in records {
            saved.push(self.save(record).await?);
        }
        debug!(entity = R::entity_name(), saved = saved.len(), "saved batch");
        Ok(saved)
    }
}

/// `deleted = false` for records that support soft delete.
fn live_predicate<R: Record>() -> Option<Predicate> {
    R::soft_delete_field().map(|flag| Predicate::Equals(flag.into(), FilterValue::Bool(false)))
}

fn is_live<R: Record>(record: &R) -> bool {
    live_predicate::<R>().is_none_or(|live| live.matches(record))
}
