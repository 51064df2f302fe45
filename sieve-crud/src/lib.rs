//! # sieve-crud
//!
//! Generic create/read/update/delete services whose listings are driven by
//! `sieve-query` filter requests.
//!
//! - [`Record`]: an entity with a primary key and optional soft delete.
//! - [`Repository`]: the async data-access collaborator, with an in-memory
//!   [`MemoryRepository`].
//! - [`CrudService`]: list/get/save/delete plus batch upsert and save.
//! - [`Pagination`] and [`Page`]: skip/take windows over listings.

pub mod error;
pub mod pagination;
pub mod record;
pub mod repository;
pub mod service;

pub use error::{CrudError, CrudResult};
pub use pagination::{Page, Pagination};
pub use record::Record;
pub use repository::{MemoryRepository, Repository};
pub use service::{CrudService, DeleteMode, UpsertSummary};
