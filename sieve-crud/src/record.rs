//! Records managed by a CRUD service.

use std::fmt::{Debug, Display};
use std::hash::Hash;

use sieve_query::Entity;

use crate::error::{CrudError, CrudResult};

/// An entity with a primary key that a repository can store.
///
/// Soft delete is opt-in: a record that names a boolean "deleted" flag in
/// [`soft_delete_field`](Record::soft_delete_field) and sets it in
/// [`mark_deleted`](Record::mark_deleted) is hidden from listings instead of
/// being removed.
pub trait Record: Entity + Clone + Send + Sync + 'static {
    /// Primary key type.
    type Key: Clone + Eq + Hash + Debug + Display + Send + Sync + 'static;

    /// The record's primary key.
    fn key(&self) -> Self::Key;

    /// Name of the boolean field that flags the record as deleted.
    fn soft_delete_field() -> Option<&'static str> {
        None
    }

    /// Flag the record as deleted.
    fn mark_deleted(&mut self) -> CrudResult<()> {
        Err(CrudError::SoftDeleteUnsupported {
            entity: Self::entity_name().to_string(),
        })
    }
}
