//! Error types for CRUD services.

// These warnings are false positives - the fields are used by derive macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use sieve_query::FilterError;
use thiserror::Error;

/// Result type for CRUD operations.
pub type CrudResult<T> = Result<T, CrudError>;

/// Errors raised by services and repositories.
#[derive(Error, Debug, Diagnostic)]
pub enum CrudError {
    /// The filter request could not be turned into a predicate.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Filter(#[from] FilterError),

    /// No record has the key.
    #[error("{entity} with key `{key}` not found")]
    #[diagnostic(code(sieve::crud::not_found))]
    NotFound { entity: String, key: String },

    /// The data-access layer failed.
    #[error("repository error: {message}")]
    #[diagnostic(code(sieve::crud::repository))]
    Repository { message: String },

    /// A soft delete was requested for an entity without a deleted flag.
    #[error("{entity} does not support soft delete")]
    #[diagnostic(
        code(sieve::crud::soft_delete_unsupported),
        help(
            "implement Record::soft_delete_field and Record::mark_deleted, \
             or delete with DeleteMode::Hard"
        )
    )]
    SoftDeleteUnsupported { entity: String },

    /// The operation's input was invalid.
    #[error("invalid operation: {message}")]
    #[diagnostic(code(sieve::crud::validation))]
    Validation { message: String },
}

impl CrudError {
    /// A missing record.
    pub fn not_found(entity: impl Into<String>, key: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity: entity.into(),
            key: key.to_string(),
        }
    }

    /// A data-access failure.
    pub fn repository(message: impl Into<String>) -> Self {
        Self::Repository {
            message: message.into(),
        }
    }

    /// Invalid input.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this wraps a filter error.
    pub fn is_filter(&self) -> bool {
        matches!(self, Self::Filter(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = CrudError::not_found("User", 7);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "User with key `7` not found");

        let err: CrudError = FilterError::lookup("Fuzzy").into();
        assert!(err.is_filter());
        assert_eq!(err.to_string(), "unsupported filter type `Fuzzy`");
    }
}
