//! Error types for filter construction.
//!
//! Every failure in the filter core is a synchronous return-path error.
//! There are four kinds a caller has to care about:
//!
//! - [`FilterError::Validation`]: a structurally invalid request (missing
//!   value, wrong value shape, unsupported field type, empty operator name).
//! - [`FilterError::Conversion`]: a value could not be coerced to the target
//!   field's type.
//! - [`FilterError::Lookup`]: no operator is registered under a name.
//! - [`FilterError::Assembly`]: any of the above, raised while assembling a
//!   whole request, with the offending operator and field attached.
//!
//! ```rust
//! use sieve_query::FilterError;
//!
//! let err = FilterError::lookup("Between");
//! assert!(err.is_lookup());
//! assert_eq!(err.to_string(), "unsupported filter type `Between`");
//!
//! let wrapped = FilterError::assembly("Between", "age", err);
//! assert!(wrapped.root_cause().is_lookup());
//! ```

// These warnings are false positives - the fields are used by derive macros
#![allow(unused_assignments)]

use std::fmt::Display;

use miette::Diagnostic;
use thiserror::Error;

/// Result type for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors that can occur while coercing values, building predicates or
/// assembling filter requests.
#[derive(Error, Debug, Diagnostic)]
pub enum FilterError {
    /// The caller supplied a structurally invalid filter.
    #[error("invalid filter: {message}")]
    #[diagnostic(code(sieve::filter::validation))]
    Validation { message: String },

    /// A value could not be converted to the target field's type.
    #[error("cannot convert `{value}` to {target}: {reason}")]
    #[diagnostic(code(sieve::filter::conversion))]
    Conversion {
        value: String,
        target: String,
        reason: String,
    },

    /// No operator factory is registered under the name.
    #[error("unsupported filter type `{name}`")]
    #[diagnostic(
        code(sieve::filter::lookup),
        help("register the operator with FilterRegistry::register before assembling")
    )]
    Lookup { name: String },

    /// Assembling a filter request failed on one of its fields.
    #[error("failed to assemble `{operator}` filter on `{field}`")]
    #[diagnostic(code(sieve::filter::assembly))]
    Assembly {
        operator: String,
        field: String,
        #[source]
        source: Box<FilterError>,
    },

    /// Error reading a configuration file.
    #[error("failed to read file: {path}")]
    #[diagnostic(code(sieve::config::io_error))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse TOML")]
    #[diagnostic(code(sieve::config::toml_error))]
    Toml {
        #[source]
        source: toml::de::Error,
    },

    /// Configuration is well-formed TOML but semantically invalid.
    #[error("configuration error: {message}")]
    #[diagnostic(code(sieve::config::invalid))]
    Config { message: String },
}

impl FilterError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a conversion error for `value` and the `target` type.
    pub fn conversion(
        value: impl Display,
        target: impl Display,
        reason: impl Into<String>,
    ) -> Self {
        Self::Conversion {
            value: value.to_string(),
            target: target.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a lookup error for an unregistered operator name.
    pub fn lookup(name: impl Into<String>) -> Self {
        Self::Lookup { name: name.into() }
    }

    /// Wrap an error with the operator and field it was raised for.
    pub fn assembly(
        operator: impl Into<String>,
        field: impl Into<String>,
        source: FilterError,
    ) -> Self {
        Self::Assembly {
            operator: operator.into(),
            field: field.into(),
            source: Box::new(source),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// The innermost error, looking through assembly wrappers.
    pub fn root_cause(&self) -> &FilterError {
        match self {
            Self::Assembly { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Check if the root cause is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self.root_cause(), Self::Validation { .. })
    }

    /// Check if the root cause is a conversion error.
    pub fn is_conversion(&self) -> bool {
        matches!(self.root_cause(), Self::Conversion { .. })
    }

    /// Check if the root cause is a lookup error.
    pub fn is_lookup(&self) -> bool {
        matches!(self.root_cause(), Self::Lookup { .. })
    }

    /// Check if this error was raised during request assembly.
    pub fn is_assembly(&self) -> bool {
        matches!(self, Self::Assembly { .. })
    }
}
