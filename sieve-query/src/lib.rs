//! # sieve-query
//!
//! Declarative filter construction for CRUD services.
//!
//! A filter request declares which of its fields map to which filter
//! operator. The [`FilterAssembler`] turns a populated request into
//! operators; each operator coerces its raw value against the target
//! field's declared type and builds a [`Predicate`], which a data-access
//! layer evaluates in memory or renders to SQL.
//!
//! ## Filter Operators
//!
//! | Operator | Input | Field types |
//! |----------|-------|-------------|
//! | `Equals`, `NotEquals` | value | any |
//! | `GreaterThan`, `LessThan` | value | int, float, decimal, timestamp, enum |
//! | `Range` | start and/or end | any |
//! | `Contains`, `StartsWith`, `EndsWith` | string | text |
//! | `In`, `NotIn` | list | any |
//!
//! New kinds are added through [`FilterRegistry::register`].
//!
//! ## Example
//!
//! ```rust
//! use sieve_query::{
//!     entity, filter_request, FieldType, FilterAssembler, FilterRegistry, RangeBounds,
//! };
//!
//! #[derive(Clone)]
//! struct Person {
//!     name: String,
//!     age: i64,
//! }
//!
//! entity!(Person {
//!     name: FieldType::Text,
//!     age: FieldType::Int,
//! });
//!
//! struct PersonSearch {
//!     age: Option<RangeBounds>,
//!     name: Option<String>,
//! }
//!
//! filter_request!(PersonSearch {
//!     age => "Range",
//!     name => "Contains",
//! });
//!
//! let people = vec![
//!     Person { name: "John".into(), age: 25 },
//!     Person { name: "Amy".into(), age: 40 },
//!     Person { name: "Joanna".into(), age: 17 },
//! ];
//! let search = PersonSearch {
//!     age: Some(RangeBounds::between(18, 30)),
//!     name: Some("jo".into()),
//! };
//!
//! let registry = FilterRegistry::new();
//! let predicate = FilterAssembler::new(&registry)
//!     .compile_for::<Person, _>(Some(&search))
//!     .unwrap();
//!
//! let matched: Vec<_> = people
//!     .iter()
//!     .filter(|p| predicate.matches(*p))
//!     .map(|p| p.name.as_str())
//!     .collect();
//! assert_eq!(matched, ["John"]);
//! ```
//!
//! ## Configuration
//!
//! Schemas, enums, operator aliases and request shapes can be loaded from a
//! `sieve.toml` file; see [`config`].

#[macro_use]
pub mod macros;

pub mod assembler;
pub mod coerce;
pub mod config;
pub mod error;
pub mod logging;
pub mod operator;
pub mod predicate;
pub mod registry;
pub mod request;
pub mod schema;
pub mod value;

pub use assembler::FilterAssembler;
pub use coerce::{coerce, coerce_each, is_assignable};
pub use config::{DebugConfig, FiltersConfig, SieveConfig};
pub use error::{FilterError, FilterResult};
pub use operator::{
    names, Comparison, FilterOperator, OperatorInput, OperatorShape, RangeOperator, ScalarOperator,
    SetOperator, TextMatch, TextOperator,
};
pub use predicate::{Predicate, TextPattern};
pub use registry::{FilterRegistry, OperatorFactory};
pub use request::{
    AsFieldInput, FieldInput, FilterRequest, FilterSpec, RangeBounds, RequestField, RequestShape,
    ShapedRequest,
};
pub use schema::{Entity, EntitySchema, Schema, TableSchema};
pub use value::{EnumType, EnumValue, FieldName, FieldType, FilterValue};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::assembler::FilterAssembler;
    pub use crate::error::{FilterError, FilterResult};
    pub use crate::operator::FilterOperator;
    pub use crate::predicate::Predicate;
    pub use crate::registry::FilterRegistry;
    pub use crate::request::{FilterRequest, FilterSpec, RangeBounds, ShapedRequest};
    pub use crate::schema::{Entity, Schema, TableSchema};
    pub use crate::value::{EnumType, EnumValue, FieldType, FilterValue};
    pub use crate::{entity, filter_request, predicate};
}
