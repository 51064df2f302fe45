//! # Sieve
//!
//! Declarative filter assembly and CRUD services.
//!
//! A caller describes a search as a plain struct whose fields carry filter
//! metadata. Sieve resolves each populated field to a registered operator,
//! coerces its value to the target field's type, and combines the results
//! into a single [`Predicate`] that can be evaluated in memory or rendered
//! as a parameterized SQL `WHERE` clause.
//!
//! ## Crates
//!
//! - [`query`]: values, types, operators, the registry and the assembler.
//! - [`crud`]: records, repositories and the generic CRUD service.
//!
//! ## Quick start
//!
//! ```rust
//! use sieve::prelude::*;
//!
//! #[derive(Debug, Clone)]
//! struct Person {
//!     id: i64,
//!     name: String,
//!     age: i64,
//! }
//!
//! entity!(Person {
//!     id: FieldType::Int,
//!     name: FieldType::Text,
//!     age: FieldType::Int,
//! });
//!
//! impl Record for Person {
//!     type Key = i64;
//!     fn key(&self) -> i64 {
//!         self.id
//!     }
//! }
//!
//! #[derive(Default)]
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
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let service = CrudService::new(MemoryRepository::with_records([
//!     Person { id: 1, name: "John".into(), age: 25 },
//!     Person { id: 2, name: "Amy".into(), age: 40 },
//!     Person { id: 3, name: "Joanna".into(), age: 17 },
//! ]));
//!
//! let search = PersonSearch {
//!     age: Some(RangeBounds::between(18, 60)),
//!     name: Some("o".into()),
//! };
//! let page = service.list(Some(&search), &Pagination::new()).await.unwrap();
//! assert_eq!(page.items.len(), 1);
//! assert_eq!(page.items[0].name, "John");
//! # });
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]

/// Filter expressions: values, operators, registry and assembler.
pub mod query {
    pub use sieve_query::*;
}

/// CRUD services over pluggable repositories.
pub mod crud {
    pub use sieve_crud::*;
}

pub use sieve_crud::{
    CrudError, CrudResult, CrudService, MemoryRepository, Page, Pagination, Record, Repository,
};
pub use sieve_query::{
    FilterAssembler, FilterError, FilterRegistry, FilterRequest, FilterResult, FilterValue,
    Predicate, SieveConfig,
};
pub use sieve_query::{entity, filter_request, predicate};

/// Prelude for common imports.
pub mod prelude {
    pub use sieve_crud::{
        CrudError, CrudResult, CrudService, DeleteMode, MemoryRepository, Page, Pagination, Record,
        Repository,
    };
    pub use sieve_query::prelude::*;
    pub use sieve_query::SieveConfig;
}
