//! Entity and schema descriptions.
//!
//! Operators never inspect entities through reflection. They ask a
//! [`Schema`] for the declared type of a field when building, and predicates
//! ask an [`Entity`] for the current value of a field when evaluating.
//!
//! ```rust
//! use sieve_query::{entity, Entity, FieldType, FilterValue};
//!
//! #[derive(Clone)]
//! struct Person {
//!     name: String,
//!     age: i64,
//!     nickname: Option<String>,
//! }
//!
//! entity!(Person {
//!     name: FieldType::Text,
//!     age: FieldType::Int,
//!     nickname: FieldType::optional(FieldType::Text),
//! });
//!
//! let p = Person { name: "Ann".into(), age: 31, nickname: None };
//! assert_eq!(Person::entity_name(), "Person");
//! assert_eq!(p.field_value("age"), Some(FilterValue::Int(31)));
//! assert_eq!(p.field_value("nickname"), Some(FilterValue::Null));
//! assert!(Person::field_type("email").is_none());
//! ```

use std::fmt;
use std::marker::PhantomData;

use indexmap::IndexMap;

use crate::error::{FilterError, FilterResult};
use crate::value::{FieldType, FilterValue};

/// Declared field types of a filter target.
pub trait Schema {
    /// Name of the target, used in diagnostics.
    fn name(&self) -> &str;

    /// The declared type of `field`, or `None` if there is no such field.
    fn field_type(&self, field: &str) -> Option<FieldType>;

    /// The declared type of `field`, failing if it does not exist.
    fn require_field(&self, field: &str) -> FilterResult<FieldType> {
        if field.trim().is_empty() {
            return Err(FilterError::validation("filter field name must not be empty"));
        }
        self.field_type(field).ok_or_else(|| {
            FilterError::validation(format!("`{}` has no field named `{field}`", self.name()))
        })
    }
}

/// A type whose values predicates can be evaluated against.
pub trait Entity {
    /// Name of the entity.
    fn entity_name() -> &'static str;

    /// The declared type of `field`.
    fn field_type(field: &str) -> Option<FieldType>;

    /// The current value of `field`, or `None` if there is no such field.
    fn field_value(&self, field: &str) -> Option<FilterValue>;
}

/// [`Schema`] view of an [`Entity`] type.
pub struct EntitySchema<E>(PhantomData<fn() -> E>);

impl<E: Entity> EntitySchema<E> {
    /// Create the schema view.
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<E: Entity> Default for EntitySchema<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> fmt::Debug for EntitySchema<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EntitySchema").field(&E::entity_name()).finish()
    }
}

impl<E: Entity> Schema for EntitySchema<E> {
    fn name(&self) -> &str {
        E::entity_name()
    }

    fn field_type(&self, field: &str) -> Option<FieldType> {
        E::field_type(field)
    }
}

/// A schema assembled at runtime, typically from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    name: String,
    fields: IndexMap<String, FieldType>,
}

impl TableSchema {
    /// Create an empty schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Add a field.
    pub fn field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.insert(name.into(), ty);
        self
    }

    /// Add a field in place.
    pub fn insert(&mut self, name: impl Into<String>, ty: FieldType) {
        self.fields.insert(name.into(), ty);
    }

    /// Iterate over declared fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldType)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if no fields are declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Schema for TableSchema {
    fn name(&self) -> &str {
        &self.name
    }

    fn field_type(&self, field: &str) -> Option<FieldType> {
        self.fields.get(field).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe {
        score: i64,
    }

    impl Entity for Probe {
        fn entity_name() -> &'static str {
            "Probe"
        }

        fn field_type(field: &str) -> Option<FieldType> {
            (field == "score").then_some(FieldType::Int)
        }

        fn field_value(&self, field: &str) -> Option<FilterValue> {
            (field == "score").then(|| FilterValue::Int(self.score))
        }
    }

    #[test]
    fn test_entity_schema_delegates() {
        let schema = EntitySchema::<Probe>::new();
        assert_eq!(schema.name(), "Probe");
        assert_eq!(schema.field_type("score"), Some(FieldType::Int));
        assert_eq!(Probe { score: 3 }.field_value("score"), Some(FilterValue::Int(3)));
    }

    #[test]
    fn test_require_field() {
        let schema = EntitySchema::<Probe>::new();
        assert!(schema.require_field("score").is_ok());

        let err = schema.require_field("rank").unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("rank"));

        assert!(schema.require_field("  ").unwrap_err().is_validation());
    }

    #[test]
    fn test_table_schema_keeps_declaration_order() {
        let schema = TableSchema::new("users")
            .field("name", FieldType::Text)
            .field("age", FieldType::Int);

        let names: Vec<_> = schema.fields().map(|(n, _)| n).collect();
        assert_eq!(names, ["name", "age"]);
        assert_eq!(schema.field_type("age"), Some(FieldType::Int));
        assert!(schema.field_type("email").is_none());
    }
}
