//! Operator registry.
//!
//! Maps operator names to factories that create fresh, unassigned
//! operators. Lookups are case-insensitive. The ten built-in operators are
//! registered at construction; callers add their own kinds with
//! [`FilterRegistry::register`].
//!
//! ```rust
//! use sieve_query::{FilterRegistry, ScalarOperator, Comparison};
//!
//! let registry = FilterRegistry::new();
//! assert!(registry.contains("equals"));
//!
//! registry.register("Is", || Box::new(ScalarOperator::new(Comparison::Equals))).unwrap();
//! let op = registry.create("is").unwrap();
//! assert_eq!(op.kind(), "Equals");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::{FilterError, FilterResult};
use crate::operator::{
    names, Comparison, FilterOperator, RangeOperator, ScalarOperator, SetOperator, TextMatch,
    TextOperator,
};

/// Creates a fresh operator instance.
pub type OperatorFactory = Arc<dyn Fn() -> Box<dyn FilterOperator> + Send + Sync>;

fn builtin<F>(factory: F) -> OperatorFactory
where
    F: Fn() -> Box<dyn FilterOperator> + Send + Sync + 'static,
{
    Arc::new(factory)
}

fn scalar(comparison: Comparison) -> Box<dyn FilterOperator> {
    Box::new(ScalarOperator::new(comparison))
}

fn text(matching: TextMatch) -> Box<dyn FilterOperator> {
    Box::new(TextOperator::new(matching))
}

struct Entry {
    name: String,
    factory: OperatorFactory,
}

/// Thread-safe name-to-factory registry.
pub struct FilterRegistry {
    entries: RwLock<HashMap<String, Entry>>,
}

impl FilterRegistry {
    /// Create a registry with the built-in operators.
    pub fn new() -> Self {
        let registry = Self::empty();
        {
            let mut entries = registry.entries.write();
            let builtins: [(&str, OperatorFactory); 10] = [
                (names::EQUALS, builtin(|| scalar(Comparison::Equals))),
                (names::NOT_EQUALS, builtin(|| scalar(Comparison::NotEquals))),
                (names::GREATER_THAN, builtin(|| scalar(Comparison::GreaterThan))),
                (names::LESS_THAN, builtin(|| scalar(Comparison::LessThan))),
                (names::RANGE, builtin(|| Box::new(RangeOperator::new()))),
                (names::CONTAINS, builtin(|| text(TextMatch::Contains))),
                (names::STARTS_WITH, builtin(|| text(TextMatch::StartsWith))),
                (names::ENDS_WITH, builtin(|| text(TextMatch::EndsWith))),
                (names::IN, builtin(|| Box::new(SetOperator::member()))),
                (names::NOT_IN, builtin(|| Box::new(SetOperator::non_member()))),
            ];
            for (name, factory) in builtins {
                entries.insert(
                    name.to_lowercase(),
                    Entry {
                        name: name.to_string(),
                        factory,
                    },
                );
            }
        }
        registry
    }

    /// Create a registry with no operators.
    pub fn empty() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide registry, created with the built-ins on first use.
    pub fn global() -> &'static FilterRegistry {
        static GLOBAL: OnceLock<FilterRegistry> = OnceLock::new();
        GLOBAL.get_or_init(FilterRegistry::new)
    }

    /// Register an operator kind, replacing any kind with the same name.
    pub fn register<F>(&self, name: &str, factory: F) -> FilterResult<()>
    where
        F: Fn() -> Box<dyn FilterOperator> + Send + Sync + 'static,
    {
        self.register_factory(name, Arc::new(factory))
    }

    /// Register a shared factory.
    pub fn register_factory(&self, name: &str, factory: OperatorFactory) -> FilterResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FilterError::validation("filter type name must not be empty"));
        }

        let previous = self.entries.write().insert(
            name.to_lowercase(),
            Entry {
                name: name.to_string(),
                factory,
            },
        );
        match previous {
            Some(old) => {
                warn!(filter = name, replaced = %old.name, "filter type registration replaced")
            }
            None => debug!(filter = name, "filter type registered"),
        }
        Ok(())
    }

    /// Make `alias` resolve to the factory currently registered as `target`.
    pub fn alias(&self, alias: &str, target: &str) -> FilterResult<()> {
        let factory = self.factory(target)?;
        self.register_factory(alias, factory)
    }

    /// Create a fresh operator of the named kind.
    pub fn create(&self, name: &str) -> FilterResult<Box<dyn FilterOperator>> {
        let factory = self.factory(name)?;
        Ok(factory())
    }

    fn factory(&self, name: &str) -> FilterResult<OperatorFactory> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FilterError::validation("filter type name must not be empty"));
        }
        self.entries
            .read()
            .get(&name.to_lowercase())
            .map(|e| Arc::clone(&e.factory))
            .ok_or_else(|| FilterError::lookup(name))
    }

    /// Check if a kind is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().contains_key(&name.trim().to_lowercase())
    }

    /// Registered names as given at registration, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.entries.read().values().map(|e| e.name.clone()).collect();
        names.sort();
        names
    }

    /// Number of registered kinds.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::OperatorShape;

    #[test]
    fn test_builtins_registered() {
        let registry = FilterRegistry::new();
        assert_eq!(registry.len(), 10);
        for name in names::ALL {
            let op = registry.create(name).unwrap();
            assert_eq!(op.kind(), name);
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = FilterRegistry::new();
        assert_eq!(registry.create("greaterthan").unwrap().kind(), "GreaterThan");
        assert_eq!(registry.create("NOTIN").unwrap().shape(), OperatorShape::Set);
        assert!(registry.contains(" range "));
    }

    #[test]
    fn test_unknown_and_blank_names() {
        let registry = FilterRegistry::new();

        let err = registry.create("Fuzzy").unwrap_err();
        assert!(err.is_lookup());
        assert!(err.to_string().contains("unsupported filter type"));

        assert!(registry.create("").unwrap_err().is_validation());
        let blank = registry.register("   ", || Box::new(RangeOperator::new()));
        assert!(blank.unwrap_err().is_validation());
    }

    #[test]
    fn test_custom_registration_and_overwrite() {
        let registry = FilterRegistry::empty();
        assert!(registry.is_empty());

        registry.register("Between", || Box::new(RangeOperator::new())).unwrap();
        assert_eq!(registry.create("between").unwrap().kind(), "Range");

        registry.register("BETWEEN", || Box::new(SetOperator::member())).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.create("Between").unwrap().kind(), "In");
        assert_eq!(registry.names(), ["BETWEEN"]);
    }

    #[test]
    fn test_alias() {
        let registry = FilterRegistry::new();
        registry.alias("eq", "Equals").unwrap();
        assert_eq!(registry.create("EQ").unwrap().kind(), "Equals");
        assert!(registry.alias("x", "Nope").unwrap_err().is_lookup());
    }

    #[test]
    fn test_created_operators_are_fresh() {
        let registry = FilterRegistry::new();
        let mut a = registry.create("Equals").unwrap();
        a.set_field("age".into());
        let b = registry.create("Equals").unwrap();
        assert_eq!(b.field(), "");
    }

    #[test]
    fn test_concurrent_registration() {
        let registry = Arc::new(FilterRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    registry
                        .register(&format!("Custom{i}"), || Box::new(RangeOperator::new()))
                        .unwrap();
                    registry.create("Equals").unwrap().kind().to_string()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), "Equals");
        }
        assert_eq!(registry.len(), 18);
    }
}
