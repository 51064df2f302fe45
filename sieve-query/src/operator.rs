//! Filter operators.
//!
//! An operator is a filter descriptor that knows how to compile itself: it
//! holds a target field and a payload, and [`FilterOperator::build`] coerces
//! the payload against the field's declared type and emits a [`Predicate`].
//!
//! Operators are created fresh by a [`crate::FilterRegistry`] factory for every
//! assembly pass and discarded once built.
//!
//! # Built-in operators
//!
//! | Name          | Shape  | Predicate                   |
//! |---------------|--------|-----------------------------|
//! | `Equals`      | scalar | `field = v`                 |
//! | `NotEquals`   | scalar | `field != v`                |
//! | `GreaterThan` | scalar | `field > v` (ordinal only)  |
//! | `LessThan`    | scalar | `field < v` (ordinal only)  |
//! | `Range`       | range  | `field >= start AND field <= end` |
//! | `Contains`    | text   | substring match             |
//! | `StartsWith`  | text   | prefix match                |
//! | `EndsWith`    | text   | suffix match                |
//! | `In`          | set    | `field IN (...)`            |
//! | `NotIn`       | set    | `field NOT IN (...)`        |
//!
//! ```rust
//! use sieve_query::{
//!     FieldType, FilterOperator, FilterValue, Predicate, ScalarOperator, TableSchema,
//! };
//!
//! let schema = TableSchema::new("users").field("age", FieldType::Int);
//! let op = ScalarOperator::greater_than("age", "21");
//!
//! let predicate = op.build(&schema).unwrap();
//! assert_eq!(predicate, Predicate::Gt("age".into(), FilterValue::Int(21)));
//! ```

use std::fmt;

use crate::coerce::{coerce, coerce_each};
use crate::error::{FilterError, FilterResult};
use crate::predicate::{Predicate, TextPattern};
use crate::schema::{Entity, EntitySchema, Schema};
use crate::value::{FieldName, FilterValue};

/// Names of the built-in operators.
pub mod names {
    /// `field = v`.
    pub const EQUALS: &str = "Equals";
    /// `field != v`.
    pub const NOT_EQUALS: &str = "NotEquals";
    /// `field > v`.
    pub const GREATER_THAN: &str = "GreaterThan";
    /// `field < v`.
    pub const LESS_THAN: &str = "LessThan";
    /// `start <= field <= end`.
    pub const RANGE: &str = "Range";
    /// Substring match.
    pub const CONTAINS: &str = "Contains";
    /// Prefix match.
    pub const STARTS_WITH: &str = "StartsWith";
    /// Suffix match.
    pub const ENDS_WITH: &str = "EndsWith";
    /// Set membership.
    pub const IN: &str = "In";
    /// Set exclusion.
    pub const NOT_IN: &str = "NotIn";

    /// All built-in operator names.
    pub const ALL: [&str; 10] = [
        EQUALS,
        NOT_EQUALS,
        GREATER_THAN,
        LESS_THAN,
        RANGE,
        CONTAINS,
        STARTS_WITH,
        ENDS_WITH,
        IN,
        NOT_IN,
    ];
}

/// The payload shape an operator accepts, used by the assembler to decide
/// how to hand a request value over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorShape {
    /// A single raw value, coerced at build time.
    Scalar,
    /// A start/end pair.
    Range,
    /// A string needle.
    Text,
    /// A list of values.
    Set,
}

/// Payload handed to [`FilterOperator::assign`].
#[derive(Debug, Clone, PartialEq)]
pub enum OperatorInput {
    /// A single value.
    Value(FilterValue),
    /// Range bounds; at least one is required at build time.
    Bounds {
        /// Inclusive lower bound.
        start: Option<FilterValue>,
        /// Inclusive upper bound.
        end: Option<FilterValue>,
    },
    /// A text needle; `ignore_case: None` keeps the operator's default.
    Text {
        /// The needle.
        value: String,
        /// Case handling override.
        ignore_case: Option<bool>,
    },
    /// A set of values.
    Values(Vec<FilterValue>),
}

/// A filter descriptor that can compile itself into a predicate.
pub trait FilterOperator: fmt::Debug + Send {
    /// The operator name this instance was registered under.
    fn kind(&self) -> &str;

    /// The payload shape this operator accepts.
    fn shape(&self) -> OperatorShape;

    /// The target field.
    fn field(&self) -> &str;

    /// Set the target field.
    fn set_field(&mut self, field: FieldName);

    /// Assign the payload.
    fn assign(&mut self, input: OperatorInput) -> FilterResult<()>;

    /// Compile into a predicate against the target's declared field types.
    fn build(&self, schema: &dyn Schema) -> FilterResult<Predicate>;
}

impl dyn FilterOperator {
    /// Compile against an entity type.
    pub fn build_for<E: Entity>(&self) -> FilterResult<Predicate> {
        self.build(&EntitySchema::<E>::new())
    }
}

fn wrong_input(kind: &str, input: &OperatorInput) -> FilterError {
    let got = match input {
        OperatorInput::Value(v) => v.kind(),
        OperatorInput::Bounds { .. } => "start/end pair",
        OperatorInput::Text { .. } => "text",
        OperatorInput::Values(_) => "list",
    };
    FilterError::validation(format!("`{kind}` filter cannot take a {got} value"))
}

// ============================================================================
// Scalar comparisons
// ============================================================================

/// The comparison a [`ScalarOperator`] performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    /// `field = v`.
    Equals,
    /// `field != v`.
    NotEquals,
    /// `field > v`.
    GreaterThan,
    /// `field < v`.
    LessThan,
}

impl Comparison {
    /// Registered operator name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Equals => names::EQUALS,
            Self::NotEquals => names::NOT_EQUALS,
            Self::GreaterThan => names::GREATER_THAN,
            Self::LessThan => names::LESS_THAN,
        }
    }

    /// Ordering comparisons only make sense on ordinal fields.
    fn requires_ordinal(self) -> bool {
        matches!(self, Self::GreaterThan | Self::LessThan)
    }
}

/// Equals, NotEquals, GreaterThan and LessThan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarOperator {
    comparison: Comparison,
    field: FieldName,
    value: Option<FilterValue>,
}

impl ScalarOperator {
    /// Create an unassigned operator.
    pub fn new(comparison: Comparison) -> Self {
        Self {
            comparison,
            field: FieldName::Borrowed(""),
            value: None,
        }
    }

    /// Create an assigned operator.
    pub fn with(
        comparison: Comparison,
        field: impl Into<FieldName>,
        value: impl Into<FilterValue>,
    ) -> Self {
        Self {
            comparison,
            field: field.into(),
            value: Some(value.into()),
        }
    }

    /// `field = value`.
    pub fn equals(field: impl Into<FieldName>, value: impl Into<FilterValue>) -> Self {
        Self::with(Comparison::Equals, field, value)
    }

    /// `field != value`.
    pub fn not_equals(field: impl Into<FieldName>, value: impl Into<FilterValue>) -> Self {
        Self::with(Comparison::NotEquals, field, value)
    }

    /// `field > value`.
    pub fn greater_than(field: impl Into<FieldName>, value: impl Into<FilterValue>) -> Self {
        Self::with(Comparison::GreaterThan, field, value)
    }

    /// `field < value`.
    pub fn less_than(field: impl Into<FieldName>, value: impl Into<FilterValue>) -> Self {
        Self::with(Comparison::LessThan, field, value)
    }

    /// The comparison performed.
    pub fn comparison(&self) -> Comparison {
        self.comparison
    }

    /// The assigned value.
    pub fn value(&self) -> Option<&FilterValue> {
        self.value.as_ref()
    }
}

impl FilterOperator for ScalarOperator {
    fn kind(&self) -> &str {
        self.comparison.name()
    }

    fn shape(&self) -> OperatorShape {
        OperatorShape::Scalar
    }

    fn field(&self) -> &str {
        &self.field
    }

    fn set_field(&mut self, field: FieldName) {
        self.field = field;
    }

    fn assign(&mut self, input: OperatorInput) -> FilterResult<()> {
        match input {
            OperatorInput::Value(v) => self.value = Some(v),
            OperatorInput::Text { value, .. } => self.value = Some(FilterValue::Text(value)),
            other => return Err(wrong_input(self.kind(), &other)),
        }
        Ok(())
    }

    fn build(&self, schema: &dyn Schema) -> FilterResult<Predicate> {
        let value = match &self.value {
            Some(v) if !v.is_null() => v,
            _ => {
                return Err(FilterError::validation(format!(
                    "`{}` filter on `{}` requires a value",
                    self.kind(),
                    self.field
                )));
            }
        };

        let field_type = schema.require_field(&self.field)?;
        if self.comparison.requires_ordinal() && !field_type.is_ordinal() {
            return Err(FilterError::validation(format!(
                "field `{}` must be a comparable type, found {}",
                self.field, field_type
            )));
        }

        let value = coerce(&field_type, value)?;
        let field = self.field.clone();
        Ok(match self.comparison {
            Comparison::Equals => Predicate::Equals(field, value),
            Comparison::NotEquals => Predicate::NotEquals(field, value),
            Comparison::GreaterThan => Predicate::Gt(field, value),
            Comparison::LessThan => Predicate::Lt(field, value),
        })
    }
}

// ============================================================================
// Range
// ============================================================================

/// Inclusive range over a field, with either bound optional.
///
/// Unlike `GreaterThan`/`LessThan`, no ordinal-type check is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeOperator {
    field: FieldName,
    start: Option<FilterValue>,
    end: Option<FilterValue>,
}

impl RangeOperator {
    /// Create an unassigned operator.
    pub fn new() -> Self {
        Self {
            field: FieldName::Borrowed(""),
            start: None,
            end: None,
        }
    }

    /// Create an assigned operator.
    pub fn between(
        field: impl Into<FieldName>,
        start: Option<FilterValue>,
        end: Option<FilterValue>,
    ) -> Self {
        Self {
            field: field.into(),
            start,
            end,
        }
    }
}

impl Default for RangeOperator {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterOperator for RangeOperator {
    fn kind(&self) -> &str {
        names::RANGE
    }

    fn shape(&self) -> OperatorShape {
        OperatorShape::Range
    }

    fn field(&self) -> &str {
        &self.field
    }

    fn set_field(&mut self, field: FieldName) {
        self.field = field;
    }

    fn assign(&mut self, input: OperatorInput) -> FilterResult<()> {
        match input {
            OperatorInput::Bounds { start, end } => {
                self.start = start;
                self.end = end;
                Ok(())
            }
            other => Err(wrong_input(self.kind(), &other)),
        }
    }

    fn build(&self, schema: &dyn Schema) -> FilterResult<Predicate> {
        let start = self.start.as_ref().filter(|v| !v.is_null());
        let end = self.end.as_ref().filter(|v| !v.is_null());
        if start.is_none() && end.is_none() {
            return Err(FilterError::validation(format!(
                "`Range` filter on `{}` requires a start or an end value",
                self.field
            )));
        }

        let field_type = schema.require_field(&self.field)?;
        let mut bounds = Vec::with_capacity(2);
        if let Some(start) = start {
            bounds.push(Predicate::Gte(self.field.clone(), coerce(&field_type, start)?));
        }
        if let Some(end) = end {
            bounds.push(Predicate::Lte(self.field.clone(), coerce(&field_type, end)?));
        }
        Ok(Predicate::and(bounds))
    }
}

// ============================================================================
// Text matching
// ============================================================================

/// The match a [`TextOperator`] performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextMatch {
    /// Substring.
    Contains,
    /// Prefix.
    StartsWith,
    /// Suffix.
    EndsWith,
}

impl TextMatch {
    /// Registered operator name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Contains => names::CONTAINS,
            Self::StartsWith => names::STARTS_WITH,
            Self::EndsWith => names::ENDS_WITH,
        }
    }

    fn predicate(self, field: FieldName, pattern: TextPattern) -> Predicate {
        match self {
            Self::Contains => Predicate::Contains(field, pattern),
            Self::StartsWith => Predicate::StartsWith(field, pattern),
            Self::EndsWith => Predicate::EndsWith(field, pattern),
        }
    }
}

/// Contains, StartsWith and EndsWith over text fields.
///
/// Case is ignored by default. On optional fields the predicate checks for
/// null first, so an absent value never matches.
#[derive(Debug, Clone, PartialEq)]
pub struct TextOperator {
    matching: TextMatch,
    field: FieldName,
    value: Option<String>,
    ignore_case: bool,
}

impl TextOperator {
    /// Create an unassigned operator.
    pub fn new(matching: TextMatch) -> Self {
        Self {
            matching,
            field: FieldName::Borrowed(""),
            value: None,
            ignore_case: true,
        }
    }

    /// Create an assigned, case-insensitive operator.
    pub fn with(
        matching: TextMatch,
        field: impl Into<FieldName>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            matching,
            field: field.into(),
            value: Some(value.into()),
            ignore_case: true,
        }
    }

    /// Substring match.
    pub fn contains(field: impl Into<FieldName>, value: impl Into<String>) -> Self {
        Self::with(TextMatch::Contains, field, value)
    }

    /// Prefix match.
    pub fn starts_with(field: impl Into<FieldName>, value: impl Into<String>) -> Self {
        Self::with(TextMatch::StartsWith, field, value)
    }

    /// Suffix match.
    pub fn ends_with(field: impl Into<FieldName>, value: impl Into<String>) -> Self {
        Self::with(TextMatch::EndsWith, field, value)
    }

    /// Set case handling.
    pub fn ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    /// Whether case is ignored.
    pub fn is_case_insensitive(&self) -> bool {
        self.ignore_case
    }
}

impl FilterOperator for TextOperator {
    fn kind(&self) -> &str {
        self.matching.name()
    }

    fn shape(&self) -> OperatorShape {
        OperatorShape::Text
    }

    fn field(&self) -> &str {
        &self.field
    }

    fn set_field(&mut self, field: FieldName) {
        self.field = field;
    }

    fn assign(&mut self, input: OperatorInput) -> FilterResult<()> {
        match input {
            OperatorInput::Text { value, ignore_case } => {
                self.value = Some(value);
                if let Some(ignore_case) = ignore_case {
                    self.ignore_case = ignore_case;
                }
                Ok(())
            }
            OperatorInput::Value(FilterValue::Text(value)) => {
                self.value = Some(value);
                Ok(())
            }
            other => Err(wrong_input(self.kind(), &other)),
        }
    }

    fn build(&self, schema: &dyn Schema) -> FilterResult<Predicate> {
        let field_type = schema.require_field(&self.field)?;
        if !field_type.is_text() {
            return Err(FilterError::validation(format!(
                "`{}` filter requires a text field, `{}` is {}",
                self.kind(),
                self.field,
                field_type
            )));
        }

        let needle = match self.value.as_deref() {
            Some(v) if !v.is_empty() => v,
            _ => {
                return Err(FilterError::validation(format!(
                    "`{}` filter on `{}` requires a non-empty string",
                    self.kind(),
                    self.field
                )));
            }
        };

        let predicate = self
            .matching
            .predicate(self.field.clone(), TextPattern::new(needle, self.ignore_case));
        if field_type.is_optional() {
            Ok(Predicate::And(vec![Predicate::IsNotNull(self.field.clone()), predicate]))
        } else {
            Ok(predicate)
        }
    }
}

// ============================================================================
// Set membership
// ============================================================================

/// In and NotIn.
#[derive(Debug, Clone, PartialEq)]
pub struct SetOperator {
    negated: bool,
    field: FieldName,
    values: Vec<FilterValue>,
}

impl SetOperator {
    /// Create an unassigned `In` operator.
    pub fn member() -> Self {
        Self {
            negated: false,
            field: FieldName::Borrowed(""),
            values: Vec::new(),
        }
    }

    /// Create an unassigned `NotIn` operator.
    pub fn non_member() -> Self {
        Self {
            negated: true,
            ..Self::member()
        }
    }

    /// `field IN values`.
    pub fn is_in<T: Into<FilterValue>>(
        field: impl Into<FieldName>,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        Self {
            negated: false,
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// `field NOT IN values`.
    pub fn not_in<T: Into<FilterValue>>(
        field: impl Into<FieldName>,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        Self {
            negated: true,
            ..Self::is_in(field, values)
        }
    }

    /// The assigned values.
    pub fn values(&self) -> &[FilterValue] {
        &self.values
    }
}

impl FilterOperator for SetOperator {
    fn kind(&self) -> &str {
        if self.negated { names::NOT_IN } else { names::IN }
    }

    fn shape(&self) -> OperatorShape {
        OperatorShape::Set
    }

    fn field(&self) -> &str {
        &self.field
    }

    fn set_field(&mut self, field: FieldName) {
        self.field = field;
    }

    fn assign(&mut self, input: OperatorInput) -> FilterResult<()> {
        match input {
            OperatorInput::Values(values) | OperatorInput::Value(FilterValue::List(values)) => {
                self.values = values;
                Ok(())
            }
            other => Err(wrong_input(self.kind(), &other)),
        }
    }

    fn build(&self, schema: &dyn Schema) -> FilterResult<Predicate> {
        if self.values.iter().all(FilterValue::is_null) {
            return Err(FilterError::validation(format!(
                "`{}` filter on `{}` requires at least one value",
                self.kind(),
                self.field
            )));
        }

        let field_type = schema.require_field(&self.field)?;
        let values = coerce_each(field_type.unwrap_optional(), &self.values)?;
        let field = self.field.clone();
        Ok(if self.negated {
            Predicate::NotIn(field, values)
        } else {
            Predicate::In(field, values)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TableSchema;
    use crate::value::{EnumType, FieldType};
    use pretty_assertions::assert_eq;

    fn schema() -> TableSchema {
        TableSchema::new("users")
            .field("name", FieldType::Text)
            .field("nickname", FieldType::optional(FieldType::Text))
            .field("age", FieldType::Int)
            .field("score", FieldType::optional(FieldType::Float))
            .field(
                "status",
                FieldType::enumeration(EnumType::new("Status", [("Active", 0), ("Banned", 1)])),
            )
    }

    #[test]
    fn test_equals_coerces_value() {
        let p = ScalarOperator::equals("age", "42").build(&schema()).unwrap();
        assert_eq!(p, Predicate::Equals("age".into(), FilterValue::Int(42)));

        let p = ScalarOperator::not_equals("status", "banned").build(&schema()).unwrap();
        match p {
            Predicate::NotEquals(_, FilterValue::Enum(v)) => assert_eq!(v.discriminant, 1),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_scalar_requires_value() {
        let op = ScalarOperator::new(Comparison::Equals);
        assert!(op.build(&schema()).unwrap_err().is_validation());

        let op = ScalarOperator::equals("age", FilterValue::Null);
        assert!(op.build(&schema()).unwrap_err().is_validation());
    }

    #[test]
    fn test_unknown_field_is_an_error() {
        let err = ScalarOperator::equals("email", "x").build(&schema()).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("email"));
    }

    #[test]
    fn test_ordering_rejects_non_ordinal_fields() {
        let err = ScalarOperator::greater_than("name", "m").build(&schema()).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("comparable"));

        assert!(ScalarOperator::less_than("nickname", "m").build(&schema()).is_err());
        assert!(ScalarOperator::greater_than("score", 1).build(&schema()).is_ok());
        assert!(ScalarOperator::less_than("status", "Banned").build(&schema()).is_ok());
    }

    #[test]
    fn test_range_bounds() {
        let lower = RangeOperator::between("age", Some(18.into()), None).build(&schema()).unwrap();
        assert_eq!(lower, Predicate::Gte("age".into(), FilterValue::Int(18)));

        let upper = RangeOperator::between("age", None, Some("30".into()))
            .build(&schema())
            .unwrap();
        assert_eq!(upper, Predicate::Lte("age".into(), FilterValue::Int(30)));

        let both = RangeOperator::between("age", Some(18.into()), Some(30.into()))
            .build(&schema())
            .unwrap();
        assert_eq!(
            both,
            Predicate::And(vec![
                Predicate::Gte("age".into(), FilterValue::Int(18)),
                Predicate::Lte("age".into(), FilterValue::Int(30)),
            ])
        );

        let err = RangeOperator::between("age", None, None).build(&schema()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_range_applies_no_ordinal_guard() {
        let names = RangeOperator::between("name", Some("a".into()), Some("m".into()));
        assert!(names.build(&schema()).is_ok());
    }

    #[test]
    fn test_text_operator_on_required_field() {
        let p = TextOperator::contains("name", "JO").build(&schema()).unwrap();
        assert_eq!(p, Predicate::Contains("name".into(), TextPattern::new("jo", true)));

        let p = TextOperator::ends_with("name", "Son").ignore_case(false).build(&schema()).unwrap();
        assert_eq!(p, Predicate::EndsWith("name".into(), TextPattern::new("Son", false)));
    }

    #[test]
    fn test_text_operator_on_optional_field_guards_null() {
        let p = TextOperator::starts_with("nickname", "j").build(&schema()).unwrap();
        assert_eq!(
            p,
            Predicate::And(vec![
                Predicate::IsNotNull("nickname".into()),
                Predicate::StartsWith("nickname".into(), TextPattern::new("j", true)),
            ])
        );
    }

    #[test]
    fn test_text_operator_validation() {
        assert!(TextOperator::contains("age", "1").build(&schema()).unwrap_err().is_validation());
        assert!(TextOperator::contains("name", "").build(&schema()).unwrap_err().is_validation());
        let mut op = TextOperator::new(TextMatch::Contains);
        assert!(op.assign(OperatorInput::Value(FilterValue::Int(1))).is_err());
    }

    #[test]
    fn test_set_operator_coerces_to_element_type() {
        let values = vec![FilterValue::Int(1), FilterValue::Null, "2.5".into()];
        let p = SetOperator::is_in("score", values)
            .build(&schema())
            .unwrap();
        assert_eq!(
            p,
            Predicate::In("score".into(), vec![FilterValue::Float(1.0), FilterValue::Float(2.5)])
        );

        let p = SetOperator::not_in("status", ["active"]).build(&schema()).unwrap();
        assert!(matches!(p, Predicate::NotIn(_, ref v) if v.len() == 1));
    }

    #[test]
    fn test_set_operator_failures() {
        let empty = SetOperator::is_in("age", Vec::<FilterValue>::new());
        assert!(empty.build(&schema()).unwrap_err().is_validation());

        let bad = SetOperator::not_in("age", ["1", "x"]);
        assert!(bad.build(&schema()).unwrap_err().is_conversion());
    }

    #[test]
    fn test_builds_are_deterministic() {
        let operators: Vec<Box<dyn FilterOperator>> = vec![
            Box::new(ScalarOperator::equals("age", 1)),
            Box::new(ScalarOperator::not_equals("age", 1)),
            Box::new(ScalarOperator::greater_than("age", 1)),
            Box::new(ScalarOperator::less_than("age", 1)),
            Box::new(RangeOperator::between("age", Some(1.into()), Some(2.into()))),
            Box::new(TextOperator::contains("name", "a")),
            Box::new(TextOperator::starts_with("name", "a")),
            Box::new(TextOperator::ends_with("name", "a")),
            Box::new(SetOperator::is_in("age", [1, 2])),
            Box::new(SetOperator::not_in("age", [1, 2])),
        ];
        let schema = schema();
        for op in &operators {
            assert_eq!(op.build(&schema).unwrap(), op.build(&schema).unwrap(), "{}", op.kind());
        }
    }

    #[test]
    fn test_kind_and_shape() {
        assert_eq!(ScalarOperator::new(Comparison::LessThan).kind(), "LessThan");
        assert_eq!(RangeOperator::new().shape(), OperatorShape::Range);
        assert_eq!(TextOperator::new(TextMatch::EndsWith).shape(), OperatorShape::Text);
        assert_eq!(SetOperator::non_member().kind(), "NotIn");
    }
}
