//! Predicate AST produced by filter operators.
//!
//! A [`Predicate`] is plain data: values inside it are already coerced to
//! the target field types. The query-execution side decides what to do with
//! it, either evaluating it in memory with [`Predicate::matches`] or
//! translating it to SQL with [`Predicate::to_sql`].
//!
//! ```rust
//! use sieve_query::{FilterValue, Predicate};
//!
//! let p = Predicate::and([
//!     Predicate::Gte("age".into(), FilterValue::Int(18)),
//!     Predicate::Lte("age".into(), FilterValue::Int(30)),
//! ]);
//!
//! let (sql, params) = p.to_sql(0);
//! assert_eq!(sql, "(age >= $1 AND age <= $2)");
//! assert_eq!(params.len(), 2);
//! ```

use std::cmp::Ordering;
use std::fmt::Write;

use crate::schema::Entity;
use crate::value::{FieldName, FilterValue};

/// Needle of a text predicate.
///
/// When `ignore_case` is set the needle is stored lowercased and the field
/// value is lowercased before matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPattern {
    /// Needle to look for.
    pub needle: String,
    /// Compare case-insensitively.
    pub ignore_case: bool,
}

impl TextPattern {
    /// Create a pattern, normalizing the needle when ignoring case.
    pub fn new(needle: impl Into<String>, ignore_case: bool) -> Self {
        let needle = needle.into();
        Self {
            needle: if ignore_case { needle.to_lowercase() } else { needle },
            ignore_case,
        }
    }

    fn haystack<'a>(&self, value: &'a str) -> std::borrow::Cow<'a, str> {
        if self.ignore_case {
            value.to_lowercase().into()
        } else {
            value.into()
        }
    }
}

/// A boolean condition over one entity.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Predicate {
    /// Matches everything.
    #[default]
    Always,

    /// Equals comparison.
    Equals(FieldName, FilterValue),
    /// Not equals comparison.
    NotEquals(FieldName, FilterValue),

    /// Less than comparison.
    Lt(FieldName, FilterValue),
    /// Less than or equal comparison.
    Lte(FieldName, FilterValue),
    /// Greater than comparison.
    Gt(FieldName, FilterValue),
    /// Greater than or equal comparison.
    Gte(FieldName, FilterValue),

    /// In a set of values.
    In(FieldName, Vec<FilterValue>),
    /// Not in a set of values.
    NotIn(FieldName, Vec<FilterValue>),

    /// Text contains the needle.
    Contains(FieldName, TextPattern),
    /// Text starts with the needle.
    StartsWith(FieldName, TextPattern),
    /// Text ends with the needle.
    EndsWith(FieldName, TextPattern),

    /// Field is null.
    IsNull(FieldName),
    /// Field is not null.
    IsNotNull(FieldName),

    /// Logical AND, evaluated left to right with short-circuit.
    And(Vec<Predicate>),
    /// Logical OR.
    Or(Vec<Predicate>),
    /// Logical NOT.
    Not(Box<Predicate>),
}

impl Predicate {
    /// Check if this predicate matches everything.
    pub fn is_always(&self) -> bool {
        matches!(self, Self::Always)
    }

    /// Combine predicates with AND, dropping `Always` terms.
    pub fn and(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        let mut predicates: Vec<_> = predicates.into_iter().filter(|p| !p.is_always()).collect();
        match predicates.len() {
            0 => Self::Always,
            1 => predicates.remove(0),
            _ => Self::And(predicates),
        }
    }

    /// Combine predicates with OR.
    ///
    /// An `Always` term makes the whole disjunction `Always`.
    pub fn or(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        let mut predicates: Vec<_> = predicates.into_iter().collect();
        if predicates.is_empty() || predicates.iter().any(Predicate::is_always) {
            return Self::Always;
        }
        match predicates.len() {
            1 => predicates.remove(0),
            _ => Self::Or(predicates),
        }
    }

    /// Negate a predicate.
    #[allow(clippy::should_implement_trait)]
    pub fn not(predicate: Predicate) -> Self {
        Self::Not(Box::new(predicate))
    }

    /// Combine with another predicate using AND.
    pub fn and_then(self, other: Predicate) -> Self {
        if self.is_always() {
            return other;
        }
        if other.is_always() {
            return self;
        }
        match self {
            Self::And(mut predicates) => {
                predicates.push(other);
                Self::And(predicates)
            }
            _ => Self::And(vec![self, other]),
        }
    }

    /// Evaluate against an entity.
    ///
    /// Fields the entity does not expose read as null.
    pub fn matches<E: Entity + ?Sized>(&self, entity: &E) -> bool {
        let value = |field: &str| entity.field_value(field).unwrap_or(FilterValue::Null);

        match self {
            Self::Always => true,

            Self::Equals(field, expected) => equals(&value(field), expected),
            Self::NotEquals(field, expected) => !equals(&value(field), expected),

            Self::Lt(field, bound) => ordering(&value(field), bound) == Some(Ordering::Less),
            Self::Lte(field, bound) => {
                matches!(ordering(&value(field), bound), Some(Ordering::Less | Ordering::Equal))
            }
            Self::Gt(field, bound) => ordering(&value(field), bound) == Some(Ordering::Greater),
            Self::Gte(field, bound) => {
                matches!(ordering(&value(field), bound), Some(Ordering::Greater | Ordering::Equal))
            }

            Self::In(field, set) => {
                let actual = value(field);
                set.iter().any(|v| actual.matches(v))
            }
            Self::NotIn(field, set) => {
                let actual = value(field);
                !set.iter().any(|v| actual.matches(v))
            }

            Self::Contains(field, pattern) => {
                text_match(&value(field), pattern, |hay, needle| hay.contains(needle))
            }
            Self::StartsWith(field, pattern) => {
                text_match(&value(field), pattern, |hay, needle| hay.starts_with(needle))
            }
            Self::EndsWith(field, pattern) => {
                text_match(&value(field), pattern, |hay, needle| hay.ends_with(needle))
            }

            Self::IsNull(field) => value(field).is_null(),
            Self::IsNotNull(field) => !value(field).is_null(),

            Self::And(predicates) => predicates.iter().all(|p| p.matches(entity)),
            Self::Or(predicates) => predicates.iter().any(|p| p.matches(entity)),
            Self::Not(predicate) => !predicate.matches(entity),
        }
    }

    /// Generate SQL for this predicate with `$n` parameter placeholders.
    ///
    /// Placeholders are numbered from `param_offset + 1`. Returns the SQL and
    /// the values to bind, in placeholder order.
    pub fn to_sql(&self, param_offset: usize) -> (String, Vec<FilterValue>) {
        let mut sql = String::with_capacity(64);
        let mut params = Vec::new();
        self.write_sql(&mut sql, param_offset, &mut params);
        (sql, params)
    }

    fn write_sql(&self, buf: &mut String, offset: usize, params: &mut Vec<FilterValue>) {
        let mut bind = |buf: &mut String, value: FilterValue| {
            params.push(value);
            let _ = write!(buf, "${}", offset + params.len());
        };

        match self {
            Self::Always => buf.push_str("TRUE"),

            Self::Equals(col, val) if val.is_null() => {
                let _ = write!(buf, "{col} IS NULL");
            }
            Self::NotEquals(col, val) if val.is_null() => {
                let _ = write!(buf, "{col} IS NOT NULL");
            }
            Self::Equals(col, val)
            | Self::NotEquals(col, val)
            | Self::Lt(col, val)
            | Self::Lte(col, val)
            | Self::Gt(col, val)
            | Self::Gte(col, val) => {
                let op = match self {
                    Self::Equals(..) => "=",
                    Self::NotEquals(..) => "!=",
                    Self::Lt(..) => "<",
                    Self::Lte(..) => "<=",
                    Self::Gt(..) => ">",
                    _ => ">=",
                };
                let _ = write!(buf, "{col} {op} ");
                bind(buf, val.clone());
            }

            Self::In(_, values) if values.is_empty() => buf.push_str("FALSE"),
            Self::NotIn(_, values) if values.is_empty() => buf.push_str("TRUE"),
            Self::In(col, values) | Self::NotIn(col, values) => {
                let keyword = if matches!(self, Self::In(..)) { "IN" } else { "NOT IN" };
                let _ = write!(buf, "{col} {keyword} (");
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        buf.push_str(", ");
                    }
                    bind(buf, value.clone());
                }
                buf.push(')');
            }

            Self::Contains(col, pattern)
            | Self::StartsWith(col, pattern)
            | Self::EndsWith(col, pattern) => {
                let escaped = escape_like(&pattern.needle);
                let like = match self {
                    Self::Contains(..) => format!("%{escaped}%"),
                    Self::StartsWith(..) => format!("{escaped}%"),
                    _ => format!("%{escaped}"),
                };
                if pattern.ignore_case {
                    let _ = write!(buf, "LOWER({col}) LIKE ");
                } else {
                    let _ = write!(buf, "{col} LIKE ");
                }
                bind(buf, FilterValue::Text(like));
            }

            Self::IsNull(col) => {
                let _ = write!(buf, "{col} IS NULL");
            }
            Self::IsNotNull(col) => {
                let _ = write!(buf, "{col} IS NOT NULL");
            }

            Self::And(predicates) | Self::Or(predicates) => {
                let (joiner, empty) = if matches!(self, Self::And(_)) {
                    (" AND ", "TRUE")
                } else {
                    (" OR ", "FALSE")
                };
                if predicates.is_empty() {
                    buf.push_str(empty);
                    return;
                }
                buf.push('(');
                for (i, predicate) in predicates.iter().enumerate() {
                    if i > 0 {
                        buf.push_str(joiner);
                    }
                    predicate.write_sql(buf, offset, params);
                }
                buf.push(')');
            }
            Self::Not(predicate) => {
                buf.push_str("NOT (");
                predicate.write_sql(buf, offset, params);
                buf.push(')');
            }
        }
    }
}

fn equals(actual: &FilterValue, expected: &FilterValue) -> bool {
    if expected.is_null() {
        actual.is_null()
    } else {
        actual.matches(expected)
    }
}

fn ordering(actual: &FilterValue, bound: &FilterValue) -> Option<Ordering> {
    actual.compare(bound)
}

fn text_match(
    actual: &FilterValue,
    pattern: &TextPattern,
    test: impl Fn(&str, &str) -> bool,
) -> bool {
    match actual.as_text() {
        Some(text) => test(&pattern.haystack(text), &pattern.needle),
        None => false,
    }
}

fn escape_like(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
