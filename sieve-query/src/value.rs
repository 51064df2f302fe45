//! Filter values and field types.
//!
//! [`FilterValue`] is the loosely-typed input side: whatever a request
//! carries (text from a query string, numbers from JSON, lists for `In`).
//! [`FieldType`] is the statically declared type of an entity field that a
//! value must be coerced to before it can take part in a predicate.
//!
//! ```rust
//! use sieve_query::{FieldType, FilterValue};
//!
//! let val: FilterValue = 42.into();
//! assert!(matches!(val, FilterValue::Int(42)));
//!
//! let val: FilterValue = "hello".into();
//! assert!(matches!(val, FilterValue::Text(_)));
//!
//! let val: FilterValue = None::<i32>.into();
//! assert!(val.is_null());
//!
//! let ty = FieldType::optional(FieldType::Text);
//! assert_eq!(ty.to_string(), "text?");
//! assert!(ty.unwrap_optional().is_text());
//! ```

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FilterError, FilterResult};

/// Field name type, borrowed for static names and owned for dynamic ones.
pub type FieldName = Cow<'static, str>;

/// A filter value that can be used in comparisons.
///
/// Variant order matters for untagged deserialization: plain JSON input
/// lands in `Null`, `Bool`, `Int`, `Float`, `Text` or `List`, and is
/// coerced to the richer variants against a field type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// List of values.
    List(Vec<FilterValue>),
    /// Exact decimal value.
    Decimal(Decimal),
    /// UTC timestamp.
    Timestamp(DateTime<Utc>),
    /// UUID value.
    Uuid(Uuid),
    /// Enumeration member.
    Enum(EnumValue),
}

impl FilterValue {
    /// Check if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow the text if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the value's kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::List(_) => "list",
            Self::Decimal(_) => "decimal",
            Self::Timestamp(_) => "timestamp",
            Self::Uuid(_) => "uuid",
            Self::Enum(_) => "enum",
        }
    }

    /// Compare two values of compatible kinds.
    ///
    /// Numeric kinds compare across `Int`, `Float` and `Decimal`; enum members
    /// compare by discriminant. Returns `None` for nulls, lists and
    /// incompatible kinds.
    pub fn compare(&self, other: &FilterValue) -> Option<Ordering> {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Int(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            (Self::Float(a), Self::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Self::Decimal(a), Self::Decimal(b)) => Some(a.cmp(b)),
            (Self::Decimal(a), Self::Int(b)) => Some(a.cmp(&Decimal::from(*b))),
            (Self::Int(a), Self::Decimal(b)) => Some(Decimal::from(*a).cmp(b)),
            (Self::Decimal(a), Self::Float(b)) => Decimal::try_from(*b).ok().map(|b| a.cmp(&b)),
            (Self::Float(a), Self::Decimal(b)) => Decimal::try_from(*a).ok().map(|a| a.cmp(b)),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Timestamp(a), Self::Timestamp(b)) => Some(a.cmp(b)),
            (Self::Uuid(a), Self::Uuid(b)) => Some(a.cmp(b)),
            (Self::Enum(a), Self::Enum(b)) => Some(a.discriminant.cmp(&b.discriminant)),
            _ => None,
        }
    }

    /// Check two values for equality under [`FilterValue::compare`].
    pub fn matches(&self, other: &FilterValue) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }

    /// Convert a JSON value into a filter value.
    ///
    /// Objects have no scalar meaning and are rejected.
    pub fn from_json(value: &serde_json::Value) -> FilterResult<Self> {
        use serde_json::Value;

        Ok(match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => match n.as_f64() {
                    Some(f) => Self::Float(f),
                    None => {
                        return Err(FilterError::validation(format!("unsupported number `{n}`")));
                    }
                },
            },
            Value::String(s) => Self::Text(s.clone()),
            Value::Array(items) => {
                Self::List(items.iter().map(Self::from_json).collect::<FilterResult<_>>()?)
            }
            Value::Object(_) => {
                return Err(FilterError::validation("objects cannot be used as filter values"));
            }
        })
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Timestamp(t) => f.write_str(&t.to_rfc3339()),
            Self::Uuid(u) => write!(f, "{u}"),
            Self::Enum(e) => f.write_str(&e.variant),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

macro_rules! filter_value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for FilterValue {
                fn from(v: $ty) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

filter_value_from! {
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Int,
    u16 => Int,
    u32 => Int,
    f32 => Float,
    f64 => Float,
    String => Text,
    Decimal => Decimal,
    DateTime<Utc> => Timestamp,
    Uuid => Uuid,
    EnumValue => Enum,
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl<T: Into<FilterValue>> From<Vec<T>> for FilterValue {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

/// A member of an enumeration, carrying both its name and discriminant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumValue {
    /// Name of the enumeration.
    pub enum_name: String,
    /// Member name.
    pub variant: String,
    /// Underlying integral value.
    pub discriminant: i64,
}

impl EnumValue {
    /// Create an enum member value.
    pub fn new(
        enum_name: impl Into<String>,
        variant: impl Into<String>,
        discriminant: i64,
    ) -> Self {
        Self {
            enum_name: enum_name.into(),
            variant: variant.into(),
            discriminant,
        }
    }
}

/// Declaration of an enumeration: its name and `(member, discriminant)` pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    name: String,
    variants: Vec<(String, i64)>,
}

impl EnumType {
    /// Declare an enumeration.
    pub fn new<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            variants: variants.into_iter().map(|(n, d)| (n.into(), d)).collect(),
        }
    }

    /// Name of the enumeration.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Iterate over `(member, discriminant)` pairs in declaration order.
    pub fn variants(&self) -> impl Iterator<Item = (&str, i64)> {
        self.variants.iter().map(|(n, d)| (n.as_str(), *d))
    }

    /// Look up a member by name, ignoring case.
    pub fn by_name(&self, name: &str) -> Option<EnumValue> {
        self.variants
            .iter()
            .find(|(n, _)| n.to_lowercase() == name.to_lowercase())
            .map(|(n, d)| EnumValue::new(self.name.clone(), n.clone(), *d))
    }

    /// Reinterpret an integral value as a member of this enumeration.
    ///
    /// Discriminants with no declared member keep their number as the name.
    pub fn by_discriminant(&self, discriminant: i64) -> EnumValue {
        let variant = self
            .variants
            .iter()
            .find(|(_, d)| *d == discriminant)
            .map(|(n, _)| n.clone())
            .unwrap_or_else(|| discriminant.to_string());
        EnumValue::new(self.name.clone(), variant, discriminant)
    }
}

/// The statically declared type of an entity field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// Boolean field.
    Bool,
    /// Integral field.
    Int,
    /// Floating point field.
    Float,
    /// Exact decimal field.
    Decimal,
    /// Text field.
    Text,
    /// UTC timestamp field.
    Timestamp,
    /// UUID field.
    Uuid,
    /// Enumeration field.
    Enum(Arc<EnumType>),
    /// Nullable wrapper around another type.
    Optional(Box<FieldType>),
}

impl FieldType {
    /// Wrap a type as optional.
    pub fn optional(inner: FieldType) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// Create an enumeration field type.
    pub fn enumeration(ty: EnumType) -> Self {
        Self::Enum(Arc::new(ty))
    }

    /// Check if the field is nullable.
    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    /// The type with every optional layer removed.
    pub fn unwrap_optional(&self) -> &FieldType {
        let mut ty = self;
        while let Self::Optional(inner) = ty {
            ty = inner;
        }
        ty
    }

    /// Check if the field is a text field, optional or not.
    pub fn is_text(&self) -> bool {
        matches!(self.unwrap_optional(), Self::Text)
    }

    /// Check if values of this type have a meaningful order.
    pub fn is_ordinal(&self) -> bool {
        matches!(
            self.unwrap_optional(),
            Self::Int | Self::Float | Self::Decimal | Self::Timestamp | Self::Enum(_)
        )
    }

    /// The type a value already has, if it is a scalar.
    ///
    /// Enum values produce a member-less declaration carrying only the
    /// enumeration name.
    pub fn of_value(value: &FilterValue) -> Option<FieldType> {
        Some(match value {
            FilterValue::Null | FilterValue::List(_) => return None,
            FilterValue::Bool(_) => Self::Bool,
            FilterValue::Int(_) => Self::Int,
            FilterValue::Float(_) => Self::Float,
            FilterValue::Text(_) => Self::Text,
            FilterValue::Decimal(_) => Self::Decimal,
            FilterValue::Timestamp(_) => Self::Timestamp,
            FilterValue::Uuid(_) => Self::Uuid,
            FilterValue::Enum(e) => Self::enumeration(EnumType::new(
                e.enum_name.clone(),
                Vec::<(String, i64)>::new(),
            )),
        })
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Int => f.write_str("int"),
            Self::Float => f.write_str("float"),
            Self::Decimal => f.write_str("decimal"),
            Self::Text => f.write_str("text"),
            Self::Timestamp => f.write_str("timestamp"),
            Self::Uuid => f.write_str("uuid"),
            Self::Enum(ty) => write!(f, "enum:{}", ty.name()),
            Self::Optional(inner) => write!(f, "{inner}?"),
        }
    }
}
