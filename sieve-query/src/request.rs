//! Filter request declarations.
//!
//! A filter request is any object that can list its filterable fields: the
//! field name, its current value, and the [`FilterSpec`] saying which
//! operator to apply. Requests are declared in one of three ways:
//!
//! - implementing [`FilterRequest`] by hand;
//! - the [`filter_request!`](crate::filter_request) macro on a struct;
//! - a [`RequestShape`] loaded from configuration and bound to a JSON object.
//!
//! ```rust
//! use sieve_query::{filter_request, FilterRequest, RangeBounds};
//!
//! struct UserSearch {
//!     age: Option<RangeBounds>,
//!     name: Option<String>,
//! }
//!
//! filter_request!(UserSearch {
//!     age => "Range",
//!     name => "Contains" ignore_case = true,
//! });
//!
//! let req = UserSearch { age: Some(RangeBounds::between(18, 30)), name: None };
//! let fields = req.fields();
//! assert_eq!(fields.len(), 2);
//! assert!(fields[1].value.is_none());
//! ```

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FilterError, FilterResult};
use crate::value::{EnumValue, FieldName, FilterValue};

/// How a request field is filtered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterSpec {
    /// Registered operator name.
    pub operator: String,
    /// Entity field to filter; defaults to the request field's name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Case handling for text operators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_case: Option<bool>,
}

impl FilterSpec {
    /// Create a spec for an operator.
    pub fn new(operator: impl Into<String>) -> Self {
        Self {
            operator: operator.into(),
            target: None,
            ignore_case: None,
        }
    }

    /// Filter a different entity field.
    pub fn on(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Set case handling.
    pub fn ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = Some(ignore_case);
        self
    }
}

/// Inclusive start/end pair for range filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeBounds {
    /// Lower bound.
    #[serde(default)]
    pub start: Option<FilterValue>,
    /// Upper bound.
    #[serde(default)]
    pub end: Option<FilterValue>,
}

impl RangeBounds {
    /// Both bounds.
    pub fn between(start: impl Into<FilterValue>, end: impl Into<FilterValue>) -> Self {
        Self {
            start: Some(start.into()),
            end: Some(end.into()),
        }
    }

    /// Lower bound only.
    pub fn at_least(start: impl Into<FilterValue>) -> Self {
        Self {
            start: Some(start.into()),
            end: None,
        }
    }

    /// Upper bound only.
    pub fn at_most(end: impl Into<FilterValue>) -> Self {
        Self {
            start: None,
            end: Some(end.into()),
        }
    }
}

/// Current value of a request field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput {
    /// A scalar or list value.
    Value(FilterValue),
    /// A start/end pair.
    Range(RangeBounds),
}

impl FieldInput {
    /// Check if the input carries nothing to filter on.
    pub fn is_absent(&self) -> bool {
        match self {
            Self::Value(v) => v.is_null(),
            Self::Range(_) => false,
        }
    }
}

impl From<FilterValue> for FieldInput {
    fn from(v: FilterValue) -> Self {
        Self::Value(v)
    }
}

impl From<RangeBounds> for FieldInput {
    fn from(v: RangeBounds) -> Self {
        Self::Range(v)
    }
}

impl<T: Into<FilterValue>> From<Vec<T>> for FieldInput {
    fn from(v: Vec<T>) -> Self {
        Self::Value(FilterValue::from(v))
    }
}

macro_rules! field_input_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for FieldInput {
                fn from(v: $ty) -> Self {
                    Self::Value(FilterValue::from(v))
                }
            }

            impl AsFieldInput for $ty {
                fn as_field_input(&self) -> Option<FieldInput> {
                    Some(FieldInput::from(self.clone()))
                }
            }
        )*
    };
}

/// Read a struct field as a request input; `None` means absent.
pub trait AsFieldInput {
    /// The current input, if any.
    fn as_field_input(&self) -> Option<FieldInput>;
}

field_input_from!(bool, i32, i64, u32, f64, String, Decimal, DateTime<Utc>, Uuid, EnumValue);

impl AsFieldInput for FilterValue {
    fn as_field_input(&self) -> Option<FieldInput> {
        Some(FieldInput::Value(self.clone()))
    }
}

impl AsFieldInput for RangeBounds {
    fn as_field_input(&self) -> Option<FieldInput> {
        Some(FieldInput::Range(self.clone()))
    }
}

impl<T: Clone + Into<FilterValue>> AsFieldInput for Vec<T> {
    fn as_field_input(&self) -> Option<FieldInput> {
        Some(FieldInput::from(self.clone()))
    }
}

impl<T: Clone + Into<FieldInput>> AsFieldInput for Option<T> {
    fn as_field_input(&self) -> Option<FieldInput> {
        self.clone().map(Into::into)
    }
}

/// One declared field of a filter request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestField {
    /// Request field name.
    pub name: FieldName,
    /// Filter annotation; unannotated fields are ignored.
    pub spec: Option<FilterSpec>,
    /// Current value; `None` when absent.
    pub value: Option<FieldInput>,
}

impl RequestField {
    /// An annotated field.
    pub fn new(name: impl Into<FieldName>, spec: FilterSpec, value: Option<FieldInput>) -> Self {
        Self {
            name: name.into(),
            spec: Some(spec),
            value,
        }
    }

    /// The entity field this request field filters.
    pub fn target(&self) -> &str {
        self.spec
            .as_ref()
            .and_then(|s| s.target.as_deref())
            .unwrap_or(&*self.name)
    }
}

/// An object that declares filterable fields.
pub trait FilterRequest {
    /// The declared fields in declaration order.
    fn fields(&self) -> Vec<RequestField>;
}

impl<T: FilterRequest + ?Sized> FilterRequest for &T {
    fn fields(&self) -> Vec<RequestField> {
        (**self).fields()
    }
}

/// A request layout loaded from configuration.
///
/// ```toml
/// schema = "users"
/// age = { operator = "Range" }
/// q = { operator = "StartsWith", target = "name" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestShape {
    /// Name of the schema the request filters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Declared fields in declaration order.
    #[serde(flatten)]
    pub fields: IndexMap<String, FilterSpec>,
}

impl RequestShape {
    /// Create an empty shape.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field.
    pub fn field(mut self, name: impl Into<String>, spec: FilterSpec) -> Self {
        self.fields.insert(name.into(), spec);
        self
    }

    /// Bind a JSON object of request values to this shape.
    ///
    /// Keys not declared in the shape are ignored. `null` is absent. An
    /// object with `start` and/or `end` keys becomes a range pair.
    pub fn bind(
        &self,
        input: &serde_json::Map<String, serde_json::Value>,
    ) -> FilterResult<ShapedRequest> {
        let mut fields = Vec::with_capacity(self.fields.len());
        for (name, spec) in &self.fields {
            let value = match input.get(name) {
                None | Some(serde_json::Value::Null) => None,
                Some(raw) => Some(json_input(name, raw)?),
            };
            fields.push(RequestField::new(name.clone(), spec.clone(), value));
        }
        Ok(ShapedRequest { fields })
    }

    /// Bind a JSON value, which must be an object.
    pub fn bind_value(&self, input: &serde_json::Value) -> FilterResult<ShapedRequest> {
        match input {
            serde_json::Value::Object(map) => self.bind(map),
            other => Err(FilterError::validation(format!(
                "filter request must be a JSON object, got `{other}`"
            ))),
        }
    }
}

fn json_input(name: &str, raw: &serde_json::Value) -> FilterResult<FieldInput> {
    let serde_json::Value::Object(map) = raw else {
        return Ok(FieldInput::Value(FilterValue::from_json(raw)?));
    };

    if map.keys().any(|k| k != "start" && k != "end") || map.is_empty() {
        return Err(FilterError::validation(format!(
            "request field `{name}` must be a value, a list or a start/end object"
        )));
    }
    let bound = |key: &str| -> FilterResult<Option<FilterValue>> {
        match map.get(key) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(v) => FilterValue::from_json(v).map(Some),
        }
    };
    Ok(FieldInput::Range(RangeBounds {
        start: bound("start")?,
        end: bound("end")?,
    }))
}

/// A request assembled at runtime.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapedRequest {
    fields: Vec<RequestField>,
}

impl ShapedRequest {
    /// Create an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field with a value.
    pub fn with(
        mut self,
        name: impl Into<FieldName>,
        spec: FilterSpec,
        value: impl Into<FieldInput>,
    ) -> Self {
        self.fields.push(RequestField::new(name, spec, Some(value.into())));
        self
    }

    /// Add a field.
    pub fn push(&mut self, field: RequestField) {
        self.fields.push(field);
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&RequestField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl FilterRequest for ShapedRequest {
    fn fields(&self) -> Vec<RequestField> {
        self.fields.clone()
    }
}
