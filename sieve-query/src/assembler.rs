//! Filter assembly.
//!
//! The assembler walks a [`FilterRequest`], creates one operator per
//! annotated field with a value, and hands each operator its payload. The
//! result is an ordered list of operators ready to build, or, through
//! [`FilterAssembler::compile`], a single AND-combined [`Predicate`].
//!
//! ```rust
//! use sieve_query::{
//!     FieldType, FilterAssembler, FilterRegistry, FilterSpec, FilterValue, RangeBounds,
//!     ShapedRequest, TableSchema,
//! };
//!
//! let schema = TableSchema::new("users")
//!     .field("age", FieldType::Int)
//!     .field("name", FieldType::Text);
//!
//! let request = ShapedRequest::new()
//!     .with("age", FilterSpec::new("Range"), RangeBounds::between(18, 30))
//!     .with("name", FilterSpec::new("Contains"), FilterValue::from("jo"));
//!
//! let registry = FilterRegistry::new();
//! let assembler = FilterAssembler::new(&registry);
//! let operators = assembler.assemble(Some(&request)).unwrap();
//! assert_eq!(operators.len(), 2);
//!
//! let (sql, params) = assembler.compile(Some(&request), &schema).unwrap().to_sql(0);
//! assert_eq!(sql, "((age >= $1 AND age <= $2) AND LOWER(name) LIKE $3)");
//! assert_eq!(params.len(), 3);
//! ```

use tracing::{debug, trace};

use crate::coerce::coerce_each;
use crate::error::{FilterError, FilterResult};
use crate::operator::{FilterOperator, OperatorInput, OperatorShape};
use crate::predicate::Predicate;
use crate::registry::FilterRegistry;
use crate::request::{FieldInput, FilterRequest, FilterSpec};
use crate::schema::{Entity, EntitySchema, Schema};
use crate::value::{FieldType, FilterValue};

/// Turns filter requests into operators and predicates.
#[derive(Debug, Clone, Copy)]
pub struct FilterAssembler<'r> {
    registry: &'r FilterRegistry,
    default_ignore_case: Option<bool>,
}

impl<'r> FilterAssembler<'r> {
    /// Create an assembler over a registry.
    pub fn new(registry: &'r FilterRegistry) -> Self {
        Self {
            registry,
            default_ignore_case: None,
        }
    }

    /// Case handling applied to text operators whose `FilterSpec` does not set it.
    pub fn default_ignore_case(mut self, ignore_case: bool) -> Self {
        self.default_ignore_case = Some(ignore_case);
        self
    }

    /// The registry operators are created from.
    pub fn registry(&self) -> &'r FilterRegistry {
        self.registry
    }

    /// Create and populate one operator per annotated, non-absent field.
    ///
    /// An absent request yields no operators. Any failure aborts assembly and
    /// is reported as [`FilterError::Assembly`].
    pub fn assemble<R>(&self, request: Option<&R>) -> FilterResult<Vec<Box<dyn FilterOperator>>>
    where
        R: FilterRequest + ?Sized,
    {
        let Some(request) = request else {
            return Ok(Vec::new());
        };

        let fields = request.fields();
        debug!(fields = fields.len(), "assembling filter request");

        let mut operators = Vec::with_capacity(fields.len());
        for field in fields {
            let (Some(spec), Some(value)) = (&field.spec, &field.value) else {
                continue;
            };
            if value.is_absent() {
                continue;
            }

            let target = field.target();
            trace!(
                field = %field.name,
                entity_field = target,
                operator = %spec.operator,
                "assembling field"
            );
            let mut operator = self
                .registry
                .create(&spec.operator)
                .map_err(|e| FilterError::assembly(spec.operator.as_str(), target, e))?;
            self.populate(operator.as_mut(), target, spec, value)
                .map_err(|e| FilterError::assembly(operator.kind(), target, e))?;
            crate::sieve_trace!(
                kind = operator.kind(),
                field = target,
                ?value,
                "populated operator"
            );
            operators.push(operator);
        }

        debug!(operators = operators.len(), "filter request assembled");
        Ok(operators)
    }

    fn populate(
        &self,
        operator: &mut dyn FilterOperator,
        target: &str,
        spec: &FilterSpec,
        value: &FieldInput,
    ) -> FilterResult<()> {
        operator.set_field(target.to_string().into());

        let input = match (operator.shape(), value) {
            (OperatorShape::Range, FieldInput::Range(bounds)) => OperatorInput::Bounds {
                start: bounds.start.clone(),
                end: bounds.end.clone(),
            },
            (_, FieldInput::Range(_)) => {
                return Err(FilterError::validation(format!(
                    "`{}` filter cannot take a start/end pair",
                    operator.kind()
                )));
            }
            (OperatorShape::Range, FieldInput::Value(_)) => {
                return Err(FilterError::validation(
                    "`Range` filter requires a start/end pair",
                ));
            }
            (OperatorShape::Scalar, FieldInput::Value(v)) => OperatorInput::Value(v.clone()),
            (OperatorShape::Text, FieldInput::Value(v)) => {
                let Some(text) = v.as_text() else {
                    return Err(FilterError::validation(format!(
                        "`{}` filter requires a string, got {}",
                        operator.kind(),
                        v.kind()
                    )));
                };
                OperatorInput::Text {
                    value: text.to_string(),
                    ignore_case: spec.ignore_case.or(self.default_ignore_case),
                }
            }
            (OperatorShape::Set, FieldInput::Value(v)) => {
                let FilterValue::List(items) = v else {
                    return Err(FilterError::validation(format!(
                        "`{}` filter requires a list, got {}",
                        operator.kind(),
                        v.kind()
                    )));
                };
                OperatorInput::Values(homogenize(items)?)
            }
        };

        operator.assign(input)
    }

    /// Assemble, build every operator against `schema`, and AND the results.
    ///
    /// An absent or empty request compiles to [`Predicate::Always`].
    pub fn compile<R>(&self, request: Option<&R>, schema: &dyn Schema) -> FilterResult<Predicate>
    where
        R: FilterRequest + ?Sized,
    {
        let operators = self.assemble(request)?;
        let mut predicates = Vec::with_capacity(operators.len());
        for operator in &operators {
            let predicate = operator
                .build(schema)
                .map_err(|e| FilterError::assembly(operator.kind(), operator.field(), e))?;
            predicates.push(predicate);
        }
        debug!(schema = schema.name(), predicates = predicates.len(), "filter request compiled");

        let predicate = Predicate::and(predicates);
        crate::sieve_debug!(schema = schema.name(), predicate = ?predicate, "compiled predicate");
        Ok(predicate)
    }

    /// [`compile`](Self::compile) against an entity type.
    pub fn compile_for<E, R>(&self, request: Option<&R>) -> FilterResult<Predicate>
    where
        E: Entity,
        R: FilterRequest + ?Sized,
    {
        self.compile(request, &EntitySchema::<E>::new())
    }
}

impl FilterAssembler<'static> {
    /// Create an assembler over the global registry.
    pub fn with_global() -> Self {
        Self::new(FilterRegistry::global())
    }
}

/// Convert every element to the type of the first non-null element.
fn homogenize(items: &[FilterValue]) -> FilterResult<Vec<FilterValue>> {
    let Some(element_type) = items.iter().find_map(FieldType::of_value) else {
        return Ok(items.to_vec());
    };
    coerce_each(&element_type, items)
}
