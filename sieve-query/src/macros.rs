//! Declaration macros.
//!
//! - [`entity!`](crate::entity) implements [`Entity`](crate::Entity) for a struct.
//! - [`filter_request!`](crate::filter_request) implements
//!   [`FilterRequest`](crate::FilterRequest) for a struct.
//! - [`predicate!`](crate::predicate) builds a single comparison
//!   [`Predicate`](crate::Predicate) directly.

/// Implement [`Entity`](crate::Entity) for a struct.
///
/// Each listed field is given a declared type; its value is read with
/// `FilterValue::from(self.field.clone())`. Fields not listed are invisible
/// to filters.
///
/// ```rust
/// use sieve_query::{entity, Entity, FieldType};
///
/// #[derive(Clone)]
/// struct Account {
///     id: i64,
///     email: Option<String>,
/// }
///
/// entity!(Account as "accounts" {
///     id: FieldType::Int,
///     email: FieldType::optional(FieldType::Text),
/// });
///
/// assert_eq!(Account::entity_name(), "accounts");
/// assert!(Account::field_type("email").unwrap().is_optional());
/// ```
#[macro_export]
macro_rules! entity {
    (@impl $ty:ty, $name:expr, $($field:ident : $field_type:expr),*) => {
        impl $crate::Entity for $ty {
            fn entity_name() -> &'static str {
                $name
            }

            #[allow(unused_variables)]
            fn field_type(field: &str) -> ::std::option::Option<$crate::FieldType> {
                $(
                    if field == stringify!($field) {
                        return ::std::option::Option::Some($field_type);
                    }
                )*
                ::std::option::Option::None
            }

            #[allow(unused_variables)]
            fn field_value(&self, field: &str) -> ::std::option::Option<$crate::FilterValue> {
                $(
                    if field == stringify!($field) {
                        return ::std::option::Option::Some($crate::FilterValue::from(
                            ::std::clone::Clone::clone(&self.$field),
                        ));
                    }
                )*
                ::std::option::Option::None
            }
        }
    };

    ($ty:ty as $name:literal { $($field:ident : $field_type:expr),* $(,)? }) => {
        $crate::entity!(@impl $ty, $name, $($field : $field_type),*);
    };

    ($ty:ty { $($field:ident : $field_type:expr),* $(,)? }) => {
        $crate::entity!(@impl $ty, stringify!($ty), $($field : $field_type),*);
    };
}

/// Implement [`FilterRequest`](crate::FilterRequest) for a struct.
///
/// # Syntax
///
/// - `field => "Operator"` - filter the entity field of the same name
/// - `field => "Operator" on "target"` - filter a different entity field
/// - `field => "Operator" ignore_case = false` - case handling for text operators
///
/// Struct fields not listed are unannotated and never filtered. Field values
/// are read through [`AsFieldInput`](crate::AsFieldInput); `None` is absent.
///
/// ```rust
/// use sieve_query::{filter_request, FilterRequest};
///
/// struct Search {
///     q: Option<String>,
///     ids: Option<Vec<i64>>,
///     page: u32,
/// }
///
/// filter_request!(Search {
///     q => "StartsWith" on "name" ignore_case = false,
///     ids => "In" on "id",
/// });
///
/// let fields = Search { q: Some("Jo".into()), ids: None, page: 2 }.fields();
/// assert_eq!(fields[0].target(), "name");
/// assert_eq!(fields[0].spec.as_ref().unwrap().ignore_case, Some(false));
/// ```
#[macro_export]
macro_rules! filter_request {
    ($ty:ty {
        $(
            $field:ident => $operator:literal
            $(on $target:literal)?
            $(ignore_case = $ignore_case:literal)?
        ),* $(,)?
    }) => {
        impl $crate::FilterRequest for $ty {
            fn fields(&self) -> ::std::vec::Vec<$crate::RequestField> {
                ::std::vec![
                    $(
                        $crate::RequestField::new(
                            stringify!($field),
                            $crate::FilterSpec::new($operator)
                                $(.on($target))?
                                $(.ignore_case($ignore_case))?,
                            $crate::AsFieldInput::as_field_input(&self.$field),
                        ),
                    )*
                ]
            }
        }
    };
}

/// Build a comparison predicate.
///
/// # Syntax
///
/// - `predicate!(field == value)`, `!=`, `>`, `>=`, `<`, `<=`
/// - `predicate!(field is null)`, `predicate!(field is not null)`
/// - `predicate!(field in [v1, v2])`, `predicate!(field not in [v1, v2])`
///
/// Values are not coerced; use an operator when the field type matters.
///
/// ```rust
/// use sieve_query::{predicate, FilterValue, Predicate};
///
/// let p = predicate!(deleted == false);
/// assert_eq!(p, Predicate::Equals("deleted".into(), FilterValue::Bool(false)));
///
/// let p = predicate!(status in ["active", "pending"]);
/// assert!(matches!(p, Predicate::In(_, ref v) if v.len() == 2));
/// ```
#[macro_export]
macro_rules! predicate {
    ($field:ident == $value:expr) => {
        $crate::Predicate::Equals(::std::borrow::Cow::Borrowed(stringify!($field)), $value.into())
    };
    ($field:ident != $value:expr) => {
        $crate::Predicate::NotEquals(
            ::std::borrow::Cow::Borrowed(stringify!($field)),
            $value.into(),
        )
    };
    ($field:ident > $value:expr) => {
        $crate::Predicate::Gt(::std::borrow::Cow::Borrowed(stringify!($field)), $value.into())
    };
    ($field:ident >= $value:expr) => {
        $crate::Predicate::Gte(::std::borrow::Cow::Borrowed(stringify!($field)), $value.into())
    };
    ($field:ident < $value:expr) => {
        $crate::Predicate::Lt(::std::borrow::Cow::Borrowed(stringify!($field)), $value.into())
    };
    ($field:ident <= $value:expr) => {
        $crate::Predicate::Lte(::std::borrow::Cow::Borrowed(stringify!($field)), $value.into())
    };
    ($field:ident is null) => {
        $crate::Predicate::IsNull(::std::borrow::Cow::Borrowed(stringify!($field)))
    };
    ($field:ident is not null) => {
        $crate::Predicate::IsNotNull(::std::borrow::Cow::Borrowed(stringify!($field)))
    };
    ($field:ident in [$($value:expr),* $(,)?]) => {
        $crate::Predicate::In(
            ::std::borrow::Cow::Borrowed(stringify!($field)),
            ::std::vec![$($crate::FilterValue::from($value)),*],
        )
    };
    ($field:ident not in [$($value:expr),* $(,)?]) => {
        $crate::Predicate::NotIn(
            ::std::borrow::Cow::Borrowed(stringify!($field)),
            ::std::vec![$($crate::FilterValue::from($value)),*],
        )
    };
}

#[cfg(test)]
mod tests {
    use crate::{Entity, FieldInput, FieldType, FilterRequest, FilterValue, Predicate, RangeBounds};

    #[derive(Clone)]
    struct Gadget {
        label: String,
        weight: f64,
        serial: Option<i64>,
    }

    entity!(Gadget {
        label: FieldType::Text,
        weight: FieldType::Float,
        serial: FieldType::optional(FieldType::Int),
    });

    struct GadgetSearch {
        label: Option<String>,
        heavy: Option<RangeBounds>,
        serials: Option<Vec<i64>>,
        #[allow(dead_code)]
        cursor: Option<String>,
    }

    filter_request!(GadgetSearch {
        label => "Contains",
        heavy => "Range" on "weight",
        serials => "NotIn" on "serial",
    });

    #[test]
    fn test_entity_macro() {
        let g = Gadget {
            label: "lamp".into(),
            weight: 1.5,
            serial: None,
        };
        assert_eq!(Gadget::entity_name(), "Gadget");
        assert_eq!(Gadget::field_type("weight"), Some(FieldType::Float));
        assert_eq!(g.field_value("label"), Some(FilterValue::Text("lamp".into())));
        assert_eq!(g.field_value("serial"), Some(FilterValue::Null));
        assert_eq!(g.field_value("colour"), None);
    }

    #[test]
    fn test_filter_request_macro() {
        let search = GadgetSearch {
            label: None,
            heavy: Some(RangeBounds::at_least(10)),
            serials: Some(vec![1, 2]),
            cursor: Some("abc".into()),
        };
        let fields = search.fields();
        assert_eq!(fields.len(), 3);
        assert!(fields[0].value.is_none());
        assert_eq!(fields[1].target(), "weight");
        assert_eq!(fields[1].value, Some(FieldInput::Range(RangeBounds::at_least(10))));
        assert_eq!(fields[2].spec.as_ref().map(|s| s.operator.as_str()), Some("NotIn"));
    }

    #[test]
    fn test_predicate_macro() {
        assert_eq!(predicate!(age >= 18), Predicate::Gte("age".into(), FilterValue::Int(18)));
        assert_eq!(predicate!(email is not null), Predicate::IsNotNull("email".into()));
        assert_eq!(
            predicate!(id not in [1, 2]),
            Predicate::NotIn("id".into(), vec![FilterValue::Int(1), FilterValue::Int(2)])
        );
    }
}
