//! Value coercion.
//!
//! Filter inputs arrive loosely typed while predicates compare against
//! statically typed entity fields. Every operator funnels its values through
//! [`coerce`], so new scalar kinds only need support here.
//!
//! Rules, in priority order:
//!
//! 1. A value already of the target type (and `Null`) is returned unchanged.
//! 2. Enum targets accept member names (case-insensitive) and discriminants.
//! 3. UUID targets parse text.
//! 4. Optional targets unwrap and recurse.
//! 5. Anything else goes through a generic scalar conversion table.
//!
//! ```rust
//! use sieve_query::{coerce, EnumType, FieldType, FilterValue};
//!
//! let value = coerce(&FieldType::Int, &FilterValue::Text("42".into())).unwrap();
//! assert_eq!(value, FilterValue::Int(42));
//!
//! let color = FieldType::enumeration(EnumType::new("Color", [("Red", 0), ("Blue", 1)]));
//! let red = coerce(&color, &"red".into()).unwrap();
//! assert_eq!(red, coerce(&color, &"RED".into()).unwrap());
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{FilterError, FilterResult};
use crate::value::{EnumType, FieldType, FilterValue};

/// Coerce `raw` to the `target` field type.
pub fn coerce(target: &FieldType, raw: &FilterValue) -> FilterResult<FilterValue> {
    if raw.is_null() || is_assignable(target, raw) {
        return Ok(raw.clone());
    }

    match target {
        FieldType::Enum(ty) => coerce_enum(ty, target, raw),
        FieldType::Uuid => match raw {
            FilterValue::Text(s) => Uuid::parse_str(s.trim())
                .map(FilterValue::Uuid)
                .map_err(|e| FilterError::conversion(raw, target, e.to_string())),
            _ => convert(target, raw),
        },
        FieldType::Optional(inner) => coerce(inner, raw),
        _ => convert(target, raw),
    }
}

/// Coerce every value of a set to `target`, dropping nulls.
///
/// All-or-nothing: the first value that fails aborts the whole set.
pub fn coerce_each<'a, I>(target: &FieldType, values: I) -> FilterResult<Vec<FilterValue>>
where
    I: IntoIterator<Item = &'a FilterValue>,
{
    values
        .into_iter()
        .filter(|v| !v.is_null())
        .map(|v| coerce(target, v))
        .collect()
}

/// Check whether a value is already of the target type.
pub fn is_assignable(target: &FieldType, value: &FilterValue) -> bool {
    match (target, value) {
        (FieldType::Optional(inner), value) => is_assignable(inner, value),
        (FieldType::Bool, FilterValue::Bool(_))
        | (FieldType::Int, FilterValue::Int(_))
        | (FieldType::Float, FilterValue::Float(_))
        | (FieldType::Decimal, FilterValue::Decimal(_))
        | (FieldType::Text, FilterValue::Text(_))
        | (FieldType::Timestamp, FilterValue::Timestamp(_))
        | (FieldType::Uuid, FilterValue::Uuid(_)) => true,
        (FieldType::Enum(ty), FilterValue::Enum(v)) => ty.name() == v.enum_name,
        _ => false,
    }
}

fn coerce_enum(ty: &EnumType, target: &FieldType, raw: &FilterValue) -> FilterResult<FilterValue> {
    match raw {
        FilterValue::Text(name) => ty.by_name(name.trim()).map(FilterValue::Enum).ok_or_else(|| {
            let reason = format!("no member of `{}` is named `{name}`", ty.name());
            FilterError::conversion(raw, target, reason)
        }),
        FilterValue::Int(discriminant) => Ok(FilterValue::Enum(ty.by_discriminant(*discriminant))),
        FilterValue::Float(_) | FilterValue::Decimal(_) => match convert(&FieldType::Int, raw) {
            Ok(FilterValue::Int(discriminant)) => {
                Ok(FilterValue::Enum(ty.by_discriminant(discriminant)))
            }
            _ => Err(FilterError::conversion(
                raw,
                target,
                format!("`{raw}` has no integral discriminant"),
            )),
        },
        other => Err(FilterError::conversion(
            raw,
            target,
            format!("{} values cannot be read as an enum member", other.kind()),
        )),
    }
}

fn convert(target: &FieldType, raw: &FilterValue) -> FilterResult<FilterValue> {
    let fail = |reason: String| FilterError::conversion(raw, target, reason);

    match (target, raw) {
        (FieldType::Int, FilterValue::Text(s)) => {
            s.trim().parse::<i64>().map(FilterValue::Int).map_err(|e| fail(e.to_string()))
        }
        (FieldType::Float, FilterValue::Text(s)) => {
            s.trim().parse::<f64>().map(FilterValue::Float).map_err(|e| fail(e.to_string()))
        }
        (FieldType::Decimal, FilterValue::Text(s)) => {
            s.trim().parse::<Decimal>().map(FilterValue::Decimal).map_err(|e| fail(e.to_string()))
        }
        (FieldType::Bool, FilterValue::Text(s)) => match s.trim().to_lowercase().as_str() {
            "true" => Ok(FilterValue::Bool(true)),
            "false" => Ok(FilterValue::Bool(false)),
            _ => Err(fail("expected `true` or `false`".to_string())),
        },
        (FieldType::Timestamp, FilterValue::Text(s)) => parse_timestamp(s.trim())
            .map(FilterValue::Timestamp)
            .ok_or_else(|| fail("expected an RFC 3339 timestamp or a YYYY-MM-DD date".to_string())),

        (FieldType::Float, FilterValue::Int(i)) => Ok(FilterValue::Float(*i as f64)),
        (FieldType::Decimal, FilterValue::Int(i)) => Ok(FilterValue::Decimal(Decimal::from(*i))),
        (FieldType::Bool, FilterValue::Int(i)) => Ok(FilterValue::Bool(*i != 0)),

        (FieldType::Int, FilterValue::Float(f)) => {
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                Ok(FilterValue::Int(*f as i64))
            } else {
                Err(fail("value is not an integer in range".to_string()))
            }
        }
        (FieldType::Decimal, FilterValue::Float(f)) => {
            Decimal::try_from(*f).map(FilterValue::Decimal).map_err(|e| fail(e.to_string()))
        }

        (FieldType::Int, FilterValue::Decimal(d)) => {
            if d.fract().is_zero() {
                i64::try_from(*d).map(FilterValue::Int).map_err(|e| fail(e.to_string()))
            } else {
                Err(fail("value is not an integer".to_string()))
            }
        }
        (FieldType::Float, FilterValue::Decimal(d)) => {
            f64::try_from(*d).map(FilterValue::Float).map_err(|e| fail(e.to_string()))
        }

        (FieldType::Int, FilterValue::Bool(b)) => Ok(FilterValue::Int(i64::from(*b))),

        (
            FieldType::Text,
            FilterValue::Bool(_)
            | FilterValue::Int(_)
            | FilterValue::Float(_)
            | FilterValue::Decimal(_)
            | FilterValue::Timestamp(_)
            | FilterValue::Uuid(_)
            | FilterValue::Enum(_),
        ) => Ok(FilterValue::Text(raw.to_string())),

        _ => Err(fail(format!("no conversion from {} to {}", raw.kind(), target))),
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
