//! Native-type mapping and the coercion/validation contract
//!
//! Discovered schema metadata records native type names (`"STRING"`,
//! `"INTEGER"`, …). A fixed table maps those names onto [`PropertyKind`];
//! names outside the table weaken to [`PropertyKind::Any`], which performs no
//! validation — unknown types are never rejected.
//!
//! Validation of a filter value is nullable-by-default and attempts at most
//! one coercion: a value already of the expected kind passes unchanged, a
//! foreign-typed value gets exactly one conversion attempt, and a failed
//! attempt raises [`TypeMismatch`] naming the property, the expected kind,
//! and the actual runtime type.

use crate::graph::{Properties, PropertyValue};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// The kinds a property can be validated against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyKind {
    Str,
    Int,
    Float,
    Bool,
    Date,
    DateTime,
    List,
    Map,
    /// Unknown native type: accepted unchanged, never validated
    Any,
}

impl PropertyKind {
    /// Map a native type name onto a kind. Unknown names map to `Any`.
    pub fn from_native(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "STRING" => Self::Str,
            "INTEGER" => Self::Int,
            "FLOAT" => Self::Float,
            "BOOLEAN" => Self::Bool,
            "DATE" => Self::Date,
            "DATETIME" => Self::DateTime,
            "LIST" => Self::List,
            "MAP" => Self::Map,
            _ => Self::Any,
        }
    }

    /// Check whether a value is already of this kind
    pub fn matches(&self, value: &PropertyValue) -> bool {
        matches!(
            (self, value),
            (Self::Str, PropertyValue::Str(_))
                | (Self::Int, PropertyValue::Int(_))
                | (Self::Float, PropertyValue::Float(_))
                | (Self::Bool, PropertyValue::Bool(_))
                | (Self::Date, PropertyValue::Date(_))
                | (Self::DateTime, PropertyValue::DateTime(_))
                | (Self::List, PropertyValue::List(_))
                | (Self::Map, PropertyValue::Map(_))
                | (Self::Any, _)
        )
    }
}

impl std::fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Str => "string",
            Self::Int => "integer",
            Self::Float => "float",
            Self::Bool => "boolean",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::List => "list",
            Self::Map => "map",
            Self::Any => "any",
        };
        write!(f, "{}", name)
    }
}

/// A filter value that could not be coerced to its property's expected kind
#[derive(Debug, Clone, PartialEq, Error)]
#[error("property '{property}' expected {expected}, got {actual}")]
pub struct TypeMismatch {
    /// The property the value was supplied for
    pub property: String,
    /// The kind the schema expects
    pub expected: PropertyKind,
    /// The native type name of the supplied value
    pub actual: &'static str,
}

/// Validate one value against an expected kind, coercing at most once.
pub fn coerce(
    property: &str,
    expected: PropertyKind,
    value: PropertyValue,
) -> Result<PropertyValue, TypeMismatch> {
    if expected.matches(&value) {
        return Ok(value);
    }

    let mismatch = TypeMismatch {
        property: property.to_string(),
        expected,
        actual: value.native_type(),
    };

    // Exactly one conversion attempt; no chaining.
    let coerced = match (expected, &value) {
        (PropertyKind::Int, PropertyValue::Str(s)) => {
            s.trim().parse::<i64>().ok().map(PropertyValue::Int)
        }
        (PropertyKind::Int, PropertyValue::Float(f)) => {
            (f.is_finite() && f.fract() == 0.0).then(|| PropertyValue::Int(*f as i64))
        }
        (PropertyKind::Float, PropertyValue::Int(i)) => Some(PropertyValue::Float(*i as f64)),
        (PropertyKind::Float, PropertyValue::Str(s)) => {
            s.trim().parse::<f64>().ok().map(PropertyValue::Float)
        }
        (PropertyKind::Str, PropertyValue::Int(_))
        | (PropertyKind::Str, PropertyValue::Float(_))
        | (PropertyKind::Str, PropertyValue::Bool(_))
        | (PropertyKind::Str, PropertyValue::Date(_))
        | (PropertyKind::Str, PropertyValue::DateTime(_)) => {
            Some(PropertyValue::Str(value.as_param_string()))
        }
        (PropertyKind::Bool, PropertyValue::Str(s)) => match s.to_ascii_lowercase().as_str() {
            "true" => Some(PropertyValue::Bool(true)),
            "false" => Some(PropertyValue::Bool(false)),
            _ => None,
        },
        (PropertyKind::Date, PropertyValue::Str(s)) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .map(PropertyValue::Date),
        (PropertyKind::DateTime, PropertyValue::Str(s)) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| PropertyValue::DateTime(dt.with_timezone(&Utc))),
        _ => None,
    };

    coerced.ok_or(mismatch)
}

/// Validate a filter map against a discovered property schema.
///
/// Properties absent from the schema pass through untyped — the graph is
/// schema-flexible and unseen properties must not be rejected. The returned
/// map carries coerced values; it is what the query must be built from.
pub fn validate_filters(
    schema: Option<&BTreeMap<String, String>>,
    filters: Properties,
) -> Result<Properties, TypeMismatch> {
    let Some(schema) = schema else {
        return Ok(filters);
    };
    let mut validated = Properties::new();
    for (key, value) in filters {
        let value = match schema.get(&key) {
            Some(native) => coerce(&key, PropertyKind::from_native(native), value)?,
            None => value,
        };
        validated.insert(key, value);
    }
    Ok(validated)
}
