//! Typed property values attached to nodes and relationships

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A property value as observed in the graph.
///
/// Serializes untagged: scalars stay scalars, temporal values are ISO-8601
/// strings. Variant order matters for deserialization — temporal variants
/// are tried before `Str` so stored date strings round-trip as dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
    Str(String),
    List(Vec<PropertyValue>),
    Map(BTreeMap<String, PropertyValue>),
}

/// Properties collection, ordered by key so serialized output is stable
pub type Properties = BTreeMap<String, PropertyValue>;

impl PropertyValue {
    /// The native type name of this value, as recorded in schema metadata.
    pub fn native_type(&self) -> &'static str {
        match self {
            Self::Bool(_) => "BOOLEAN",
            Self::Int(_) => "INTEGER",
            Self::Float(_) => "FLOAT",
            Self::DateTime(_) => "DATETIME",
            Self::Date(_) => "DATE",
            Self::Str(_) => "STRING",
            Self::List(_) => "LIST",
            Self::Map(_) => "MAP",
        }
    }

    /// Render the value as a query parameter string.
    ///
    /// Temporal values use the same ISO-8601 forms they serialize with, so a
    /// parameter compares equal to the stored representation.
    pub fn as_param_string(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
            Self::DateTime(dt) => dt.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true),
            other => serde_json::to_string(other).unwrap_or_default(),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for PropertyValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}
