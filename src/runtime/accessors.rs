//! Accessor execution
//!
//! The shared implementation behind every generated accessor: fold the id
//! into the filter set, validate/coerce known properties against the embedded
//! schema, build the match query, execute it, and normalize the rows. Errors
//! propagate to the caller — swallowing them is the adapter's job, not ours.

use super::normalize;
use crate::graph::{NodeRecord, Properties, PropertyValue, RelationshipTriple};
use crate::source::{queries, QueryExecutor, SourceError};
use crate::typemap::{validate_filters, TypeMismatch};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised by accessor execution
#[derive(Debug, Error)]
pub enum AccessError {
    #[error(transparent)]
    Mismatch(#[from] TypeMismatch),

    #[error("query execution failed: {0}")]
    Source(#[from] SourceError),
}

/// Result type for accessor calls
pub type AccessResult<T> = Result<T, AccessError>;

/// Criteria for a node accessor call
#[derive(Debug, Clone, Default)]
pub struct NodeQuery {
    /// Optional id; folded into the filters as an equality constraint
    pub id: Option<String>,
    /// Property equality filters, AND-combined
    pub filters: Properties,
}

impl NodeQuery {
    /// Match every node of the accessor's label
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: PropertyValue) -> Self {
        self.filters.insert(key.into(), value);
        self
    }
}

/// Criteria for a relationship accessor call
#[derive(Debug, Clone, Default)]
pub struct RelationshipQuery {
    pub id: Option<String>,
    /// Constrain the start node; with `end_id` set too, matches the exact pair
    pub start_id: Option<String>,
    /// Constrain the end node
    pub end_id: Option<String>,
    /// Property equality filters, AND-combined
    pub filters: Properties,
}

impl RelationshipQuery {
    /// Match every relationship of the accessor's type
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn from_node(mut self, start_id: impl Into<String>) -> Self {
        self.start_id = Some(start_id.into());
        self
    }

    pub fn to_node(mut self, end_id: impl Into<String>) -> Self {
        self.end_id = Some(end_id.into());
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: PropertyValue) -> Self {
        self.filters.insert(key.into(), value);
        self
    }
}

/// Execute a node accessor: validate filters, match, normalize.
///
/// `schema` is the accessor's slice of the embedded metadata; properties it
/// doesn't list pass through untyped. Zero matches yield an empty vec.
pub fn fetch_nodes(
    exec: &dyn QueryExecutor,
    label: &str,
    schema: Option<&BTreeMap<String, String>>,
    query: &NodeQuery,
) -> AccessResult<Vec<NodeRecord>> {
    let mut filters = validate_filters(schema, query.filters.clone())?;
    if let Some(id) = &query.id {
        filters.insert("id".to_string(), PropertyValue::Str(id.clone()));
    }
    let (text, params) = queries::node_match(label, &filters);
    let rows = exec.execute(&text, &params)?;
    Ok(rows.iter().map(|row| normalize::node_from_row(row, "")).collect())
}

/// Execute a relationship accessor. Same validation and normalization
/// contract as [`fetch_nodes`], returning (start, relationship, end) triples.
pub fn fetch_relationships(
    exec: &dyn QueryExecutor,
    rel_type: &str,
    schema: Option<&BTreeMap<String, String>>,
    query: &RelationshipQuery,
) -> AccessResult<Vec<RelationshipTriple>> {
    let filters = validate_filters(schema, query.filters.clone())?;
    let (text, params) = queries::relationship_match(
        rel_type,
        query.id.as_deref(),
        query.start_id.as_deref(),
        query.end_id.as_deref(),
        &filters,
    );
    let rows = exec.execute(&text, &params)?;
    Ok(rows.iter().map(normalize::triple_from_row).collect())
}
