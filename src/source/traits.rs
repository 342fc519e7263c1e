//! Source trait definitions
//!
//! Two seams into the database, deliberately separate. `GraphSource` is the
//! typed catalog/sampling surface the introspector discovers schema through.
//! `QueryExecutor` is the raw parameterized entry point generated accessors
//! and raw-query callers execute through. A backend may implement either or
//! both; consumers must not assume both are present.

use crate::graph::{NodeRecord, PropertyValue, RelationshipRecord, RelationshipTriple};
use thiserror::Error;

/// Errors that can occur while talking to a graph backend
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("connection failure: {0}")]
    Connection(String),

    #[error("query failure: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("corrupt stored value: {0}")]
    Corrupt(String),

    #[error("invalid record: {0}")]
    Invalid(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for SourceError {
    fn from(e: serde_json::Error) -> Self {
        Self::Corrupt(e.to_string())
    }
}

/// Result type for source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// One cell of a raw query result row.
///
/// Backends return plain values; richer backends (or stubs standing in for
/// one) may return whole records. Normalization accepts either.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Value(PropertyValue),
    Node(NodeRecord),
    Relationship(RelationshipRecord),
}

/// One row of a raw query result, in column order.
#[derive(Debug, Clone, Default)]
pub struct Row {
    /// (column name, cell) pairs in select order
    pub cells: Vec<(String, CellValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a cell
    pub fn push(&mut self, column: impl Into<String>, cell: CellValue) {
        self.cells.push((column.into(), cell));
    }

    /// Look up a cell by column name
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, cell)| cell)
    }
}

/// Typed catalog and sampling operations over a live property graph.
///
/// Discovery is sampling-based: `sample_*` operations examine up to `limit`
/// instances (`None` = unbounded) and callers must treat the result as
/// best-effort, not schema-complete.
pub trait GraphSource: Send + Sync {
    /// Enumerate all node labels present in the database
    fn node_labels(&self) -> SourceResult<Vec<String>>;

    /// Enumerate all relationship types present in the database
    fn relationship_types(&self) -> SourceResult<Vec<String>>;

    /// Return up to `limit` nodes carrying the given label
    fn sample_nodes(&self, label: &str, limit: Option<usize>) -> SourceResult<Vec<NodeRecord>>;

    /// Return up to `limit` relationships of the given type, with endpoints
    fn sample_relationships(
        &self,
        rel_type: &str,
        limit: Option<usize>,
    ) -> SourceResult<Vec<RelationshipTriple>>;
}

/// Raw parameterized query execution.
///
/// `text` uses named placeholders (`:p0`, `:label`, …); `params` supplies the
/// values keyed without the leading colon.
pub trait QueryExecutor: Send + Sync {
    fn execute(&self, text: &str, params: &[(String, PropertyValue)]) -> SourceResult<Vec<Row>>;
}
