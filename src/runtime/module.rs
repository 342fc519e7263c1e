//! The consumed shape of a generated access module
//!
//! A generated module presents its surface as a [`ModuleHandle`]: embedded
//! metadata, accessor namespaces keyed by normalized identifier, and a raw
//! query entry point. The shape is a convention, not an enforced interface —
//! a hand-written substitute or stub may populate any subset of it, and the
//! adapter layer is responsible for absorbing whatever is missing.

use super::accessors::{AccessResult, NodeQuery, RelationshipQuery};
use crate::graph::{NodeRecord, RelationshipTriple};
use crate::introspect::SchemaMetadata;
use crate::source::QueryExecutor;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A node accessor: one generated function querying one label
pub type NodeAccessor = Arc<dyn Fn(&NodeQuery) -> AccessResult<Vec<NodeRecord>> + Send + Sync>;

/// A relationship accessor: one generated function querying one type
pub type EdgeAccessor =
    Arc<dyn Fn(&RelationshipQuery) -> AccessResult<Vec<RelationshipTriple>> + Send + Sync>;

/// What a loaded access module exposes. Every field is optional in practice.
#[derive(Default)]
pub struct ModuleHandle {
    /// Embedded copy of the schema snapshot captured at generation time
    pub metadata: Option<SchemaMetadata>,
    /// Node accessors keyed by normalized label identifier
    pub nodes: BTreeMap<String, NodeAccessor>,
    /// Relationship accessors keyed by normalized type identifier
    pub edges: BTreeMap<String, EdgeAccessor>,
    /// Raw parameterized-query entry point
    pub executor: Option<Arc<dyn QueryExecutor>>,
}

impl ModuleHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metadata(mut self, metadata: SchemaMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_executor(mut self, executor: Arc<dyn QueryExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Register a node accessor under its normalized identifier
    pub fn add_node_accessor(&mut self, ident: impl Into<String>, accessor: NodeAccessor) {
        self.nodes.insert(ident.into(), accessor);
    }

    /// Register a relationship accessor under its normalized identifier
    pub fn add_edge_accessor(&mut self, ident: impl Into<String>, accessor: EdgeAccessor) {
        self.edges.insert(ident.into(), accessor);
    }

    /// True when the module presents any structured surface at all
    pub fn has_structured_surface(&self) -> bool {
        self.metadata.is_some() || !self.nodes.is_empty() || !self.edges.is_empty()
    }
}

impl std::fmt::Debug for ModuleHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleHandle")
            .field("metadata", &self.metadata.is_some())
            .field("nodes", &self.nodes.keys().collect::<Vec<_>>())
            .field("edges", &self.edges.keys().collect::<Vec<_>>())
            .field("executor", &self.executor.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_handle_has_no_surface() {
        let handle = ModuleHandle::new();
        assert!(!handle.has_structured_surface());
        assert!(handle.executor.is_none());
    }

    #[test]
    fn test_accessor_registration() {
        let mut handle = ModuleHandle::new();
        handle.add_node_accessor("movie", Arc::new(|_| Ok(Vec::new())));
        assert!(handle.has_structured_surface());
        assert!(handle.nodes.contains_key("movie"));
    }
}
