//! Normalization adapter over a loaded access module
//!
//! Generated modules vary in shape: different generator versions, hand-written
//! substitutes, and test stubs may each expose only part of the expected
//! surface. The adapter absorbs that variance behind one fixed read API with
//! a hard guarantee: it never returns an error and never panics. Failures are
//! reported through `tracing` and degrade to empty results.
//!
//! This is deliberately the opposite policy from the accessor layer, which
//! propagates failures to its caller. The adapter is the boundary where
//! heterogeneous, unreliable generated code meets whatever is built on top.

use crate::graph::{NodeRecord, Properties, PropertyValue, RelationshipTriple};
use crate::runtime::{normalize, ModuleHandle, NodeQuery, RelationshipQuery};
use crate::source::{queries, CellValue, Direction, Row};
use crate::synth::normalize_identifier;

/// What a wrapped module is structurally capable of, classified once at
/// wrap time and dispatched on per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// The module presents metadata and/or generated accessors
    StructuredAccessors,
    /// Only a raw query entry point is available
    RawQueryOnly,
    /// No usable surface; every operation returns empty
    Unsupported,
}

/// The stable read API over one wrapped access module.
///
/// Strategy order per operation is fixed: the matching structured accessor if
/// the module presents one, else the raw query entry point, else an empty
/// result. Selection is by structural availability — an available strategy
/// that fails degrades to empty rather than falling through to the next.
pub struct GraphAdapter {
    module: ModuleHandle,
    capability: Capability,
}

impl GraphAdapter {
    /// Wrap a module, classifying its capability once.
    pub fn wrap(module: ModuleHandle) -> Self {
        let capability = if module.has_structured_surface() {
            Capability::StructuredAccessors
        } else if module.executor.is_some() {
            Capability::RawQueryOnly
        } else {
            Capability::Unsupported
        };
        tracing::debug!(capability = ?capability, module = ?module, "wrapped access module");
        Self { module, capability }
    }

    /// The capability classification computed at wrap time
    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// List every node label the module knows about.
    pub fn node_labels(&self) -> Vec<String> {
        match self.capability {
            Capability::StructuredAccessors => match &self.module.metadata {
                Some(meta) => meta.node_labels.clone(),
                None => self.labels_via_raw(),
            },
            Capability::RawQueryOnly => self.labels_via_raw(),
            Capability::Unsupported => Vec::new(),
        }
    }

    /// List every relationship type the module knows about.
    pub fn relationship_types(&self) -> Vec<String> {
        match self.capability {
            Capability::StructuredAccessors => match &self.module.metadata {
                Some(meta) => meta.edge_types.clone(),
                None => self.types_via_raw(),
            },
            Capability::RawQueryOnly => self.types_via_raw(),
            Capability::Unsupported => Vec::new(),
        }
    }

    /// List all nodes carrying the given label.
    pub fn nodes_by_label(&self, label: &str) -> Vec<NodeRecord> {
        match self.capability {
            Capability::StructuredAccessors => {
                match self.module.nodes.get(&normalize_identifier(label)) {
                    Some(accessor) => degrade(accessor(&NodeQuery::new()), "nodes_by_label"),
                    None => self.nodes_via_raw(label, None),
                }
            }
            Capability::RawQueryOnly => self.nodes_via_raw(label, None),
            Capability::Unsupported => Vec::new(),
        }
    }

    /// Fetch one node by label and id.
    pub fn node_by_id(&self, label: &str, id: &str) -> Option<NodeRecord> {
        let matches = match self.capability {
            Capability::StructuredAccessors => {
                match self.module.nodes.get(&normalize_identifier(label)) {
                    Some(accessor) => {
                        degrade(accessor(&NodeQuery::new().with_id(id)), "node_by_id")
                    }
                    None => self.nodes_via_raw(label, Some(id)),
                }
            }
            Capability::RawQueryOnly => self.nodes_via_raw(label, Some(id)),
            Capability::Unsupported => Vec::new(),
        };
        matches.into_iter().next()
    }

    /// List relationships arriving at the given node.
    pub fn incoming_relationships(&self, node_id: &str) -> Vec<RelationshipTriple> {
        self.relationships(node_id, Direction::Incoming)
    }

    /// List relationships leaving the given node.
    pub fn outgoing_relationships(&self, node_id: &str) -> Vec<RelationshipTriple> {
        self.relationships(node_id, Direction::Outgoing)
    }

    fn relationships(&self, node_id: &str, direction: Direction) -> Vec<RelationshipTriple> {
        match self.capability {
            Capability::StructuredAccessors if !self.module.edges.is_empty() => {
                let query = match direction {
                    Direction::Incoming => RelationshipQuery::new().to_node(node_id),
                    Direction::Outgoing => RelationshipQuery::new().from_node(node_id),
                };
                // Each type's accessor degrades independently; one failing
                // type does not blank the others.
                self.module
                    .edges
                    .values()
                    .flat_map(|accessor| degrade(accessor(&query), "relationships"))
                    .collect()
            }
            Capability::StructuredAccessors | Capability::RawQueryOnly => {
                self.relationships_via_raw(node_id, direction)
            }
            Capability::Unsupported => Vec::new(),
        }
    }

    fn execute_raw(&self, text: &str, params: &[(String, PropertyValue)]) -> Vec<Row> {
        let Some(executor) = &self.module.executor else {
            return Vec::new();
        };
        degrade(executor.execute(text, params), "raw_query")
    }

    fn labels_via_raw(&self) -> Vec<String> {
        let (text, params) = queries::node_labels();
        self.execute_raw(&text, &params)
            .iter()
            .filter_map(|row| text_cell(row, "label"))
            .collect()
    }

    fn types_via_raw(&self) -> Vec<String> {
        let (text, params) = queries::relationship_types();
        self.execute_raw(&text, &params)
            .iter()
            .filter_map(|row| text_cell(row, "rel_type"))
            .collect()
    }

    fn nodes_via_raw(&self, label: &str, id: Option<&str>) -> Vec<NodeRecord> {
        let mut filters = Properties::new();
        if let Some(id) = id {
            filters.insert("id".to_string(), PropertyValue::Str(id.to_string()));
        }
        let (text, params) = queries::node_match(label, &filters);
        self.execute_raw(&text, &params)
            .iter()
            .map(|row| normalize::node_from_row(row, ""))
            .collect()
    }

    fn relationships_via_raw(
        &self,
        node_id: &str,
        direction: Direction,
    ) -> Vec<RelationshipTriple> {
        let (text, params) = queries::relationships_by_endpoint(node_id, direction);
        self.execute_raw(&text, &params)
            .iter()
            .map(normalize::triple_from_row)
            .collect()
    }
}

/// Convert a strategy failure into an empty result, reporting it to the
/// logging collaborator. The adapter's callers never see the error.
fn degrade<T, E: std::fmt::Display>(result: Result<Vec<T>, E>, operation: &str) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(operation = operation, error = %e, "adapter degraded to empty result");
            Vec::new()
        }
    }
}

fn text_cell(row: &Row, column: &str) -> Option<String> {
    match row.get(column) {
        Some(CellValue::Value(PropertyValue::Str(s))) => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::AccessError;
    use crate::source::SourceError;
    use std::sync::Arc;

    fn failing_handle() -> ModuleHandle {
        let mut handle = ModuleHandle::new();
        handle.add_node_accessor(
            "movie",
            Arc::new(|_| Err(AccessError::Source(SourceError::Connection("down".into())))),
        );
        handle
    }

    #[test]
    fn test_unsupported_module_returns_empty_everywhere() {
        let adapter = GraphAdapter::wrap(ModuleHandle::new());
        assert_eq!(adapter.capability(), Capability::Unsupported);
        assert!(adapter.node_labels().is_empty());
        assert!(adapter.relationship_types().is_empty());
        assert!(adapter.nodes_by_label("Movie").is_empty());
        assert!(adapter.node_by_id("Movie", "m1").is_none());
        assert!(adapter.incoming_relationships("m1").is_empty());
        assert!(adapter.outgoing_relationships("m1").is_empty());
    }

    #[test]
    fn test_failing_accessor_degrades_without_error() {
        let adapter = GraphAdapter::wrap(failing_handle());
        assert_eq!(adapter.capability(), Capability::StructuredAccessors);
        assert!(adapter.nodes_by_label("Movie").is_empty());
        assert!(adapter.node_by_id("Movie", "m1").is_none());
    }

    #[test]
    fn test_metadata_only_module_lists_labels() {
        let mut meta = crate::introspect::SchemaMetadata::default();
        meta.node_labels = vec!["Movie".into(), "Person".into()];
        meta.edge_types = vec!["ACTED_IN".into()];

        let adapter = GraphAdapter::wrap(ModuleHandle::new().with_metadata(meta));
        assert_eq!(adapter.node_labels(), vec!["Movie", "Person"]);
        assert_eq!(adapter.relationship_types(), vec!["ACTED_IN"]);
        // No accessor and no executor behind the metadata: reads degrade
        assert!(adapter.nodes_by_label("Movie").is_empty());
    }

    #[test]
    fn test_missing_edge_namespace_without_executor_degrades() {
        let mut handle = ModuleHandle::new();
        handle.add_node_accessor("movie", Arc::new(|_| Ok(Vec::new())));

        let adapter = GraphAdapter::wrap(handle);
        assert!(adapter.outgoing_relationships("m1").is_empty());
        assert!(adapter.incoming_relationships("m1").is_empty());
    }
}
