//! In-memory graph source
//!
//! A fixture-friendly [`GraphSource`] with no backing database. It
//! intentionally does not implement `QueryExecutor`: a module wrapped over a
//! memory graph presents no raw-query entry point, which is one of the
//! module shapes the adapter layer must tolerate.

use super::traits::{GraphSource, SourceResult};
use crate::graph::{NodeRecord, Properties, RelationshipRecord, RelationshipTriple};
use std::collections::BTreeMap;

/// An in-memory property graph
#[derive(Debug, Default)]
pub struct MemoryGraph {
    nodes: BTreeMap<String, NodeRecord>,
    edges: Vec<StoredEdge>,
}

#[derive(Debug, Clone)]
struct StoredEdge {
    rel: RelationshipRecord,
    start_id: String,
    end_id: String,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, returning its id
    pub fn add_node(&mut self, node: NodeRecord) -> String {
        let id = node.id.clone();
        self.nodes.insert(id.clone(), node);
        id
    }

    /// Add an edge between two existing nodes, returning its id
    pub fn add_edge(
        &mut self,
        rel_type: impl Into<String>,
        start_id: impl Into<String>,
        end_id: impl Into<String>,
        properties: Properties,
    ) -> String {
        let mut rel = RelationshipRecord::new(rel_type);
        rel.properties = properties;
        let id = rel.id.clone();
        self.edges.push(StoredEdge {
            rel,
            start_id: start_id.into(),
            end_id: end_id.into(),
        });
        id
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

impl GraphSource for MemoryGraph {
    fn node_labels(&self) -> SourceResult<Vec<String>> {
        let mut labels: Vec<String> = self
            .nodes
            .values()
            .flat_map(|n| n.labels.iter().cloned())
            .collect();
        labels.sort();
        labels.dedup();
        Ok(labels)
    }

    fn relationship_types(&self) -> SourceResult<Vec<String>> {
        let mut types: Vec<String> = self.edges.iter().map(|e| e.rel.rel_type.clone()).collect();
        types.sort();
        types.dedup();
        Ok(types)
    }

    fn sample_nodes(&self, label: &str, limit: Option<usize>) -> SourceResult<Vec<NodeRecord>> {
        let matches = self
            .nodes
            .values()
            .filter(|n| n.has_label(label))
            .cloned();
        Ok(match limit {
            Some(limit) => matches.take(limit).collect(),
            None => matches.collect(),
        })
    }

    fn sample_relationships(
        &self,
        rel_type: &str,
        limit: Option<usize>,
    ) -> SourceResult<Vec<RelationshipTriple>> {
        let mut out = Vec::new();
        for edge in self.edges.iter().filter(|e| e.rel.rel_type == rel_type) {
            if limit.is_some_and(|limit| out.len() >= limit) {
                break;
            }
            // Dangling endpoints are skipped rather than invented
            let (Some(start), Some(end)) =
                (self.nodes.get(&edge.start_id), self.nodes.get(&edge.end_id))
            else {
                continue;
            };
            out.push((start.clone(), edge.rel.clone(), end.clone()));
        }
        Ok(out)
    }
}
