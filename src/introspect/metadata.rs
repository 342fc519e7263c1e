//! Discovered schema snapshot

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Observed start/end label sets for one relationship type.
///
/// Either set may be empty when no instance of the type was sampled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSets {
    pub start: BTreeSet<String>,
    pub end: BTreeSet<String>,
}

/// An immutable snapshot of a graph's discovered structure.
///
/// Produced by one complete introspection pass and embedded verbatim into the
/// generated module. The snapshot reflects sampled instance data only: a
/// property that never appeared in the sample window is silently absent, so
/// the maps are best-effort, not schema-complete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaMetadata {
    /// Labels present in the database, sorted and unique
    pub node_labels: Vec<String>,
    /// Label → property name → native type name
    pub node_properties: BTreeMap<String, BTreeMap<String, String>>,
    /// Relationship types present in the database, sorted and unique
    pub edge_types: Vec<String>,
    /// Relationship type → property name → native type name
    pub edge_properties: BTreeMap<String, BTreeMap<String, String>>,
    /// Relationship type → observed endpoint label sets
    pub edge_endpoints: BTreeMap<String, EndpointSets>,
}

impl SchemaMetadata {
    /// The native type recorded for a node property, if it was observed
    pub fn node_property_type(&self, label: &str, property: &str) -> Option<&str> {
        self.node_properties
            .get(label)
            .and_then(|props| props.get(property))
            .map(String::as_str)
    }

    /// The native type recorded for a relationship property, if observed
    pub fn edge_property_type(&self, rel_type: &str, property: &str) -> Option<&str> {
        self.edge_properties
            .get(rel_type)
            .and_then(|props| props.get(property))
            .map(String::as_str)
    }

    /// Record one node property observation (used by generated modules)
    pub fn insert_node_property(
        &mut self,
        label: impl Into<String>,
        property: impl Into<String>,
        native_type: impl Into<String>,
    ) {
        self.node_properties
            .entry(label.into())
            .or_default()
            .insert(property.into(), native_type.into());
    }

    /// Record one relationship property observation (used by generated modules)
    pub fn insert_edge_property(
        &mut self,
        rel_type: impl Into<String>,
        property: impl Into<String>,
        native_type: impl Into<String>,
    ) {
        self.edge_properties
            .entry(rel_type.into())
            .or_default()
            .insert(property.into(), native_type.into());
    }

    /// Record endpoint label sets for one type (used by generated modules)
    pub fn insert_edge_endpoints(
        &mut self,
        rel_type: impl Into<String>,
        start: &[&str],
        end: &[&str],
    ) {
        self.edge_endpoints.insert(
            rel_type.into(),
            EndpointSets {
                start: start.iter().map(|s| s.to_string()).collect(),
                end: end.iter().map(|s| s.to_string()).collect(),
            },
        );
    }

    /// True when the snapshot contains no labels and no types
    pub fn is_empty(&self) -> bool {
        self.node_labels.is_empty() && self.edge_types.is_empty()
    }
}
