//! Sampling-based schema discovery
//!
//! Walks the catalog, then samples instances of each label and relationship
//! type to infer property names, property types, and endpoint label sets.
//! Any query failure is fatal to the whole pass: a partial or guessed schema
//! is never an acceptable basis for a generated module.

use super::metadata::{EndpointSets, SchemaMetadata};
use crate::graph::Properties;
use crate::source::{GraphSource, SourceError};
use std::collections::BTreeMap;
use thiserror::Error;

/// Default bound on how many instances of each label/type are examined
pub const DEFAULT_SAMPLE_LIMIT: usize = 1000;

/// Recorded when two samples disagree about a property's type
const CONFLICTING_TYPE: &str = "ANY";

/// Errors that abort an introspection pass
#[derive(Debug, Error)]
pub enum IntrospectError {
    #[error("connection failure: {0}")]
    Connection(SourceError),

    #[error("schema query failed: {0}")]
    SchemaQuery(SourceError),
}

impl From<SourceError> for IntrospectError {
    fn from(e: SourceError) -> Self {
        match e {
            SourceError::Connection(_) => Self::Connection(e),
            _ => Self::SchemaQuery(e),
        }
    }
}

/// Result type for introspection operations
pub type IntrospectResult<T> = Result<T, IntrospectError>;

/// Sampling-based schema discovery over a [`GraphSource`].
///
/// Label and type listing is unbounded; per-entity scans examine at most
/// `sample_limit` instances. There is no confidence threshold: on large
/// heterogeneous graphs a rare property or endpoint combination can fall
/// outside the sample window, and callers who need more coverage must raise
/// the limit.
pub struct SchemaIntrospector<'a> {
    source: &'a dyn GraphSource,
    sample_limit: usize,
}

impl<'a> SchemaIntrospector<'a> {
    pub fn new(source: &'a dyn GraphSource) -> Self {
        Self {
            source,
            sample_limit: DEFAULT_SAMPLE_LIMIT,
        }
    }

    /// Override the per-entity sample window
    pub fn with_sample_limit(mut self, limit: usize) -> Self {
        self.sample_limit = limit;
        self
    }

    pub fn sample_limit(&self) -> usize {
        self.sample_limit
    }

    /// Enumerate all labels present in the database
    pub fn discover_node_labels(&self) -> IntrospectResult<Vec<String>> {
        Ok(self.source.node_labels()?)
    }

    /// Enumerate all relationship types present in the database
    pub fn discover_edge_types(&self) -> IntrospectResult<Vec<String>> {
        Ok(self.source.relationship_types()?)
    }

    /// Union the property keys observed on up to `sample_limit` nodes of
    /// `label` and infer each property's type from its observed values.
    pub fn discover_node_properties(
        &self,
        label: &str,
    ) -> IntrospectResult<BTreeMap<String, String>> {
        let nodes = self.source.sample_nodes(label, Some(self.sample_limit))?;
        Ok(infer_property_types(nodes.iter().map(|n| &n.properties)))
    }

    /// Same sampling strategy applied to relationships of `rel_type`
    pub fn discover_edge_properties(
        &self,
        rel_type: &str,
    ) -> IntrospectResult<BTreeMap<String, String>> {
        let rels = self
            .source
            .sample_relationships(rel_type, Some(self.sample_limit))?;
        Ok(infer_property_types(rels.iter().map(|(_, r, _)| &r.properties)))
    }

    /// Union the start/end label sets observed on up to `sample_limit`
    /// relationships of `rel_type`. A type with zero sampled instances
    /// yields two empty sets, not an error.
    pub fn discover_edge_endpoints(&self, rel_type: &str) -> IntrospectResult<EndpointSets> {
        let rels = self
            .source
            .sample_relationships(rel_type, Some(self.sample_limit))?;
        let mut endpoints = EndpointSets::default();
        for (start, _, end) in &rels {
            endpoints.start.extend(start.labels.iter().cloned());
            endpoints.end.extend(end.labels.iter().cloned());
        }
        Ok(endpoints)
    }

    /// Run one complete introspection pass and assemble the snapshot.
    pub fn introspect(&self) -> IntrospectResult<SchemaMetadata> {
        let mut metadata = SchemaMetadata::default();

        metadata.node_labels = self.discover_node_labels()?;
        metadata.node_labels.sort();
        metadata.node_labels.dedup();
        for label in &metadata.node_labels {
            let props = self.discover_node_properties(label)?;
            metadata.node_properties.insert(label.clone(), props);
        }

        metadata.edge_types = self.discover_edge_types()?;
        metadata.edge_types.sort();
        metadata.edge_types.dedup();
        for rel_type in &metadata.edge_types {
            let props = self.discover_edge_properties(rel_type)?;
            metadata.edge_properties.insert(rel_type.clone(), props);
            let endpoints = self.discover_edge_endpoints(rel_type)?;
            metadata.edge_endpoints.insert(rel_type.clone(), endpoints);
        }

        tracing::info!(
            labels = metadata.node_labels.len(),
            types = metadata.edge_types.len(),
            sample_limit = self.sample_limit,
            "introspection pass complete"
        );
        Ok(metadata)
    }
}

/// Union property keys across samples, inferring each key's native type from
/// observed values. Conflicting observations degrade the property to "ANY"
/// instead of letting sample order pick a winner.
fn infer_property_types<'p>(
    samples: impl Iterator<Item = &'p Properties>,
) -> BTreeMap<String, String> {
    let mut types: BTreeMap<String, String> = BTreeMap::new();
    for properties in samples {
        for (key, value) in properties {
            let observed = value.native_type();
            match types.get(key) {
                None => {
                    types.insert(key.clone(), observed.to_string());
                }
                Some(prior) if prior != observed => {
                    types.insert(key.clone(), CONFLICTING_TYPE.to_string());
                }
                Some(_) => {}
            }
        }
    }
    types
}
