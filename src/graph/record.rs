//! Canonical node and relationship records
//!
//! Every read path in the crate converges on these shapes: a node carries one
//! or more labels, a relationship carries exactly one type.

use super::value::{Properties, PropertyValue};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A node as returned by every read operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Unique identifier
    pub id: String,
    /// Labels attached to the node; never empty for a stored node
    pub labels: Vec<String>,
    /// Properties attached to the node
    pub properties: Properties,
}

impl NodeRecord {
    /// Create a new node with a random id and the given labels
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_id(Uuid::new_v4().to_string(), labels)
    }

    /// Create a node with an explicit id
    pub fn with_id<I, S>(id: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            labels: labels.into_iter().map(Into::into).collect(),
            properties: Properties::new(),
        }
    }

    /// An empty-shell record: no id, no labels, no properties.
    ///
    /// Produced by normalization when a raw value carries none of the
    /// recognized fields.
    pub fn empty() -> Self {
        Self {
            id: String::new(),
            labels: Vec::new(),
            properties: Properties::new(),
        }
    }

    /// Add a property to the node
    pub fn with_property(mut self, key: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Check whether the node carries the given label
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

/// A relationship as returned by every read operation.
///
/// Unlike nodes, a relationship has exactly one type, never a set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipRecord {
    /// Unique identifier
    pub id: String,
    /// The single relationship type
    pub rel_type: String,
    /// Properties attached to the relationship
    pub properties: Properties,
}

impl RelationshipRecord {
    /// Create a new relationship with a random id and the given type
    pub fn new(rel_type: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), rel_type)
    }

    /// Create a relationship with an explicit id
    pub fn with_id(id: impl Into<String>, rel_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rel_type: rel_type.into(),
            properties: Properties::new(),
        }
    }

    /// An empty-shell record, counterpart of [`NodeRecord::empty`].
    pub fn empty() -> Self {
        Self {
            id: String::new(),
            rel_type: String::new(),
            properties: Properties::new(),
        }
    }

    /// Add a property to the relationship
    pub fn with_property(mut self, key: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(key.into(), value);
        self
    }
}

/// A relationship together with its endpoints: (start node, relationship, end node)
pub type RelationshipTriple = (NodeRecord, RelationshipRecord, NodeRecord);
