//! Best-effort record normalization
//!
//! Strategies can hand back native record objects or plain column/value rows,
//! and different producers spell the same field differently. Normalization
//! sniffs a small set of known alternate field names and degrades to an
//! empty-shell record when nothing matches — it never fails.

use crate::graph::{NodeRecord, Properties, PropertyValue, RelationshipRecord, RelationshipTriple};
use crate::source::{CellValue, Row};

const ID_FIELDS: &[&str] = &["id", "uuid", "element_id"];
const LABEL_FIELDS: &[&str] = &["labels", "_labels", "labels_json"];
const PROPERTY_FIELDS: &[&str] = &["properties", "props", "properties_json"];
const TYPE_FIELDS: &[&str] = &["type", "rel_type", "relationship"];

/// Find the first cell matching `prefix` + any candidate name
fn sniff<'r>(row: &'r Row, prefix: &str, candidates: &[&str]) -> Option<&'r CellValue> {
    candidates
        .iter()
        .find_map(|name| row.get(&format!("{}{}", prefix, name)))
}

fn cell_as_id(cell: &CellValue) -> Option<String> {
    match cell {
        CellValue::Value(PropertyValue::Str(s)) => Some(s.clone()),
        // Some producers use numeric ids
        CellValue::Value(PropertyValue::Int(i)) => Some(i.to_string()),
        _ => None,
    }
}

fn cell_as_labels(cell: &CellValue) -> Option<Vec<String>> {
    match cell {
        CellValue::Value(PropertyValue::List(items)) => Some(
            items
                .iter()
                .filter_map(|v| match v {
                    PropertyValue::Str(s) => Some(s.clone()),
                    _ => None,
                })
                .collect(),
        ),
        CellValue::Value(PropertyValue::Str(text)) => serde_json::from_str(text).ok(),
        _ => None,
    }
}

fn cell_as_properties(cell: &CellValue) -> Option<Properties> {
    match cell {
        CellValue::Value(PropertyValue::Map(map)) => Some(map.clone()),
        CellValue::Value(PropertyValue::Str(text)) => serde_json::from_str(text).ok(),
        _ => None,
    }
}

/// Normalize the node described by `prefix`-ed fields of a row.
///
/// A native node cell under the prefix wins outright; otherwise fields are
/// sniffed individually. Nothing recognizable yields an empty shell.
pub fn node_from_row(row: &Row, prefix: &str) -> NodeRecord {
    // A whole record object in any matching column takes precedence
    for (name, cell) in &row.cells {
        if let CellValue::Node(node) = cell {
            if name.starts_with(prefix) {
                return node.clone();
            }
        }
    }

    let mut node = NodeRecord::empty();
    if let Some(id) = sniff(row, prefix, ID_FIELDS).and_then(cell_as_id) {
        node.id = id;
    }
    if let Some(labels) = sniff(row, prefix, LABEL_FIELDS).and_then(cell_as_labels) {
        node.labels = labels;
    }
    if let Some(properties) = sniff(row, prefix, PROPERTY_FIELDS).and_then(cell_as_properties) {
        node.properties = properties;
    }
    node
}

/// Normalize the relationship described by `prefix`-ed fields of a row.
pub fn relationship_from_row(row: &Row, prefix: &str) -> RelationshipRecord {
    for (name, cell) in &row.cells {
        if let CellValue::Relationship(rel) = cell {
            if name.starts_with(prefix) {
                return rel.clone();
            }
        }
    }

    let mut rel = RelationshipRecord::empty();
    if let Some(id) = sniff(row, prefix, ID_FIELDS).and_then(cell_as_id) {
        rel.id = id;
    }
    if let Some(CellValue::Value(PropertyValue::Str(t))) = sniff(row, prefix, TYPE_FIELDS) {
        rel.rel_type = t.clone();
    }
    if let Some(properties) = sniff(row, prefix, PROPERTY_FIELDS).and_then(cell_as_properties) {
        rel.properties = properties;
    }
    rel
}

/// Normalize a (start, relationship, end) triple from one row.
///
/// Rows carrying native record objects are read positionally — first node,
/// first relationship, second node. Field rows use the `start_`/`rel_`/`end_`
/// prefixes.
pub fn triple_from_row(row: &Row) -> RelationshipTriple {
    let nodes: Vec<&NodeRecord> = row
        .cells
        .iter()
        .filter_map(|(_, cell)| match cell {
            CellValue::Node(n) => Some(n),
            _ => None,
        })
        .collect();
    let rel = row.cells.iter().find_map(|(_, cell)| match cell {
        CellValue::Relationship(r) => Some(r),
        _ => None,
    });

    if let (2, Some(rel)) = (nodes.len(), rel) {
        return (nodes[0].clone(), rel.clone(), nodes[1].clone());
    }

    (
        node_from_row(row, "start_"),
        relationship_from_row(row, "rel_"),
        node_from_row(row, "end_"),
    )
}
