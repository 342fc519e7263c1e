//! The fixed set of catalog, sampling, and match query templates
//!
//! Every template returns `(query text, named parameters)`. Parameter keys
//! are written without the leading colon; backends prepend it when binding.
//! Filters are always AND-combined — there is no OR form.
//!
//! The reserved filter key `id` matches the entity's id column rather than a
//! stored property.

use crate::graph::{Properties, PropertyValue};

/// Named parameters accompanying a query template
pub type QueryParams = Vec<(String, PropertyValue)>;

/// Direction of a relationship relative to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Relationships whose end node is the given node
    Incoming,
    /// Relationships whose start node is the given node
    Outgoing,
}

/// Columns selected for a node result
const NODE_COLUMNS: &str = "nodes.id AS id, nodes.labels_json AS labels, nodes.properties_json AS properties";

/// Columns selected for a (start, relationship, end) triple result
const TRIPLE_COLUMNS: &str = "a.id AS start_id, a.labels_json AS start_labels, a.properties_json AS start_properties, \
     e.id AS rel_id, e.rel_type AS rel_type, e.properties_json AS rel_properties, \
     b.id AS end_id, b.labels_json AS end_labels, b.properties_json AS end_properties";

fn limit_param(limit: Option<usize>) -> PropertyValue {
    // SQLite treats a negative LIMIT as "no limit"
    PropertyValue::Int(limit.map_or(-1, |n| n as i64))
}

/// Catalog query: every distinct label in use
pub fn node_labels() -> (String, QueryParams) {
    let text = "SELECT DISTINCT je.value AS label FROM nodes, json_each(nodes.labels_json) je ORDER BY 1".to_string();
    (text, Vec::new())
}

/// Catalog query: every distinct relationship type in use
pub fn relationship_types() -> (String, QueryParams) {
    let text = "SELECT DISTINCT rel_type FROM edges ORDER BY 1".to_string();
    (text, Vec::new())
}

/// Sampling query: up to `limit` nodes carrying `label`
pub fn sample_nodes(label: &str, limit: Option<usize>) -> (String, QueryParams) {
    let text = format!(
        "SELECT {} FROM nodes \
         WHERE EXISTS (SELECT 1 FROM json_each(nodes.labels_json) WHERE json_each.value = :label) \
         ORDER BY nodes.id LIMIT :limit",
        NODE_COLUMNS
    );
    let params = vec![
        ("label".to_string(), PropertyValue::Str(label.to_string())),
        ("limit".to_string(), limit_param(limit)),
    ];
    (text, params)
}

/// Sampling query: up to `limit` relationships of `rel_type`, with endpoints
pub fn sample_relationships(rel_type: &str, limit: Option<usize>) -> (String, QueryParams) {
    let text = format!(
        "SELECT {} FROM edges e \
         JOIN nodes a ON a.id = e.start_id \
         JOIN nodes b ON b.id = e.end_id \
         WHERE e.rel_type = :rel_type \
         ORDER BY e.id LIMIT :limit",
        TRIPLE_COLUMNS
    );
    let params = vec![
        (
            "rel_type".to_string(),
            PropertyValue::Str(rel_type.to_string()),
        ),
        ("limit".to_string(), limit_param(limit)),
    ];
    (text, params)
}

/// Match query: nodes carrying `label` whose properties equal every filter value.
pub fn node_match(label: &str, filters: &Properties) -> (String, QueryParams) {
    let mut conditions = vec![
        "EXISTS (SELECT 1 FROM json_each(nodes.labels_json) WHERE json_each.value = :label)"
            .to_string(),
    ];
    let mut params: QueryParams = vec![(
        "label".to_string(),
        PropertyValue::Str(label.to_string()),
    )];

    for (i, (key, value)) in filters.iter().enumerate() {
        let param = format!("f{}", i);
        if key == "id" {
            conditions.push(format!("nodes.id = :{}", param));
        } else {
            conditions.push(format!(
                "json_extract(nodes.properties_json, '$.{}') = :{}",
                key, param
            ));
        }
        params.push((param, value.clone()));
    }

    let text = format!(
        "SELECT {} FROM nodes WHERE {} ORDER BY nodes.id",
        NODE_COLUMNS,
        conditions.join(" AND ")
    );
    (text, params)
}

/// Match query: relationships of `rel_type` with optional id/endpoint
/// constraints and property filters.
///
/// Both endpoint ids given matches the exact pair; one given matches
/// one-sided; neither matches on property filters alone.
pub fn relationship_match(
    rel_type: &str,
    id: Option<&str>,
    start_id: Option<&str>,
    end_id: Option<&str>,
    filters: &Properties,
) -> (String, QueryParams) {
    let mut conditions = vec!["e.rel_type = :rel_type".to_string()];
    let mut params: QueryParams = vec![(
        "rel_type".to_string(),
        PropertyValue::Str(rel_type.to_string()),
    )];

    if let Some(id) = id {
        conditions.push("e.id = :id".to_string());
        params.push(("id".to_string(), PropertyValue::Str(id.to_string())));
    }
    if let Some(start) = start_id {
        conditions.push("e.start_id = :start".to_string());
        params.push(("start".to_string(), PropertyValue::Str(start.to_string())));
    }
    if let Some(end) = end_id {
        conditions.push("e.end_id = :end".to_string());
        params.push(("end".to_string(), PropertyValue::Str(end.to_string())));
    }

    for (i, (key, value)) in filters.iter().enumerate() {
        let param = format!("f{}", i);
        if key == "id" {
            conditions.push(format!("e.id = :{}", param));
        } else {
            conditions.push(format!(
                "json_extract(e.properties_json, '$.{}') = :{}",
                key, param
            ));
        }
        params.push((param, value.clone()));
    }

    let text = format!(
        "SELECT {} FROM edges e \
         JOIN nodes a ON a.id = e.start_id \
         JOIN nodes b ON b.id = e.end_id \
         WHERE {} ORDER BY e.id",
        TRIPLE_COLUMNS,
        conditions.join(" AND ")
    );
    (text, params)
}

/// Match query: every relationship touching `node_id` in the given direction,
/// regardless of type.
pub fn relationships_by_endpoint(node_id: &str, direction: Direction) -> (String, QueryParams) {
    let column = match direction {
        Direction::Incoming => "e.end_id",
        Direction::Outgoing => "e.start_id",
    };
    let text = format!(
        "SELECT {} FROM edges e \
         JOIN nodes a ON a.id = e.start_id \
         JOIN nodes b ON b.id = e.end_id \
         WHERE {} = :node ORDER BY e.id",
        TRIPLE_COLUMNS, column
    );
    let params = vec![(
        "node".to_string(),
        PropertyValue::Str(node_id.to_string()),
    )];
    (text, params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_match_folds_id_into_conditions() {
        let mut filters = Properties::new();
        filters.insert("id".to_string(), PropertyValue::Str("n1".into()));
        filters.insert("title".to_string(), PropertyValue::Str("Inception".into()));

        let (text, params) = node_match("Movie", &filters);
        assert!(text.contains("nodes.id = :f0"));
        assert!(text.contains("json_extract(nodes.properties_json, '$.title') = :f1"));
        assert_eq!(params.len(), 3); // label + two filters
    }

    #[test]
    fn test_filters_are_and_combined() {
        let mut filters = Properties::new();
        filters.insert("released".to_string(), PropertyValue::Int(2010));
        filters.insert("title".to_string(), PropertyValue::Str("Inception".into()));

        let (text, _) = node_match("Movie", &filters);
        assert_eq!(text.matches(" AND ").count(), 2);
        assert!(!text.contains(" OR "));
    }

    #[test]
    fn test_relationship_match_exact_pair() {
        let (text, params) =
            relationship_match("ACTED_IN", None, Some("p1"), Some("m1"), &Properties::new());
        assert!(text.contains("e.start_id = :start"));
        assert!(text.contains("e.end_id = :end"));
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_relationship_match_one_sided() {
        let (text, _) = relationship_match("ACTED_IN", None, Some("p1"), None, &Properties::new());
        assert!(text.contains("e.start_id = :start"));
        assert!(!text.contains("e.end_id"));
    }

    #[test]
    fn test_unbounded_sample_uses_negative_limit() {
        let (_, params) = sample_nodes("Movie", None);
        assert!(params.contains(&("limit".to_string(), PropertyValue::Int(-1))));
    }
}
