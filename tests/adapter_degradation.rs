//! Adapter behavior over the full range of module shapes
//!
//! Wires module handles the way generated modules do, the way stubs do, and
//! not at all, then checks the one hard guarantee: the adapter never fails,
//! it degrades.

mod common;

use common::{memory_fixture, seed_sqlite_fixture, MovieFixture};
use graphloom::runtime::{fetch_nodes, fetch_relationships};
use graphloom::source::{QueryExecutor, Row, SourceError, SourceResult};
use graphloom::{
    Capability, GraphAdapter, ModuleHandle, NodeRecord, PropertyValue, SchemaIntrospector,
    SqliteGraph,
};
use std::sync::Arc;

/// Wire a handle the way a generated module's `module_with` does.
fn generated_shape_handle(store: Arc<SqliteGraph>) -> (ModuleHandle, MovieFixture) {
    let fixture = seed_sqlite_fixture(store.as_ref());
    let metadata = SchemaIntrospector::new(store.as_ref()).introspect().unwrap();

    let mut handle = ModuleHandle::new()
        .with_metadata(metadata.clone())
        .with_executor(store.clone());

    for label in metadata.node_labels.clone() {
        let store = store.clone();
        let metadata = metadata.clone();
        let owned = label.clone();
        handle.add_node_accessor(
            graphloom::synth::normalize_identifier(&label),
            Arc::new(move |query| {
                fetch_nodes(
                    store.as_ref(),
                    &owned,
                    metadata.node_properties.get(&owned),
                    query,
                )
            }),
        );
    }
    for rel_type in metadata.edge_types.clone() {
        let store = store.clone();
        let metadata = metadata.clone();
        let owned = rel_type.clone();
        handle.add_edge_accessor(
            graphloom::synth::normalize_identifier(&rel_type),
            Arc::new(move |query| {
                fetch_relationships(
                    store.as_ref(),
                    &owned,
                    metadata.edge_properties.get(&owned),
                    query,
                )
            }),
        );
    }
    (handle, fixture)
}

/// An executor whose every call fails
struct BrokenExecutor;

impl QueryExecutor for BrokenExecutor {
    fn execute(&self, _text: &str, _params: &[(String, PropertyValue)]) -> SourceResult<Vec<Row>> {
        Err(SourceError::Connection("backend unavailable".into()))
    }
}

#[test]
fn test_structured_module_serves_all_operations() {
    let store = Arc::new(SqliteGraph::open_in_memory().unwrap());
    let (handle, fixture) = generated_shape_handle(store);
    let adapter = GraphAdapter::wrap(handle);

    assert_eq!(adapter.capability(), Capability::StructuredAccessors);
    assert_eq!(adapter.node_labels(), vec!["Director", "Movie", "Person"]);
    assert_eq!(adapter.relationship_types(), vec!["ACTED_IN", "DIRECTED"]);

    let movies = adapter.nodes_by_label("Movie");
    assert_eq!(movies.len(), 2);

    let inception = adapter.node_by_id("Movie", &fixture.inception_id).unwrap();
    assert_eq!(
        inception.properties.get("title"),
        Some(&PropertyValue::Str("Inception".into()))
    );
    assert!(adapter.node_by_id("Movie", "no-such-id").is_none());

    // Inception has an incoming ACTED_IN and an incoming DIRECTED edge
    let incoming = adapter.incoming_relationships(&fixture.inception_id);
    assert_eq!(incoming.len(), 2);

    let outgoing = adapter.outgoing_relationships(&fixture.dicaprio_id);
    assert_eq!(outgoing.len(), 1);
    assert_eq!(outgoing[0].1.rel_type, "ACTED_IN");
    assert_eq!(outgoing[0].2.id, fixture.inception_id);
}

#[test]
fn test_raw_only_module_serves_all_operations() {
    let store = Arc::new(SqliteGraph::open_in_memory().unwrap());
    let fixture = seed_sqlite_fixture(store.as_ref());

    // No metadata, no accessors: only the raw entry point
    let handle = ModuleHandle::new().with_executor(store);
    let adapter = GraphAdapter::wrap(handle);

    assert_eq!(adapter.capability(), Capability::RawQueryOnly);
    assert_eq!(adapter.node_labels(), vec!["Director", "Movie", "Person"]);
    assert_eq!(adapter.nodes_by_label("Movie").len(), 2);
    assert!(adapter.node_by_id("Movie", &fixture.matrix_id).is_some());
    assert_eq!(adapter.outgoing_relationships(&fixture.reeves_id).len(), 1);
    assert_eq!(adapter.incoming_relationships(&fixture.matrix_id).len(), 1);
}

#[test]
fn test_stub_module_with_canned_records() {
    // The shape a hand-written mock presents: canned accessor results,
    // nothing else
    let mut handle = ModuleHandle::new();
    handle.add_node_accessor(
        "person",
        Arc::new(|_| {
            Ok(vec![NodeRecord::with_id("123", ["Person"])
                .with_property("name", PropertyValue::Str("Test Person".into()))])
        }),
    );

    let adapter = GraphAdapter::wrap(handle);
    assert_eq!(adapter.capability(), Capability::StructuredAccessors);

    let people = adapter.nodes_by_label("Person");
    assert_eq!(people.len(), 1);
    assert_eq!(people[0].id, "123");

    // No metadata and no executor behind the stub: listing degrades to empty
    assert!(adapter.node_labels().is_empty());
}

#[test]
fn test_memory_backed_module_lists_schema_but_degrades_reads() {
    // A module generated against an in-memory source embeds metadata but has
    // no raw-query entry point to fall back on
    let graph = memory_fixture();
    let metadata = SchemaIntrospector::new(&graph).introspect().unwrap();

    let adapter = GraphAdapter::wrap(ModuleHandle::new().with_metadata(metadata));
    assert_eq!(adapter.capability(), Capability::StructuredAccessors);
    assert_eq!(adapter.node_labels(), vec!["Movie", "Person"]);
    assert_eq!(adapter.relationship_types(), vec!["ACTED_IN"]);
    assert!(adapter.nodes_by_label("Movie").is_empty());
    assert!(adapter.node_by_id("Movie", "m1").is_none());
}

#[test]
fn test_module_without_edges_or_raw_entry_returns_empty_relationships() {
    let mut handle = ModuleHandle::new();
    handle.add_node_accessor("movie", Arc::new(|_| Ok(Vec::new())));

    let adapter = GraphAdapter::wrap(handle);
    assert!(adapter.outgoing_relationships("n1").is_empty());
    assert!(adapter.incoming_relationships("n1").is_empty());
}

#[test]
fn test_unsupported_module_is_empty_everywhere() {
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
fn test_broken_executor_degrades_instead_of_raising() {
    let handle = ModuleHandle::new().with_executor(Arc::new(BrokenExecutor));
    let adapter = GraphAdapter::wrap(handle);

    assert_eq!(adapter.capability(), Capability::RawQueryOnly);
    assert!(adapter.node_labels().is_empty());
    assert!(adapter.nodes_by_label("Movie").is_empty());
    assert!(adapter.outgoing_relationships("m1").is_empty());
}

#[test]
fn test_one_failing_edge_type_does_not_blank_the_others() {
    let store = Arc::new(SqliteGraph::open_in_memory().unwrap());
    let fixture = seed_sqlite_fixture(store.as_ref());

    let mut handle = ModuleHandle::new();
    {
        let store = store.clone();
        handle.add_edge_accessor(
            "acted_in",
            Arc::new(move |query| fetch_relationships(store.as_ref(), "ACTED_IN", None, query)),
        );
    }
    handle.add_edge_accessor(
        "directed",
        Arc::new(|_| {
            Err(graphloom::AccessError::Source(SourceError::Connection(
                "down".into(),
            )))
        }),
    );

    let adapter = GraphAdapter::wrap(handle);
    let incoming = adapter.incoming_relationships(&fixture.inception_id);
    assert_eq!(incoming.len(), 1);
    assert_eq!(incoming[0].1.rel_type, "ACTED_IN");
}
