//! Common test utilities
//!
//! Builders for the movie fixture graph used across integration tests, in
//! both backend flavors.

use graphloom::{
    MemoryGraph, NodeRecord, Properties, PropertyValue, RelationshipRecord, SqliteGraph,
};

/// Ids of the interesting fixture entities
pub struct MovieFixture {
    pub inception_id: String,
    pub matrix_id: String,
    pub dicaprio_id: String,
    pub reeves_id: String,
}

/// Seed the standard movie fixture into a SQLite store.
///
/// Two movies, two actors, one director; ACTED_IN and DIRECTED edges.
pub fn seed_sqlite_fixture(store: &SqliteGraph) -> MovieFixture {
    let inception = NodeRecord::new(["Movie"])
        .with_property("title", PropertyValue::Str("Inception".into()))
        .with_property("released", PropertyValue::Int(2010));
    let matrix = NodeRecord::new(["Movie"])
        .with_property("title", PropertyValue::Str("The Matrix".into()))
        .with_property("released", PropertyValue::Int(1999));
    let dicaprio = NodeRecord::new(["Person"])
        .with_property("name", PropertyValue::Str("Leonardo DiCaprio".into()))
        .with_property("born", PropertyValue::Int(1974));
    let reeves = NodeRecord::new(["Person"])
        .with_property("name", PropertyValue::Str("Keanu Reeves".into()))
        .with_property("born", PropertyValue::Int(1964));
    let nolan = NodeRecord::new(["Person", "Director"])
        .with_property("name", PropertyValue::Str("Christopher Nolan".into()));

    for node in [&inception, &matrix, &dicaprio, &reeves, &nolan] {
        store.put_node(node).expect("failed to seed node");
    }

    let cobb = RelationshipRecord::new("ACTED_IN").with_property(
        "roles",
        PropertyValue::List(vec![PropertyValue::Str("Cobb".into())]),
    );
    let neo = RelationshipRecord::new("ACTED_IN").with_property(
        "roles",
        PropertyValue::List(vec![PropertyValue::Str("Neo".into())]),
    );
    let directed = RelationshipRecord::new("DIRECTED");

    store
        .put_edge(&cobb, &dicaprio.id, &inception.id)
        .expect("failed to seed edge");
    store
        .put_edge(&neo, &reeves.id, &matrix.id)
        .expect("failed to seed edge");
    store
        .put_edge(&directed, &nolan.id, &inception.id)
        .expect("failed to seed edge");

    MovieFixture {
        inception_id: inception.id,
        matrix_id: matrix.id,
        dicaprio_id: dicaprio.id,
        reeves_id: reeves.id,
    }
}

/// The same fixture shape over the in-memory source (no raw-query surface).
pub fn memory_fixture() -> MemoryGraph {
    let mut graph = MemoryGraph::new();
    let inception = graph.add_node(
        NodeRecord::new(["Movie"])
            .with_property("title", PropertyValue::Str("Inception".into()))
            .with_property("released", PropertyValue::Int(2010)),
    );
    let dicaprio = graph.add_node(
        NodeRecord::new(["Person"])
            .with_property("name", PropertyValue::Str("Leonardo DiCaprio".into())),
    );
    let mut roles = Properties::new();
    roles.insert(
        "roles".to_string(),
        PropertyValue::List(vec![PropertyValue::Str("Cobb".into())]),
    );
    graph.add_edge("ACTED_IN", dicaprio, inception, roles);
    graph
}
