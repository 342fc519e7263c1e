//! End-to-end generation pipeline tests
//!
//! Exercises introspection over a live SQLite store, module assembly, and
//! artifact emission, including the regeneration-idempotence guarantee.

mod common;

use common::seed_sqlite_fixture;
use graphloom::{GeneratorProfile, ModuleSynthesizer, SchemaIntrospector, SqliteGraph, SynthError};
use regex_lite::Regex;
use std::fs;

fn synthesizer(db_path: &str) -> ModuleSynthesizer {
    ModuleSynthesizer::new(GeneratorProfile {
        graph_name: "movies".to_string(),
        database_path: db_path.to_string(),
    })
}

#[test]
fn test_introspection_over_live_store() {
    let store = SqliteGraph::open_in_memory().unwrap();
    seed_sqlite_fixture(&store);

    let metadata = SchemaIntrospector::new(&store).introspect().unwrap();

    assert_eq!(metadata.node_labels, vec!["Director", "Movie", "Person"]);
    assert_eq!(metadata.edge_types, vec!["ACTED_IN", "DIRECTED"]);
    assert_eq!(metadata.node_property_type("Movie", "title"), Some("STRING"));
    assert_eq!(
        metadata.node_property_type("Movie", "released"),
        Some("INTEGER")
    );
    assert_eq!(
        metadata.edge_property_type("ACTED_IN", "roles"),
        Some("LIST")
    );

    let acted_in = metadata.edge_endpoints.get("ACTED_IN").unwrap();
    assert!(acted_in.start.contains("Person"));
    assert_eq!(
        acted_in.end.iter().collect::<Vec<_>>(),
        vec!["Movie"],
        "ACTED_IN was only observed ending at Movie nodes"
    );

    // The director node carries both labels, and both must be observed
    let directed = metadata.edge_endpoints.get("DIRECTED").unwrap();
    assert!(directed.start.contains("Director"));
    assert!(directed.start.contains("Person"));
}

#[test]
fn test_generated_module_contains_accessor_per_entity() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("movies.db");
    let store = SqliteGraph::open(&db_path).unwrap();
    seed_sqlite_fixture(&store);

    let synth = synthesizer(&db_path.display().to_string());
    let artifact = synth
        .generate(&store, dir.path(), None)
        .expect("generation failed");
    assert!(artifact.ends_with("movies_graph.rs"));

    let text = fs::read_to_string(&artifact).unwrap();
    for accessor in ["fn movie(", "fn person(", "fn director(", "fn acted_in(", "fn directed("] {
        assert!(text.contains(accessor), "missing accessor: {}", accessor);
    }
    assert!(text.contains("pub fn metadata() -> SchemaMetadata"));
    assert!(text.contains("meta.insert_node_property(\"Movie\", \"released\", \"INTEGER\");"));
    assert!(text.contains(&format!("{:?}", db_path.display().to_string())));
}

#[test]
fn test_regeneration_is_idempotent_modulo_timestamp() {
    let store = SqliteGraph::open_in_memory().unwrap();
    seed_sqlite_fixture(&store);

    let synth = synthesizer("/tmp/movies.db");
    let metadata = SchemaIntrospector::new(&store).introspect().unwrap();
    let first = synth.assemble(&metadata).unwrap();
    let second = synth.assemble(&metadata).unwrap();

    let timestamp = Regex::new(r"(?m)^// Generated at: .*$").unwrap();
    assert_eq!(
        timestamp.replace_all(&first, ""),
        timestamp.replace_all(&second, ""),
        "artifacts over an unchanged schema must differ only in the timestamp line"
    );
    // Exactly one permitted provenance-timestamp line
    assert_eq!(timestamp.find_iter(&first).count(), 1);
}

#[test]
fn test_regeneration_replaces_artifact_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("movies.db");
    let store = SqliteGraph::open(&db_path).unwrap();
    seed_sqlite_fixture(&store);

    let synth = synthesizer(&db_path.display().to_string());
    let first = synth.generate(&store, dir.path(), None).unwrap();

    // A later run, after the schema grew, fully replaces the artifact
    let studio = graphloom::NodeRecord::new(["Studio"])
        .with_property("name", graphloom::PropertyValue::Str("Syncopy".into()));
    store.put_node(&studio).unwrap();

    let second = synth.generate(&store, dir.path(), None).unwrap();
    assert_eq!(first, second);

    let text = fs::read_to_string(&second).unwrap();
    assert!(text.contains("fn studio("));
}

#[test]
fn test_colliding_labels_abort_generation() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteGraph::open_in_memory().unwrap();
    let a = graphloom::NodeRecord::new(["Box-Office"]);
    let b = graphloom::NodeRecord::new(["BOX_OFFICE"]);
    store.put_node(&a).unwrap();
    store.put_node(&b).unwrap();

    let synth = synthesizer("/tmp/collide.db");
    let err = synth.generate(&store, dir.path(), None).unwrap_err();
    assert!(matches!(err, SynthError::IdentifierCollision { .. }));

    // Nothing partial reaches the output directory
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_empty_database_generates_empty_module() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteGraph::open_in_memory().unwrap();

    let synth = synthesizer("/tmp/empty.db");
    let artifact = synth.generate(&store, dir.path(), None).unwrap();
    let text = fs::read_to_string(&artifact).unwrap();

    assert!(text.contains("meta.node_labels = vec![];"));
    assert!(text.contains("pub fn module() -> SourceResult<ModuleHandle>"));
}
