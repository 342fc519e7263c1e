//! Graphloom CLI — introspect a property graph and generate access modules.
//!
//! Usage:
//!   graphloom generate --name demo [--db path] [--output dir] [--sample-limit N]
//!   graphloom schema [--db path] [--sample-limit N] [--json]
//!   graphloom seed [--db path]

use clap::{Parser, Subcommand};
use graphloom::{
    GeneratorProfile, ModuleSynthesizer, NodeRecord, PropertyValue, RelationshipRecord,
    SchemaIntrospector, SqliteGraph,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "graphloom",
    version,
    about = "Schema introspection and access-module generation for property graphs"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Introspect the database and generate an access module
    Generate {
        /// Logical graph name; the artifact is named <name>_graph.rs
        #[arg(long, default_value = "new")]
        name: String,
        /// Path to the graph database file
        #[arg(long)]
        db: Option<PathBuf>,
        /// Directory to write the generated module to
        #[arg(long, default_value = "generated_modules")]
        output: PathBuf,
        /// Maximum instances sampled per label/type during discovery
        #[arg(long)]
        sample_limit: Option<usize>,
    },
    /// Introspect the database and print the discovered schema
    Schema {
        /// Path to the graph database file
        #[arg(long)]
        db: Option<PathBuf>,
        /// Maximum instances sampled per label/type during discovery
        #[arg(long)]
        sample_limit: Option<usize>,
        /// Print the snapshot as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Load the built-in movie sample graph
    Seed {
        /// Path to the graph database file
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

/// Get the default database path (~/.local/share/graphloom/graph.db)
fn default_db_path() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    let loom_dir = data_dir.join("graphloom");
    std::fs::create_dir_all(&loom_dir).ok();
    loom_dir.join("graph.db")
}

fn open_store(db: Option<PathBuf>) -> Result<(SqliteGraph, PathBuf), String> {
    let db_path = db.unwrap_or_else(default_db_path);
    let store = SqliteGraph::open(&db_path)
        .map_err(|e| format!("Failed to open database at {}: {}", db_path.display(), e))?;
    Ok((store, db_path))
}

fn cmd_generate(
    name: &str,
    db: Option<PathBuf>,
    output: &PathBuf,
    sample_limit: Option<usize>,
) -> i32 {
    let (store, db_path) = match open_store(db) {
        Ok(opened) => opened,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let profile = GeneratorProfile {
        graph_name: name.to_string(),
        database_path: db_path.display().to_string(),
    };
    match ModuleSynthesizer::new(profile).generate(&store, output, sample_limit) {
        Ok(path) => {
            println!("Generated module: {}", path.display());
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_schema(db: Option<PathBuf>, sample_limit: Option<usize>, json: bool) -> i32 {
    let (store, _) = match open_store(db) {
        Ok(opened) => opened,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let mut introspector = SchemaIntrospector::new(&store);
    if let Some(limit) = sample_limit {
        introspector = introspector.with_sample_limit(limit);
    }
    let metadata = match introspector.introspect() {
        Ok(metadata) => metadata,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    if json {
        match serde_json::to_string_pretty(&metadata) {
            Ok(text) => {
                println!("{}", text);
                return 0;
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        }
    }

    println!(
        "Discovered schema (sampled <= {} instances per entity; rare properties may be absent)",
        introspector.sample_limit()
    );
    for label in &metadata.node_labels {
        let count = store.node_count(Some(label)).unwrap_or(0);
        println!("(:{})  [{} nodes]", label, count);
        if let Some(props) = metadata.node_properties.get(label) {
            for (name, native) in props {
                println!("    {}: {}", name, native);
            }
        }
    }
    for rel_type in &metadata.edge_types {
        let count = store.edge_count(Some(rel_type)).unwrap_or(0);
        let endpoints = metadata.edge_endpoints.get(rel_type);
        let start = endpoints
            .map(|e| e.start.iter().cloned().collect::<Vec<_>>().join("|"))
            .unwrap_or_default();
        let end = endpoints
            .map(|e| e.end.iter().cloned().collect::<Vec<_>>().join("|"))
            .unwrap_or_default();
        println!("(:{})-[:{}]->(:{})  [{} edges]", start, rel_type, end, count);
        if let Some(props) = metadata.edge_properties.get(rel_type) {
            for (name, native) in props {
                println!("    {}: {}", name, native);
            }
        }
    }
    0
}

fn cmd_seed(db: Option<PathBuf>) -> i32 {
    let (store, db_path) = match open_store(db) {
        Ok(opened) => opened,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    match seed_movie_graph(&store) {
        Ok((nodes, edges)) => {
            println!(
                "Seeded {} nodes and {} edges into {}",
                nodes,
                edges,
                db_path.display()
            );
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

/// A small movie graph for trying the pipeline end to end
fn seed_movie_graph(store: &SqliteGraph) -> Result<(usize, usize), graphloom::SourceError> {
    let movies = [
        ("Inception", 2010i64),
        ("The Matrix", 1999),
        ("Memento", 2000),
    ];
    let people = [
        ("Leonardo DiCaprio", 1974i64),
        ("Keanu Reeves", 1964),
        ("Carrie-Anne Moss", 1967),
        ("Guy Pearce", 1967),
    ];
    let roles = [
        ("Leonardo DiCaprio", "Inception", "Cobb"),
        ("Keanu Reeves", "The Matrix", "Neo"),
        ("Carrie-Anne Moss", "The Matrix", "Trinity"),
        ("Guy Pearce", "Memento", "Leonard"),
    ];

    let mut movie_ids = std::collections::HashMap::new();
    for &(title, released) in &movies {
        let node = NodeRecord::new(["Movie"])
            .with_property("title", PropertyValue::Str(title.to_string()))
            .with_property("released", PropertyValue::Int(released));
        movie_ids.insert(title, node.id.clone());
        store.put_node(&node)?;
    }

    let mut person_ids = std::collections::HashMap::new();
    for &(name, born) in &people {
        let node = NodeRecord::new(["Person"])
            .with_property("name", PropertyValue::Str(name.to_string()))
            .with_property("born", PropertyValue::Int(born));
        person_ids.insert(name, node.id.clone());
        store.put_node(&node)?;
    }

    for &(name, title, role) in &roles {
        let rel = RelationshipRecord::new("ACTED_IN").with_property(
            "roles",
            PropertyValue::List(vec![PropertyValue::Str(role.to_string())]),
        );
        store.put_edge(&rel, &person_ids[name], &movie_ids[title])?;
    }

    Ok((movies.len() + people.len(), roles.len()))
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Generate {
            name,
            db,
            output,
            sample_limit,
        } => cmd_generate(&name, db, &output, sample_limit),
        Commands::Schema {
            db,
            sample_limit,
            json,
        } => cmd_schema(db, sample_limit, json),
        Commands::Seed { db } => cmd_seed(db),
    };
    std::process::exit(code);
}
