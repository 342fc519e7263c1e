//! Graphloom: schema introspection and access-module generation for property graphs
//!
//! Graphloom discovers the structure of a live property graph by sampling it,
//! then synthesizes a typed Rust access module from the discovered schema.
//! A normalization adapter wraps any such module — complete or not — behind a
//! stable, never-failing read API.
//!
//! # Core Concepts
//!
//! - **Introspection**: labels, relationship types, property types, and
//!   endpoint label sets, discovered from sampled instance data
//! - **Synthesis**: one self-contained generated module per graph, linking
//!   against the shared [`runtime`]
//! - **Adaptation**: capability-classified dispatch over whatever surface a
//!   generated module actually presents
//!
//! # Example
//!
//! ```
//! use graphloom::{MemoryGraph, NodeRecord, PropertyValue, SchemaIntrospector};
//!
//! let mut graph = MemoryGraph::new();
//! graph.add_node(
//!     NodeRecord::new(["Movie"]).with_property("title", PropertyValue::Str("Inception".into())),
//! );
//!
//! let metadata = SchemaIntrospector::new(&graph).introspect().unwrap();
//! assert_eq!(metadata.node_labels, vec!["Movie".to_string()]);
//! ```

pub mod adapter;
pub mod graph;
pub mod introspect;
pub mod runtime;
pub mod source;
pub mod synth;
pub mod typemap;

pub use adapter::{Capability, GraphAdapter};
pub use graph::{NodeRecord, Properties, PropertyValue, RelationshipRecord, RelationshipTriple};
pub use introspect::{IntrospectError, SchemaIntrospector, SchemaMetadata};
pub use runtime::{AccessError, ModuleHandle, NodeQuery, RelationshipQuery};
pub use source::{GraphSource, MemoryGraph, QueryExecutor, SourceError, SqliteGraph};
pub use synth::{GeneratorProfile, ModuleSynthesizer, SynthError};
pub use typemap::{PropertyKind, TypeMismatch};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
