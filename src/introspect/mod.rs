//! Schema discovery: introspector and metadata snapshot

mod introspector;
mod metadata;

pub use introspector::{
    IntrospectError, IntrospectResult, SchemaIntrospector, DEFAULT_SAMPLE_LIMIT,
};
pub use metadata::{EndpointSets, SchemaMetadata};
