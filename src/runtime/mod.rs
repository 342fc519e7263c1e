//! Shared runtime for generated access modules
//!
//! Generated modules stay thin by linking against this module instead of
//! re-embedding query construction, validation, and normalization per
//! artifact.

mod accessors;
mod module;
pub mod normalize;

pub use accessors::{
    fetch_nodes, fetch_relationships, AccessError, AccessResult, NodeQuery, RelationshipQuery,
};
pub use module::{EdgeAccessor, ModuleHandle, NodeAccessor};
