//! Core graph data structures

mod record;
mod value;

pub use record::{NodeRecord, RelationshipRecord, RelationshipTriple};
pub use value::{Properties, PropertyValue};
