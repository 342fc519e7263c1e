//! Database seam: traits, query templates, and backends

mod memory;
pub mod queries;
mod sqlite;
mod traits;

pub use memory::MemoryGraph;
pub use queries::Direction;
pub use sqlite::SqliteGraph;
pub use traits::{CellValue, GraphSource, QueryExecutor, Row, SourceError, SourceResult};
