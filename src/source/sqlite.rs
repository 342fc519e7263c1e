//! SQLite-backed property graph
//!
//! A single database file with a `nodes` and an `edges` table; labels and
//! properties are stored as JSON columns so the graph stays schema-flexible.
//! Thread-safe via an internal mutex on the connection; the lock is held for
//! the duration of one operation and released on every exit path.

use super::queries;
use super::traits::{
    CellValue, GraphSource, QueryExecutor, Row, SourceError, SourceResult,
};
use crate::graph::{NodeRecord, Properties, PropertyValue, RelationshipRecord, RelationshipTriple};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{params, Connection, ToSql};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite-backed graph store.
///
/// Implements both [`GraphSource`] (catalog/sampling, used by introspection)
/// and [`QueryExecutor`] (raw parameterized execution, used by generated
/// accessors and raw-query callers).
pub struct SqliteGraph {
    conn: Mutex<Connection>,
}

impl SqliteGraph {
    /// Open or create a graph database at the given path
    pub fn open(path: impl AsRef<Path>) -> SourceResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| SourceError::Connection(e.to_string()))?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory graph (useful for testing)
    pub fn open_in_memory() -> SourceResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| SourceError::Connection(e.to_string()))?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Initialize the database schema
    fn init_schema(conn: &Connection) -> SourceResult<()> {
        conn.execute_batch(
            r#"
            -- Nodes table: labels and properties as JSON
            CREATE TABLE IF NOT EXISTS nodes (
                id TEXT PRIMARY KEY,
                labels_json TEXT NOT NULL,
                properties_json TEXT NOT NULL
            );

            -- Edges table: exactly one type per edge
            CREATE TABLE IF NOT EXISTS edges (
                id TEXT PRIMARY KEY,
                rel_type TEXT NOT NULL,
                start_id TEXT NOT NULL,
                end_id TEXT NOT NULL,
                properties_json TEXT NOT NULL,
                FOREIGN KEY (start_id) REFERENCES nodes(id) ON DELETE CASCADE,
                FOREIGN KEY (end_id) REFERENCES nodes(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_edges_rel_type ON edges(rel_type);
            CREATE INDEX IF NOT EXISTS idx_edges_start ON edges(start_id);
            CREATE INDEX IF NOT EXISTS idx_edges_end ON edges(end_id);

            -- Enable foreign keys
            PRAGMA foreign_keys = ON;

            -- WAL mode for concurrent reads during writes
            PRAGMA journal_mode = WAL;
            "#,
        )?;
        Ok(())
    }

    fn conn(&self) -> SourceResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| SourceError::Connection("connection lock poisoned".to_string()))
    }

    /// Save a node (insert or update). The node must carry at least one label.
    pub fn put_node(&self, node: &NodeRecord) -> SourceResult<()> {
        if node.labels.is_empty() {
            return Err(SourceError::Invalid(format!(
                "node '{}' must carry at least one label",
                node.id
            )));
        }
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO nodes (id, labels_json, properties_json)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                labels_json = excluded.labels_json,
                properties_json = excluded.properties_json
            "#,
            params![
                node.id,
                serde_json::to_string(&node.labels)?,
                serde_json::to_string(&node.properties)?
            ],
        )?;
        Ok(())
    }

    /// Save an edge (insert or update). Both endpoints must already exist.
    pub fn put_edge(
        &self,
        rel: &RelationshipRecord,
        start_id: &str,
        end_id: &str,
    ) -> SourceResult<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO edges (id, rel_type, start_id, end_id, properties_json)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                rel_type = excluded.rel_type,
                start_id = excluded.start_id,
                end_id = excluded.end_id,
                properties_json = excluded.properties_json
            "#,
            params![
                rel.id,
                rel.rel_type,
                start_id,
                end_id,
                serde_json::to_string(&rel.properties)?
            ],
        )?;
        Ok(())
    }

    /// Count nodes, optionally restricted to one label
    pub fn node_count(&self, label: Option<&str>) -> SourceResult<usize> {
        let conn = self.conn()?;
        let count: i64 = match label {
            Some(label) => conn.query_row(
                "SELECT COUNT(*) FROM nodes \
                 WHERE EXISTS (SELECT 1 FROM json_each(nodes.labels_json) WHERE json_each.value = ?1)",
                params![label],
                |row| row.get(0),
            )?,
            None => conn.query_row("SELECT COUNT(*) FROM nodes", [], |row| row.get(0))?,
        };
        Ok(count as usize)
    }

    /// Count edges, optionally restricted to one type
    pub fn edge_count(&self, rel_type: Option<&str>) -> SourceResult<usize> {
        let conn = self.conn()?;
        let count: i64 = match rel_type {
            Some(rel_type) => conn.query_row(
                "SELECT COUNT(*) FROM edges WHERE rel_type = ?1",
                params![rel_type],
                |row| row.get(0),
            )?,
            None => conn.query_row("SELECT COUNT(*) FROM edges", [], |row| row.get(0))?,
        };
        Ok(count as usize)
    }

    /// Convert a property value to its SQL binding.
    ///
    /// Booleans bind as 0/1 and nested values as canonical JSON text, matching
    /// what `json_extract` yields for the stored JSON columns.
    fn to_sql_value(value: &PropertyValue) -> Value {
        match value {
            PropertyValue::Bool(b) => Value::Integer(i64::from(*b)),
            PropertyValue::Int(i) => Value::Integer(*i),
            PropertyValue::Float(f) => Value::Real(*f),
            PropertyValue::Str(_) | PropertyValue::Date(_) | PropertyValue::DateTime(_) => {
                Value::Text(value.as_param_string())
            }
            PropertyValue::List(_) | PropertyValue::Map(_) => {
                Value::Text(serde_json::to_string(value).unwrap_or_default())
            }
        }
    }

    /// Extract a text cell from a strictly-shaped internal result row
    fn require_text(row: &Row, column: &str) -> SourceResult<String> {
        match row.get(column) {
            Some(CellValue::Value(PropertyValue::Str(s))) => Ok(s.clone()),
            other => Err(SourceError::Corrupt(format!(
                "expected text in column '{}', got {:?}",
                column, other
            ))),
        }
    }

    /// Assemble a node from the aliased columns of an internal query
    fn node_from_row(row: &Row, prefix: &str) -> SourceResult<NodeRecord> {
        let id = Self::require_text(row, &format!("{}id", prefix))?;
        let labels: Vec<String> =
            serde_json::from_str(&Self::require_text(row, &format!("{}labels", prefix))?)?;
        let properties: Properties =
            serde_json::from_str(&Self::require_text(row, &format!("{}properties", prefix))?)?;
        Ok(NodeRecord {
            id,
            labels,
            properties,
        })
    }

    fn triple_from_row(row: &Row) -> SourceResult<RelationshipTriple> {
        let start = Self::node_from_row(row, "start_")?;
        let end = Self::node_from_row(row, "end_")?;
        let rel = RelationshipRecord {
            id: Self::require_text(row, "rel_id")?,
            rel_type: Self::require_text(row, "rel_type")?,
            properties: serde_json::from_str(&Self::require_text(row, "rel_properties")?)?,
        };
        Ok((start, rel, end))
    }
}

impl QueryExecutor for SqliteGraph {
    fn execute(&self, text: &str, params: &[(String, PropertyValue)]) -> SourceResult<Vec<Row>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(text)?;
        let columns: Vec<String> = stmt
            .column_names()
            .iter()
            .map(|c| c.to_string())
            .collect();

        let bound: Vec<(String, Value)> = params
            .iter()
            .map(|(key, value)| (format!(":{}", key), Self::to_sql_value(value)))
            .collect();
        let param_refs: Vec<(&str, &dyn ToSql)> = bound
            .iter()
            .map(|(key, value)| (key.as_str(), value as &dyn ToSql))
            .collect();

        let mut rows = stmt.query(param_refs.as_slice())?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut cells = Row::new();
            for (i, name) in columns.iter().enumerate() {
                let cell = match row.get_ref(i)? {
                    ValueRef::Null | ValueRef::Blob(_) => CellValue::Null,
                    ValueRef::Integer(v) => CellValue::Value(PropertyValue::Int(v)),
                    ValueRef::Real(v) => CellValue::Value(PropertyValue::Float(v)),
                    ValueRef::Text(t) => CellValue::Value(PropertyValue::Str(
                        String::from_utf8_lossy(t).into_owned(),
                    )),
                };
                cells.push(name.clone(), cell);
            }
            out.push(cells);
        }
        Ok(out)
    }
}

impl GraphSource for SqliteGraph {
    fn node_labels(&self) -> SourceResult<Vec<String>> {
        let (text, params) = queries::node_labels();
        let rows = self.execute(&text, &params)?;
        rows.iter()
            .map(|row| Self::require_text(row, "label"))
            .collect()
    }

    fn relationship_types(&self) -> SourceResult<Vec<String>> {
        let (text, params) = queries::relationship_types();
        let rows = self.execute(&text, &params)?;
        rows.iter()
            .map(|row| Self::require_text(row, "rel_type"))
            .collect()
    }

    fn sample_nodes(&self, label: &str, limit: Option<usize>) -> SourceResult<Vec<NodeRecord>> {
        let (text, params) = queries::sample_nodes(label, limit);
        let rows = self.execute(&text, &params)?;
        rows.iter().map(|row| Self::node_from_row(row, "")).collect()
    }

    fn sample_relationships(
        &self,
        rel_type: &str,
        limit: Option<usize>,
    ) -> SourceResult<Vec<RelationshipTriple>> {
        let (text, params) = queries::sample_relationships(rel_type, limit);
        let rows = self.execute(&text, &params)?;
        rows.iter().map(Self::triple_from_row).collect()
    }
}
