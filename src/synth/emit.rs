//! Module assembly and artifact emission
//!
//! Assembly is pure: metadata in, source text out, so it is testable with
//! fixture snapshots and no database. Emission to disk is destructive and
//! idempotent: the prior artifact is deleted and the new one promoted over
//! the target path with an atomic rename, so a crash mid-write never leaves
//! a half-written file under the artifact's name.

use super::ident::normalize_identifier;
use crate::introspect::{IntrospectError, SchemaIntrospector, SchemaMetadata};
use crate::source::GraphSource;
use chrono::{SecondsFormat, Utc};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Identifiers the generated module reserves for its fixed entry points
const RESERVED_IDENTS: &[&str] = &["metadata", "connect", "execute_query", "module", "module_with"];

/// Errors that abort module synthesis
#[derive(Debug, Error)]
pub enum SynthError {
    #[error("identifier collision: '{first}' and '{second}' both normalize to '{identifier}'")]
    IdentifierCollision {
        first: String,
        second: String,
        identifier: String,
    },

    #[error("entity '{name}' normalizes to reserved identifier '{identifier}'")]
    ReservedIdentifier { name: String, identifier: String },

    #[error("introspection failed: {0}")]
    Introspect(#[from] IntrospectError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Connection configuration embedded into a generated module
#[derive(Debug, Clone)]
pub struct GeneratorProfile {
    /// Logical graph name; the artifact is named `<graph_name>_graph.rs`
    pub graph_name: String,
    /// Database path the module connects back to
    pub database_path: String,
}

/// Assembles generated access modules from schema snapshots.
pub struct ModuleSynthesizer {
    profile: GeneratorProfile,
}

impl ModuleSynthesizer {
    pub fn new(profile: GeneratorProfile) -> Self {
        Self { profile }
    }

    /// Assemble the complete source text of the access module.
    ///
    /// Output is deterministic for a given snapshot except for the single
    /// provenance-timestamp comment line.
    pub fn assemble(&self, metadata: &SchemaMetadata) -> Result<String, SynthError> {
        let node_idents = assign_identifiers(&metadata.node_labels, &mut reserved_map())?;
        // Accessors share one flat namespace, so types are checked against
        // the node identifiers as well.
        let mut used = reserved_map();
        for (ident, label) in &node_idents {
            used.insert(ident.clone(), label.clone());
        }
        let edge_idents = assign_identifiers(&metadata.edge_types, &mut used)?;

        let mut out = String::new();
        self.emit_header(&mut out);
        self.emit_constants(&mut out);
        emit_metadata_fn(&mut out, metadata);
        emit_entry_points(&mut out);
        for (ident, label) in &node_idents {
            emit_node_accessor(&mut out, ident, label);
        }
        for (ident, rel_type) in &edge_idents {
            emit_edge_accessor(&mut out, ident, rel_type);
        }
        emit_module_constructors(&mut out, &node_idents, &edge_idents);

        tracing::info!(
            graph = %self.profile.graph_name,
            accessors = node_idents.len() + edge_idents.len(),
            "assembled access module"
        );
        Ok(out)
    }

    fn emit_header(&self, out: &mut String) {
        out.push_str(&format!(
            "//! Generated access module for the {:?} graph.\n", self.profile.graph_name));
        out.push_str("//!\n");
        out.push_str(&format!(
            "//! Auto-generated by graphloom {}. Regeneration replaces this file\n",
            crate::VERSION
        ));
        out.push_str("//! wholesale; edits made here do not survive.\n");
        out.push_str(&format!(
            "// Generated at: {}\n\n",
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
        out.push_str("use graphloom::graph::{NodeRecord, PropertyValue, RelationshipTriple};\n");
        out.push_str("use graphloom::introspect::SchemaMetadata;\n");
        out.push_str(
            "use graphloom::runtime::{self, AccessResult, ModuleHandle, NodeQuery, RelationshipQuery};\n",
        );
        out.push_str("use graphloom::source::{QueryExecutor, Row, SourceResult, SqliteGraph};\n");
        out.push_str("use std::sync::Arc;\n\n");
    }

    fn emit_constants(&self, out: &mut String) {
        out.push_str("/// Database this module was generated against.\n");
        out.push_str(&format!(
            "pub const DATABASE_PATH: &str = {:?};\n",
            self.profile.database_path
        ));
        out.push_str("/// Logical graph name supplied at generation time.\n");
        out.push_str(&format!(
            "pub const GRAPH_NAME: &str = {:?};\n\n",
            self.profile.graph_name
        ));
    }

    /// Delete any prior artifact and promote the new source over the target
    /// path. Returns the artifact path.
    pub fn write_artifact(&self, output_dir: &Path, source: &str) -> Result<PathBuf, SynthError> {
        fs::create_dir_all(output_dir)?;
        let file_stem = normalize_identifier(&self.profile.graph_name);
        let target = output_dir.join(format!("{}_graph.rs", file_stem));

        if target.exists() {
            tracing::info!(path = %target.display(), "removing prior artifact");
            fs::remove_file(&target)?;
        }

        let staging = output_dir.join(format!("{}_graph.rs.tmp", file_stem));
        fs::write(&staging, source)?;
        fs::rename(&staging, &target)?;

        tracing::info!(path = %target.display(), "artifact written");
        Ok(target)
    }

    /// The full pipeline: introspect, assemble, write.
    ///
    /// Any step failure aborts the run; nothing partial reaches the target
    /// path.
    pub fn generate(
        &self,
        source: &dyn GraphSource,
        output_dir: &Path,
        sample_limit: Option<usize>,
    ) -> Result<PathBuf, SynthError> {
        let mut introspector = SchemaIntrospector::new(source);
        if let Some(limit) = sample_limit {
            introspector = introspector.with_sample_limit(limit);
        }
        let metadata = introspector.introspect()?;
        let text = self.assemble(&metadata)?;
        self.write_artifact(output_dir, &text)
    }
}

fn reserved_map() -> BTreeMap<String, String> {
    RESERVED_IDENTS
        .iter()
        .map(|ident| (ident.to_string(), String::new()))
        .collect()
}

/// Normalize each entity name, rejecting collisions instead of resolving them
fn assign_identifiers(
    names: &[String],
    used: &mut BTreeMap<String, String>,
) -> Result<Vec<(String, String)>, SynthError> {
    let mut assigned = Vec::new();
    for name in names {
        let ident = normalize_identifier(name);
        match used.get(&ident) {
            Some(prior) if prior.is_empty() => {
                return Err(SynthError::ReservedIdentifier {
                    name: name.clone(),
                    identifier: ident,
                });
            }
            Some(prior) => {
                return Err(SynthError::IdentifierCollision {
                    first: prior.clone(),
                    second: name.clone(),
                    identifier: ident,
                });
            }
            None => {
                used.insert(ident.clone(), name.clone());
                assigned.push((ident, name.clone()));
            }
        }
    }
    Ok(assigned)
}

/// Embed the snapshot as literal construction code
fn emit_metadata_fn(out: &mut String, metadata: &SchemaMetadata) {
    out.push_str("/// The schema snapshot captured at generation time.\n");
    out.push_str("pub fn metadata() -> SchemaMetadata {\n");
    out.push_str("    let mut meta = SchemaMetadata::default();\n");

    let labels: Vec<String> = metadata
        .node_labels
        .iter()
        .map(|l| format!("{:?}.to_string()", l))
        .collect();
    out.push_str(&format!("    meta.node_labels = vec![{}];\n", labels.join(", ")));
    for (label, props) in &metadata.node_properties {
        for (prop, native) in props {
            out.push_str(&format!(
                "    meta.insert_node_property({:?}, {:?}, {:?});\n",
                label, prop, native
            ));
        }
    }

    let types: Vec<String> = metadata
        .edge_types
        .iter()
        .map(|t| format!("{:?}.to_string()", t))
        .collect();
    out.push_str(&format!("    meta.edge_types = vec![{}];\n", types.join(", ")));
    for (rel_type, props) in &metadata.edge_properties {
        for (prop, native) in props {
            out.push_str(&format!(
                "    meta.insert_edge_property({:?}, {:?}, {:?});\n",
                rel_type, prop, native
            ));
        }
    }
    for (rel_type, endpoints) in &metadata.edge_endpoints {
        let start: Vec<String> = endpoints.start.iter().map(|l| format!("{:?}", l)).collect();
        let end: Vec<String> = endpoints.end.iter().map(|l| format!("{:?}", l)).collect();
        out.push_str(&format!(
            "    meta.insert_edge_endpoints({:?}, &[{}], &[{}]);\n",
            rel_type,
            start.join(", "),
            end.join(", ")
        ));
    }

    out.push_str("    meta\n}\n\n");
}

fn emit_entry_points(out: &mut String) {
    out.push_str("/// Open a connection to the database this module was generated against.\n");
    out.push_str("pub fn connect() -> SourceResult<SqliteGraph> {\n");
    out.push_str("    SqliteGraph::open(DATABASE_PATH)\n}\n\n");

    out.push_str("/// Execute a raw parameterized query.\n");
    out.push_str("pub fn execute_query(\n");
    out.push_str("    exec: &dyn QueryExecutor,\n");
    out.push_str("    text: &str,\n");
    out.push_str("    params: &[(String, PropertyValue)],\n");
    out.push_str(") -> SourceResult<Vec<Row>> {\n");
    out.push_str("    exec.execute(text, params)\n}\n\n");
}

fn emit_node_accessor(out: &mut String, ident: &str, label: &str) {
    out.push_str(&format!("/// Nodes labeled `{}`.\n", label));
    out.push_str(&format!(
        "pub fn {}(exec: &dyn QueryExecutor, query: &NodeQuery) -> AccessResult<Vec<NodeRecord>> {{\n",
        ident
    ));
    out.push_str("    let meta = metadata();\n");
    out.push_str(&format!(
        "    runtime::fetch_nodes(exec, {:?}, meta.node_properties.get({:?}), query)\n",
        label, label
    ));
    out.push_str("}\n\n");
}

fn emit_edge_accessor(out: &mut String, ident: &str, rel_type: &str) {
    out.push_str(&format!("/// Relationships of type `{}`.\n", rel_type));
    out.push_str(&format!(
        "pub fn {}(exec: &dyn QueryExecutor, query: &RelationshipQuery) -> AccessResult<Vec<RelationshipTriple>> {{\n",
        ident
    ));
    out.push_str("    let meta = metadata();\n");
    out.push_str(&format!(
        "    runtime::fetch_relationships(exec, {:?}, meta.edge_properties.get({:?}), query)\n",
        rel_type, rel_type
    ));
    out.push_str("}\n\n");
}

fn emit_module_constructors(
    out: &mut String,
    node_idents: &[(String, String)],
    edge_idents: &[(String, String)],
) {
    out.push_str("/// Assemble the module surface over a freshly opened connection.\n");
    out.push_str("pub fn module() -> SourceResult<ModuleHandle> {\n");
    out.push_str("    Ok(module_with(Arc::new(connect()?)))\n}\n\n");

    out.push_str("/// Assemble the module surface over an existing executor.\n");
    out.push_str("pub fn module_with(exec: Arc<dyn QueryExecutor>) -> ModuleHandle {\n");
    out.push_str("    let mut handle = ModuleHandle::new()\n");
    out.push_str("        .with_metadata(metadata())\n");
    out.push_str("        .with_executor(exec.clone());\n");
    for (ident, _) in node_idents {
        out.push_str("    {\n        let exec = exec.clone();\n");
        out.push_str(&format!(
            "        handle.add_node_accessor({:?}, Arc::new(move |query| {}(exec.as_ref(), query)));\n",
            ident, ident
        ));
        out.push_str("    }\n");
    }
    for (ident, _) in edge_idents {
        out.push_str("    {\n        let exec = exec.clone();\n");
        out.push_str(&format!(
            "        handle.add_edge_accessor({:?}, Arc::new(move |query| {}(exec.as_ref(), query)));\n",
            ident, ident
        ));
        out.push_str("    }\n");
    }
    out.push_str("    handle\n}\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie_metadata() -> SchemaMetadata {
        let mut meta = SchemaMetadata::default();
        meta.node_labels = vec!["Movie".into(), "Person".into()];
        meta.insert_node_property("Movie", "title", "STRING");
        meta.insert_node_property("Movie", "released", "INTEGER");
        meta.insert_node_property("Person", "name", "STRING");
        meta.edge_types = vec!["ACTED_IN".into()];
        meta.insert_edge_property("ACTED_IN", "roles", "LIST");
        meta.insert_edge_endpoints("ACTED_IN", &["Person"], &["Movie"]);
        meta
    }

    fn synthesizer() -> ModuleSynthesizer {
        ModuleSynthesizer::new(GeneratorProfile {
            graph_name: "demo".to_string(),
            database_path: "/tmp/demo.db".to_string(),
        })
    }

    #[test]
    fn test_assemble_contains_all_sections() {
        let text = synthesizer().assemble(&movie_metadata()).unwrap();
        assert!(text.contains("// Generated at: "));
        assert!(text.contains("pub const DATABASE_PATH: &str = \"/tmp/demo.db\";"));
        assert!(text.contains("pub fn metadata() -> SchemaMetadata"));
        assert!(text.contains("pub fn movie(exec: &dyn QueryExecutor"));
        assert!(text.contains("pub fn person(exec: &dyn QueryExecutor"));
        assert!(text.contains("pub fn acted_in(exec: &dyn QueryExecutor"));
        assert!(text.contains("pub fn module() -> SourceResult<ModuleHandle>"));
        assert!(text.contains("pub fn execute_query"));
    }

    #[test]
    fn test_assemble_embeds_snapshot_verbatim() {
        let text = synthesizer().assemble(&movie_metadata()).unwrap();
        assert!(text.contains("meta.insert_node_property(\"Movie\", \"released\", \"INTEGER\");"));
        assert!(text.contains("meta.insert_edge_endpoints(\"ACTED_IN\", &[\"Person\"], &[\"Movie\"]);"));
    }

    #[test]
    fn test_identifier_collision_is_fatal() {
        let mut meta = SchemaMetadata::default();
        meta.node_labels = vec!["ACTED_IN".into()];
        meta.edge_types = vec!["acted-in".into()];

        let err = synthesizer().assemble(&meta).unwrap_err();
        match err {
            SynthError::IdentifierCollision {
                first,
                second,
                identifier,
            } => {
                assert_eq!(first, "ACTED_IN");
                assert_eq!(second, "acted-in");
                assert_eq!(identifier, "acted_in");
            }
            other => panic!("expected collision, got {:?}", other),
        }
    }

    #[test]
    fn test_reserved_identifier_is_fatal() {
        let mut meta = SchemaMetadata::default();
        meta.node_labels = vec!["Connect".into()];

        assert!(matches!(
            synthesizer().assemble(&meta).unwrap_err(),
            SynthError::ReservedIdentifier { .. }
        ));
    }

    #[test]
    fn test_write_artifact_replaces_prior_file() {
        let dir = tempfile::tempdir().unwrap();
        let synth = synthesizer();

        let first = synth.write_artifact(dir.path(), "// old\n").unwrap();
        assert_eq!(fs::read_to_string(&first).unwrap(), "// old\n");

        let second = synth.write_artifact(dir.path(), "// new\n").unwrap();
        assert_eq!(first, second);
        assert_eq!(fs::read_to_string(&second).unwrap(), "// new\n");

        // No staging leftovers
        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries.len(), 1);
    }
}
