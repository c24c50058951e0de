//! The join pipeline
//!
//! A run has two phases separated by a hard barrier:
//!
//! 1. **Scan**: every unit is parsed; its definitions go into the
//!    definition table and its dependencies become edges, or are deferred
//!    when the defining unit has not been scanned yet.
//! 2. **Resolve + sort**: deferred edges are replayed against the complete
//!    definition table, the graph is sorted dependency-first, and the raw
//!    unit contents are concatenated in that order.
//!
//! [`SchemaJoiner::finish`] consumes the joiner, so nothing can be scanned
//! after resolution has started.

use crate::error::JoinError;
use crate::walker::SourceWalker;
use sqljoin_core::{unique, Builtins, Config, SqlObject};
use sqljoin_graph::{top_sort, DeferredEdges, DefinitionTable, DependencyGraph};
use sqljoin_sql::{ObjectExtractor, ParsedSql, SqlParser};
use std::collections::HashMap;
use std::path::Path;

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct JoinedSchema {
    /// Unit names, dependency-first
    pub order: Vec<String>,

    /// Raw unit contents in `order`, each followed by a newline
    pub script: String,

    /// The fully resolved dependency graph
    pub graph: DependencyGraph,
}

/// Scan-phase state for one run
pub struct SchemaJoiner {
    parser: SqlParser,
    builtins: Builtins,
    graph: DependencyGraph,
    definitions: DefinitionTable,
    deferred: DeferredEdges,

    /// Unit name -> raw content, emitted verbatim at the end
    contents: HashMap<String, String>,
}

impl SchemaJoiner {
    pub fn new(parser: SqlParser, builtins: Builtins) -> Self {
        Self {
            parser,
            builtins,
            graph: DependencyGraph::new(),
            definitions: DefinitionTable::new(),
            deferred: DeferredEdges::new(),
            contents: HashMap::new(),
        }
    }

    /// Parser dialect and allow-list taken from a config
    pub fn from_config(config: &Config) -> Self {
        Self::new(SqlParser::from_dialect(&config.dialect), config.builtins())
    }

    /// Read, parse and scan one file
    pub fn add_file(&mut self, path: &Path) -> Result<ParsedSql, JoinError> {
        let sql = std::fs::read_to_string(path).map_err(|source| JoinError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        self.add_unit(path, &sql)
    }

    /// Parse and scan one unit's SQL text
    pub fn add_unit(&mut self, path: &Path, sql: &str) -> Result<ParsedSql, JoinError> {
        let parsed = self.parser.parse(sql, Some(path))?;
        let objects = ObjectExtractor::extract(&parsed.statements);

        self.add_objects(
            path.display().to_string(),
            parsed.sql.clone(),
            objects.definitions,
            objects.dependencies,
        );

        Ok(parsed)
    }

    /// Scan a unit from already extracted objects.
    ///
    /// Both lists are deduplicated here; callers may pass duplicates.
    pub fn add_objects(
        &mut self,
        unit: impl Into<String>,
        content: impl Into<String>,
        definitions: Vec<SqlObject>,
        dependencies: Vec<SqlObject>,
    ) {
        let unit = unit.into();
        let node = self.graph.create_node(unit.as_str());

        let definitions = unique(definitions);
        for definition in &definitions {
            self.definitions.insert(definition.name.clone(), unit.as_str());
        }

        let mut deferred = 0;
        for dependency in unique(dependencies) {
            match self.definitions.owner(&dependency.name) {
                Some(owner) if owner != unit => {
                    let owner = self.graph.create_node(owner);
                    self.graph.add_edge(node, owner);
                }
                Some(_) => {}
                None => {
                    self.deferred.defer(unit.as_str(), dependency);
                    deferred += 1;
                }
            }
        }

        tracing::debug!(
            unit = %unit,
            definitions = definitions.len(),
            deferred,
            "scanned unit"
        );

        self.contents.insert(unit, content.into());
    }

    /// The graph as built so far (deferred edges not yet applied)
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Number of dependencies still waiting for replay
    pub fn pending(&self) -> usize {
        self.deferred.len()
    }

    /// Replay deferred edges, sort, and assemble the script
    pub fn finish(self) -> Result<JoinedSchema, JoinError> {
        let Self {
            mut graph,
            definitions,
            deferred,
            builtins,
            contents,
            ..
        } = self;

        let replayed = deferred.replay(&mut graph, &definitions, &builtins)?;
        tracing::debug!(
            nodes = graph.len(),
            edges = graph.edge_count(),
            replayed,
            "dependency graph complete"
        );

        let sorted = top_sort(&graph)?;

        let mut order = Vec::with_capacity(sorted.len());
        let mut script = String::new();
        for id in sorted {
            let name = graph.name(id);
            if let Some(content) = contents.get(name) {
                script.push_str(content);
                script.push('\n');
            }
            order.push(name.to_string());
        }

        Ok(JoinedSchema {
            order,
            script,
            graph,
        })
    }
}

/// Walk a directory and join every unit found.
///
/// `on_unit` sees each parsed unit in scan order.
pub fn join_directory<F>(
    walker: &SourceWalker,
    config: &Config,
    mut on_unit: F,
) -> Result<JoinedSchema, JoinError>
where
    F: FnMut(&ParsedSql),
{
    let mut joiner = SchemaJoiner::from_config(config);

    for path in walker.discover()? {
        let parsed = joiner.add_file(&path)?;
        on_unit(&parsed);
    }

    tracing::debug!(pending = joiner.pending(), "scan complete");
    joiner.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sqljoin_graph::GraphError;

    fn joiner() -> SchemaJoiner {
        SchemaJoiner::new(SqlParser::new(), Builtins::default())
    }

    #[test]
    fn scenario_in_scan_order() {
        let mut joiner = joiner();
        joiner.add_objects("a.sql", "A", vec![SqlObject::table("t1")], vec![]);
        joiner.add_objects("b.sql", "B", vec![SqlObject::view("v1")], vec![SqlObject::table("t1")]);
        joiner.add_objects("c.sql", "C", vec![SqlObject::table("t2")], vec![SqlObject::table("v1")]);

        assert_eq!(joiner.pending(), 0);

        let joined = joiner.finish().unwrap();
        assert_eq!(joined.order, vec!["a.sql", "b.sql", "c.sql"]);
        assert_eq!(joined.script, "A\nB\nC\n");
    }

    #[test]
    fn forward_references_are_deferred() {
        let mut joiner = joiner();
        joiner.add_objects("a.sql", "A", vec![], vec![SqlObject::table("x")]);
        assert_eq!(joiner.pending(), 1);
        assert_eq!(joiner.graph().edge_count(), 0);

        joiner.add_objects("b.sql", "B", vec![SqlObject::table("x")], vec![]);

        let joined = joiner.finish().unwrap();
        assert_eq!(joined.order, vec!["b.sql", "a.sql"]);
        assert_eq!(joined.graph.dependencies("a.sql"), vec!["b.sql"]);
    }

    #[test]
    fn duplicates_are_collapsed() {
        let mut joiner = joiner();
        joiner.add_objects("a.sql", "A", vec![SqlObject::table("t"), SqlObject::table("t")], vec![]);
        joiner.add_objects(
            "b.sql",
            "B",
            vec![],
            vec![SqlObject::table("t"), SqlObject::table("t")],
        );

        let joined = joiner.finish().unwrap();
        assert_eq!(joined.graph.edge_count(), 1);
    }

    #[test]
    fn undefined_dependency_aborts() {
        let mut joiner = joiner();
        joiner.add_objects("x.sql", "X", vec![], vec![SqlObject::table("y")]);

        let err = joiner.finish().unwrap_err();
        assert!(matches!(
            err,
            JoinError::Graph(GraphError::UndefinedDependency { ref name, .. }) if name == "y"
        ));
    }

    #[test]
    fn add_unit_parses_sql() {
        let mut joiner = joiner();
        let users = "CREATE TABLE users (id INTEGER PRIMARY KEY);";
        let orders = "CREATE TABLE orders (id INTEGER, user_id INTEGER REFERENCES users (id));";

        joiner.add_unit(Path::new("orders.sql"), orders).unwrap();
        joiner.add_unit(Path::new("users.sql"), users).unwrap();

        let joined = joiner.finish().unwrap();
        assert_eq!(joined.order, vec!["users.sql", "orders.sql"]);
        assert_eq!(joined.script, format!("{users}\n{orders}\n"));
    }

    #[test]
    fn parse_failure_names_the_unit() {
        let mut joiner = joiner();
        let err = joiner
            .add_unit(Path::new("broken.sql"), "CREATE TABLE (")
            .unwrap_err();

        assert!(matches!(err, JoinError::Parse(_)));
        assert!(err.to_string().contains("broken.sql"));
    }
}
