//! Deferred edges
//!
//! Units are scanned one at a time, so a unit may depend on a name whose
//! defining unit has not been seen yet. Such dependencies are queued here and
//! replayed once every unit has been scanned and the definition table is
//! complete.

use crate::definitions::DefinitionTable;
use crate::error::GraphError;
use crate::graph::DependencyGraph;
use sqljoin_core::{Builtins, SqlObject};
use std::collections::BTreeMap;

/// Dependencies waiting for the scan to finish, grouped by name
#[derive(Debug, Clone, Default)]
pub struct DeferredEdges {
    /// dependency name -> (source unit, dependency) in the order they were queued
    pending: BTreeMap<String, Vec<(String, SqlObject)>>,
}

impl DeferredEdges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `unit -> dependency` for replay
    pub fn defer(&mut self, unit: impl Into<String>, dependency: SqlObject) {
        self.pending
            .entry(dependency.name.clone())
            .or_default()
            .push((unit.into(), dependency));
    }

    /// Number of queued entries
    pub fn len(&self) -> usize {
        self.pending.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Wire every queued dependency into the graph.
    ///
    /// Must run only after all units have been scanned. Returns the number of
    /// edges added. A name with no owner that is not a built-in fails the run.
    pub fn replay(
        self,
        graph: &mut DependencyGraph,
        definitions: &DefinitionTable,
        builtins: &Builtins,
    ) -> Result<usize, GraphError> {
        let mut added = 0;

        for (name, entries) in self.pending {
            for (unit, dependency) in entries {
                let Some(owner) = definitions.owner(&name) else {
                    if builtins.is_satisfied(&dependency) {
                        tracing::debug!(unit = %unit, dependency = %dependency, "built-in dependency");
                        continue;
                    }
                    return Err(GraphError::UndefinedDependency { unit, name });
                };

                if owner == unit {
                    continue;
                }

                let from = graph.create_node(unit.as_str());
                let to = graph.create_node(owner);
                graph.add_edge(from, to);
                added += 1;

                tracing::debug!(from = %unit, to = %owner, name = %name, "deferred edge resolved");
            }
        }

        Ok(added)
    }
}
