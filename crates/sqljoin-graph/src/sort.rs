//! Depth-first topological sort with cycle detection
//!
//! Nodes are emitted in post-order, so every node appears after everything
//! it depends on. Roots are visited in graph creation order, which makes the
//! output deterministic for a given graph.

use crate::error::GraphError;
use crate::graph::{DependencyGraph, NodeId, NodeSet};

/// Order the graph dependency-first.
///
/// Fails on the first back-edge found; no partial order is returned.
pub fn top_sort(graph: &DependencyGraph) -> Result<Vec<NodeId>, GraphError> {
    let mut sorter = Sorter {
        graph,
        resolved: NodeSet::new(),
        unresolved: NodeSet::new(),
    };

    for id in graph.node_ids() {
        if !sorter.resolved.contains(id) {
            sorter.resolve(id)?;
        }
    }

    Ok(sorter.resolved.into_vec())
}

struct Sorter<'g> {
    graph: &'g DependencyGraph,

    /// Nodes whose whole dependency closure has been emitted
    resolved: NodeSet,

    /// Nodes on the active traversal path, outermost first
    unresolved: NodeSet,
}

impl Sorter<'_> {
    /// Resolve everything reachable from `root`. The traversal keeps its own
    /// frame stack, so chain length is not bounded by the thread stack.
    fn resolve(&mut self, root: NodeId) -> Result<(), GraphError> {
        // (node, index of the next edge to follow)
        let mut frames = vec![(root, 0usize)];
        self.unresolved.insert(root);

        while let Some(frame) = frames.last_mut() {
            let (id, next) = *frame;

            match self.graph.get(id).edges().get(next) {
                Some(&edge) => {
                    frame.1 += 1;
                    if self.resolved.contains(edge) {
                        continue;
                    }
                    if self.unresolved.contains(edge) {
                        return Err(self.cycle(id, edge));
                    }
                    self.unresolved.insert(edge);
                    frames.push((edge, 0));
                }
                None => {
                    frames.pop();
                    self.resolved.insert(id);
                    self.unresolved.remove(id);
                }
            }
        }

        Ok(())
    }

    /// Build the error for back-edge `from -> to`, walking the active path
    /// from `to` down to `from` and closing the loop.
    fn cycle(&self, from: NodeId, to: NodeId) -> GraphError {
        let stack = self.unresolved.as_slice();
        let start = stack.iter().position(|&id| id == to).unwrap_or(0);

        let mut path: Vec<String> = stack[start..]
            .iter()
            .map(|&id| self.graph.name(id).to_string())
            .collect();
        path.push(self.graph.name(to).to_string());

        GraphError::CycleDetected {
            from: self.graph.name(from).to_string(),
            to: self.graph.name(to).to_string(),
            path,
        }
    }
}
