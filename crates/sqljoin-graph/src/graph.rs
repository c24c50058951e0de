//! Dependency graph store
//!
//! Nodes live in an arena and are addressed by [`NodeId`] handles, so a
//! handle taken early in the scan stays valid however many nodes are added
//! afterwards. A node's identity is its name.

use std::collections::{HashMap, HashSet};
use std::fmt;

/// Stable handle to a node in a [`DependencyGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A source unit and the units it depends on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    name: String,

    /// Targets of "depends on" edges, in insertion order (may repeat)
    edges: Vec<NodeId>,
}

impl Node {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn edges(&self) -> &[NodeId] {
        &self.edges
    }
}

/// Directed graph of units; an edge `a -> b` means `a` depends on `b`
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// All nodes, in creation order
    nodes: Vec<Node>,

    /// Name -> handle
    index: HashMap<String, NodeId>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node for `name` unless one exists; returns its handle either way.
    ///
    /// Creating an existing node leaves its edges untouched.
    pub fn create_node(&mut self, name: impl Into<String>) -> NodeId {
        let name = name.into();
        if let Some(&id) = self.index.get(&name) {
            return id;
        }

        let id = NodeId(self.nodes.len());
        self.index.insert(name.clone(), id);
        self.nodes.push(Node {
            name,
            edges: Vec::new(),
        });
        id
    }

    /// Exact-name lookup
    pub fn node(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    /// Resolve a handle.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different graph.
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Name of the node behind a handle
    pub fn name(&self, id: NodeId) -> &str {
        &self.get(id).name
    }

    /// Record that `from` depends on `to`. Duplicate edges are kept.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) {
        self.nodes[from.0].edges.push(to);
    }

    /// Membership by name
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Handles of all nodes, in creation order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// All nodes, in creation order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of edges, duplicates included
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|node| node.edges.len()).sum()
    }

    /// Names of the direct dependencies of a node
    pub fn dependencies(&self, name: &str) -> Vec<&str> {
        self.node(name)
            .map(|id| {
                self.get(id)
                    .edges
                    .iter()
                    .map(|&edge| self.name(edge))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl fmt::Display for DependencyGraph {
    /// One `name -> (dep1,dep2)` line per node
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            let deps: Vec<&str> = node.edges.iter().map(|&id| self.name(id)).collect();
            writeln!(f, "{} -> ({})", node.name, deps.join(","))?;
        }
        Ok(())
    }
}

/// Insertion-ordered set of node handles.
///
/// Used for the `resolved` and `unresolved` working sets of the sorter;
/// membership is by node identity, never by edge contents.
#[derive(Debug, Clone, Default)]
pub struct NodeSet {
    order: Vec<NodeId>,
    members: HashSet<NodeId>,
}

impl NodeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node; returns false if it was already present
    pub fn insert(&mut self, id: NodeId) -> bool {
        if self.members.insert(id) {
            self.order.push(id);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.members.contains(&id)
    }

    /// Remove a node; returns false if it was not present
    pub fn remove(&mut self, id: NodeId) -> bool {
        if self.members.remove(&id) {
            if self.order.last() == Some(&id) {
                self.order.pop();
            } else {
                self.order.retain(|&member| member != id);
            }
            true
        } else {
            false
        }
    }

    /// Members in insertion order
    pub fn as_slice(&self) -> &[NodeId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn into_vec(self) -> Vec<NodeId> {
        self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_node_is_idempotent() {
        let mut graph = DependencyGraph::new();
        let a = graph.create_node("a.sql");
        let b = graph.create_node("b.sql");
        graph.add_edge(a, b);

        let again = graph.create_node("a.sql");

        assert_eq!(again, a);
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.dependencies("a.sql"), vec!["b.sql"]);
    }

    #[test]
    fn handles_survive_growth() {
        let mut graph = DependencyGraph::new();
        let first = graph.create_node("first.sql");

        for i in 0..1_000 {
            graph.create_node(format!("unit_{i}.sql"));
        }

        let last = graph.create_node("last.sql");
        graph.add_edge(first, last);

        assert_eq!(graph.name(first), "first.sql");
        assert_eq!(graph.get(first).edges(), &[last]);
        assert_eq!(graph.node("first.sql"), Some(first));
    }

    #[test]
    fn lookup_missing_node() {
        let graph = DependencyGraph::new();
        assert_eq!(graph.node("nope.sql"), None);
        assert!(!graph.contains("nope.sql"));
        assert!(graph.dependencies("nope.sql").is_empty());
    }

    #[test]
    fn duplicate_edges_are_kept() {
        let mut graph = DependencyGraph::new();
        let a = graph.create_node("a.sql");
        let b = graph.create_node("b.sql");
        graph.add_edge(a, b);
        graph.add_edge(a, b);

        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn nodes_keep_creation_order() {
        let mut graph = DependencyGraph::new();
        for name in ["c.sql", "a.sql", "b.sql"] {
            graph.create_node(name);
        }

        let names: Vec<&str> = graph.nodes().map(Node::name).collect();
        assert_eq!(names, vec!["c.sql", "a.sql", "b.sql"]);
    }

    #[test]
    fn display_lists_edges() {
        let mut graph = DependencyGraph::new();
        let a = graph.create_node("a.sql");
        let b = graph.create_node("b.sql");
        let c = graph.create_node("c.sql");
        graph.add_edge(c, a);
        graph.add_edge(c, b);

        assert_eq!(
            graph.to_string(),
            "a.sql -> ()\nb.sql -> ()\nc.sql -> (a.sql,b.sql)\n"
        );
    }

    #[test]
    fn node_set_membership_is_by_identity() {
        let mut graph = DependencyGraph::new();
        let a = graph.create_node("a.sql");
        let b = graph.create_node("b.sql");

        let mut set = NodeSet::new();
        assert!(set.insert(a));
        assert!(!set.insert(a));

        // growing a's edge list does not change its identity
        graph.add_edge(a, b);
        assert!(set.contains(a));

        assert!(set.insert(b));
        assert!(set.remove(a));
        assert!(!set.remove(a));
        assert_eq!(set.as_slice(), &[b]);
    }
}
