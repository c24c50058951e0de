//! Dependency graph construction and ordering
//!
//! This crate handles:
//! - Storing units as graph nodes with stable handles
//! - Tracking which unit owns each defined name
//! - Deferring edges whose target has not been scanned yet
//! - Depth-first topological sorting with cycle detection

pub mod graph;
pub mod definitions;
pub mod deferred;
pub mod sort;
pub mod error;

pub use graph::{DependencyGraph, Node, NodeId, NodeSet};
pub use definitions::DefinitionTable;
pub use deferred::DeferredEdges;
pub use sort::top_sort;
pub use error::GraphError;
