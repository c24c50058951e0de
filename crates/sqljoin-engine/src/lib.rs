//! sqljoin engine - scan, resolve, sort, join
//!
//! This crate drives a full run:
//! - Walking the schema directory for source units
//! - Scanning each unit into the dependency graph
//! - Replaying deferred edges once scanning is complete
//! - Sorting and concatenating units dependency-first

pub mod walker;
pub mod joiner;
pub mod error;

pub use walker::SourceWalker;
pub use joiner::{JoinedSchema, SchemaJoiner, join_directory};
pub use error::JoinError;
