//! SQL parsing and object extraction
//!
//! This crate handles:
//! - Parsing source units using sqlparser-rs
//! - Extracting the tables, views and functions a unit defines
//! - Extracting the objects a unit depends on
//! - Rendering parse trees as JSON for inspection

pub mod parser;
pub mod extractor;

pub use parser::{SqlParser, ParsedSql, ParseError};
pub use extractor::{ObjectExtractor, ExtractedObjects};
