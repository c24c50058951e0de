//! sqljoin Core
//!
//! Shared domain model: the schema objects a source unit defines or
//! depends on, the built-in allow-list, and the configuration file.

pub mod object;
pub mod builtins;
pub mod config;

pub use object::{ObjectKind, SqlObject, unique};
pub use builtins::Builtins;
pub use config::{Config, ConfigError, DialectConfig};
