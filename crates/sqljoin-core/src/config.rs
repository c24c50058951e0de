//! Configuration schema (sqljoin.toml)

use serde::{Deserialize, Serialize};
use crate::builtins::Builtins;

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "sqljoin.toml";

/// SQL dialect configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectConfig {
    /// PostgreSQL SQL dialect
    #[default]
    Postgres,

    /// Generic ANSI SQL
    Ansi,

    /// BigQuery SQL dialect
    BigQuery,

    /// Snowflake SQL dialect
    Snowflake,
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// SQL dialect used to parse source units
    #[serde(default)]
    pub dialect: DialectConfig,

    /// Extra names treated as always defined, on top of the PostgreSQL namespaces
    #[serde(default)]
    pub builtins: Vec<String>,

    /// Path substrings; matching files and directories are skipped
    #[serde(default)]
    pub ignore: Vec<String>,

    /// File extensions that count as source units
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

fn default_extensions() -> Vec<String> {
    vec!["sql".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dialect: DialectConfig::default(),
            builtins: Vec::new(),
            ignore: Vec::new(),
            extensions: default_extensions(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Full allow-list: the PostgreSQL defaults plus configured names
    pub fn builtins(&self) -> Builtins {
        let mut builtins = Builtins::default();
        builtins.extend(self.builtins.iter().cloned());
        builtins
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}
