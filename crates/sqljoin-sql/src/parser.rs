//! SQL parsing using sqlparser-rs
//!
//! Parses a source unit into statements and keeps its raw text around,
//! since the raw text is what ends up in the joined script.

use sqlparser::ast::Statement;
use sqlparser::dialect::{Dialect, GenericDialect, BigQueryDialect, PostgreSqlDialect, SnowflakeDialect};
use sqlparser::parser::{Parser, ParserError};
use sqljoin_core::DialectConfig;
use std::path::{Path, PathBuf};

/// SQL parser with configurable dialect
pub struct SqlParser {
    dialect: Box<dyn Dialect>,
}

impl SqlParser {
    /// Create a new SQL parser with the default (PostgreSQL) dialect
    pub fn new() -> Self {
        Self::postgres()
    }

    /// Create a SQL parser for generic ANSI SQL
    pub fn generic() -> Self {
        Self {
            dialect: Box::new(GenericDialect {}),
        }
    }

    /// Create a SQL parser for PostgreSQL
    pub fn postgres() -> Self {
        Self {
            dialect: Box::new(PostgreSqlDialect {}),
        }
    }

    /// Create a SQL parser for BigQuery
    pub fn bigquery() -> Self {
        Self {
            dialect: Box::new(BigQueryDialect {}),
        }
    }

    /// Create a SQL parser for Snowflake
    pub fn snowflake() -> Self {
        Self {
            dialect: Box::new(SnowflakeDialect {}),
        }
    }

    /// Create a parser from a dialect config
    pub fn from_dialect(dialect: &DialectConfig) -> Self {
        match dialect {
            DialectConfig::Postgres => Self::postgres(),
            DialectConfig::Ansi => Self::generic(),
            DialectConfig::BigQuery => Self::bigquery(),
            DialectConfig::Snowflake => Self::snowflake(),
        }
    }

    /// Parse SQL string into AST
    pub fn parse(&self, sql: &str, file_path: Option<&Path>) -> Result<ParsedSql, ParseError> {
        match Parser::parse_sql(&*self.dialect, sql) {
            Ok(statements) => Ok(ParsedSql {
                sql: sql.to_string(),
                statements,
                file_path: file_path.map(Path::to_path_buf),
            }),
            Err(error) => Err(ParseError {
                error,
                file_path: file_path.map(Path::to_path_buf),
            }),
        }
    }

    /// Parse SQL from a file
    pub fn parse_file(&self, path: &Path) -> Result<ParsedSql, ParseError> {
        let sql = std::fs::read_to_string(path)
            .map_err(|e| ParseError {
                error: ParserError::ParserError(format!("Failed to read file: {}", e)),
                file_path: Some(path.to_path_buf()),
            })?;

        self.parse(&sql, Some(path))
    }
}

impl Default for SqlParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Successfully parsed source unit
#[derive(Debug, Clone)]
pub struct ParsedSql {
    /// Original SQL string, emitted verbatim into the joined script
    pub sql: String,

    /// Parsed statements
    pub statements: Vec<Statement>,

    /// Source file path (if parsed from file)
    pub file_path: Option<PathBuf>,
}

impl ParsedSql {
    /// Count the number of statements
    pub fn statement_count(&self) -> usize {
        self.statements.len()
    }

    /// Pretty-printed JSON of the parse tree, for inspection only
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.statements)
    }
}

/// A source unit the parser could not handle
#[derive(Debug, thiserror::Error)]
#[error("failed to parse sql file: {}: {error}", display_path(.file_path))]
pub struct ParseError {
    /// Parser error from sqlparser
    pub error: ParserError,

    /// Source file path
    pub file_path: Option<PathBuf>,
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<inline>".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_create_table() {
        let parser = SqlParser::new();
        let sql = "CREATE TABLE users (id SERIAL PRIMARY KEY, name TEXT NOT NULL);";

        let parsed = parser.parse(sql, None).unwrap();
        assert_eq!(parsed.statement_count(), 1);
        assert_eq!(parsed.sql, sql);
    }

    #[test]
    fn parse_multiple_statements() {
        let parser = SqlParser::new();
        let sql = r#"
            CREATE TABLE users (id INTEGER);
            CREATE VIEW all_users AS SELECT id FROM users;
        "#;

        let parsed = parser.parse(sql, None).unwrap();
        assert_eq!(parsed.statement_count(), 2);
    }

    #[test]
    fn parse_invalid_sql() {
        let parser = SqlParser::new();
        let path = Path::new("schema/broken.sql");

        let error = parser.parse("CREATE TABLE (", Some(path)).unwrap_err();

        assert_eq!(error.file_path.as_deref(), Some(path));
        assert!(error.to_string().starts_with("failed to parse sql file: schema/broken.sql: "));
    }

    #[test]
    fn missing_file_is_a_parse_error() {
        let parser = SqlParser::new();
        let error = parser.parse_file(Path::new("no/such/file.sql")).unwrap_err();

        assert!(error.to_string().contains("Failed to read file"));
    }

    #[test]
    fn different_dialects() {
        let sql = "SELECT id FROM users";

        for dialect in [
            DialectConfig::Postgres,
            DialectConfig::Ansi,
            DialectConfig::BigQuery,
            DialectConfig::Snowflake,
        ] {
            assert!(SqlParser::from_dialect(&dialect).parse(sql, None).is_ok());
        }
    }

    #[test]
    fn json_rendering() {
        let parser = SqlParser::new();
        let parsed = parser.parse("CREATE TABLE users (id INTEGER);", None).unwrap();

        let json = parsed.to_json().unwrap();
        assert!(json.contains("CreateTable"));
        assert!(json.contains("users"));
        assert!(json.contains('\n'));
    }
}
