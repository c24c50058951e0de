//! Schema objects (tables, views, functions)
//!
//! An object is a plain value: two objects are the same object when kind,
//! name and schema qualifier all match.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Kind of schema entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// `CREATE TABLE`
    Table,

    /// `CREATE VIEW` / `CREATE MATERIALIZED VIEW`
    View,

    /// `CREATE FUNCTION`
    Function,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::View => "view",
            Self::Function => "function",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named schema entity, used both for definitions and dependencies
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SqlObject {
    pub kind: ObjectKind,

    /// Unqualified name; this is what definitions and dependencies are matched on
    pub name: String,

    /// Explicit schema qualifier, if the SQL spelled one out
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

impl SqlObject {
    pub fn new(kind: ObjectKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            schema: None,
        }
    }

    pub fn table(name: impl Into<String>) -> Self {
        Self::new(ObjectKind::Table, name)
    }

    pub fn view(name: impl Into<String>) -> Self {
        Self::new(ObjectKind::View, name)
    }

    pub fn function(name: impl Into<String>) -> Self {
        Self::new(ObjectKind::Function, name)
    }

    /// Attach a schema qualifier
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }
}

impl fmt::Display for SqlObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{} {}.{}", self.kind, schema, self.name),
            None => write!(f, "{} {}", self.kind, self.name),
        }
    }
}

/// Remove structurally equal duplicates.
///
/// The result is sorted by name, then kind, then schema, so repeated runs
/// over the same input yield the same sequence.
pub fn unique<I>(objects: I) -> Vec<SqlObject>
where
    I: IntoIterator<Item = SqlObject>,
{
    let set: HashSet<SqlObject> = objects.into_iter().collect();
    let mut objects: Vec<SqlObject> = set.into_iter().collect();
    objects.sort_by(|a, b| {
        a.name
            .cmp(&b.name)
            .then(a.kind.cmp(&b.kind))
            .then_with(|| a.schema.cmp(&b.schema))
    });
    objects
}
