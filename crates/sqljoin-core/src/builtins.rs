//! Names that are always satisfied outside the scanned schema
//!
//! A dependency on one of these never needs a defining unit.

use crate::object::SqlObject;
use std::collections::BTreeSet;

/// Namespaces shipped with PostgreSQL itself
pub const DEFAULT_BUILTINS: &[&str] = &["pg_catalog", "information_schema"];

/// Allow-list of externally provided names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Builtins {
    names: BTreeSet<String>,
}

impl Builtins {
    /// An allow-list with nothing on it
    pub fn empty() -> Self {
        Self {
            names: BTreeSet::new(),
        }
    }

    /// Add a name to the list
    pub fn insert(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    /// Check a bare name
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// An object is satisfied if its name, or the schema it is qualified
    /// with, is on the list.
    pub fn is_satisfied(&self, object: &SqlObject) -> bool {
        self.contains(&object.name)
            || object
                .schema
                .as_deref()
                .is_some_and(|schema| self.contains(schema))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl Default for Builtins {
    fn default() -> Self {
        DEFAULT_BUILTINS.iter().copied().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for Builtins {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for Builtins {
    fn extend<T: IntoIterator<Item = S>>(&mut self, iter: T) {
        self.names.extend(iter.into_iter().map(Into::into));
    }
}
