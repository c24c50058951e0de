//! Name -> owning unit table

use std::collections::HashMap;

/// Which unit defines each name seen so far.
///
/// Append-only during the scan. A name defined twice keeps the last owner;
/// duplicates are not an error.
#[derive(Debug, Clone, Default)]
pub struct DefinitionTable {
    owners: HashMap<String, String>,
}

impl DefinitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `unit` as the owner of `name`
    pub fn insert(&mut self, name: impl Into<String>, unit: impl Into<String>) {
        let name = name.into();
        let unit = unit.into();

        if let Some(previous) = self.owners.get(&name) {
            if *previous != unit {
                tracing::warn!(
                    name = %name,
                    previous = %previous,
                    unit = %unit,
                    "name redefined; last definition wins"
                );
            }
        }

        self.owners.insert(name, unit);
    }

    /// Unit that defines `name`, if any
    pub fn owner(&self, name: &str) -> Option<&str> {
        self.owners.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}
