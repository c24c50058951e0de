//! Source unit discovery
//!
//! Walks the schema directory in lexical file-name order so the scan, and
//! therefore the sort's tie-breaking, is the same on every run.

use crate::error::JoinError;
use sqljoin_core::Config;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Finds the source units under a root directory
#[derive(Debug, Clone)]
pub struct SourceWalker {
    root: PathBuf,

    /// Path substrings; any entry whose path contains one is skipped
    ignore: Vec<String>,

    /// Extensions (without the dot) that count as source units
    extensions: Vec<String>,
}

impl SourceWalker {
    /// Walk `root` for `.sql` files, ignoring nothing
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ignore: Vec::new(),
            extensions: vec!["sql".to_string()],
        }
    }

    /// Walk `root` using the ignore list and extensions from a config
    pub fn from_config(root: impl Into<PathBuf>, config: &Config) -> Self {
        Self::new(root)
            .with_ignore(config.ignore.iter().cloned())
            .with_extensions(config.extensions.iter().cloned())
    }

    /// Add ignore substrings
    pub fn with_ignore<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Replace the accepted extensions
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All source unit paths, in walk order
    pub fn discover(&self) -> Result<Vec<PathBuf>, JoinError> {
        if !self.root.is_dir() {
            return Err(JoinError::MissingRoot(self.root.clone()));
        }

        let mut units = Vec::new();

        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_ignored(entry.path()));

        for entry in walker {
            let entry = entry?;
            if self.is_source_unit(&entry) {
                units.push(entry.into_path());
            }
        }

        tracing::debug!(root = %self.root.display(), units = units.len(), "discovered source units");
        Ok(units)
    }

    fn is_ignored(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        self.ignore.iter().any(|pattern| path.contains(pattern.as_str()))
    }

    fn is_source_unit(&self, entry: &DirEntry) -> bool {
        if !entry.file_type().is_file() {
            return false;
        }

        entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|allowed| allowed == ext))
    }
}
