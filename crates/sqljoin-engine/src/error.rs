//! Run-level errors

use std::path::PathBuf;

/// Anything that aborts a join. There is no partial output.
#[derive(Debug, thiserror::Error)]
pub enum JoinError {
    #[error("schema directory does not exist: {}", .0.display())]
    MissingRoot(PathBuf),

    #[error("error walking files: {0}")]
    Traversal(#[from] walkdir::Error),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] sqljoin_sql::ParseError),

    #[error(transparent)]
    Graph(#[from] sqljoin_graph::GraphError),
}
