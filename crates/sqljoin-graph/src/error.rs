//! Graph resolution errors

/// Failures while wiring or ordering the graph. All of them end the run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// No unit defines the name and it is not a built-in
    #[error("undefined dependency: {unit} depends on {name}, which no unit defines")]
    UndefinedDependency { unit: String, name: String },

    /// The sorter found a back-edge `from -> to`
    #[error("circular reference detected: {from} -> {to} (cycle: {})", .path.join(" -> "))]
    CycleDetected {
        from: String,
        to: String,

        /// Full cycle, starting and ending at `to`
        path: Vec<String>,
    },
}
