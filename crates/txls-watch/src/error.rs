//! Watch registry error types.

/// Errors from watch registration.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// A watch already exists for the project name. Call sites must
    /// unwatch before re-watching.
    #[error("watch already registered for project: {0}")]
    DuplicateWatch(String),

    /// The glob pattern could not be compiled.
    #[error("invalid watch pattern '{pattern}': {detail}")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// Compiler diagnostic.
        detail: String,
    },

    /// The underlying watcher backend failed.
    #[error("watcher error: {0}")]
    Backend(#[from] notify::Error),
}
