//! Syntax collaborator error types.

/// Errors from syntax parsing and keyword compilation.
#[derive(Debug, thiserror::Error)]
pub enum SyntaxError {
    /// The syntax definition was not valid JSON.
    #[error("syntax definition parse error: {0}")]
    Parse(String),

    /// A keyword pattern failed to compile.
    #[error("invalid keyword pattern for '{language}': {detail}")]
    InvalidPattern {
        /// Language the pattern belongs to.
        language: String,
        /// Compiler diagnostic.
        detail: String,
    },
}
