//! Coordinator error type.
use std::path::PathBuf;

use txls_core::error::ToolchainError;
use txls_watch::WatchError;

/// Errors the lifecycle coordinators return to callers.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A name argument was empty or whitespace.
    #[error("name must not be empty")]
    EmptyName,

    /// Another lifecycle operation for the same project is still
    /// running; the caller should retry once it completes.
    #[error("an operation is already in flight for: {0}")]
    OperationInFlight(String),

    /// No installed project could be resolved from a picked path.
    #[error("no project name could be resolved from: {}", .0.display())]
    UnknownProject(PathBuf),

    /// The external toolchain failed.
    #[error(transparent)]
    Toolchain(#[from] ToolchainError),

    /// Watch registration failed.
    #[error(transparent)]
    Watch(#[from] WatchError),

    /// The per-call working directory could not be created.
    #[error("failed to create working directory: {0}")]
    Workdir(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_flight_display_names_project() {
        let err = ServiceError::OperationInFlight("demo".into());
        assert_eq!(err.to_string(), "an operation is already in flight for: demo");
    }

    #[test]
    fn toolchain_errors_convert() {
        let err = ServiceError::from(ToolchainError::ConnectionLost);
        assert!(matches!(err, ServiceError::Toolchain(_)));
    }

    #[test]
    fn unknown_project_display_contains_path() {
        let err = ServiceError::UnknownProject(PathBuf::from("/work/demo"));
        assert!(err.to_string().contains("/work/demo"));
    }
}
