//! Errors at the collaborator seams.

/// Errors from the external toolchain seam.
#[derive(Debug, thiserror::Error)]
pub enum ToolchainError {
    /// The toolchain server process failed to start.
    #[error("toolchain failed to start: {0}")]
    SpawnFailed(String),

    /// Transport-level failure (server crashed, pipe closed).
    #[error("toolchain connection lost")]
    ConnectionLost,

    /// The server returned an error for a command.
    #[error("toolchain command '{command}' failed: {message}")]
    Command {
        /// The external command id.
        command: String,
        /// The server's error message.
        message: String,
    },

    /// Request timed out waiting for a response.
    #[error("toolchain request timed out after {0} seconds")]
    Timeout(u64),

    /// The response payload did not have the expected shape.
    #[error("invalid toolchain response: {0}")]
    InvalidResponse(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the editor-host seam.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// A host command (extension install, reload) failed.
    #[error("host command failed: {0}")]
    CommandFailed(String),

    /// The host CLI could not be spawned.
    #[error("host CLI failed to start: {0}")]
    SpawnFailed(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toolchain_command_display() {
        let err = ToolchainError::Command {
            command: "textx/installProject".into(),
            message: "pip failed".into(),
        };
        assert_eq!(
            err.to_string(),
            "toolchain command 'textx/installProject' failed: pip failed"
        );
    }

    #[test]
    fn toolchain_timeout_display() {
        let err = ToolchainError::Timeout(10);
        assert_eq!(err.to_string(), "toolchain request timed out after 10 seconds");
    }

    #[test]
    fn toolchain_io_from() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "broken");
        let err = ToolchainError::from(io);
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn host_command_failed_display() {
        let err = HostError::CommandFailed("exit status 1".into());
        assert_eq!(err.to_string(), "host command failed: exit status 1");
    }
}
