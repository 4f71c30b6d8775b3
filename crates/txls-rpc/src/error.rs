//! RPC error types.
use txls_core::ToolchainError;

/// Errors from the JSON-RPC toolchain connection.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// Server process failed to start.
    #[error("server failed to start: {0}")]
    SpawnFailed(String),

    /// JSON-RPC error returned by the server.
    #[error("JSON-RPC error {code}: {message}")]
    Rpc {
        /// The error code.
        code: i32,
        /// The error message.
        message: String,
    },

    /// Request timed out waiting for a response.
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// Server process exited unexpectedly.
    #[error("server process exited unexpectedly")]
    ServerCrashed,

    /// Serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Invalid message from the server.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<RpcError> for ToolchainError {
    fn from(err: RpcError) -> Self {
        match err {
            RpcError::SpawnFailed(msg) => ToolchainError::SpawnFailed(msg),
            RpcError::Timeout(secs) => ToolchainError::Timeout(secs),
            RpcError::ServerCrashed => ToolchainError::ConnectionLost,
            RpcError::Rpc { code, message } => ToolchainError::Command {
                command: format!("rpc:{code}"),
                message,
            },
            RpcError::Serialization(msg) | RpcError::InvalidResponse(msg) => {
                ToolchainError::InvalidResponse(msg)
            }
            RpcError::Io(e) => ToolchainError::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_failed_display() {
        let err = RpcError::SpawnFailed("not found".into());
        assert_eq!(err.to_string(), "server failed to start: not found");
    }

    #[test]
    fn rpc_display() {
        let err = RpcError::Rpc {
            code: -32601,
            message: "method not found".into(),
        };
        assert_eq!(err.to_string(), "JSON-RPC error -32601: method not found");
    }

    #[test]
    fn timeout_display() {
        assert_eq!(
            RpcError::Timeout(10).to_string(),
            "request timed out after 10 seconds"
        );
    }

    #[test]
    fn converts_to_toolchain_error() {
        let err: ToolchainError = RpcError::ServerCrashed.into();
        assert!(matches!(err, ToolchainError::ConnectionLost));

        let err: ToolchainError = RpcError::Timeout(5).into();
        assert!(matches!(err, ToolchainError::Timeout(5)));

        let err: ToolchainError = RpcError::InvalidResponse("bad".into()).into();
        assert!(matches!(err, ToolchainError::InvalidResponse(_)));
    }
}
