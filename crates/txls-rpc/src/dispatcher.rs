//! Response routing for in-flight toolchain requests.
//!
//! Pending requests are tracked by ID; responses resolve the matching
//! oneshot channel. Server-initiated notifications (progress messages,
//! log output) are logged and dropped — the client has no UI channel
//! of its own for them.
use std::collections::HashMap;

use tokio::sync::oneshot;

use crate::transport::{RpcMessage, WireError};

/// The result dispatched to a waiting request.
#[derive(Debug)]
pub enum DispatchResult {
    /// Successful response with the result value.
    Success(serde_json::Value),
    /// Error response from the server.
    Error(WireError),
}

/// Routes incoming messages to waiting callers.
pub struct Dispatcher {
    /// Map of request ID to pending response sender.
    pending: HashMap<i64, oneshot::Sender<DispatchResult>>,
}

impl Dispatcher {
    /// Create a new dispatcher with no pending requests.
    pub fn new() -> Self {
        Self {
            pending: HashMap::new(),
        }
    }

    /// Register a pending request and return a receiver for the
    /// response.
    pub fn register_request(&mut self, id: i64) -> oneshot::Receiver<DispatchResult> {
        let (tx, rx) = oneshot::channel();
        self.pending.insert(id, tx);
        rx
    }

    /// How many requests are pending.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Route an incoming message.
    pub fn dispatch(&mut self, message: RpcMessage) {
        match message {
            RpcMessage::Response { id, result, error } => {
                if let Some(sender) = self.pending.remove(&id) {
                    let dispatch_result = match error {
                        Some(err) => DispatchResult::Error(err),
                        None => {
                            DispatchResult::Success(result.unwrap_or(serde_json::Value::Null))
                        }
                    };
                    // A dropped receiver means the caller gave up; fine.
                    let _ = sender.send(dispatch_result);
                } else {
                    tracing::warn!(id, "response for unknown request id");
                }
            }
            RpcMessage::Notification { method, params } => {
                // The server narrates installs through showMessage
                // notifications; keep them in the log.
                tracing::debug!(%method, %params, "server notification");
            }
            RpcMessage::Request { method, .. } => {
                tracing::debug!(%method, "server request (unhandled)");
            }
        }
    }

    /// Drop all pending requests (their receivers resolve with an
    /// error).
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
