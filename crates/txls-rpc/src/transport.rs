//! JSON-RPC wire format: Content-Length framing and message codec.
use std::sync::atomic::{AtomicI64, Ordering};

use crate::error::RpcError;

/// Global request ID counter.
static NEXT_REQUEST_ID: AtomicI64 = AtomicI64::new(1);

/// Generate the next unique request ID.
pub fn next_request_id() -> i64 {
    NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed)
}

/// A JSON-RPC message (request, response, or notification).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcMessage {
    /// A request (has id and method).
    Request {
        id: i64,
        method: String,
        params: serde_json::Value,
    },
    /// A response (has id, may carry result or error).
    Response {
        id: i64,
        result: Option<serde_json::Value>,
        error: Option<WireError>,
    },
    /// A notification (method, no id).
    Notification {
        method: String,
        params: serde_json::Value,
    },
}

/// An error object in a JSON-RPC response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireError {
    pub code: i32,
    pub message: String,
}

/// Frame a message body with a Content-Length header.
pub fn frame(body: &str) -> Vec<u8> {
    let mut bytes = format!("Content-Length: {}\r\n\r\n", body.len()).into_bytes();
    bytes.extend_from_slice(body.as_bytes());
    bytes
}

/// Serialize a request body.
pub fn request_body(id: i64, method: &str, params: serde_json::Value) -> String {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params
    })
    .to_string()
}

/// Serialize a notification body (no id).
pub fn notification_body(method: &str, params: serde_json::Value) -> String {
    serde_json::json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": params
    })
    .to_string()
}

/// Parse the Content-Length value out of raw header text.
pub fn parse_content_length(header: &str) -> Result<usize, RpcError> {
    for line in header.lines() {
        if let Some(value) = line.trim().strip_prefix("Content-Length:") {
            let value = value.trim();
            return value
                .parse::<usize>()
                .map_err(|_| RpcError::InvalidResponse(format!("invalid Content-Length: {value}")));
        }
    }
    Err(RpcError::InvalidResponse(
        "missing Content-Length header".to_string(),
    ))
}

/// Decode a JSON-RPC message from its JSON body.
pub fn decode_message(json_str: &str) -> Result<RpcMessage, RpcError> {
    let value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| RpcError::Serialization(format!("invalid JSON: {e}")))?;

    let id = value.get("id").and_then(|v| v.as_i64());
    let method = value.get("method").and_then(|v| v.as_str());
    let params = || value.get("params").cloned().unwrap_or(serde_json::Value::Null);

    match (id, method) {
        (Some(id), Some(method)) => Ok(RpcMessage::Request {
            id,
            method: method.to_string(),
            params: params(),
        }),
        (Some(id), None) => {
            let result = value.get("result").cloned();
            let error = value.get("error").and_then(|e| {
                Some(WireError {
                    code: e.get("code")?.as_i64()? as i32,
                    message: e.get("message")?.as_str()?.to_string(),
                })
            });
            Ok(RpcMessage::Response { id, result, error })
        }
        (None, Some(method)) => Ok(RpcMessage::Notification {
            method: method.to_string(),
            params: params(),
        }),
        (None, None) => Err(RpcError::InvalidResponse(
            "message has neither id nor method".to_string(),
        )),
    }
}
