//! txls-rpc — JSON-RPC client for the external textX toolchain.
//!
//! The toolchain runs out of process as a language server that
//! registers its operations as workspace commands. This crate spawns
//! that server, frames messages with Content-Length headers, routes
//! responses back to waiting callers, and exposes the commands as the
//! typed [`txls_core::Toolchain`] trait.
pub mod client;
pub mod dispatcher;
pub mod error;
pub mod transport;

pub use client::{ClientState, ServerConfig, ToolchainClient};
pub use error::RpcError;
