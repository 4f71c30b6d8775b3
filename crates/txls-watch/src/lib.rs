//! txls-watch — filesystem watch registry for editable projects.
//!
//! Owns one OS-level watcher per installed editable project, keyed by
//! project name. Events under the project's grammar glob are forwarded
//! into a channel the lifecycle coordinator consumes.
pub mod error;
pub mod registry;

pub use error::WatchError;
pub use registry::{WatchEvent, WatchHandle, WatchRegistry};
