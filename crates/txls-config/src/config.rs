use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Log verbosity level.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Most verbose.
    Trace,
    /// Debug messages.
    Debug,
    /// Informational messages (default).
    #[default]
    Info,
    /// Warnings only.
    Warn,
    /// Errors only.
    Error,
}

impl LogLevel {
    /// The level name as a `tracing` filter string.
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// How to reach the out-of-process textX toolchain server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolchainConfig {
    /// Command that starts the server.
    #[serde(default = "default_server_command")]
    pub command: String,
    /// Command-line arguments.
    #[serde(default = "default_server_args")]
    pub args: Vec<String>,
    /// Python interpreter used for local source queries
    /// (`setup.py --name`).
    #[serde(default = "default_python")]
    pub python: PathBuf,
    /// Seconds to wait for a command response (1–300).
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

fn default_server_command() -> String {
    "python3".to_string()
}

fn default_server_args() -> Vec<String> {
    vec!["-m".to_string(), "textx_ls_server".to_string()]
}

fn default_python() -> PathBuf {
    PathBuf::from("python3")
}

fn default_timeout() -> u64 {
    10
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            command: default_server_command(),
            args: default_server_args(),
            python: default_python(),
            request_timeout_secs: default_timeout(),
        }
    }
}

/// The editor CLI used for extension management and window reloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorCliConfig {
    /// The editor executable (e.g. `code`).
    #[serde(default = "default_editor_cli")]
    pub command: String,
    /// Path to the packaging tool forwarded to the extension
    /// generator.
    #[serde(default)]
    pub vsce_path: Option<PathBuf>,
}

fn default_editor_cli() -> String {
    "code".to_string()
}

impl Default for EditorCliConfig {
    fn default() -> Self {
        Self {
            command: default_editor_cli(),
            vsce_path: None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log verbosity level.
    #[serde(default)]
    pub level: LogLevel,
    /// Optional path to a log file.
    pub file: Option<PathBuf>,
}

/// Top-level txls configuration.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Toolchain server settings.
    #[serde(default)]
    pub toolchain: ToolchainConfig,
    /// Editor CLI settings.
    #[serde(default)]
    pub editor: EditorCliConfig,
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}
