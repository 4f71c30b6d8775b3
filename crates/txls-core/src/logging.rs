//! Logging helpers: default log path, size-based rotation, level
//! mapping. The `tracing-subscriber` setup itself lives in the binary
//! crate, which is the only place that depends on it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Maximum size of a single log file before rotation (5 MB).
pub const DEFAULT_MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;

/// Maximum number of rotated log files to retain.
pub const DEFAULT_MAX_LOG_FILES: u32 = 3;

/// Return the platform-specific default log file path.
///
/// * macOS: `$HOME/Library/Logs/txls/txls.log`
/// * Linux: `$HOME/.local/share/txls/txls.log`
/// * Windows: `%APPDATA%/txls/logs/txls.log`
/// * Fallback: `/tmp/txls/txls.log`
pub fn default_log_file_path() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join("Library/Logs/txls/txls.log");
        }
    }
    #[cfg(target_os = "linux")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".local/share/txls/txls.log");
        }
    }
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("txls\\logs\\txls.log");
        }
    }
    PathBuf::from("/tmp/txls/txls.log")
}

/// Ensure the parent directory of a log file exists.
pub fn ensure_log_dir(log_path: &Path) -> io::Result<()> {
    if let Some(parent) = log_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Rotate log files when the current file exceeds `max_size` bytes.
///
/// `txls.log` becomes `txls.log.1`, existing rotated files shift up,
/// and `txls.log.<max_files>` is deleted. Does nothing when the file
/// is missing or under the threshold.
pub fn rotate_log_files(log_path: &Path, max_size: u64, max_files: u32) -> io::Result<()> {
    if !log_path.exists() {
        return Ok(());
    }
    if fs::metadata(log_path)?.len() < max_size {
        return Ok(());
    }

    let oldest = rotated_path(log_path, max_files);
    if oldest.exists() {
        fs::remove_file(&oldest)?;
    }

    for i in (1..max_files).rev() {
        let from = rotated_path(log_path, i);
        if from.exists() {
            fs::rename(&from, rotated_path(log_path, i + 1))?;
        }
    }

    fs::rename(log_path, rotated_path(log_path, 1))?;
    Ok(())
}

/// Convert a level name (case-insensitive) to a `tracing` filter
/// string. Unrecognised values fall back to `"info"`.
pub fn log_level_to_filter(level: &str) -> &'static str {
    match level.to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" => "warn",
        "error" => "error",
        _ => "info",
    }
}

fn rotated_path(base: &Path, index: u32) -> PathBuf {
    let name = base.file_name().unwrap_or_default().to_string_lossy();
    let parent = base.parent().unwrap_or_else(|| Path::new("."));
    parent.join(format!("{}.{}", name, index))
}
