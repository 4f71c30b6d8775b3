//! Project and language data model.
//!
//! These structs mirror the JSON the toolchain server emits (camelCase
//! field names). The client never mutates them; installs and uninstalls
//! go through the toolchain and the authoritative state is re-queried.
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// A textX language registered by an installed project.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    /// Language name as registered with textX.
    pub name: String,
    /// Name of the project that provides the language.
    #[serde(default)]
    pub project_name: Option<String>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

/// An installed textX project as reported by the toolchain.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique project name.
    pub project_name: String,
    /// Distribution/output location of the install.
    pub dist_location: PathBuf,
    /// Editable installs point at live sources and are watched.
    #[serde(default)]
    pub editable: bool,
    /// Languages the project registers.
    #[serde(default)]
    pub languages: Vec<Language>,
}

/// The pair a successful project install returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    pub project_name: String,
    pub dist_location: PathBuf,
}

/// An explicit reference to the thing a UI action was invoked on.
///
/// Replaces instance-of checks on tree items: callers say whether they
/// hold a structured project node or a raw filesystem path, and the
/// coordinator resolves each by match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeRef {
    /// A node from the installed-projects view.
    ProjectNode { name: String },
    /// A file or folder picked in the workspace.
    FilesystemPath { path: PathBuf },
}

/// Normalize a user-picked install target to a module path.
///
/// Picking `setup.py` means installing the package it describes, so the
/// parent directory is the actual module path.
pub fn normalize_module_path(path: &Path) -> PathBuf {
    if path.file_name().is_some_and(|n| n == "setup.py") {
        path.parent().unwrap_or(path).to_path_buf()
    } else {
        path.to_path_buf()
    }
}

/// Derive the editor-extension package name for a project.
///
/// Lowercased, underscores replaced by dashes, under the `textX`
/// publisher namespace.
pub fn extension_name(project_name: &str) -> String {
    format!("textX.{}", project_name.to_lowercase().replace('_', "-"))
}
