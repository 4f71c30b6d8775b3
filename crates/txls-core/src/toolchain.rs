//! The external-toolchain seam.
//!
//! All real work (grammar compilation, extension packaging, syntax
//! generation, pip installs) happens out of process. The coordinators
//! only see this trait; the JSON-RPC client in `txls-rpc` implements it
//! and tests substitute in-memory fakes.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::ToolchainError;
use crate::generator::GeneratorDescriptor;
use crate::project::{InstallOutcome, Language, Project};

/// Generator target producing an installable editor-extension package.
pub const EXTENSION_GENERATOR_TARGET: &str = "vscode";
/// Generator target producing TextMate syntax definitions.
pub const SYNTAX_HIGHLIGHT_TARGET: &str = "textmate";

/// Options forwarded to the extension generator.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Skip keyword extraction (set for editable installs, where
    /// keywords are regenerated on every grammar change instead).
    pub skip_keywords: bool,
    /// Path to the packaging tool the generator shells out to.
    pub vsce_path: Option<PathBuf>,
}

/// Commands the external textX toolchain exposes.
#[async_trait]
pub trait Toolchain: Send + Sync {
    /// Generate an extension package for `project` into `dest_dir`.
    /// Returns whether generation succeeded.
    async fn generate_extension(
        &self,
        project: &str,
        target: &str,
        dest_dir: &Path,
        options: &GenerateOptions,
    ) -> Result<bool, ToolchainError>;

    /// Generate syntax definitions for every language of `project`.
    async fn generate_syntaxes(
        &self,
        project: &str,
        target: &str,
        silent: bool,
    ) -> Result<BTreeMap<String, String>, ToolchainError>;

    /// List available generators.
    async fn generators(&self) -> Result<Vec<GeneratorDescriptor>, ToolchainError>;

    /// Install a project from a wheel or source directory.
    /// `None` means the toolchain reported failure.
    async fn install_project(
        &self,
        module_path: &Path,
        editable: bool,
    ) -> Result<Option<InstallOutcome>, ToolchainError>;

    /// Uninstall a project. Returns whether the uninstall succeeded.
    async fn uninstall_project(&self, project_name: &str) -> Result<bool, ToolchainError>;

    /// The authoritative set of installed projects, keyed by name.
    async fn projects(&self) -> Result<BTreeMap<String, Project>, ToolchainError>;

    /// Request a new project skeleton. Fire-and-forget.
    async fn scaffold_project(&self, project_name: &str) -> Result<(), ToolchainError>;

    /// Install a language package. `None` means failure.
    async fn install_language(
        &self,
        module_path: &Path,
        editable: bool,
    ) -> Result<Option<String>, ToolchainError>;

    /// Uninstall a language package.
    async fn uninstall_language(&self, language_name: &str) -> Result<bool, ToolchainError>;

    /// List installed languages.
    async fn languages(&self) -> Result<Vec<Language>, ToolchainError>;

    /// Request a new language-package skeleton.
    async fn scaffold_language(&self, language_name: &str) -> Result<(), ToolchainError>;

    /// Resolve the project name from a source tree's `setup.py`.
    /// `None` when the name cannot be determined.
    async fn project_name_from_source(
        &self,
        setup_py: &Path,
    ) -> Result<Option<String>, ToolchainError>;
}
