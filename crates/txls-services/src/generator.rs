//! Generator coordinator: extension packaging and syntax refresh.
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tempfile::TempDir;
use txls_core::generator::GeneratorDescriptor;
use txls_core::host::{EditorHost, ExtensionInstall};
use txls_core::project::extension_name;
use txls_core::toolchain::{
    GenerateOptions, Toolchain, EXTENSION_GENERATOR_TARGET, SYNTAX_HIGHLIGHT_TARGET,
};
use txls_syntax::{extract_keywords, parse_textmate, KeywordHighlighter};

use crate::error::ServiceError;
use crate::guard::lock;

/// Drives extension generation through the toolchain and hands the
/// resulting package to the editor host.
pub struct GeneratorService {
    toolchain: Arc<dyn Toolchain>,
    host: Arc<dyn EditorHost>,
    highlighter: Arc<Mutex<KeywordHighlighter>>,
    vsce_path: Option<PathBuf>,
}

impl GeneratorService {
    pub fn new(
        toolchain: Arc<dyn Toolchain>,
        host: Arc<dyn EditorHost>,
        highlighter: Arc<Mutex<KeywordHighlighter>>,
        vsce_path: Option<PathBuf>,
    ) -> Self {
        Self {
            toolchain,
            host,
            highlighter,
            vsce_path,
        }
    }

    /// Generate the extension package for `project` and install it in
    /// the host. The package is built in a temporary directory that is
    /// removed when this call returns, on every path.
    ///
    /// Generation and host-install failures are reported to the user
    /// and returned as `installed: false`; only toolchain transport
    /// errors propagate.
    pub async fn generate_and_install_extension(
        &self,
        project: &str,
        editable: bool,
    ) -> Result<ExtensionInstall, ServiceError> {
        let workdir = TempDir::new()?;
        let extension = extension_name(project);
        let options = GenerateOptions {
            // Editable installs regenerate keywords on grammar change
            // instead of baking them into the package.
            skip_keywords: editable,
            vsce_path: self.vsce_path.clone(),
        };

        let generated = self
            .toolchain
            .generate_extension(project, EXTENSION_GENERATOR_TARGET, workdir.path(), &options)
            .await?;
        if !generated {
            self.host
                .notify_error(&format!("Failed to generate the extension for: {project}"));
            return Ok(ExtensionInstall {
                installed: false,
                extension_name: extension,
            });
        }

        let package = workdir.path().join(format!("{project}.vsix"));
        let installed = match self.host.install_extension(&package).await {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(%project, %err, "extension install failed");
                self.host
                    .notify_error(&format!("Failed to install the extension for: {project}"));
                false
            }
        };

        if installed && editable {
            self.refresh_keywords(project).await;
        }

        Ok(ExtensionInstall {
            installed,
            extension_name: extension,
        })
    }

    /// Regenerate syntax definitions for `project` and replace the
    /// highlighter's keyword sets. Per-language failures are logged
    /// and skipped so one malformed grammar cannot block the rest.
    pub async fn refresh_keywords(&self, project: &str) {
        let syntaxes = match self
            .toolchain
            .generate_syntaxes(project, SYNTAX_HIGHLIGHT_TARGET, true)
            .await
        {
            Ok(map) => map,
            Err(err) => {
                tracing::warn!(%project, %err, "syntax regeneration failed");
                return;
            }
        };

        let mut highlighter = lock(&self.highlighter);
        for (language, source) in &syntaxes {
            let keywords = match parse_textmate(source) {
                Ok(syntax) => extract_keywords(&syntax),
                Err(err) => {
                    tracing::warn!(%language, %err, "skipping malformed syntax definition");
                    continue;
                }
            };
            if let Err(err) = highlighter.add_language_keywords(language, &keywords) {
                tracing::warn!(%language, %err, "keyword set rejected");
            }
        }
    }

    /// Syntax definitions for every language of `project`.
    pub async fn languages_syntaxes(
        &self,
        project: &str,
    ) -> Result<BTreeMap<String, String>, ServiceError> {
        let syntaxes = self
            .toolchain
            .generate_syntaxes(project, SYNTAX_HIGHLIGHT_TARGET, false)
            .await?;
        Ok(syntaxes)
    }

    /// All generators the toolchain knows about.
    pub async fn all(&self) -> Result<Vec<GeneratorDescriptor>, ServiceError> {
        Ok(self.toolchain.generators().await?)
    }

    /// Generators for one language. The toolchain has no scoped query
    /// for this; callers get an empty list until it grows one.
    pub async fn by_language(&self, language: &str) -> Vec<GeneratorDescriptor> {
        tracing::warn!(%language, "per-language generator query is not supported");
        Vec::new()
    }

    /// Shared keyword highlighter fed by editable regeneration.
    pub fn highlighter(&self) -> Arc<Mutex<KeywordHighlighter>> {
        Arc::clone(&self.highlighter)
    }
}

impl std::fmt::Debug for GeneratorService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorService")
            .field("vsce_path", &self.vsce_path)
            .finish()
    }
}
