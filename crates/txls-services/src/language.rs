//! Language lifecycle coordinator.
//!
//! Languages follow the project flow minus the grammar watch: a
//! language package's extension is generated once at install and never
//! regenerated from filesystem changes.
use std::path::Path;
use std::sync::Arc;

use txls_core::event::EventHub;
use txls_core::host::EditorHost;
use txls_core::project::{extension_name, normalize_module_path, Language};
use txls_core::toolchain::Toolchain;

use crate::error::ServiceError;
use crate::generator::GeneratorService;
use crate::guard::FireOnDrop;

pub struct LanguageService {
    toolchain: Arc<dyn Toolchain>,
    host: Arc<dyn EditorHost>,
    events: Arc<EventHub>,
    generator: Arc<GeneratorService>,
}

impl LanguageService {
    pub fn new(
        toolchain: Arc<dyn Toolchain>,
        host: Arc<dyn EditorHost>,
        events: Arc<EventHub>,
        generator: Arc<GeneratorService>,
    ) -> Self {
        Self {
            toolchain,
            host,
            events,
            generator,
        }
    }

    /// Languages currently registered with the toolchain.
    pub async fn installed(&self) -> Result<Vec<Language>, ServiceError> {
        Ok(self.toolchain.languages().await?)
    }

    /// Install the language package at `module_path`, then generate
    /// and install its editor extension. Returns the installed
    /// language name, or `Ok(None)` on a reported failure.
    pub async fn install(
        &self,
        module_path: &Path,
        editable: bool,
    ) -> Result<Option<String>, ServiceError> {
        let _refresh = FireOnDrop(&self.events);
        let module_path = normalize_module_path(module_path);

        let Some(name) = self.toolchain.install_language(&module_path, editable).await? else {
            self.host.notify_error(&format!(
                "Failed to install the language from: {}",
                module_path.display()
            ));
            return Ok(None);
        };

        self.generator
            .generate_and_install_extension(&name, editable)
            .await?;
        tracing::info!(language = %name, editable, "language installed");
        Ok(Some(name))
    }

    /// Uninstall `name`; on confirmation the editor extension is
    /// removed too, reloading the window if it was active.
    pub async fn uninstall(&self, name: &str) -> Result<bool, ServiceError> {
        if name.trim().is_empty() {
            return Err(ServiceError::EmptyName);
        }
        let _refresh = FireOnDrop(&self.events);

        if !self.toolchain.uninstall_language(name).await? {
            self.host
                .notify_error(&format!("Failed to uninstall language: {name}"));
            return Ok(false);
        }

        let extension = extension_name(name);
        match self.host.uninstall_extension(&extension).await {
            Ok(removal) if removal.removed && removal.was_active => {
                if let Err(err) = self.host.reload_window().await {
                    tracing::error!(%err, "window reload failed");
                }
            }
            Ok(_) => {}
            Err(err) => tracing::warn!(%extension, %err, "extension removal failed"),
        }
        tracing::info!(language = %name, "language uninstalled");
        Ok(true)
    }

    /// Request a fresh language-package skeleton named `name`.
    pub async fn scaffold(&self, name: &str) -> Result<(), ServiceError> {
        if name.trim().is_empty() {
            return Err(ServiceError::EmptyName);
        }
        self.toolchain.scaffold_language(name).await?;
        Ok(())
    }
}

impl std::fmt::Debug for LanguageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageService").finish()
    }
}
