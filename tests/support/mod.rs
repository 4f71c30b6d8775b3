//! In-memory collaborator fakes shared by the integration tests.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use txls_core::error::{HostError, ToolchainError};
use txls_core::generator::GeneratorDescriptor;
use txls_core::host::{EditorHost, ExtensionRemoval};
use txls_core::project::{InstallOutcome, Language, Project};
use txls_core::toolchain::{GenerateOptions, Toolchain};

/// Scriptable toolchain fake recording every external call.
#[derive(Default)]
pub struct FakeToolchain {
    pub calls: Mutex<Vec<String>>,
    pub projects: Mutex<BTreeMap<String, Project>>,
    pub install_outcome: Mutex<Option<InstallOutcome>>,
    pub generate_ok: AtomicBool,
    pub generate_dirs: Mutex<Vec<PathBuf>>,
    pub uninstall_ok: AtomicBool,
    pub uninstall_gate: Mutex<Option<Arc<tokio::sync::Notify>>>,
    pub fail: AtomicBool,
}

impl FakeToolchain {
    pub fn new() -> Arc<Self> {
        let fake = Self::default();
        fake.generate_ok.store(true, Ordering::SeqCst);
        fake.uninstall_ok.store(true, Ordering::SeqCst);
        Arc::new(fake)
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    pub fn calls_named(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    /// Script a successful editable install of `name` and mirror it
    /// into the reported project map.
    pub fn script_install(&self, name: &str, dist: &Path, editable: bool) {
        *self.install_outcome.lock().unwrap() = Some(InstallOutcome {
            project_name: name.to_string(),
            dist_location: dist.to_path_buf(),
        });
        self.projects.lock().unwrap().insert(
            name.to_string(),
            Project {
                project_name: name.to_string(),
                dist_location: dist.to_path_buf(),
                editable,
                languages: Vec::new(),
            },
        );
    }

    fn check_fail(&self) -> Result<(), ToolchainError> {
        if self.fail.load(Ordering::SeqCst) {
            Err(ToolchainError::ConnectionLost)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Toolchain for FakeToolchain {
    async fn generate_extension(
        &self,
        project: &str,
        target: &str,
        dest_dir: &Path,
        options: &GenerateOptions,
    ) -> Result<bool, ToolchainError> {
        self.record(format!(
            "generate_extension:{project}:{target}:skip_keywords={}",
            options.skip_keywords
        ));
        self.generate_dirs
            .lock()
            .unwrap()
            .push(dest_dir.to_path_buf());
        self.check_fail()?;
        Ok(self.generate_ok.load(Ordering::SeqCst))
    }

    async fn generate_syntaxes(
        &self,
        project: &str,
        target: &str,
        _silent: bool,
    ) -> Result<BTreeMap<String, String>, ToolchainError> {
        self.record(format!("generate_syntaxes:{project}:{target}"));
        self.check_fail()?;
        Ok(BTreeMap::new())
    }

    async fn generators(&self) -> Result<Vec<GeneratorDescriptor>, ToolchainError> {
        self.record("generators");
        self.check_fail()?;
        Ok(Vec::new())
    }

    async fn install_project(
        &self,
        module_path: &Path,
        editable: bool,
    ) -> Result<Option<InstallOutcome>, ToolchainError> {
        self.record(format!(
            "install_project:{}:editable={editable}",
            module_path.display()
        ));
        self.check_fail()?;
        Ok(self.install_outcome.lock().unwrap().clone())
    }

    async fn uninstall_project(&self, project_name: &str) -> Result<bool, ToolchainError> {
        self.record(format!("uninstall_project:{project_name}"));
        let gate = self.uninstall_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.check_fail()?;
        if self.uninstall_ok.load(Ordering::SeqCst) {
            self.projects.lock().unwrap().remove(project_name);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn projects(&self) -> Result<BTreeMap<String, Project>, ToolchainError> {
        self.record("projects");
        self.check_fail()?;
        Ok(self.projects.lock().unwrap().clone())
    }

    async fn scaffold_project(&self, project_name: &str) -> Result<(), ToolchainError> {
        self.record(format!("scaffold_project:{project_name}"));
        self.check_fail()
    }

    async fn install_language(
        &self,
        module_path: &Path,
        editable: bool,
    ) -> Result<Option<String>, ToolchainError> {
        self.record(format!(
            "install_language:{}:editable={editable}",
            module_path.display()
        ));
        self.check_fail()?;
        Ok(None)
    }

    async fn uninstall_language(&self, language_name: &str) -> Result<bool, ToolchainError> {
        self.record(format!("uninstall_language:{language_name}"));
        self.check_fail()?;
        Ok(self.uninstall_ok.load(Ordering::SeqCst))
    }

    async fn languages(&self) -> Result<Vec<Language>, ToolchainError> {
        self.record("languages");
        self.check_fail()?;
        Ok(Vec::new())
    }

    async fn scaffold_language(&self, language_name: &str) -> Result<(), ToolchainError> {
        self.record(format!("scaffold_language:{language_name}"));
        self.check_fail()
    }

    async fn project_name_from_source(
        &self,
        setup_py: &Path,
    ) -> Result<Option<String>, ToolchainError> {
        self.record(format!("project_name_from_source:{}", setup_py.display()));
        self.check_fail()?;
        Ok(None)
    }
}

/// Recording editor-host fake.
#[derive(Default)]
pub struct FakeHost {
    pub installed: Mutex<Vec<PathBuf>>,
    pub uninstalled: Mutex<Vec<String>>,
    pub reloads: AtomicUsize,
    pub errors: Mutex<Vec<String>>,
    pub warnings: Mutex<Vec<String>>,
    pub removal: Mutex<ExtensionRemoval>,
}

impl FakeHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn installed_packages(&self) -> Vec<PathBuf> {
        self.installed.lock().unwrap().clone()
    }

    pub fn uninstalled_names(&self) -> Vec<String> {
        self.uninstalled.lock().unwrap().clone()
    }
}

#[async_trait]
impl EditorHost for FakeHost {
    async fn install_extension(&self, package_path: &Path) -> Result<(), HostError> {
        self.installed.lock().unwrap().push(package_path.to_path_buf());
        Ok(())
    }

    async fn uninstall_extension(
        &self,
        extension_name: &str,
    ) -> Result<ExtensionRemoval, HostError> {
        self.uninstalled
            .lock()
            .unwrap()
            .push(extension_name.to_string());
        Ok(*self.removal.lock().unwrap())
    }

    async fn reload_window(&self) -> Result<(), HostError> {
        self.reloads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn notify_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }

    fn notify_warning(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }
}
