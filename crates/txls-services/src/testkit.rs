//! In-memory collaborator fakes for coordinator tests.
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

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap()
}

/// Scriptable toolchain fake recording every external call.
#[derive(Default)]
pub struct FakeToolchain {
    /// Call log, one entry per toolchain method invocation.
    pub calls: Mutex<Vec<String>>,
    /// Returned by `projects`.
    pub projects: Mutex<BTreeMap<String, Project>>,
    /// Returned by `languages`.
    pub languages: Mutex<Vec<Language>>,
    /// Returned by `generators`.
    pub generators: Mutex<Vec<GeneratorDescriptor>>,
    /// Returned by `install_project`.
    pub install_outcome: Mutex<Option<InstallOutcome>>,
    /// Returned by `install_language`.
    pub language_name: Mutex<Option<String>>,
    /// Returned by `project_name_from_source`.
    pub source_name: Mutex<Option<String>>,
    /// Returned by `generate_syntaxes`.
    pub syntaxes: Mutex<BTreeMap<String, String>>,
    /// Result of `generate_extension`; destination dirs are recorded
    /// in `generate_dirs` either way.
    pub generate_ok: AtomicBool,
    pub generate_dirs: Mutex<Vec<PathBuf>>,
    /// Result of `uninstall_project` / `uninstall_language`.
    pub uninstall_ok: AtomicBool,
    /// When set, `uninstall_project` parks until notified. Used to
    /// hold an operation in flight.
    pub uninstall_gate: Mutex<Option<Arc<tokio::sync::Notify>>>,
    /// When set, every call fails with a connection error.
    pub fail: AtomicBool,
}

impl FakeToolchain {
    pub fn new() -> Arc<Self> {
        let fake = Self::default();
        fake.generate_ok.store(true, Ordering::SeqCst);
        fake.uninstall_ok.store(true, Ordering::SeqCst);
        Arc::new(fake)
    }

    pub fn record(&self, call: impl Into<String>) {
        lock(&self.calls).push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    pub fn calls_named(&self, prefix: &str) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
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
        lock(&self.generate_dirs).push(dest_dir.to_path_buf());
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
        Ok(lock(&self.syntaxes).clone())
    }

    async fn generators(&self) -> Result<Vec<GeneratorDescriptor>, ToolchainError> {
        self.record("generators");
        self.check_fail()?;
        Ok(lock(&self.generators).clone())
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
        Ok(lock(&self.install_outcome).clone())
    }

    async fn uninstall_project(&self, project_name: &str) -> Result<bool, ToolchainError> {
        self.record(format!("uninstall_project:{project_name}"));
        let gate = lock(&self.uninstall_gate).clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.check_fail()?;
        Ok(self.uninstall_ok.load(Ordering::SeqCst))
    }

    async fn projects(&self) -> Result<BTreeMap<String, Project>, ToolchainError> {
        self.record("projects");
        self.check_fail()?;
        Ok(lock(&self.projects).clone())
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
        Ok(lock(&self.language_name).clone())
    }

    async fn uninstall_language(&self, language_name: &str) -> Result<bool, ToolchainError> {
        self.record(format!("uninstall_language:{language_name}"));
        self.check_fail()?;
        Ok(self.uninstall_ok.load(Ordering::SeqCst))
    }

    async fn languages(&self) -> Result<Vec<Language>, ToolchainError> {
        self.record("languages");
        self.check_fail()?;
        Ok(lock(&self.languages).clone())
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
        Ok(lock(&self.source_name).clone())
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
    /// When set, `install_extension` fails.
    pub install_fails: AtomicBool,
    /// Returned by `uninstall_extension`.
    pub removal: Mutex<ExtensionRemoval>,
}

impl FakeHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn installed_packages(&self) -> Vec<PathBuf> {
        lock(&self.installed).clone()
    }

    pub fn uninstalled_names(&self) -> Vec<String> {
        lock(&self.uninstalled).clone()
    }

    pub fn error_count(&self) -> usize {
        lock(&self.errors).len()
    }

    pub fn reload_count(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EditorHost for FakeHost {
    async fn install_extension(&self, package_path: &Path) -> Result<(), HostError> {
        if self.install_fails.load(Ordering::SeqCst) {
            return Err(HostError::CommandFailed("exit status 1".into()));
        }
        lock(&self.installed).push(package_path.to_path_buf());
        Ok(())
    }

    async fn uninstall_extension(
        &self,
        extension_name: &str,
    ) -> Result<ExtensionRemoval, HostError> {
        lock(&self.uninstalled).push(extension_name.to_string());
        Ok(*lock(&self.removal))
    }

    async fn reload_window(&self) -> Result<(), HostError> {
        self.reloads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn notify_error(&self, message: &str) {
        lock(&self.errors).push(message.to_string());
    }

    fn notify_warning(&self, message: &str) {
        lock(&self.warnings).push(message.to_string());
    }
}

/// A project record as the toolchain would report it.
pub fn project(name: &str, dist: &Path, editable: bool) -> Project {
    Project {
        project_name: name.to_string(),
        dist_location: dist.to_path_buf(),
        editable,
        languages: Vec::new(),
    }
}
