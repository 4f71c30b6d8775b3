//! Project lifecycle coordinator.
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::Mutex;
use txls_core::event::EventHub;
use txls_core::host::EditorHost;
use txls_core::project::{extension_name, normalize_module_path, InstallOutcome, NodeRef, Project};
use txls_core::toolchain::Toolchain;
use txls_watch::{WatchHandle, WatchRegistry};

use crate::error::ServiceError;
use crate::generator::GeneratorService;
use crate::guard::{FireOnDrop, InFlight};

/// Coordinates project installs, uninstalls and grammar watches.
///
/// Every lifecycle method fires the languages-changed signal on exit,
/// success or not, so subscribed views re-query the authoritative
/// project list.
pub struct ProjectService {
    toolchain: Arc<dyn Toolchain>,
    host: Arc<dyn EditorHost>,
    events: Arc<EventHub>,
    watches: Arc<Mutex<WatchRegistry>>,
    generator: Arc<GeneratorService>,
    in_flight: Arc<InFlight>,
}

impl ProjectService {
    pub fn new(
        toolchain: Arc<dyn Toolchain>,
        host: Arc<dyn EditorHost>,
        events: Arc<EventHub>,
        watches: Arc<Mutex<WatchRegistry>>,
        generator: Arc<GeneratorService>,
    ) -> Self {
        Self {
            toolchain,
            host,
            events,
            watches,
            generator,
            in_flight: InFlight::new(),
        }
    }

    /// The authoritative installed-project map, arming a grammar watch
    /// for every editable project that does not have one yet. Safe to
    /// call repeatedly; existing watches are left alone.
    pub async fn installed(&self) -> Result<BTreeMap<String, Project>, ServiceError> {
        let projects = self.toolchain.projects().await?;
        let mut watches = self.watches.lock().await;
        for project in projects.values().filter(|p| p.editable) {
            if watches.is_watched(&project.project_name) {
                continue;
            }
            match watches.watch(
                &project.project_name,
                &grammar_glob(&project.dist_location),
            ) {
                Ok(handle) => self.spawn_regeneration(handle),
                Err(err) => {
                    tracing::warn!(project = %project.project_name, %err, "grammar watch not armed");
                }
            }
        }
        Ok(projects)
    }

    /// Install the project at `module_path` through the toolchain,
    /// then generate and install its editor extension. Editable
    /// installs additionally get a grammar watch over their dist
    /// location.
    ///
    /// Returns `Ok(None)` when the toolchain reports the install
    /// failed; the user is notified through the host.
    pub async fn install(
        &self,
        module_path: &Path,
        editable: bool,
    ) -> Result<Option<InstallOutcome>, ServiceError> {
        let _refresh = FireOnDrop(&self.events);
        let module_path = normalize_module_path(module_path);

        let Some(outcome) = self.toolchain.install_project(&module_path, editable).await? else {
            self.host.notify_error(&format!(
                "Failed to install the project from: {}",
                module_path.display()
            ));
            return Ok(None);
        };

        // The name is only known now; guard the post-install steps.
        let _guard = self.in_flight.acquire(&outcome.project_name)?;

        let install = self
            .generator
            .generate_and_install_extension(&outcome.project_name, editable)
            .await?;
        if install.installed && editable {
            self.arm_watch(&outcome.project_name, &outcome.dist_location)
                .await;
        }

        tracing::info!(project = %outcome.project_name, editable, "project installed");
        Ok(Some(outcome))
    }

    /// Uninstall `name` through the toolchain. Only on a confirmed
    /// uninstall does local teardown run: the grammar watch is
    /// released and the editor extension removed, with a window reload
    /// when the removed extension was active.
    pub async fn uninstall(&self, name: &str) -> Result<bool, ServiceError> {
        if name.trim().is_empty() {
            return Err(ServiceError::EmptyName);
        }
        let _guard = self.in_flight.acquire(name)?;
        let _refresh = FireOnDrop(&self.events);

        if !self.toolchain.uninstall_project(name).await? {
            self.host
                .notify_error(&format!("Failed to uninstall project: {name}"));
            return Ok(false);
        }

        self.watches.lock().await.unwatch(name);
        self.remove_extension(name).await;
        tracing::info!(project = %name, "project uninstalled");
        Ok(true)
    }

    /// Uninstall whatever `node` refers to, resolving a picked path
    /// to its project name first.
    pub async fn uninstall_node(&self, node: &NodeRef) -> Result<bool, ServiceError> {
        let name = self.resolve_project_name(node).await?;
        self.uninstall(&name).await
    }

    /// Request a fresh project skeleton named `name`.
    pub async fn scaffold(&self, name: &str) -> Result<(), ServiceError> {
        if name.trim().is_empty() {
            return Err(ServiceError::EmptyName);
        }
        self.toolchain.scaffold_project(name).await?;
        Ok(())
    }

    /// Resolve a node reference to an installed project name. A
    /// filesystem pick is resolved through the source tree's
    /// `setup.py`.
    pub async fn resolve_project_name(&self, node: &NodeRef) -> Result<String, ServiceError> {
        match node {
            NodeRef::ProjectNode { name } => Ok(name.clone()),
            NodeRef::FilesystemPath { path } => {
                let setup_py = if path.file_name().is_some_and(|n| n == "setup.py") {
                    path.clone()
                } else {
                    path.join("setup.py")
                };
                self.toolchain
                    .project_name_from_source(&setup_py)
                    .await?
                    .ok_or_else(|| ServiceError::UnknownProject(path.clone()))
            }
        }
    }

    /// Re-arm the grammar watch for a freshly installed project. An
    /// older watch from a previous install is released first.
    async fn arm_watch(&self, project: &str, dist: &Path) {
        let pattern = grammar_glob(dist);
        let mut watches = self.watches.lock().await;
        watches.unwatch(project);
        match watches.watch(project, &pattern) {
            Ok(handle) => self.spawn_regeneration(handle),
            Err(err) => tracing::warn!(%project, %err, "grammar watch not armed"),
        }
    }

    /// Consume watch events for one project, regenerating its
    /// extension per grammar change. Failures are logged; the watch
    /// stays armed either way.
    fn spawn_regeneration(&self, mut handle: WatchHandle) {
        let generator = Arc::clone(&self.generator);
        let host = Arc::clone(&self.host);
        tokio::spawn(async move {
            while let Some(event) = handle.recv().await {
                tracing::info!(
                    project = %event.project,
                    path = %event.path.display(),
                    "grammar changed, regenerating extension"
                );
                match generator
                    .generate_and_install_extension(&event.project, true)
                    .await
                {
                    Ok(result) if result.installed => {
                        if let Err(err) = host.reload_window().await {
                            tracing::error!(%err, "window reload failed");
                        }
                    }
                    Ok(_) => {
                        tracing::warn!(project = %event.project, "extension regeneration reported failure");
                    }
                    Err(err) => {
                        tracing::error!(project = %event.project, %err, "extension regeneration failed");
                    }
                }
            }
        });
    }

    async fn remove_extension(&self, project: &str) {
        let extension = extension_name(project);
        match self.host.uninstall_extension(&extension).await {
            Ok(removal) if removal.removed && removal.was_active => {
                if let Err(err) = self.host.reload_window().await {
                    tracing::error!(%err, "window reload failed");
                }
            }
            Ok(_) => {}
            Err(err) => tracing::warn!(%extension, %err, "extension removal failed"),
        }
    }
}

impl std::fmt::Debug for ProjectService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectService").finish()
    }
}

/// Grammar files under a project's dist location.
pub(crate) fn grammar_glob(dist: &Path) -> String {
    format!("{}/**/*.tx", dist.display())
}
