//! Watch registry managing one filesystem watcher per project.
//!
//! Invariant: at most one active watch entry per project name. An
//! entry exists exactly while the corresponding project is installed
//! in editable mode; the registry is the sole owner of the OS watch
//! resource and releases it on `unwatch` or drop.
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use globset::{Glob, GlobMatcher};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::error::WatchError;

/// A filesystem change under a watched project's glob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    /// The watched project's name.
    pub project: String,
    /// The path that changed.
    pub path: PathBuf,
}

/// Receiving side of one project's watch.
///
/// Events for the same project arrive in filesystem-notification
/// order; ordering across projects is unspecified.
pub struct WatchHandle {
    project: String,
    rx: mpsc::UnboundedReceiver<WatchEvent>,
}

impl WatchHandle {
    /// The project this handle belongs to.
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Wait for the next change event. Returns `None` once the watch
    /// has been unregistered.
    pub async fn recv(&mut self) -> Option<WatchEvent> {
        self.rx.recv().await
    }

    /// Consume the handle, exposing the raw receiver.
    pub fn into_receiver(self) -> mpsc::UnboundedReceiver<WatchEvent> {
        self.rx
    }
}

impl std::fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchHandle")
            .field("project", &self.project)
            .finish()
    }
}

struct WatchEntry {
    // Held for ownership: dropping the watcher releases the OS watch.
    _watcher: RecommendedWatcher,
    pattern: String,
}

/// Registry of active project watches.
pub struct WatchRegistry {
    entries: HashMap<String, WatchEntry>,
}

impl WatchRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register a watcher for `project` over `pattern`.
    ///
    /// The watch root is the longest literal prefix of the pattern;
    /// events under it are filtered against the full glob before
    /// being forwarded.
    ///
    /// # Errors
    ///
    /// [`WatchError::DuplicateWatch`] if the project is already
    /// watched; call sites re-installing a project must `unwatch`
    /// first.
    pub fn watch(&mut self, project: &str, pattern: &str) -> Result<WatchHandle, WatchError> {
        if self.entries.contains_key(project) {
            return Err(WatchError::DuplicateWatch(project.to_string()));
        }

        let root = literal_prefix(pattern);
        let matcher = compile_matcher(pattern)?;

        let (tx, rx) = mpsc::unbounded_channel();
        let event_project = project.to_string();

        let mut watcher =
            notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
                let event = match res {
                    Ok(event) => event,
                    Err(err) => {
                        tracing::warn!(project = %event_project, %err, "watch backend error");
                        return;
                    }
                };
                if !is_content_change(&event.kind) {
                    return;
                }
                for path in &event.paths {
                    if matcher.is_match(path) {
                        // Send fails only after unwatch; nothing to do then.
                        let _ = tx.send(WatchEvent {
                            project: event_project.clone(),
                            path: path.clone(),
                        });
                    }
                }
            })?;

        watcher.watch(&root, RecursiveMode::Recursive)?;
        tracing::debug!(%project, %pattern, root = %root.display(), "watch registered");

        self.entries.insert(
            project.to_string(),
            WatchEntry {
                _watcher: watcher,
                pattern: pattern.to_string(),
            },
        );

        Ok(WatchHandle {
            project: project.to_string(),
            rx,
        })
    }

    /// Dispose the watcher for `project` and remove its entry.
    /// No-op when no entry exists.
    pub fn unwatch(&mut self, project: &str) {
        if self.entries.remove(project).is_some() {
            tracing::debug!(%project, "watch removed");
        }
    }

    /// Whether a watch entry exists for `project`.
    pub fn is_watched(&self, project: &str) -> bool {
        self.entries.contains_key(project)
    }

    /// The glob pattern registered for `project`, if watched.
    pub fn glob_pattern(&self, project: &str) -> Option<&str> {
        self.entries.get(project).map(|e| e.pattern.as_str())
    }

    /// Names of all watched projects.
    pub fn watched_projects(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Number of active watch entries.
    pub fn watch_count(&self) -> usize {
        self.entries.len()
    }
}

impl Default for WatchRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WatchRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchRegistry")
            .field("watch_count", &self.entries.len())
            .finish()
    }
}

/// Compile the glob, mapping compiler failures to [`WatchError`].
fn compile_matcher(pattern: &str) -> Result<GlobMatcher, WatchError> {
    Glob::new(pattern)
        .map(|g| g.compile_matcher())
        .map_err(|e| WatchError::Pattern {
            pattern: pattern.to_string(),
            detail: e.to_string(),
        })
}

/// The longest prefix of `pattern` containing no glob metacharacters.
/// This is the directory handed to the OS watcher.
fn literal_prefix(pattern: &str) -> PathBuf {
    let mut root = PathBuf::new();
    for component in Path::new(pattern).components() {
        let text = match component {
            Component::Normal(os) => os.to_string_lossy(),
            other => {
                root.push(other.as_os_str());
                continue;
            }
        };
        if text.contains(['*', '?', '[', '{']) {
            break;
        }
        root.push(component.as_os_str());
    }
    root
}

/// Only content-relevant event kinds re-trigger generation.
fn is_content_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}
