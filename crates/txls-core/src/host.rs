//! The editor-host seam.
//!
//! Dialogs, notifications, extension management and window reloads are
//! host concerns. Coordinators talk to this trait; the binary provides
//! a CLI-backed implementation and tests provide a recording fake.
use std::path::Path;

use async_trait::async_trait;

use crate::error::HostError;

/// Result of installing a generated extension package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionInstall {
    /// Whether the package ended up installed in the host.
    pub installed: bool,
    /// The extension package name (`textX.<project>`).
    pub extension_name: String,
}

/// Result of removing an extension package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtensionRemoval {
    /// Whether a package was actually removed.
    pub removed: bool,
    /// Whether the removed package was active; an active removal
    /// requires a window reload to take effect.
    pub was_active: bool,
}

/// Host-editor operations the coordinators depend on.
#[async_trait]
pub trait EditorHost: Send + Sync {
    /// Install a packaged extension from a file.
    async fn install_extension(&self, package_path: &Path) -> Result<(), HostError>;

    /// Uninstall an extension by package name.
    async fn uninstall_extension(&self, extension_name: &str)
        -> Result<ExtensionRemoval, HostError>;

    /// Request a full window reload.
    async fn reload_window(&self) -> Result<(), HostError>;

    /// Surface an error notification to the user.
    fn notify_error(&self, message: &str);

    /// Surface a warning notification to the user.
    fn notify_warning(&self, message: &str);
}
