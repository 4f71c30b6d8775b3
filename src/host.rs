//! Editor-host adapter backed by the editor's command-line interface.
use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{info, warn};

use txls_core::error::HostError;
use txls_core::host::{EditorHost, ExtensionRemoval};

/// Drives extension management through the configured editor CLI
/// (`code --install-extension`, `code --uninstall-extension`).
pub struct CliHost {
    command: String,
}

impl CliHost {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<std::process::Output, HostError> {
        Command::new(&self.command)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| HostError::SpawnFailed(e.to_string()))
    }

    /// Whether the editor reports `extension_name` as installed.
    /// Extension ids compare case-insensitively.
    async fn is_installed(&self, extension_name: &str) -> Result<bool, HostError> {
        let output = self.run(&["--list-extensions"]).await?;
        if !output.status.success() {
            return Err(HostError::CommandFailed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        let wanted = extension_name.to_lowercase();
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .any(|line| line.trim().to_lowercase() == wanted))
    }
}

#[async_trait]
impl EditorHost for CliHost {
    async fn install_extension(&self, package_path: &Path) -> Result<(), HostError> {
        let path = package_path.to_string_lossy();
        let output = self.run(&["--install-extension", &path]).await?;
        if !output.status.success() {
            return Err(HostError::CommandFailed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        info!(package = %path, "extension installed");
        Ok(())
    }

    async fn uninstall_extension(
        &self,
        extension_name: &str,
    ) -> Result<ExtensionRemoval, HostError> {
        if !self.is_installed(extension_name).await? {
            return Ok(ExtensionRemoval {
                removed: false,
                was_active: false,
            });
        }
        let output = self.run(&["--uninstall-extension", extension_name]).await?;
        if !output.status.success() {
            return Err(HostError::CommandFailed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        info!(extension = %extension_name, "extension removed");
        // An installed extension is loaded in any running window, so
        // its removal needs a reload to take effect.
        Ok(ExtensionRemoval {
            removed: true,
            was_active: true,
        })
    }

    async fn reload_window(&self) -> Result<(), HostError> {
        // The editor CLI has no reload verb; running windows pick the
        // change up on their next restart.
        warn!("window reload requested; restart open editor windows to apply");
        Ok(())
    }

    fn notify_error(&self, message: &str) {
        tracing::error!("{message}");
        eprintln!("txls: {message}");
    }

    fn notify_warning(&self, message: &str) {
        tracing::warn!("{message}");
        eprintln!("txls: warning: {message}");
    }
}

impl std::fmt::Debug for CliHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliHost")
            .field("command", &self.command)
            .finish()
    }
}
