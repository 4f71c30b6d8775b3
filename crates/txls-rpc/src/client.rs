//! Toolchain client managing the external textX server process.
//!
//! Handles lifecycle (spawn, initialize, shutdown) and the
//! `workspace/executeCommand` interchange every lifecycle operation
//! rides on.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command as TokioCommand};
use tokio::sync::{mpsc, Mutex};
use tokio::time::{timeout, Duration};

use txls_core::command::Action;
use txls_core::{
    GenerateOptions, GeneratorDescriptor, InstallOutcome, Language, Project, Toolchain,
    ToolchainError,
};

use crate::dispatcher::{DispatchResult, Dispatcher};
use crate::error::RpcError;
use crate::transport::{
    decode_message, frame, next_request_id, notification_body, request_body, RpcMessage,
};

/// How to start the toolchain server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// The command to run the server.
    pub command: String,
    /// Command-line arguments.
    pub args: Vec<String>,
    /// Python interpreter for local source queries.
    pub python: PathBuf,
    /// Seconds to wait for a command response.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            command: "python3".to_string(),
            args: vec!["-m".to_string(), "textx_ls_server".to_string()],
            python: PathBuf::from("python3"),
            request_timeout_secs: 10,
        }
    }
}

/// State of the toolchain connection lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    /// Client created but not yet started.
    Created,
    /// Initialize handshake in progress.
    Initializing,
    /// Ready to handle commands.
    Running,
    /// Shutting down.
    ShuttingDown,
    /// Stopped.
    Stopped,
}

/// A client connected to one toolchain server process.
pub struct ToolchainClient {
    config: ServerConfig,
    state: ClientState,
    dispatcher: Arc<Mutex<Dispatcher>>,
    writer_tx: Option<mpsc::Sender<Vec<u8>>>,
    child: Option<Child>,
}

impl ToolchainClient {
    /// Create a client with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            state: ClientState::Created,
            dispatcher: Arc::new(Mutex::new(Dispatcher::new())),
            writer_tx: None,
            child: None,
        }
    }

    /// Get the current state.
    pub fn state(&self) -> ClientState {
        self.state
    }

    /// Get the server config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Start the server process and perform the initialize handshake.
    pub async fn start(&mut self) -> Result<(), RpcError> {
        self.state = ClientState::Initializing;

        let mut child = TokioCommand::new(&self.config.command)
            .args(&self.config.args)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::null())
            .spawn()
            .map_err(|e| RpcError::SpawnFailed(format!("{}: {}", self.config.command, e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| RpcError::SpawnFailed("could not capture stdin".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| RpcError::SpawnFailed("could not capture stdout".into()))?;

        // Writer task: sends framed messages to the server
        let (writer_tx, mut writer_rx) = mpsc::channel::<Vec<u8>>(64);
        tokio::spawn(async move {
            let mut stdin = stdin;
            while let Some(msg) = writer_rx.recv().await {
                if stdin.write_all(&msg).await.is_err() {
                    break;
                }
                if stdin.flush().await.is_err() {
                    break;
                }
            }
        });

        // Reader task: decodes messages and feeds the dispatcher
        let dispatcher = self.dispatcher.clone();
        tokio::spawn(async move {
            let mut reader = BufReader::new(stdout);

            loop {
                // Read header lines until the blank separator
                let mut content_length: Option<usize> = None;
                loop {
                    let mut line = String::new();
                    match reader.read_line(&mut line).await {
                        Ok(0) => return, // EOF
                        Err(_) => return,
                        Ok(_) => {}
                    }
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        break;
                    }
                    if let Some(val) = trimmed.strip_prefix("Content-Length:") {
                        content_length = val.trim().parse().ok();
                    }
                }

                let length = match content_length {
                    Some(l) => l,
                    None => continue,
                };

                let mut body_buf = vec![0u8; length];
                if tokio::io::AsyncReadExt::read_exact(&mut reader, &mut body_buf)
                    .await
                    .is_err()
                {
                    return;
                }

                let body = match String::from_utf8(body_buf) {
                    Ok(s) => s,
                    Err(_) => continue,
                };

                let message = match decode_message(&body) {
                    Ok(m) => m,
                    Err(_) => continue,
                };

                dispatcher.lock().await.dispatch(message);
            }
        });

        self.writer_tx = Some(writer_tx);
        self.child = Some(child);

        self.initialize().await?;

        self.state = ClientState::Running;
        Ok(())
    }

    /// Send the initialize request and the initialized notification.
    async fn initialize(&mut self) -> Result<(), RpcError> {
        let params = serde_json::json!({
            "processId": std::process::id(),
            "capabilities": {},
            "rootUri": null,
            "clientInfo": {
                "name": "txls",
                "version": env!("CARGO_PKG_VERSION")
            }
        });

        self.send_request("initialize", params).await?;
        self.send_notification("initialized", serde_json::json!({}))
            .await?;
        Ok(())
    }

    /// Send a request and wait for the response.
    pub async fn send_request(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, RpcError> {
        let writer_tx = self.writer_tx.as_ref().ok_or(RpcError::ServerCrashed)?;

        let id = next_request_id();
        let framed = frame(&request_body(id, method, params));

        let rx = {
            let mut disp = self.dispatcher.lock().await;
            disp.register_request(id)
        };

        writer_tx
            .send(framed)
            .await
            .map_err(|_| RpcError::ServerCrashed)?;

        let secs = self.config.request_timeout_secs;
        let result = timeout(Duration::from_secs(secs), rx)
            .await
            .map_err(|_| RpcError::Timeout(secs))?
            .map_err(|_| RpcError::ServerCrashed)?;

        match result {
            DispatchResult::Success(val) => Ok(val),
            DispatchResult::Error(err) => Err(RpcError::Rpc {
                code: err.code,
                message: err.message,
            }),
        }
    }

    /// Send a notification (no response expected).
    pub async fn send_notification(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<(), RpcError> {
        let writer_tx = self.writer_tx.as_ref().ok_or(RpcError::ServerCrashed)?;
        let framed = frame(&notification_body(method, params));
        writer_tx
            .send(framed)
            .await
            .map_err(|_| RpcError::ServerCrashed)?;
        Ok(())
    }

    /// Execute a server-registered command with positional arguments.
    pub async fn execute_command(
        &self,
        command: &str,
        arguments: Vec<serde_json::Value>,
    ) -> Result<serde_json::Value, RpcError> {
        self.send_request(
            "workspace/executeCommand",
            serde_json::json!({
                "command": command,
                "arguments": arguments,
            }),
        )
        .await
    }

    /// Shutdown the server process.
    pub async fn shutdown(&mut self) -> Result<(), RpcError> {
        if self.state == ClientState::Stopped {
            return Ok(());
        }
        self.state = ClientState::ShuttingDown;

        let _ = self.send_request("shutdown", serde_json::Value::Null).await;
        let _ = self
            .send_notification("exit", serde_json::Value::Null)
            .await;

        self.writer_tx = None;

        if let Some(ref mut child) = self.child {
            let _ = child.wait().await;
        }

        self.state = ClientState::Stopped;
        Ok(())
    }
}

impl std::fmt::Debug for ToolchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolchainClient")
            .field("config", &self.config)
            .field("state", &self.state)
            .finish()
    }
}

// ── response parsing ────────────────────────────────────────────────────────

/// Parse the install-command result: `[name, dist_or_null, ..]`.
/// A null or missing dist location is the server's failure sentinel.
fn parse_install_outcome(value: &serde_json::Value) -> Option<InstallOutcome> {
    let name = value.get(0)?.as_str()?;
    let dist = value.get(1)?.as_str()?;
    if name.is_empty() {
        return None;
    }
    Some(InstallOutcome {
        project_name: name.to_string(),
        dist_location: PathBuf::from(dist),
    })
}

/// Parse the project map; a null result means "none installed".
fn parse_projects(value: serde_json::Value) -> Result<BTreeMap<String, Project>, RpcError> {
    if value.is_null() {
        return Ok(BTreeMap::new());
    }
    serde_json::from_value(value).map_err(|e| RpcError::Serialization(format!("project list: {e}")))
}

/// Parse a language→syntax map, stringifying non-string values.
fn parse_syntaxes(value: serde_json::Value) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    if let serde_json::Value::Object(map) = value {
        for (lang, syntax) in map {
            let text = match syntax {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            out.insert(lang, text);
        }
    }
    out
}

#[async_trait]
impl Toolchain for ToolchainClient {
    async fn generate_extension(
        &self,
        project: &str,
        target: &str,
        dest_dir: &Path,
        options: &GenerateOptions,
    ) -> Result<bool, ToolchainError> {
        let cmd_args = serde_json::json!({
            "project_name": project,
            "vsix": 1,
            "skip_keywords": options.skip_keywords,
            "vsce": options.vsce_path,
        });
        let result = self
            .execute_command(
                &Action::GenerateExtension.external(),
                vec![
                    serde_json::json!(target),
                    serde_json::json!(dest_dir),
                    cmd_args,
                ],
            )
            .await
            .map_err(ToolchainError::from)?;
        Ok(result.as_bool().unwrap_or(false))
    }

    async fn generate_syntaxes(
        &self,
        project: &str,
        target: &str,
        silent: bool,
    ) -> Result<BTreeMap<String, String>, ToolchainError> {
        let result = self
            .execute_command(
                &Action::GenerateSyntaxes.external(),
                vec![
                    serde_json::json!(project),
                    serde_json::json!(target),
                    serde_json::json!({ "silent": silent as u8 }),
                ],
            )
            .await
            .map_err(ToolchainError::from)?;
        Ok(parse_syntaxes(result))
    }

    async fn generators(&self) -> Result<Vec<GeneratorDescriptor>, ToolchainError> {
        let result = self
            .execute_command(&Action::GeneratorList.external(), vec![])
            .await
            .map_err(ToolchainError::from)?;
        if result.is_null() {
            return Ok(Vec::new());
        }
        serde_json::from_value(result)
            .map_err(|e| ToolchainError::InvalidResponse(format!("generator list: {e}")))
    }

    async fn install_project(
        &self,
        module_path: &Path,
        editable: bool,
    ) -> Result<Option<InstallOutcome>, ToolchainError> {
        let result = self
            .execute_command(
                &Action::ProjectInstall.external(),
                vec![serde_json::json!(module_path), serde_json::json!(editable)],
            )
            .await
            .map_err(ToolchainError::from)?;
        Ok(parse_install_outcome(&result))
    }

    async fn uninstall_project(&self, project_name: &str) -> Result<bool, ToolchainError> {
        let result = self
            .execute_command(
                &Action::ProjectUninstall.external(),
                vec![serde_json::json!(project_name)],
            )
            .await
            .map_err(ToolchainError::from)?;
        Ok(result.as_bool().unwrap_or(false))
    }

    async fn projects(&self) -> Result<BTreeMap<String, Project>, ToolchainError> {
        let result = self
            .execute_command(&Action::ProjectList.external(), vec![])
            .await
            .map_err(ToolchainError::from)?;
        parse_projects(result).map_err(ToolchainError::from)
    }

    async fn scaffold_project(&self, project_name: &str) -> Result<(), ToolchainError> {
        self.execute_command(
            &Action::ProjectScaffold.external(),
            vec![serde_json::json!(project_name)],
        )
        .await
        .map_err(ToolchainError::from)?;
        Ok(())
    }

    async fn install_language(
        &self,
        module_path: &Path,
        editable: bool,
    ) -> Result<Option<String>, ToolchainError> {
        let result = self
            .execute_command(
                &Action::LanguageInstall.external(),
                vec![serde_json::json!(module_path), serde_json::json!(editable)],
            )
            .await
            .map_err(ToolchainError::from)?;
        Ok(result
            .as_str()
            .filter(|name| !name.is_empty())
            .map(str::to_string))
    }

    async fn uninstall_language(&self, language_name: &str) -> Result<bool, ToolchainError> {
        let result = self
            .execute_command(
                &Action::LanguageUninstall.external(),
                vec![serde_json::json!(language_name)],
            )
            .await
            .map_err(ToolchainError::from)?;
        Ok(result.as_bool().unwrap_or(false))
    }

    async fn languages(&self) -> Result<Vec<Language>, ToolchainError> {
        let result = self
            .execute_command(&Action::LanguageList.external(), vec![])
            .await
            .map_err(ToolchainError::from)?;
        if result.is_null() {
            return Ok(Vec::new());
        }
        serde_json::from_value(result)
            .map_err(|e| ToolchainError::InvalidResponse(format!("language list: {e}")))
    }

    async fn scaffold_language(&self, language_name: &str) -> Result<(), ToolchainError> {
        self.execute_command(
            &Action::LanguageScaffold.external(),
            vec![serde_json::json!(language_name)],
        )
        .await
        .map_err(ToolchainError::from)?;
        Ok(())
    }

    async fn project_name_from_source(
        &self,
        setup_py: &Path,
    ) -> Result<Option<String>, ToolchainError> {
        let output = TokioCommand::new(&self.config.python)
            .arg(setup_py)
            .arg("--name")
            .output()
            .await
            .map_err(|e| {
                ToolchainError::SpawnFailed(format!("{}: {}", self.config.python.display(), e))
            })?;

        if !output.status.success() {
            return Ok(None);
        }
        let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(if name.is_empty() { None } else { Some(name) })
    }
}
