use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex as StdMutex;

use anyhow::{bail, Context, Result};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use txls_config::{load_config, Config};
use txls_core::command::Action;
use txls_core::event::EventHub;
use txls_core::logging::{
    default_log_file_path, ensure_log_dir, rotate_log_files, DEFAULT_MAX_LOG_FILES,
    DEFAULT_MAX_LOG_SIZE,
};
use txls_rpc::{ServerConfig, ToolchainClient};
use txls_services::{GeneratorService, LanguageService, ProjectService};
use txls_syntax::KeywordHighlighter;
use txls_watch::WatchRegistry;

mod actions;
mod host;

use actions::{ActionContext, ActionTable};
use host::CliHost;

const USAGE: &str = "\
usage: txls [--watch] <command>

commands:
  project install <path> [--editable]    install a project (wheel or source dir)
  project install-editable <path>        install a project in editable mode
  project uninstall <name|path>          uninstall a project
  project scaffold <name>                scaffold a new project
  project list                           list installed projects
  language install <path> [--editable]   install a language package
  language install-editable <path>       install a language in editable mode
  language uninstall <name>              uninstall a language
  language scaffold <name>               scaffold a new language package
  language list                          list installed languages
  generators list                        list available generators
  extension generate <project>           regenerate and install the extension
  syntaxes generate <project>            list generated language syntaxes

options:
  --watch     keep running after the command, regenerating extensions
              when watched grammars change
";

/// One parsed command-line invocation.
#[derive(Debug, PartialEq, Eq)]
struct Invocation {
    internal_id: String,
    args: Vec<String>,
    watch: bool,
}

fn parse_args(args: &[String]) -> Result<Invocation> {
    let mut watch = false;
    let mut editable = false;
    let mut words: Vec<String> = Vec::new();
    for arg in args {
        match arg.as_str() {
            "--watch" => watch = true,
            "--editable" => editable = true,
            other => words.push(other.to_string()),
        }
    }

    let group = words.first().map(String::as_str);
    let verb = words.get(1).map(String::as_str);
    let action = match (group, verb) {
        (Some("project"), Some("install")) if editable => Action::ProjectInstallEditable,
        (Some("project"), Some("install")) => Action::ProjectInstall,
        (Some("project"), Some("install-editable")) => Action::ProjectInstallEditable,
        (Some("project"), Some("uninstall")) => Action::ProjectUninstall,
        (Some("project"), Some("scaffold")) => Action::ProjectScaffold,
        (Some("project"), Some("list")) => Action::ProjectList,
        (Some("project"), Some("refresh")) => Action::ProjectListRefresh,
        (Some("language"), Some("install")) if editable => Action::LanguageInstallEditable,
        (Some("language"), Some("install")) => Action::LanguageInstall,
        (Some("language"), Some("install-editable")) => Action::LanguageInstallEditable,
        (Some("language"), Some("uninstall")) => Action::LanguageUninstall,
        (Some("language"), Some("scaffold")) => Action::LanguageScaffold,
        (Some("language"), Some("list")) => Action::LanguageList,
        (Some("generators"), Some("list")) => Action::GeneratorList,
        (Some("extension"), Some("generate")) => Action::GenerateExtension,
        (Some("syntaxes"), Some("generate")) => Action::GenerateSyntaxes,
        (None, _) => bail!("no command given"),
        _ => bail!("unknown command: {}", words.join(" ")),
    };

    Ok(Invocation {
        internal_id: action.internal(),
        args: words[2..].to_vec(),
        watch,
    })
}

/// The global config directory (`$TXLS_CONFIG_DIR`, else
/// `$HOME/.config/txls`).
fn config_dir() -> PathBuf {
    if let Some(dir) = env::var_os("TXLS_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".config").join("txls");
    }
    PathBuf::from("/tmp/txls/config")
}

/// Direct tracing output to the rotated log file so it never bleeds
/// into command output.
fn init_tracing(config: &Config) -> Result<()> {
    let log_path = config
        .log
        .file
        .clone()
        .unwrap_or_else(default_log_file_path);
    ensure_log_dir(&log_path)?;
    rotate_log_files(&log_path, DEFAULT_MAX_LOG_SIZE, DEFAULT_MAX_LOG_FILES)?;
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file: {}", log_path.display()))?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.log.level.as_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(StdMutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run(invocation: Invocation) -> Result<()> {
    let workspace = env::current_dir().ok();
    let config = load_config(&config_dir(), workspace.as_deref()).unwrap_or_else(|e| {
        eprintln!("txls: config load failed, using defaults: {e}");
        Config::default()
    });

    init_tracing(&config)?;

    let mut client = ToolchainClient::new(ServerConfig {
        command: config.toolchain.command.clone(),
        args: config.toolchain.args.clone(),
        python: config.toolchain.python.clone(),
        request_timeout_secs: config.toolchain.request_timeout_secs,
    });
    client
        .start()
        .await
        .context("failed to start the toolchain server")?;
    let toolchain = Arc::new(client);

    let host = Arc::new(CliHost::new(config.editor.command.clone()));
    let events = Arc::new(EventHub::new());
    let watches = Arc::new(Mutex::new(WatchRegistry::new()));
    let highlighter = Arc::new(StdMutex::new(KeywordHighlighter::new()));

    let generators = Arc::new(GeneratorService::new(
        toolchain.clone(),
        host.clone(),
        highlighter,
        config.editor.vsce_path.clone(),
    ));
    let projects = Arc::new(ProjectService::new(
        toolchain.clone(),
        host.clone(),
        events.clone(),
        watches.clone(),
        generators.clone(),
    ));
    let languages = Arc::new(LanguageService::new(
        toolchain.clone(),
        host.clone(),
        events.clone(),
        generators.clone(),
    ));

    let ctx = ActionContext {
        projects,
        languages,
        generators,
    };
    let table = ActionTable::new();

    let outcome = table
        .dispatch(&ctx, &invocation.internal_id, &invocation.args)
        .await;

    if invocation.watch && outcome.is_ok() {
        let watched = watches.lock().await.watch_count();
        info!(watched, "watching for grammar changes");
        eprintln!("txls: watching {watched} project(s), press Ctrl-C to stop");
        tokio::signal::ctrl_c()
            .await
            .context("failed to wait for Ctrl-C")?;
    }

    drop(ctx);
    match Arc::try_unwrap(toolchain) {
        Ok(mut client) => {
            if let Err(e) = client.shutdown().await {
                error!("toolchain shutdown failed: {e}");
            }
        }
        // Regeneration tasks still hold the client; the server exits
        // with our stdio pipes.
        Err(_) => debug!("toolchain client still shared at exit"),
    }

    outcome
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let invocation = match parse_args(&args) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("txls: {e:#}\n\n{USAGE}");
            std::process::exit(2);
        }
    };

    if let Err(e) = run(invocation).await {
        eprintln!("txls: {e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn parse_project_install() {
        let inv = parse_args(&args(&["project", "install", "/work/demo"])).unwrap();
        assert_eq!(inv.internal_id, "textx.installProject");
        assert_eq!(inv.args, vec!["/work/demo"]);
        assert!(!inv.watch);
    }

    #[test]
    fn parse_editable_flag_switches_action() {
        let inv =
            parse_args(&args(&["project", "install", "/work/demo", "--editable"])).unwrap();
        assert_eq!(inv.internal_id, "textx.installProjectEditable");

        let inv = parse_args(&args(&["project", "install-editable", "/work/demo"])).unwrap();
        assert_eq!(inv.internal_id, "textx.installProjectEditable");
    }

    #[test]
    fn parse_watch_flag() {
        let inv = parse_args(&args(&["project", "list", "--watch"])).unwrap();
        assert_eq!(inv.internal_id, "textx.getProjects");
        assert!(inv.watch);
    }

    #[test]
    fn parse_language_commands() {
        let inv = parse_args(&args(&["language", "uninstall", "flow"])).unwrap();
        assert_eq!(inv.internal_id, "textx.uninstallLanguage");
        assert_eq!(inv.args, vec!["flow"]);
    }

    #[test]
    fn parse_rejects_unknown_commands() {
        assert!(parse_args(&args(&["frobnicate"])).is_err());
        assert!(parse_args(&args(&[])).is_err());
    }

    #[test]
    fn parsed_ids_have_handlers() {
        let table = ActionTable::new();
        for words in [
            vec!["project", "install", "p"],
            vec!["project", "uninstall", "n"],
            vec!["project", "scaffold", "n"],
            vec!["project", "list"],
            vec!["project", "refresh"],
            vec!["language", "install", "p"],
            vec!["language", "uninstall", "n"],
            vec!["language", "scaffold", "n"],
            vec!["language", "list"],
            vec!["generators", "list"],
            vec!["extension", "generate", "p"],
            vec!["syntaxes", "generate", "p"],
        ] {
            let inv = parse_args(&args(&words)).unwrap();
            assert!(table.contains(&inv.internal_id), "{}", inv.internal_id);
        }
    }
}
