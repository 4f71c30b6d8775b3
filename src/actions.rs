//! Internal action dispatch.
//!
//! One table maps every internal action id (`textx.<name>`) to its
//! handler. The table is built once at startup from the command
//! gateway, so an action without a handler is caught immediately
//! rather than on first use.
use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use txls_core::command::Action;
use txls_core::project::NodeRef;
use txls_services::{GeneratorService, LanguageService, ProjectService};

/// Shared state handed to every action handler.
pub struct ActionContext {
    pub projects: Arc<ProjectService>,
    pub languages: Arc<LanguageService>,
    pub generators: Arc<GeneratorService>,
}

type BoxFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + 'a>>;
type Handler = for<'a> fn(&'a ActionContext, &'a [String]) -> BoxFuture<'a>;

/// Dispatch table from internal action id to handler.
pub struct ActionTable {
    handlers: HashMap<String, Handler>,
}

impl ActionTable {
    pub fn new() -> Self {
        let mut handlers: HashMap<String, Handler> = HashMap::new();
        for action in Action::ALL {
            handlers.insert(action.internal(), handler_for(action));
        }
        Self { handlers }
    }

    pub fn contains(&self, internal_id: &str) -> bool {
        self.handlers.contains_key(internal_id)
    }

    pub async fn dispatch(
        &self,
        ctx: &ActionContext,
        internal_id: &str,
        args: &[String],
    ) -> Result<()> {
        let Some(handler) = self.handlers.get(internal_id) else {
            bail!("unknown action: {internal_id}");
        };
        tracing::debug!(action = %internal_id, "dispatching");
        handler(ctx, args).await
    }
}

impl Default for ActionTable {
    fn default() -> Self {
        Self::new()
    }
}

fn handler_for(action: Action) -> Handler {
    match action {
        Action::GenerateExtension => generate_extension,
        Action::GenerateSyntaxes => generate_syntaxes,
        Action::GeneratorList => list_generators,
        Action::ProjectInstall => install_project,
        Action::ProjectInstallEditable => install_project_editable,
        Action::ProjectList | Action::ProjectListRefresh => list_projects,
        Action::ProjectScaffold => scaffold_project,
        Action::ProjectUninstall => uninstall_project,
        Action::LanguageInstall => install_language,
        Action::LanguageInstallEditable => install_language_editable,
        Action::LanguageList => list_languages,
        Action::LanguageScaffold => scaffold_language,
        Action::LanguageUninstall => uninstall_language,
    }
}

fn required<'a>(args: &'a [String], what: &str) -> Result<&'a str> {
    args.first()
        .map(String::as_str)
        .with_context(|| format!("missing argument: {what}"))
}

/// A picked uninstall target: an existing path or anything with a
/// separator is a filesystem pick, everything else a project name.
fn node_from_arg(arg: &str) -> NodeRef {
    let path = Path::new(arg);
    if path.exists() || arg.contains(std::path::MAIN_SEPARATOR) {
        NodeRef::FilesystemPath {
            path: path.to_path_buf(),
        }
    } else {
        NodeRef::ProjectNode {
            name: arg.to_string(),
        }
    }
}

fn generate_extension<'a>(ctx: &'a ActionContext, args: &'a [String]) -> BoxFuture<'a> {
    Box::pin(async move {
        let project = required(args, "project name")?;
        let result = ctx
            .generators
            .generate_and_install_extension(project, false)
            .await?;
        if !result.installed {
            bail!("extension generation failed for: {project}");
        }
        println!("installed {}", result.extension_name);
        Ok(())
    })
}

fn generate_syntaxes<'a>(ctx: &'a ActionContext, args: &'a [String]) -> BoxFuture<'a> {
    Box::pin(async move {
        let project = required(args, "project name")?;
        let syntaxes = ctx.generators.languages_syntaxes(project).await?;
        if syntaxes.is_empty() {
            println!("no languages in {project}");
            return Ok(());
        }
        for language in syntaxes.keys() {
            println!("{language}");
        }
        Ok(())
    })
}

fn list_generators<'a>(ctx: &'a ActionContext, _args: &'a [String]) -> BoxFuture<'a> {
    Box::pin(async move {
        let generators = ctx.generators.all().await?;
        if generators.is_empty() {
            println!("no generators registered");
            return Ok(());
        }
        for g in generators {
            println!(
                "{} -> {}  {}",
                g.language,
                g.target,
                g.description.as_deref().unwrap_or("")
            );
        }
        Ok(())
    })
}

fn install_project<'a>(ctx: &'a ActionContext, args: &'a [String]) -> BoxFuture<'a> {
    Box::pin(install_project_inner(ctx, args, false))
}

fn install_project_editable<'a>(ctx: &'a ActionContext, args: &'a [String]) -> BoxFuture<'a> {
    Box::pin(install_project_inner(ctx, args, true))
}

async fn install_project_inner(
    ctx: &ActionContext,
    args: &[String],
    editable: bool,
) -> Result<()> {
    let path = PathBuf::from(required(args, "project path")?);
    match ctx.projects.install(&path, editable).await? {
        Some(outcome) => {
            println!(
                "installed {} ({})",
                outcome.project_name,
                outcome.dist_location.display()
            );
            Ok(())
        }
        None => bail!("project install failed"),
    }
}

fn list_projects<'a>(ctx: &'a ActionContext, _args: &'a [String]) -> BoxFuture<'a> {
    Box::pin(async move {
        let projects = ctx.projects.installed().await?;
        if projects.is_empty() {
            println!("no projects installed");
            return Ok(());
        }
        for project in projects.values() {
            let mode = if project.editable { "editable" } else { "release" };
            let languages: Vec<&str> =
                project.languages.iter().map(|l| l.name.as_str()).collect();
            println!(
                "{}  [{}]  {}  ({})",
                project.project_name,
                mode,
                project.dist_location.display(),
                languages.join(", ")
            );
        }
        Ok(())
    })
}

fn scaffold_project<'a>(ctx: &'a ActionContext, args: &'a [String]) -> BoxFuture<'a> {
    Box::pin(async move {
        let name = required(args, "project name")?;
        ctx.projects.scaffold(name).await?;
        println!("scaffold requested for {name}");
        Ok(())
    })
}

fn uninstall_project<'a>(ctx: &'a ActionContext, args: &'a [String]) -> BoxFuture<'a> {
    Box::pin(async move {
        let target = required(args, "project name or path")?;
        let removed = ctx.projects.uninstall_node(&node_from_arg(target)).await?;
        if !removed {
            bail!("project uninstall failed");
        }
        println!("uninstalled {target}");
        Ok(())
    })
}

fn install_language<'a>(ctx: &'a ActionContext, args: &'a [String]) -> BoxFuture<'a> {
    Box::pin(install_language_inner(ctx, args, false))
}

fn install_language_editable<'a>(ctx: &'a ActionContext, args: &'a [String]) -> BoxFuture<'a> {
    Box::pin(install_language_inner(ctx, args, true))
}

async fn install_language_inner(
    ctx: &ActionContext,
    args: &[String],
    editable: bool,
) -> Result<()> {
    let path = PathBuf::from(required(args, "language path")?);
    match ctx.languages.install(&path, editable).await? {
        Some(name) => {
            println!("installed language {name}");
            Ok(())
        }
        None => bail!("language install failed"),
    }
}

fn list_languages<'a>(ctx: &'a ActionContext, _args: &'a [String]) -> BoxFuture<'a> {
    Box::pin(async move {
        let languages = ctx.languages.installed().await?;
        if languages.is_empty() {
            println!("no languages installed");
            return Ok(());
        }
        for language in languages {
            println!(
                "{}  {}  {}",
                language.name,
                language.project_name.as_deref().unwrap_or("-"),
                language.description.as_deref().unwrap_or("")
            );
        }
        Ok(())
    })
}

fn scaffold_language<'a>(ctx: &'a ActionContext, args: &'a [String]) -> BoxFuture<'a> {
    Box::pin(async move {
        let name = required(args, "language name")?;
        ctx.languages.scaffold(name).await?;
        println!("scaffold requested for {name}");
        Ok(())
    })
}

fn uninstall_language<'a>(ctx: &'a ActionContext, args: &'a [String]) -> BoxFuture<'a> {
    Box::pin(async move {
        let name = required(args, "language name")?;
        if !ctx.languages.uninstall(name).await? {
            bail!("language uninstall failed");
        }
        println!("uninstalled {name}");
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_every_action() {
        let table = ActionTable::new();
        for action in Action::ALL {
            assert!(
                table.contains(&action.internal()),
                "no handler for {}",
                action.internal()
            );
        }
    }

    #[test]
    fn node_from_arg_distinguishes_paths_from_names() {
        assert!(matches!(
            node_from_arg("demo"),
            NodeRef::ProjectNode { .. }
        ));
        assert!(matches!(
            node_from_arg("/work/demo/setup.py"),
            NodeRef::FilesystemPath { .. }
        ));
    }
}
