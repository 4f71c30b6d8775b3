//! Command gateway mapping symbolic actions to command identifiers.
//!
//! Every user-facing action resolves to a pair of identifiers: the
//! `external` id is the command registered by the out-of-process textX
//! server and invoked through `workspace/executeCommand`; the
//! `internal` id names the host-side UI action. Both are derived from
//! the action by a fixed convention (`textx/<name>` and `textx.<name>`).

/// Prefix for server-registered external command ids.
const EXTERNAL_PREFIX: &str = "textx/";
/// Prefix for host-registered internal action ids.
const INTERNAL_PREFIX: &str = "textx.";

/// A symbolic action the client can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    GenerateExtension,
    GenerateSyntaxes,
    GeneratorList,
    ProjectInstall,
    ProjectInstallEditable,
    ProjectList,
    ProjectListRefresh,
    ProjectScaffold,
    ProjectUninstall,
    LanguageInstall,
    LanguageInstallEditable,
    LanguageList,
    LanguageScaffold,
    LanguageUninstall,
}

impl Action {
    /// All actions, in declaration order. Used to build the dispatch
    /// table at startup.
    pub const ALL: [Action; 14] = [
        Action::GenerateExtension,
        Action::GenerateSyntaxes,
        Action::GeneratorList,
        Action::ProjectInstall,
        Action::ProjectInstallEditable,
        Action::ProjectList,
        Action::ProjectListRefresh,
        Action::ProjectScaffold,
        Action::ProjectUninstall,
        Action::LanguageInstall,
        Action::LanguageInstallEditable,
        Action::LanguageList,
        Action::LanguageScaffold,
        Action::LanguageUninstall,
    ];

    /// The name used for the server-side (external) command id.
    ///
    /// Install-editable variants share the external command with their
    /// plain install counterpart; editable is a flag on the call, not a
    /// separate server command.
    fn external_name(self) -> &'static str {
        match self {
            Action::GenerateExtension => "generateExtension",
            Action::GenerateSyntaxes => "generateSyntaxes",
            Action::GeneratorList => "getGenerators",
            Action::ProjectInstall | Action::ProjectInstallEditable => "installProject",
            Action::ProjectList | Action::ProjectListRefresh => "getProjects",
            Action::ProjectScaffold => "scaffoldProject",
            Action::ProjectUninstall => "uninstallProject",
            Action::LanguageInstall | Action::LanguageInstallEditable => "installLanguage",
            Action::LanguageList => "getLanguages",
            Action::LanguageScaffold => "scaffoldLanguage",
            Action::LanguageUninstall => "uninstallLanguage",
        }
    }

    /// The name used for the host-side (internal) action id.
    fn internal_name(self) -> &'static str {
        match self {
            Action::GenerateExtension => "generateExtension",
            Action::GenerateSyntaxes => "generateSyntaxes",
            Action::GeneratorList => "getGenerators",
            Action::ProjectInstall => "installProject",
            Action::ProjectInstallEditable => "installProjectEditable",
            Action::ProjectList => "getProjects",
            Action::ProjectListRefresh => "refreshProjects",
            Action::ProjectScaffold => "scaffoldProject",
            Action::ProjectUninstall => "uninstallProject",
            Action::LanguageInstall => "installLanguage",
            Action::LanguageInstallEditable => "installLanguageEditable",
            Action::LanguageList => "getLanguages",
            Action::LanguageScaffold => "scaffoldLanguage",
            Action::LanguageUninstall => "uninstallLanguage",
        }
    }

    /// Resolve this action to its command descriptor.
    pub fn descriptor(self) -> CommandDescriptor {
        CommandDescriptor {
            external: format!("{}{}", EXTERNAL_PREFIX, self.external_name()),
            internal: format!("{}{}", INTERNAL_PREFIX, self.internal_name()),
        }
    }

    /// The external command id, as registered by the toolchain server.
    pub fn external(self) -> String {
        format!("{}{}", EXTERNAL_PREFIX, self.external_name())
    }

    /// The internal action id, as registered with the host UI.
    pub fn internal(self) -> String {
        format!("{}{}", INTERNAL_PREFIX, self.internal_name())
    }
}

/// The identifier pair for one action. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    /// Command id routed to the out-of-process toolchain.
    pub external: String,
    /// Action id registered with the host UI.
    pub internal: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_follows_naming_convention() {
        for action in Action::ALL {
            let desc = action.descriptor();
            assert!(
                desc.external.starts_with("textx/"),
                "external id must use slash prefix: {}",
                desc.external
            );
            assert!(
                desc.internal.starts_with("textx."),
                "internal id must use dot prefix: {}",
                desc.internal
            );
        }
    }

    #[test]
    fn external_ids_match_server_registration() {
        assert_eq!(Action::GenerateExtension.external(), "textx/generateExtension");
        assert_eq!(Action::GenerateSyntaxes.external(), "textx/generateSyntaxes");
        assert_eq!(Action::GeneratorList.external(), "textx/getGenerators");
        assert_eq!(Action::ProjectInstall.external(), "textx/installProject");
        assert_eq!(Action::ProjectList.external(), "textx/getProjects");
        assert_eq!(Action::ProjectScaffold.external(), "textx/scaffoldProject");
        assert_eq!(Action::ProjectUninstall.external(), "textx/uninstallProject");
    }

    #[test]
    fn editable_install_shares_external_id() {
        assert_eq!(
            Action::ProjectInstall.external(),
            Action::ProjectInstallEditable.external()
        );
        assert_ne!(
            Action::ProjectInstall.internal(),
            Action::ProjectInstallEditable.internal()
        );
    }

    #[test]
    fn internal_ids_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for action in Action::ALL {
            assert!(seen.insert(action.internal()), "duplicate internal id");
        }
    }

    #[test]
    fn descriptor_is_deterministic() {
        assert_eq!(
            Action::ProjectUninstall.descriptor(),
            Action::ProjectUninstall.descriptor()
        );
    }
}
