//! txls-core — shared domain model for the textX lifecycle client.
//!
//! This crate defines the command gateway, the project/language/generator
//! data model, the languages-changed event hub, and the collaborator
//! traits (external toolchain, editor host) the coordinators are wired
//! against.
pub mod command;
pub mod error;
pub mod event;
pub mod generator;
pub mod host;
pub mod logging;
pub mod project;
pub mod toolchain;

// Re-export key types for convenience.
pub use command::{Action, CommandDescriptor};
pub use error::{HostError, ToolchainError};
pub use event::{EventHub, SubscriptionId};
pub use generator::GeneratorDescriptor;
pub use host::{EditorHost, ExtensionInstall, ExtensionRemoval};
pub use project::{extension_name, normalize_module_path, InstallOutcome, Language, NodeRef, Project};
pub use toolchain::{GenerateOptions, Toolchain, EXTENSION_GENERATOR_TARGET, SYNTAX_HIGHLIGHT_TARGET};
