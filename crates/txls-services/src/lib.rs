//! txls-services — the lifecycle coordinators.
//!
//! Project and language installs, uninstalls and scaffolding, plus
//! extension generation. Every coordinator delegates the real work to
//! the toolchain and host seams from `txls-core`; what lives here is
//! sequencing: which external calls happen in which order, what gets
//! watched, and when the languages-changed signal fires.
pub mod error;
pub mod generator;
mod guard;
pub mod language;
pub mod project;

#[cfg(test)]
mod testkit;

pub use error::ServiceError;
pub use generator::GeneratorService;
pub use language::LanguageService;
pub use project::ProjectService;
