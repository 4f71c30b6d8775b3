//! Generator descriptors reported by the toolchain.
use serde::Deserialize;

/// An available code generator, scoped to a target language.
///
/// Read-only: the toolchain owns this data, the client only lists it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorDescriptor {
    /// Language the generator consumes.
    pub language: String,
    /// Output target the generator produces.
    pub target: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
}
