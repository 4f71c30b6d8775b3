//! TextMate syntax definitions, as produced by the toolchain's
//! textmate generator target.
//!
//! Only the slice of the format needed for keyword extraction is
//! modeled: the top-level name/scope and the pattern list with its
//! `match`/`name` pairs.
use serde::Deserialize;

use crate::error::SyntaxError;

/// A parsed TextMate grammar file.
#[derive(Debug, Clone, Deserialize)]
pub struct TextmateSyntax {
    /// Display name of the grammar.
    #[serde(default)]
    pub name: Option<String>,
    /// Root scope, e.g. `source.flow`.
    #[serde(rename = "scopeName", default)]
    pub scope_name: Option<String>,
    /// Top-level patterns.
    #[serde(default)]
    pub patterns: Vec<TextmatePattern>,
}

/// One pattern entry. Nested `patterns` appear in include blocks.
#[derive(Debug, Clone, Deserialize)]
pub struct TextmatePattern {
    /// Scope assigned to matches, e.g. `keyword.control.flow`.
    #[serde(default)]
    pub name: Option<String>,
    /// The match regex, in Oniguruma syntax.
    #[serde(rename = "match", default)]
    pub match_pattern: Option<String>,
    /// Nested patterns.
    #[serde(default)]
    pub patterns: Vec<TextmatePattern>,
}

/// Parse a TextMate grammar from its JSON source.
pub fn parse_textmate(json: &str) -> Result<TextmateSyntax, SyntaxError> {
    serde_json::from_str(json).map_err(|e| SyntaxError::Parse(e.to_string()))
}

/// Collect the keyword tokens from every `keyword.*`-scoped pattern.
///
/// The generator emits keyword rules in the shape
/// `\b(if|else|while)\b`; the word-boundary anchors and alternation
/// group are unwrapped and the alternatives returned in order of
/// first appearance, deduplicated. Tokens containing regex syntax
/// beyond plain identifiers are skipped.
pub fn extract_keywords(syntax: &TextmateSyntax) -> Vec<String> {
    let mut keywords = Vec::new();
    for pattern in &syntax.patterns {
        collect_keywords(pattern, &mut keywords);
    }
    keywords
}

fn collect_keywords(pattern: &TextmatePattern, out: &mut Vec<String>) {
    if let (Some(scope), Some(regex)) = (&pattern.name, &pattern.match_pattern) {
        if scope.starts_with("keyword") {
            for token in split_alternation(regex) {
                if is_word_token(&token) && !out.iter().any(|k| *k == token) {
                    out.push(token);
                }
            }
        }
    }
    for nested in &pattern.patterns {
        collect_keywords(nested, out);
    }
}

/// Strip `\b` anchors and one level of grouping, then split on `|`.
fn split_alternation(regex: &str) -> Vec<String> {
    let mut body = regex.trim();
    body = body.strip_prefix("\\b").unwrap_or(body);
    body = body.strip_suffix("\\b").unwrap_or(body);
    body = body
        .strip_prefix("(?:")
        .or_else(|| body.strip_prefix('('))
        .unwrap_or(body);
    body = body.strip_suffix(')').unwrap_or(body);
    body.split('|')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Plain identifier check: alternatives with residual regex syntax
/// are not keywords.
fn is_word_token(token: &str) -> bool {
    !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}
