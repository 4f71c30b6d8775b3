//! Per-language keyword matchers compiled from extracted keyword sets.
use std::collections::HashMap;

use regex::Regex;

use crate::error::SyntaxError;

/// A matched keyword occurrence within a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSpan {
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
    /// The matched keyword.
    pub keyword: String,
}

/// Holds one compiled keyword regex per language.
///
/// Language entries are replaced wholesale when a grammar is
/// regenerated; stale keyword sets never linger.
pub struct KeywordHighlighter {
    languages: HashMap<String, Regex>,
}

impl KeywordHighlighter {
    /// Create a highlighter with no languages registered.
    pub fn new() -> Self {
        Self {
            languages: HashMap::new(),
        }
    }

    /// Compile `keywords` into a word-boundary matcher for `language`,
    /// replacing any previous set. An empty keyword list removes the
    /// language instead.
    ///
    /// # Errors
    ///
    /// [`SyntaxError::InvalidPattern`] if the combined pattern fails
    /// to compile.
    pub fn add_language_keywords(
        &mut self,
        language: &str,
        keywords: &[String],
    ) -> Result<(), SyntaxError> {
        if keywords.is_empty() {
            if self.languages.remove(language).is_some() {
                tracing::debug!(%language, "keyword set cleared");
            }
            return Ok(());
        }

        let alternation = keywords
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = format!(r"\b(?:{})\b", alternation);
        let regex = Regex::new(&pattern).map_err(|e| SyntaxError::InvalidPattern {
            language: language.to_string(),
            detail: e.to_string(),
        })?;

        tracing::debug!(%language, keywords = keywords.len(), "keyword set compiled");
        self.languages.insert(language.to_string(), regex);
        Ok(())
    }

    /// Remove the keyword set for `language`. No-op when absent.
    pub fn remove_language(&mut self, language: &str) {
        self.languages.remove(language);
    }

    /// Whether a keyword set is registered for `language`.
    pub fn has_language(&self, language: &str) -> bool {
        self.languages.contains_key(language)
    }

    /// All keyword occurrences in `line`, left to right. Empty when
    /// the language has no keyword set.
    pub fn highlight_line(&self, language: &str, line: &str) -> Vec<KeywordSpan> {
        let Some(regex) = self.languages.get(language) else {
            return Vec::new();
        };
        regex
            .find_iter(line)
            .map(|m| KeywordSpan {
                start: m.start(),
                end: m.end(),
                keyword: m.as_str().to_string(),
            })
            .collect()
    }

    /// Names of all registered languages.
    pub fn languages(&self) -> Vec<&str> {
        self.languages.keys().map(String::as_str).collect()
    }
}

impl Default for KeywordHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for KeywordHighlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeywordHighlighter")
            .field("languages", &self.languages.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn highlights_registered_keywords() {
        let mut hl = KeywordHighlighter::new();
        hl.add_language_keywords("flow", &keywords(&["algo", "flow"]))
            .unwrap();

        let spans = hl.highlight_line("flow", "algo first -> flow second");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].keyword, "algo");
        assert_eq!((spans[0].start, spans[0].end), (0, 4));
        assert_eq!(spans[1].keyword, "flow");
        assert_eq!((spans[1].start, spans[1].end), (14, 18));
    }

    #[test]
    fn word_boundaries_prevent_partial_matches() {
        let mut hl = KeywordHighlighter::new();
        hl.add_language_keywords("flow", &keywords(&["if"])).unwrap();

        assert!(hl.highlight_line("flow", "notify gift").is_empty());
        assert_eq!(hl.highlight_line("flow", "if x").len(), 1);
    }

    #[test]
    fn unknown_language_yields_nothing() {
        let hl = KeywordHighlighter::new();
        assert!(hl.highlight_line("ghost", "if else while").is_empty());
    }

    #[test]
    fn regeneration_replaces_the_keyword_set() {
        let mut hl = KeywordHighlighter::new();
        hl.add_language_keywords("flow", &keywords(&["old"])).unwrap();
        hl.add_language_keywords("flow", &keywords(&["new"])).unwrap();

        assert!(hl.highlight_line("flow", "old").is_empty());
        assert_eq!(hl.highlight_line("flow", "new").len(), 1);
    }

    #[test]
    fn empty_keyword_list_removes_language() {
        let mut hl = KeywordHighlighter::new();
        hl.add_language_keywords("flow", &keywords(&["if"])).unwrap();
        hl.add_language_keywords("flow", &[]).unwrap();
        assert!(!hl.has_language("flow"));
    }

    #[test]
    fn keywords_with_regex_metacharacters_are_escaped() {
        let mut hl = KeywordHighlighter::new();
        hl.add_language_keywords("flow", &keywords(&["a_b", "c1"]))
            .unwrap();
        assert_eq!(hl.highlight_line("flow", "a_b c1").len(), 2);
    }

    #[test]
    fn remove_language_is_noop_safe() {
        let mut hl = KeywordHighlighter::new();
        hl.remove_language("ghost");
        assert!(hl.languages().is_empty());
    }
}
