//! txls-syntax — keyword highlighting from generated syntaxes.
//!
//! Editable installs regenerate TextMate syntax definitions on every
//! grammar change; this crate extracts the keyword sets from those
//! definitions and compiles them into per-language regex matchers.
pub mod error;
pub mod highlighter;
pub mod textmate;

pub use error::SyntaxError;
pub use highlighter::{KeywordHighlighter, KeywordSpan};
pub use textmate::{extract_keywords, parse_textmate, TextmatePattern, TextmateSyntax};
