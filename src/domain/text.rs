//! Free-text cleanup.

use once_cell::sync::Lazy;
use regex::Regex;

/// Trims text, normalizes line endings to `\n` and collapses runs of blank
/// lines down to a single blank line.
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer;

impl TextNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Three or more line breaks, whitespace-only lines counting as blank.
    fn blank_run() -> &'static Regex {
        static PATTERN: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"\n(?:[ \t]*\n){2,}").expect("Valid blank line regex"));
        &PATTERN
    }

    pub fn normalize(&self, text: &str) -> String {
        let unified = Self::normalize_line_endings(text);
        Self::blank_run()
            .replace_all(unified.trim(), "\n\n")
            .into_owned()
    }

    /// CRLF and lone CR become LF.
    pub fn normalize_line_endings(text: &str) -> String {
        text.replace("\r\n", "\n").replace('\r', "\n")
    }
}
