//! Line parser
//!
//! Splits a single `key = value  # comment` line into its parts.

use crate::error::ParseErrorKind;

/// A parsed `key=value` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine<'a> {
    /// Lowercased key
    pub key: String,

    /// Value with surrounding whitespace removed
    pub value: &'a str,
}

/// Whitespace as understood by C's `isspace` in the "C" locale
pub fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0b' | '\x0c' | '\r')
}

/// Parse one line
///
/// Returns `Ok(None)` for blank and comment-only lines.
pub fn parse_line(line: &str) -> Result<Option<ParsedLine<'_>>, ParseErrorKind> {
    let content = match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    };
    let content = content.trim_matches(is_space);

    if content.is_empty() {
        return Ok(None);
    }
    if content.starts_with('=') {
        return Err(ParseErrorKind::EmptyKey);
    }

    let key_end = content
        .find(|c: char| c == '=' || is_space(c))
        .unwrap_or(content.len());
    let key = content[..key_end].to_ascii_lowercase();

    let rest = content[key_end..].trim_start_matches(is_space);
    let value = match rest.strip_prefix('=') {
        Some(value) => value.trim_start_matches(is_space),
        None => return Err(ParseErrorKind::MissingSeparator),
    };

    Ok(Some(ParsedLine { key, value }))
}
