//! Page titles from document text.
//!
//! Titles come from the first line fragment that looks like `Lecture 3: Topic`
//! (colon or dash optional). The whole match is the title, `Lecture N` prefix
//! and any trailing blanks included. Documents without such a line fall back
//! to their filename stem.

use regex::Regex;
use std::sync::LazyLock;

/// `Lecture <digits>`, optional `:` or `-`, then the rest of the line.
/// Whitespace is limited to blanks so a match never spans lines.
static LECTURE_TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Lecture[ \t]+\d+[:\-]?[ \t]*.*").unwrap());

/// Extract a title from raw document text, or return `fallback`.
///
/// The matched text is returned verbatim, except that the `\r` of a CRLF line
/// ending is not part of the title.
pub fn extract_title(text: &str, fallback: &str) -> String {
    LECTURE_TITLE_RE
        .find(text)
        .map(|m| {
            let line = m.as_str();
            line.strip_suffix('\r').unwrap_or(line).to_string()
        })
        .unwrap_or_else(|| fallback.to_string())
}
