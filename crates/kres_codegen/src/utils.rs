//! Path normalization and identifier utilities.
//!
//! These functions bridge the gap between how resources are named on disk and
//! the identifiers used in generated sources. Display names are never derived
//! back from identifiers; both are kept side by side in the tree.

use camino::Utf8Path;
use std::borrow::Cow;

/// Kotlin hard keywords, which cannot be used as bare identifiers.
const KOTLIN_HARD_KEYWORDS: &[&str] = &[
    "as", "break", "class", "continue", "do", "else", "false", "for", "fun", "if", "in",
    "interface", "is", "null", "object", "package", "return", "super", "this", "throw", "true",
    "try", "typealias", "typeof", "val", "var", "when", "while",
];

/// Replace `.` with `_` so a name can be used as an identifier.
pub fn sanitize_name(name: &str) -> String {
    name.replace('.', "_")
}

/// Identifier of a file entry: the name without its last extension, sanitized.
///
/// - `logo.png` -> `logo`
/// - `logo.dark.png` -> `logo_dark`
/// - `README` -> `README`
/// - `.env` -> `_env` (the stem would be empty)
pub fn file_identifier(file_name: &str) -> String {
    let stem = match file_name.rfind('.') {
        Some(idx) if idx > 0 => &file_name[..idx],
        _ => file_name,
    };
    sanitize_name(stem)
}

/// Normalize a relative path to `/` separators.
pub fn normalize_rel_path(rel_path: &Utf8Path) -> String {
    rel_path
        .components()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join("/")
        .replace('\\', "/")
}

/// Quote an identifier with backticks if Kotlin would not accept it bare.
pub fn kotlin_identifier(name: &str) -> Cow<'_, str> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    };

    if valid && !KOTLIN_HARD_KEYWORDS.contains(&name) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("`{}`", name))
    }
}

/// Render a Kotlin string literal, escaping quotes, backslashes, `$` and control characters.
pub fn kotlin_string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
