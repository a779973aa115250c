//! JSON string-content escaping for values interpolated into generated bodies.
//!
//! # Design
//! Only values that end up *inside* a JSON string literal go through
//! `json_escape` (today: the search query). Documents and settings typed by
//! the user are already JSON and are forwarded untouched; escaping them would
//! double-escape every quote.
//!
//! Control characters without a short form become `\u00xx`. Non-ASCII
//! characters are valid inside JSON strings and are emitted as UTF-8, so the
//! escaped text always decodes back to the input.

use std::fmt::Write;

/// Longest escape sequence produced for a single input byte (`\u00xx`).
const MAX_ESCAPE_LEN: usize = 6;

/// Escape `input` so it can be placed between double quotes in a JSON document.
pub fn json_escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len() * MAX_ESCAPE_LEN);
    for c in input.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\u{08}' => escaped.push_str("\\b"),
            '\u{0c}' => escaped.push_str("\\f"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if c.is_ascii_control() => {
                // Writing into a String cannot fail.
                let _ = write!(escaped, "\\u{:04x}", c as u32);
            }
            c => escaped.push(c),
        }
    }
    escaped
}
