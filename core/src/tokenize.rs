//! Splits one interactive input line into command tokens.
//!
//! Only the ASCII space separates tokens. A token opening with `"` runs to
//! the next `"` (or the end of the line) and keeps its inner spaces.

/// Upper bound on tokens collected from a single line.
pub const MAX_TOKENS: usize = 64;

/// Tokenize `line`, keeping at most `max_tokens` tokens.
///
/// Input past the last kept token is dropped without error. Tokens borrow
/// from `line`.
pub fn tokenize(line: &str, max_tokens: usize) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = line;

    while tokens.len() < max_tokens {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            break;
        }

        if let Some(quoted) = rest.strip_prefix('"') {
            match quoted.find('"') {
                Some(end) => {
                    tokens.push(&quoted[..end]);
                    rest = &quoted[end + 1..];
                }
                None => {
                    tokens.push(quoted);
                    rest = "";
                }
            }
        } else {
            let end = rest.find(' ').unwrap_or(rest.len());
            tokens.push(&rest[..end]);
            rest = &rest[end..];
        }
    }

    tokens
}
