//! Value quoting.
//!
//! Three token forms are accepted on input:
//!
//! - `'single quoted'`: the body is taken verbatim.
//! - `"double quoted"`: `\"`, `\\`, `\n`, `\t`, `\r` and `\$` are unescaped.
//!   Any other escape is kept as written, and inner unescaped `"` characters
//!   are literal (only the outermost pair delimits the token).
//! - bare: taken verbatim, minus surrounding whitespace.

use std::borrow::Cow;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    #[error("unterminated {0} quote")]
    Unterminated(char),
}

/// Strip quoting syntax from a raw value token.
pub fn unescape(raw: &str) -> Result<String, QuoteError> {
    let token = raw.trim();
    match token.chars().next() {
        Some(quote @ ('\'' | '"')) => {
            if token.len() < 2 || !token.ends_with(quote) {
                return Err(QuoteError::Unterminated(quote));
            }
            let body = &token[1..token.len() - 1];
            if quote == '\'' {
                Ok(body.to_string())
            } else {
                unescape_double(body)
            }
        }
        _ => Ok(token.to_string()),
    }
}

fn unescape_double(body: &str) -> Result<String, QuoteError> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        // A trailing backslash escaped the closing quote.
        match chars.next().ok_or(QuoteError::Unterminated('"'))? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '"' => out.push('"'),
            '\\' => out.push('\\'),
            '$' => out.push('$'),
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    Ok(out)
}

/// Render a value so that [`unescape`] gives it back unchanged.
///
/// Values that survive as bare tokens are returned as-is.
pub fn quote(value: &str) -> Cow<'_, str> {
    let needs_quotes = value != value.trim()
        || value.starts_with(['"', '\''])
        || value.chars().any(char::is_control);
    if !needs_quotes {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    Cow::Owned(out)
}
