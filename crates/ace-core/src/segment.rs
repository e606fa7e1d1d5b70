//! Segment codec: the line grammar of the store file.
//!
//! ```text
//! ace:<BASE32(wrapped key)>
//! NAME=<BASE32(nonce || ciphertext || tag)>
//! ...
//! <blank line>
//! ```

use crate::base32;
use crate::error::{CoreError, Result};

/// Marks a header line.
pub const HEADER_PREFIX: &str = "ace:";

/// One `name=ciphertext` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    /// Text-encoded value blob, see [`crate::value`].
    pub ciphertext: String,
}

/// A wrapped segment key and the entries sealed under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// CBOR bytes of a [`crate::wrap::WrappedKey`].
    pub wrapped_key: Vec<u8>,
    pub entries: Vec<Entry>,
}

impl Segment {
    /// Render the segment block, including the terminating blank line.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        out.push_str(HEADER_PREFIX);
        out.push_str(&base32::encode_padded(&self.wrapped_key));
        out.push('\n');
        for entry in &self.entries {
            out.push_str(&entry.name);
            out.push('=');
            out.push_str(&entry.ciphertext);
            out.push('\n');
        }
        out.push('\n');
        out
    }
}

/// Parse a whole store into segments, in file order.
///
/// Stores are written only by this codec, so any line that is neither
/// blank, a header, nor a `name=value` entry is corruption.
pub fn parse_store(text: &str) -> Result<Vec<Segment>> {
    let mut segments: Vec<Segment> = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.is_empty() {
            continue;
        }

        if let Some(body) = line.strip_prefix(HEADER_PREFIX) {
            let wrapped_key = base32::decode_padded(body)
                .map_err(|e| CoreError::Corrupt(format!("line {line_no}: header: {e}")))?;
            segments.push(Segment {
                wrapped_key,
                entries: Vec::new(),
            });
            continue;
        }

        let (name, ciphertext) = line
            .split_once('=')
            .ok_or_else(|| CoreError::Corrupt(format!("line {line_no}: entry without '='")))?;
        let segment = segments
            .last_mut()
            .ok_or_else(|| CoreError::Corrupt(format!("line {line_no}: entry before any header")))?;
        segment.entries.push(Entry {
            name: name.to_string(),
            ciphertext: ciphertext.to_string(),
        });
    }

    Ok(segments)
}

/// Collect `NAME=VALUE` lines from free-form input.
///
/// Blank lines, `#` comments and lines without `=` are skipped. Values are
/// returned raw; unquoting is the caller's job.
pub fn parse_pairs(text: &str) -> Vec<(String, String)> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(split_pair)
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

/// Split at the first `=`.
pub fn split_pair(pair: &str) -> Option<(&str, &str)> {
    pair.split_once('=')
}

/// Check that a name can be stored and exported.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(CoreError::syntax(name, "empty name"));
    }
    if name.starts_with(HEADER_PREFIX) {
        return Err(CoreError::syntax(name, "name collides with the header marker"));
    }
    if name.chars().any(|c| c.is_whitespace() || c == '=' || c.is_control()) {
        return Err(CoreError::syntax(
            name,
            "name must not contain whitespace, control characters or '='",
        ));
    }
    Ok(())
}
