//! RFC 4648 base32.
//!
//! Store lines use the standard padded alphabet. Key text uses the unpadded
//! form so keys stay copy-pasteable.

use crate::error::{CoreError, Result};

const UPPER: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";
const LOWER: &[u8; 32] = b"abcdefghijklmnopqrstuvwxyz234567";

/// Encode with the standard alphabet and `=` padding.
pub fn encode_padded(data: &[u8]) -> String {
    let mut out = encode_with(data, UPPER);
    while out.len() % 8 != 0 {
        out.push('=');
    }
    out
}

/// Decode standard padded base32.
pub fn decode_padded(text: &str) -> Result<Vec<u8>> {
    if text.len() % 8 != 0 {
        return Err(CoreError::Corrupt(format!(
            "base32 length {} is not a multiple of 8",
            text.len()
        )));
    }
    let body = text.trim_end_matches('=');
    let padding = text.len() - body.len();
    if !matches!(padding, 0 | 1 | 3 | 4 | 6) {
        return Err(CoreError::Corrupt(format!("invalid base32 padding ({padding})")));
    }
    decode_with(body, UPPER)
}

/// Encode with the lowercase alphabet, no padding.
pub fn encode_lower_unpadded(data: &[u8]) -> String {
    encode_with(data, LOWER)
}

/// Encode with the uppercase alphabet, no padding.
pub fn encode_upper_unpadded(data: &[u8]) -> String {
    encode_with(data, UPPER)
}

pub fn decode_lower_unpadded(text: &str) -> Result<Vec<u8>> {
    decode_with(text, LOWER)
}

pub fn decode_upper_unpadded(text: &str) -> Result<Vec<u8>> {
    decode_with(text, UPPER)
}

fn encode_with(data: &[u8], alphabet: &[u8; 32]) -> String {
    let mut result = String::with_capacity((data.len() * 8 + 4) / 5);
    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;

    for &byte in data {
        buffer = (buffer << 8) | (byte as u64);
        bits_in_buffer += 8;

        while bits_in_buffer >= 5 {
            bits_in_buffer -= 5;
            let index = ((buffer >> bits_in_buffer) & 0x1f) as usize;
            result.push(alphabet[index] as char);
        }
    }

    if bits_in_buffer > 0 {
        let index = ((buffer << (5 - bits_in_buffer)) & 0x1f) as usize;
        result.push(alphabet[index] as char);
    }

    result
}

fn decode_with(text: &str, alphabet: &[u8; 32]) -> Result<Vec<u8>> {
    // 1, 3 and 6 trailing symbols cannot come from whole bytes.
    if matches!(text.len() % 8, 1 | 3 | 6) {
        return Err(CoreError::Corrupt(format!(
            "invalid base32 length {}",
            text.len()
        )));
    }

    let mut out = Vec::with_capacity(text.len() * 5 / 8);
    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;

    for c in text.bytes() {
        let index = alphabet
            .iter()
            .position(|&a| a == c)
            .ok_or_else(|| CoreError::Corrupt(format!("invalid base32 character {:?}", c as char)))?;
        buffer = (buffer << 5) | index as u64;
        bits_in_buffer += 5;

        if bits_in_buffer >= 8 {
            bits_in_buffer -= 8;
            out.push((buffer >> bits_in_buffer) as u8);
            buffer &= (1 << bits_in_buffer) - 1;
        }
    }

    if buffer != 0 {
        return Err(CoreError::Corrupt("non-zero trailing bits in base32".into()));
    }

    Ok(out)
}
