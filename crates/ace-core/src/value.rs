//! Value codec.
//!
//! Each value is sealed under its segment key with XChaCha20-Poly1305 and a
//! fresh random nonce. The stored text is `base32(nonce || ciphertext || tag)`,
//! so decryption needs nothing beyond the segment key.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use rand::RngCore;

use crate::base32;
use crate::crypto::SegmentKey;
use crate::error::{CoreError, Result};

/// Nonce length for XChaCha20-Poly1305.
pub const NONCE_LEN: usize = 24;

/// Poly1305 tag length.
pub const TAG_LEN: usize = 16;

/// Encrypt a value and return its text encoding.
pub fn encrypt(key: &SegmentKey, plaintext: &str) -> Result<String> {
    let cipher = XChaCha20Poly1305::new_from_slice(key.as_bytes())
        .map_err(|e| CoreError::Encryption(e.to_string()))?;

    let mut nonce = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce);

    let sealed = cipher
        .encrypt(XNonce::from_slice(&nonce), plaintext.as_bytes())
        .map_err(|e| CoreError::Encryption(e.to_string()))?;

    let mut blob = Vec::with_capacity(NONCE_LEN + sealed.len());
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&sealed);
    Ok(base32::encode_padded(&blob))
}

/// Decrypt a value produced by [`encrypt`].
///
/// Any failure is [`CoreError::Corrupt`]: bad encoding, a truncated blob,
/// a failed tag check, or plaintext that is not UTF-8.
pub fn decrypt(key: &SegmentKey, encoded: &str) -> Result<String> {
    let blob = base32::decode_padded(encoded)?;
    if blob.len() < NONCE_LEN + TAG_LEN {
        return Err(CoreError::Corrupt(format!(
            "value blob too short: {} bytes",
            blob.len()
        )));
    }

    let (nonce, sealed) = blob.split_at(NONCE_LEN);
    let cipher = XChaCha20Poly1305::new_from_slice(key.as_bytes())
        .map_err(|e| CoreError::Corrupt(e.to_string()))?;
    let plaintext = cipher
        .decrypt(XNonce::from_slice(nonce), sealed)
        .map_err(|_| CoreError::Corrupt("value authentication failed".into()))?;

    String::from_utf8(plaintext).map_err(|_| CoreError::Corrupt("value is not valid UTF-8".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let key = SegmentKey::generate();
        let encoded = encrypt(&key, "hello, encrypted world!").unwrap();

        assert_eq!(decrypt(&key, &encoded).unwrap(), "hello, encrypted world!");
    }

    #[test]
    fn test_empty_value() {
        let key = SegmentKey::generate();
        let encoded = encrypt(&key, "").unwrap();
        assert_eq!(base32::decode_padded(&encoded).unwrap().len(), NONCE_LEN + TAG_LEN);
        assert_eq!(decrypt(&key, &encoded).unwrap(), "");
    }

    #[test]
    fn test_fresh_nonce_per_value() {
        let key = SegmentKey::generate();
        let a = encrypt(&key, "same").unwrap();
        let b = encrypt(&key, "same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_wrong_key_is_corrupt() {
        let key1 = SegmentKey::generate();
        let key2 = SegmentKey::generate();
        let encoded = encrypt(&key1, "secret").unwrap();

        assert!(decrypt(&key2, &encoded).unwrap_err().is_corrupt());
    }

    #[test]
    fn test_tampered_value_is_corrupt() {
        let key = SegmentKey::generate();
        let encoded = encrypt(&key, "secret").unwrap();

        let mut blob = base32::decode_padded(&encoded).unwrap();
        let last = blob.len() - 1;
        blob[last] ^= 0x01;
        let tampered = base32::encode_padded(&blob);

        assert!(decrypt(&key, &tampered).unwrap_err().is_corrupt());
    }

    #[test]
    fn test_short_blob_is_corrupt() {
        let key = SegmentKey::generate();
        let short = base32::encode_padded(&[0u8; NONCE_LEN + TAG_LEN - 1]);
        assert!(decrypt(&key, &short).unwrap_err().is_corrupt());
    }

    #[test]
    fn test_bad_encoding_is_corrupt() {
        let key = SegmentKey::generate();
        assert!(decrypt(&key, "not base32!").unwrap_err().is_corrupt());
    }

    proptest! {
        #[test]
        fn value_roundtrip(value in any::<String>()) {
            let key = SegmentKey::generate();
            let encoded = encrypt(&key, &value).unwrap();
            prop_assert_eq!(decrypt(&key, &encoded).unwrap(), value);
        }
    }
}
