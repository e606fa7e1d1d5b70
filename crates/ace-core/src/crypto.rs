//! Key material.
//!
//! Recipients are X25519 public keys, identities are X25519 static secrets,
//! and every segment gets its own random XChaCha20-Poly1305 key.

use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::base32;
use crate::error::{CoreError, Result};

/// Prefix of a recipient's textual form.
pub const RECIPIENT_PREFIX: &str = "ace1";

/// Prefix of an identity's textual form.
pub const IDENTITY_PREFIX: &str = "ACE-SECRET-KEY-1";

/// Size of a segment key in bytes.
pub const SEGMENT_KEY_LEN: usize = 32;

/// A per-segment symmetric key.
///
/// Only its wrapped form is ever persisted.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SegmentKey([u8; SEGMENT_KEY_LEN]);

impl SegmentKey {
    /// Generate a new random key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; SEGMENT_KEY_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; SEGMENT_KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SEGMENT_KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for SegmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SegmentKey(..)")
    }
}

/// A public key segments can be wrapped for.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Recipient([u8; 32]);

impl Recipient {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub(crate) fn to_dalek(self) -> PublicKey {
        PublicKey::from(self.0)
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", RECIPIENT_PREFIX, base32::encode_lower_unpadded(&self.0))
    }
}

impl fmt::Debug for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Recipient({self})")
    }
}

impl FromStr for Recipient {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CoreError::InvalidRecipient(s.to_string());
        let body = s.strip_prefix(RECIPIENT_PREFIX).ok_or_else(invalid)?;
        let bytes = base32::decode_lower_unpadded(body).map_err(|_| invalid())?;
        let bytes: [u8; 32] = bytes.try_into().map_err(|_| invalid())?;
        Ok(Self(bytes))
    }
}

impl From<PublicKey> for Recipient {
    fn from(pk: PublicKey) -> Self {
        Self(*pk.as_bytes())
    }
}

/// A private key able to open segments wrapped for its [`Recipient`].
#[derive(Clone)]
pub struct Identity(StaticSecret);

impl Identity {
    /// Generate a new random identity.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let identity = Self::from_bytes(bytes);
        bytes.zeroize();
        identity
    }

    /// Create from seed bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(StaticSecret::from(bytes))
    }

    /// The recipient this identity can open.
    pub fn recipient(&self) -> Recipient {
        Recipient::from(PublicKey::from(&self.0))
    }

    /// Encode as `ACE-SECRET-KEY-1...`.
    pub fn to_secret_string(&self) -> String {
        format!(
            "{}{}",
            IDENTITY_PREFIX,
            base32::encode_upper_unpadded(self.0.as_bytes())
        )
    }

    pub(crate) fn diffie_hellman(&self, peer: &PublicKey) -> [u8; 32] {
        *self.0.diffie_hellman(peer).as_bytes()
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self.recipient())
    }
}

impl FromStr for Identity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let body = s
            .strip_prefix(IDENTITY_PREFIX)
            .ok_or_else(|| CoreError::InvalidIdentity("missing identity prefix".into()))?;
        let mut bytes = base32::decode_upper_unpadded(body)
            .map_err(|_| CoreError::InvalidIdentity("malformed key encoding".into()))?;
        let result = <[u8; 32]>::try_from(bytes.as_slice())
            .map(Self::from_bytes)
            .map_err(|_| CoreError::InvalidIdentity(format!("expected 32 key bytes, got {}", bytes.len())));
        bytes.zeroize();
        result
    }
}

/// Parse a recipient list: one key per line, blank and `#` lines ignored.
///
/// An empty list is not an error here.
pub fn parse_recipients(text: &str) -> Result<Vec<Recipient>> {
    key_lines(text).map(str::parse::<Recipient>).collect()
}

/// Parse an identity file. At least one identity is required.
pub fn parse_identities(text: &str) -> Result<Vec<Identity>> {
    let identities = key_lines(text)
        .map(str::parse::<Identity>)
        .collect::<Result<Vec<_>>>()?;
    if identities.is_empty() {
        return Err(CoreError::InvalidIdentity("no identities found".into()));
    }
    Ok(identities)
}

fn key_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}
