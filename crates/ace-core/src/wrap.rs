//! Segment key wrapping via X25519 key agreement.
//!
//! A segment key is wrapped once per recipient. Each stanza carries a fresh
//! ephemeral public key and the segment key sealed with ChaCha20-Poly1305
//! under a key derived from the ECDH shared secret. Any one identity that
//! matches a stanza can recover the segment key.
//!
//! Stanzas also carry a short recipient tag, and the whole key is closed
//! by a BLAKE3 MAC keyed from the segment key. An identity that is named
//! by a tag but cannot open its stanza, or that opens a stanza under a bad
//! MAC, sees `Corrupt` rather than `NoMatch`.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use x25519_dalek::{EphemeralSecret, PublicKey};
use zeroize::Zeroize;

use crate::crypto::{Identity, Recipient, SegmentKey, SEGMENT_KEY_LEN};
use crate::error::{CoreError, Result, UnwrapError};

/// Wire format version of [`WrappedKey`].
pub const WRAP_VERSION: u8 = 1;

const WRAP_CONTEXT: &str = "ace v1 segment key wrap";
const TAG_CONTEXT: &str = "ace v1 recipient tag";
const MAC_CONTEXT: &str = "ace v1 header mac";

const TAG_LEN: usize = 16;

/// One recipient's copy of the segment key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Stanza {
    /// Names the recipient without revealing the key.
    tag: [u8; TAG_LEN],
    /// Sender's side of the ECDH.
    ephemeral_public: [u8; 32],
    nonce: [u8; 12],
    /// The segment key sealed under the derived wrap key (includes tag).
    encrypted_key: Vec<u8>,
}

/// A segment key wrapped for a set of recipients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrappedKey {
    version: u8,
    stanzas: Vec<Stanza>,
    /// Keyed BLAKE3 over `version` and `stanzas`.
    mac: [u8; 32],
}

/// The MAC'd portion of a [`WrappedKey`].
#[derive(Serialize)]
struct MacBody<'a> {
    version: u8,
    stanzas: &'a [Stanza],
}

impl WrappedKey {
    /// Number of recipients this key was wrapped for.
    pub fn recipient_count(&self) -> usize {
        self.stanzas.len()
    }

    /// Serialize to CBOR bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf).map_err(|e| CoreError::Encryption(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize from CBOR bytes. The input must hold exactly one item.
    pub fn from_bytes(bytes: &[u8]) -> std::result::Result<Self, UnwrapError> {
        let mut rest = bytes;
        let wrapped: Self =
            ciborium::from_reader(&mut rest).map_err(|e| UnwrapError::Corrupt(e.to_string()))?;
        if !rest.is_empty() {
            return Err(UnwrapError::Corrupt(format!(
                "{} trailing bytes after wrapped key",
                rest.len()
            )));
        }
        if wrapped.version != WRAP_VERSION {
            return Err(UnwrapError::Corrupt(format!(
                "unsupported wrap version {}",
                wrapped.version
            )));
        }
        Ok(wrapped)
    }

    fn verify(&self, key: &SegmentKey) -> std::result::Result<(), UnwrapError> {
        let expected = header_mac(key, self.version, &self.stanzas)
            .map_err(|e| UnwrapError::Corrupt(e.to_string()))?;
        // blake3::Hash equality is constant time.
        if expected != blake3::Hash::from(self.mac) {
            return Err(UnwrapError::Corrupt("wrapped key MAC mismatch".into()));
        }
        Ok(())
    }
}

/// Wrap `key` so that any of `recipients` can unwrap it.
///
/// Zero recipients yields a key nobody can open; callers that persist the
/// result must check for that themselves.
pub fn wrap(recipients: &[Recipient], key: &SegmentKey) -> Result<WrappedKey> {
    let stanzas = recipients
        .iter()
        .map(|recipient| wrap_for(recipient, key.as_bytes()))
        .collect::<Result<Vec<_>>>()?;
    let mac = header_mac(key, WRAP_VERSION, &stanzas)?;

    Ok(WrappedKey {
        version: WRAP_VERSION,
        stanzas,
        mac: *mac.as_bytes(),
    })
}

/// Recover the segment key with the first identity that matches a stanza.
///
/// `NoMatch` only when no identity opens a stanza and none is named by a
/// stanza tag.
pub fn unwrap(
    identities: &[Identity],
    wrapped: &WrappedKey,
) -> std::result::Result<SegmentKey, UnwrapError> {
    for identity in identities {
        let recipient = identity.recipient();
        for stanza in &wrapped.stanzas {
            if let Some(key) = open_stanza(identity, &recipient, stanza)? {
                wrapped.verify(&key)?;
                return Ok(key);
            }
        }
        let tag = recipient_tag(&recipient);
        if wrapped.stanzas.iter().any(|stanza| stanza.tag == tag) {
            return Err(UnwrapError::Corrupt(
                "stanza addressed to this identity does not open".into(),
            ));
        }
    }
    Err(UnwrapError::NoMatch)
}

/// Decode a CBOR wrapped key and unwrap it.
pub fn unwrap_bytes(
    identities: &[Identity],
    bytes: &[u8],
) -> std::result::Result<SegmentKey, UnwrapError> {
    unwrap(identities, &WrappedKey::from_bytes(bytes)?)
}

fn wrap_for(recipient: &Recipient, key: &[u8]) -> Result<Stanza> {
    let ephemeral = EphemeralSecret::random_from_rng(rand::thread_rng());
    let ephemeral_public = *PublicKey::from(&ephemeral).as_bytes();

    let mut shared = *ephemeral.diffie_hellman(&recipient.to_dalek()).as_bytes();
    let wrap_key = derive_wrap_key(&shared, &ephemeral_public, recipient);
    shared.zeroize();

    let mut nonce = [0u8; 12];
    rand::thread_rng().fill_bytes(&mut nonce);

    let encrypted_key = wrap_key
        .encrypt(Nonce::from_slice(&nonce), key)
        .map_err(|e| CoreError::Encryption(e.to_string()))?;

    Ok(Stanza {
        tag: recipient_tag(recipient),
        ephemeral_public,
        nonce,
        encrypted_key,
    })
}

fn recipient_tag(recipient: &Recipient) -> [u8; TAG_LEN] {
    let hash = blake3::derive_key(TAG_CONTEXT, recipient.as_bytes());
    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&hash[..TAG_LEN]);
    tag
}

fn header_mac(key: &SegmentKey, version: u8, stanzas: &[Stanza]) -> Result<blake3::Hash> {
    let mut body = Vec::new();
    ciborium::into_writer(&MacBody { version, stanzas }, &mut body)
        .map_err(|e| CoreError::Encryption(e.to_string()))?;
    let mut mac_key = blake3::derive_key(MAC_CONTEXT, key.as_bytes());
    let mac = blake3::keyed_hash(&mac_key, &body);
    mac_key.zeroize();
    Ok(mac)
}

/// `Ok(None)` when the stanza belongs to someone else.
fn open_stanza(
    identity: &Identity,
    recipient: &Recipient,
    stanza: &Stanza,
) -> std::result::Result<Option<SegmentKey>, UnwrapError> {
    let mut shared = identity.diffie_hellman(&PublicKey::from(stanza.ephemeral_public));
    if shared.iter().all(|&b| b == 0) {
        return Err(UnwrapError::Corrupt("low-order ephemeral key".into()));
    }
    let wrap_key = derive_wrap_key(&shared, &stanza.ephemeral_public, recipient);
    shared.zeroize();

    let opened = wrap_key.decrypt(
        Nonce::from_slice(&stanza.nonce),
        stanza.encrypted_key.as_slice(),
    );
    let Ok(mut key_bytes) = opened else {
        return Ok(None);
    };

    let key = <[u8; SEGMENT_KEY_LEN]>::try_from(key_bytes.as_slice()).map(SegmentKey::from_bytes);
    let len = key_bytes.len();
    key_bytes.zeroize();
    key.map(Some).map_err(|_| {
        UnwrapError::Corrupt(format!(
            "invalid key length: expected {SEGMENT_KEY_LEN}, got {len}"
        ))
    })
}

fn derive_wrap_key(
    shared: &[u8; 32],
    ephemeral_public: &[u8; 32],
    recipient: &Recipient,
) -> ChaCha20Poly1305 {
    let mut hasher = blake3::Hasher::new_derive_key(WRAP_CONTEXT);
    hasher.update(shared);
    hasher.update(ephemeral_public);
    hasher.update(recipient.as_bytes());
    let okm = hasher.finalize();
    ChaCha20Poly1305::new(Key::from_slice(okm.as_bytes()))
}
