//! # ace core
//!
//! Pure primitives for the ace secret store: key material, the value and
//! segment codecs, and recipient key wrapping.
//!
//! This crate does no I/O. Reading and appending store files lives in
//! `ace-store`.
//!
//! ## Encryption Model
//!
//! Every write produces one segment with a two-layer key model:
//!
//! 1. **Segment key**: a fresh XChaCha20-Poly1305 key that seals each value
//! 2. **Wrapped key**: the segment key sealed once per recipient via X25519 ECDH
//!
//! Readers try each of their identities against each segment's wrapped key.
//! Segments that do not open are somebody else's and are skipped.
//!
//! ## Key Types
//!
//! - [`Recipient`] / [`Identity`] - X25519 public and private keys
//! - [`SegmentKey`] - per-segment symmetric key
//! - [`WrappedKey`] - a segment key wrapped for a recipient set
//! - [`Segment`] - the parsed form of one store block

pub mod base32;
pub mod crypto;
pub mod error;
pub mod quoting;
pub mod segment;
pub mod value;
pub mod wrap;

pub use crypto::{parse_identities, parse_recipients, Identity, Recipient, SegmentKey};
pub use error::{CoreError, Result, UnwrapError};
pub use quoting::{quote, unescape, QuoteError};
pub use segment::{parse_pairs, parse_store, Entry, Segment, HEADER_PREFIX};
pub use wrap::{unwrap, wrap, WrappedKey};
