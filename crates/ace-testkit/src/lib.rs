//! # ace testkit
//!
//! Testing utilities for ace.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Quoting vectors**: raw value tokens with the value each must unquote to
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Temporary key files and stores, and a command runner
//!
//! ## Quoting Vectors
//!
//! ```rust
//! use ace_testkit::vectors::all_vectors;
//!
//! for vector in all_vectors() {
//!     assert_eq!(ace_core::unescape(vector.raw).unwrap(), vector.expected);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use ace_testkit::generators::secret_value;
//!
//! proptest! {
//!     #[test]
//!     fn quote_roundtrip(value in secret_value()) {
//!         let quoted = ace_core::quote(&value);
//!         prop_assert_eq!(ace_core::unescape(&quoted).unwrap(), value);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use ace_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let alice = fixture.party("alice", 1);
//! let recipients = fixture.recipient_file("recipients.txt", &[&alice]);
//! assert!(recipients.exists());
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{identity_from_seed, multi_party_fixtures, run, Party, RunOutput, TestFixture};
pub use vectors::{all_vectors, QuotingVector};
