//! # ace store
//!
//! Append-only persistence for ace segments and the engine that resolves
//! them into a plaintext environment.
//!
//! ## Key Types
//!
//! - [`SegmentLog`] - the trait for append-only byte logs
//! - [`FileStore`] - store file on disk
//! - [`MemoryStore`] - in-memory log for tests
//! - [`append_segment`] / [`resolve`] - the two engine operations
//!
//! ## Usage
//!
//! ```rust
//! use ace_core::Identity;
//! use ace_store::{append_segment, resolve, MemoryStore};
//!
//! let store = MemoryStore::new();
//! let alice = Identity::generate();
//!
//! let pairs = vec![("API_TOKEN".to_string(), "hunter2".to_string())];
//! append_segment(&store, &[alice.recipient()], &pairs).unwrap();
//!
//! let env = resolve(&store, &[alice]).unwrap();
//! assert_eq!(env["API_TOKEN"], "hunter2");
//! ```
//!
//! ## Design Notes
//!
//! - **Append-only**: segments are never rewritten; a new value for a name is
//!   a new segment that shadows older ones.
//! - **Scoped reads**: a reader sees the last value it can decrypt, which is
//!   not necessarily the last value written.

pub mod engine;
pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use engine::{
    append_segment, resolve, resolve_text, resolve_with_stats, seal_segment, ResolveStats,
    ResolvedEnv, SegmentSummary,
};
pub use error::{Result, StoreError};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::SegmentLog;
