//! In-memory segment log.
//!
//! Primarily for tests. Same semantics as [`crate::FileStore`] except that
//! it always exists and nothing is persisted.

use std::sync::RwLock;

use crate::error::Result;
use crate::traits::SegmentLog;

/// In-memory store. Thread-safe via RwLock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    bytes: RwLock<Vec<u8>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding existing bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: RwLock::new(bytes.into()),
        }
    }

    /// Snapshot of the current contents.
    pub fn contents(&self) -> Vec<u8> {
        self.bytes.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl SegmentLog for MemoryStore {
    fn read_all(&self) -> Result<Vec<u8>> {
        Ok(self.contents())
    }

    fn append(&self, bytes: &[u8]) -> Result<()> {
        let mut log = self.bytes.write().unwrap_or_else(|e| e.into_inner());
        log.extend_from_slice(bytes);
        Ok(())
    }
}
