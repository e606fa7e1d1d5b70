//! File-backed segment log.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};
use crate::traits::SegmentLog;

/// A store file on disk.
///
/// Appends open the file with `O_APPEND` and write a whole segment at once.
/// That keeps earlier segments intact, but concurrent writers from separate
/// processes still need external locking to avoid interleaving.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Refer to a store file. Nothing is opened until first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SegmentLog for FileStore {
    fn read_all(&self) -> Result<Vec<u8>> {
        fs::read(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::NotFound(self.path.clone()),
            _ => StoreError::Io(e),
        })
    }

    fn append(&self, bytes: &[u8]) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(())
    }
}
