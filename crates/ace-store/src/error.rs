//! Error types for the store module.

use std::path::PathBuf;

use ace_core::CoreError;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A segment must be readable by at least one recipient.
    #[error("no recipients: a segment needs at least one recipient")]
    NoRecipients,

    /// The store file does not exist.
    #[error("store not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Stored data failed to decode, unwrap or authenticate.
    #[error("corrupt store: {0}")]
    Corrupt(String),

    /// Encryption or codec failure while building a segment.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// True when the backing store could not be read at all.
    pub fn is_unreadable(&self) -> bool {
        matches!(self, StoreError::NotFound(_) | StoreError::Io(_))
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
