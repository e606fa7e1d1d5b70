//! SegmentLog trait: the minimal interface for store persistence.

use crate::error::Result;

/// An append-only byte log holding encoded segments.
///
/// Implementations never rewrite bytes that were already appended.
/// The engine doesn't care where the bytes live; it only needs these two
/// operations.
pub trait SegmentLog: Send + Sync {
    /// Read every byte currently in the log.
    ///
    /// A log that is still growing is read as of this call.
    fn read_all(&self) -> Result<Vec<u8>>;

    /// Append `bytes` at the end of the log in a single write.
    fn append(&self, bytes: &[u8]) -> Result<()>;
}
