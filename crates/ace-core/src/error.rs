//! Error types for ace core.

use thiserror::Error;

/// Errors raised by the codecs and key parsers.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Stored data failed to decode or authenticate.
    ///
    /// Never recoverable: corruption is indistinguishable from tampering.
    #[error("corrupt data: {0}")]
    Corrupt(String),

    #[error("invalid recipient {0:?}")]
    InvalidRecipient(String),

    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    /// A `NAME=VALUE` pair or quoted value is malformed.
    #[error("syntax error in {name:?}: {reason}")]
    Syntax { name: String, reason: String },

    #[error("encryption error: {0}")]
    Encryption(String),
}

impl CoreError {
    pub(crate) fn syntax(name: &str, reason: impl Into<String>) -> Self {
        CoreError::Syntax {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// True for the corruption class of errors.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, CoreError::Corrupt(_))
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Outcome of a failed key unwrap.
///
/// `NoMatch` is the expected result for segments addressed to someone else
/// and must stay distinguishable from `Corrupt`.
#[derive(Debug, Error)]
pub enum UnwrapError {
    #[error("no identity matched any recipient of the wrapped key")]
    NoMatch,

    #[error("corrupt wrapped key: {0}")]
    Corrupt(String),
}
