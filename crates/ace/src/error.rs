//! Error types for ace commands.

use std::io;
use std::path::PathBuf;

use ace_core::CoreError;
use ace_store::StoreError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum AceError {
    /// Set was given nothing to encrypt to.
    #[error("no recipients: pass --recipient or list keys in a recipient file")]
    NoRecipients,

    /// A recipient file could not be read or parsed.
    #[error("recipient file {}: {reason}", path.display())]
    RecipientFile { path: PathBuf, reason: String },

    /// An identity file could not be read or parsed.
    #[error("identity file {}: {reason}", path.display())]
    IdentityFile { path: PathBuf, reason: String },

    /// Codec and key parsing errors (invalid recipient, syntax).
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The child command for `env` could not be started.
    #[error("failed to run {program:?}")]
    ChildProcess {
        program: String,
        #[source]
        source: io::Error,
    },

    /// A file Keygen was told to write could not be created.
    #[error("cannot write {}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Broad class of an [`AceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid keys and key files.
    Config,
    /// Stored data failed to decode or authenticate.
    Corrupt,
    /// A malformed `NAME=VALUE` pair.
    Syntax,
    /// The child process could not be started.
    ChildProcess,
    /// Anything else the OS reported.
    Io,
}

impl AceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AceError::NoRecipients
            | AceError::RecipientFile { .. }
            | AceError::IdentityFile { .. } => ErrorKind::Config,
            AceError::Core(CoreError::Syntax { .. }) => ErrorKind::Syntax,
            AceError::Core(CoreError::Corrupt(_)) => ErrorKind::Corrupt,
            AceError::Core(_) => ErrorKind::Config,
            AceError::Store(StoreError::Corrupt(_)) => ErrorKind::Corrupt,
            AceError::Store(StoreError::Core(e)) if e.is_corrupt() => ErrorKind::Corrupt,
            AceError::Store(StoreError::NoRecipients) => ErrorKind::Config,
            AceError::Store(_) => ErrorKind::Io,
            AceError::ChildProcess { .. } => ErrorKind::ChildProcess,
            AceError::Output { .. } | AceError::Io(_) => ErrorKind::Io,
        }
    }

    /// True when the store file or an identity file could not be read.
    ///
    /// These are the events an `env` on-missing policy may tolerate.
    pub fn is_missing_input(&self) -> bool {
        match self {
            AceError::IdentityFile { .. } => true,
            AceError::Store(e) => e.is_unreadable(),
            _ => false,
        }
    }
}

/// Result type for ace commands.
pub type Result<T> = std::result::Result<T, AceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(AceError::NoRecipients.kind(), ErrorKind::Config);
        assert_eq!(
            AceError::Core(CoreError::Syntax {
                name: "A".into(),
                reason: "unterminated".into()
            })
            .kind(),
            ErrorKind::Syntax
        );
        assert_eq!(
            AceError::Store(StoreError::Corrupt("bad".into())).kind(),
            ErrorKind::Corrupt
        );
    }

    #[test]
    fn test_report_chain_names_each_cause_once() {
        let err = anyhow::Error::from(AceError::ChildProcess {
            program: "deploy".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        });
        assert_eq!(format!("{err:#}"), "failed to run \"deploy\": no such file");

        let err = anyhow::Error::from(AceError::Store(StoreError::Io(io::Error::new(
            io::ErrorKind::Other,
            "disk full",
        ))));
        assert_eq!(format!("{err:#}"), "disk full");
    }

    #[test]
    fn test_missing_input() {
        let missing = AceError::Store(StoreError::NotFound(".env.ace".into()));
        assert!(missing.is_missing_input());

        let corrupt = AceError::Store(StoreError::Corrupt("bad".into()));
        assert!(!corrupt.is_missing_input());

        let identity = AceError::IdentityFile {
            path: "id.txt".into(),
            reason: "not found".into(),
        };
        assert!(identity.is_missing_input());
    }
}
