//! Loading recipients and identities from the command line and key files.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use ace_core::{parse_identities, parse_recipients, Identity, Recipient};
use tracing::debug;

use crate::error::{AceError, Result};

/// Collect recipients from literal `-r` values and recipient files.
///
/// Duplicates are dropped, first occurrence wins. Every source must load;
/// an empty result is left for the caller to reject.
pub fn load_recipients(literals: &[String], files: &[PathBuf]) -> Result<Vec<Recipient>> {
    let mut recipients = Vec::new();
    for literal in literals {
        recipients.push(literal.trim().parse::<Recipient>()?);
    }
    for path in files {
        recipients.extend(read_recipient_file(path)?);
    }

    let mut seen = HashSet::new();
    recipients.retain(|r| seen.insert(*r));
    Ok(recipients)
}

/// Read one recipient file.
pub fn read_recipient_file(path: &Path) -> Result<Vec<Recipient>> {
    let text = fs::read_to_string(path).map_err(|e| AceError::RecipientFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let recipients = parse_recipients(&text).map_err(|e| AceError::RecipientFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    debug!(path = %path.display(), count = recipients.len(), "loaded recipient file");
    Ok(recipients)
}

/// Read one identity file. The file must hold at least one identity.
pub fn read_identity_file(path: &Path) -> Result<Vec<Identity>> {
    let text = fs::read_to_string(path).map_err(|e| AceError::IdentityFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let identities = parse_identities(&text).map_err(|e| AceError::IdentityFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    debug!(path = %path.display(), count = identities.len(), "loaded identity file");
    Ok(identities)
}

/// Read every identity file. The first failure aborts.
pub fn load_identities(paths: &[PathBuf]) -> Result<Vec<Identity>> {
    let mut identities = Vec::new();
    for path in paths {
        identities.extend(read_identity_file(path)?);
    }
    Ok(identities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_literals_and_files_merge_without_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let alice = Identity::from_bytes([1; 32]).recipient();
        let bob = Identity::from_bytes([2; 32]).recipient();

        let file = dir.path().join("recipients.txt");
        fs::write(&file, format!("# team\n{alice}\n\n{bob}\n")).unwrap();

        let loaded = load_recipients(&[alice.to_string()], &[file]).unwrap();
        assert_eq!(loaded, vec![alice, bob]);
    }

    #[test]
    fn test_missing_recipient_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_recipients(&[], &[dir.path().join("nope.txt")]).unwrap_err();
        assert!(matches!(err, AceError::RecipientFile { .. }));
    }

    #[test]
    fn test_invalid_literal_recipient() {
        let err = load_recipients(&["ace1notakey".to_string()], &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_identity_file_requires_a_key() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("identity.txt");
        fs::write(&file, "# nothing here\n").unwrap();

        let err = read_identity_file(&file).unwrap_err();
        assert!(matches!(err, AceError::IdentityFile { .. }));
    }

    #[test]
    fn test_identities_from_several_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = Identity::from_bytes([1; 32]);
        let b = Identity::from_bytes([2; 32]);
        let fa = dir.path().join("a.txt");
        let fb = dir.path().join("b.txt");
        fs::write(&fa, a.to_secret_string()).unwrap();
        fs::write(&fb, format!("{}\n", b.to_secret_string())).unwrap();

        let loaded = load_identities(&[fa, fb]).unwrap();
        let recipients: Vec<_> = loaded.iter().map(Identity::recipient).collect();
        assert_eq!(recipients, vec![a.recipient(), b.recipient()]);
    }
}
