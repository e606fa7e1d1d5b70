//! `ace keygen`: generate an identity.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use ace_core::Identity;
use clap::Args;
use tracing::info;

use super::Context;
use crate::error::{AceError, Result};

#[derive(Debug, Clone, Args)]
pub struct KeygenCommand {
    /// Write the identity to PATH instead of stdout. Existing files are never overwritten.
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

impl KeygenCommand {
    pub fn run(&self, ctx: &mut Context<'_>) -> Result<Identity> {
        let identity = Identity::generate();
        let text = identity_file_text(&identity);

        match &self.output {
            Some(path) => {
                write_new_file(path, &text)?;
                info!(path = %path.display(), "wrote identity");
                writeln!(ctx.errors, "Public key: {}", identity.recipient())?;
            }
            None => ctx.output.write_all(text.as_bytes())?,
        }
        Ok(identity)
    }
}

/// The identity file body: the public key as a comment, then the secret.
pub fn identity_file_text(identity: &Identity) -> String {
    format!(
        "# public key: {}\n{}\n",
        identity.recipient(),
        identity.to_secret_string()
    )
}

fn write_new_file(path: &Path, text: &str) -> Result<()> {
    let output_error = |source: std::io::Error| AceError::Output {
        path: path.to_path_buf(),
        source,
    };

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path).map_err(output_error)?;
    file.write_all(text.as_bytes()).map_err(output_error)?;
    Ok(())
}
