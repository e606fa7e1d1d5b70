//! `ace set`: encrypt pairs into a new segment.

use std::collections::HashSet;
use std::path::PathBuf;

use ace_core::segment::{split_pair, validate_name};
use ace_core::{parse_pairs, unescape, CoreError};
use ace_store::{append_segment, FileStore, SegmentSummary};
use clap::Args;
use tracing::warn;

use super::Context;
use crate::config;
use crate::error::{AceError, Result};
use crate::keys;

#[derive(Debug, Clone, Args)]
pub struct SetCommand {
    /// Encrypt to the specified RECIPIENT. Can be repeated.
    #[arg(short = 'r', long = "recipient", value_name = "RECIPIENT")]
    pub recipients: Vec<String>,

    /// Encrypt to recipients listed at PATH. Can be repeated. Defaults to ./recipients.txt
    #[arg(short = 'R', long = "recipient-file", value_name = "PATH")]
    pub recipient_files: Vec<PathBuf>,

    /// Store file to append to
    #[arg(
        short = 'e',
        long = "env-file",
        value_name = "PATH",
        env = config::ENV_FILE_VAR,
        default_value = config::DEFAULT_ENV_FILE
    )]
    pub env_file: PathBuf,

    /// Pairs to store. Read from stdin when none are given.
    #[arg(value_name = "NAME=VALUE")]
    pub pairs: Vec<String>,
}

impl SetCommand {
    pub fn run(&self, ctx: &mut Context<'_>) -> Result<SegmentSummary> {
        let files = config::recipient_files(&self.recipient_files);
        let recipients = keys::load_recipients(&self.recipients, &files)?;
        if recipients.is_empty() {
            return Err(AceError::NoRecipients);
        }

        let raw = if self.pairs.is_empty() {
            parse_pairs(&ctx.read_input()?)
        } else {
            self.argument_pairs()
        };
        let entries = prepare_entries(raw)?;

        let store = FileStore::new(&self.env_file);
        let summary = append_segment(&store, &recipients, &entries)?;
        Ok(summary)
    }

    fn argument_pairs(&self) -> Vec<(String, String)> {
        self.pairs
            .iter()
            .filter_map(|arg| match split_pair(arg) {
                Some((name, value)) => Some((name.to_string(), value.to_string())),
                None => {
                    warn!(argument = %arg, "ignoring argument without '='");
                    None
                }
            })
            .collect()
    }
}

/// Validate names and unquote values. Duplicate names are rejected.
fn prepare_entries(raw: Vec<(String, String)>) -> Result<Vec<(String, String)>> {
    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(raw.len());

    for (name, value) in raw {
        let name = name.trim().to_string();
        validate_name(&name)?;
        if !seen.insert(name.clone()) {
            return Err(syntax(&name, "duplicate name"));
        }
        let value = unescape(&value).map_err(|e| syntax(&name, &e.to_string()))?;
        entries.push((name, value));
    }
    Ok(entries)
}

fn syntax(name: &str, reason: &str) -> AceError {
    AceError::Core(CoreError::Syntax {
        name: name.to_string(),
        reason: reason.to_string(),
    })
}
