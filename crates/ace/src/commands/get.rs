//! `ace get`: print the secrets the given identities can read.

use std::io::Write;
use std::path::PathBuf;

use ace_core::quote;
use ace_store::{resolve, FileStore, ResolvedEnv};
use clap::Args;

use super::Context;
use crate::config;
use crate::error::Result;
use crate::keys;

#[derive(Debug, Clone, Args)]
pub struct GetCommand {
    /// Identity file to decrypt with. Can be repeated. Defaults to the
    /// comma-separated list in ACE_IDENTITY, then ./identity.txt
    #[arg(short = 'i', long = "identity", value_name = "PATH")]
    pub identities: Vec<PathBuf>,

    /// Store file to read
    #[arg(
        short = 'e',
        long = "env-file",
        value_name = "PATH",
        env = config::ENV_FILE_VAR,
        default_value = config::DEFAULT_ENV_FILE
    )]
    pub env_file: PathBuf,

    /// Only print these names. Names that are not set are left out.
    #[arg(value_name = "NAME")]
    pub names: Vec<String>,
}

impl GetCommand {
    pub fn run(&self, ctx: &mut Context<'_>) -> Result<()> {
        let identities = keys::load_identities(&config::identity_files(&self.identities))?;
        let env = resolve(&FileStore::new(&self.env_file), &identities)?;
        let env = select(env, &self.names);

        for (name, value) in &env {
            writeln!(ctx.output, "{name}={}", quote(value))?;
        }
        ctx.output.flush()?;
        Ok(())
    }
}

/// Keep only `names`, or everything when no names are given.
fn select(mut env: ResolvedEnv, names: &[String]) -> ResolvedEnv {
    if names.is_empty() {
        return env;
    }
    names
        .iter()
        .filter_map(|name| env.remove_entry(name))
        .collect()
}
