//! `ace env`: run a command with the resolved secrets in its environment.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{self, Stdio};
use std::thread;

use ace_core::Identity;
use ace_store::{resolve, FileStore, ResolvedEnv};
use clap::{Args, ValueEnum};
use tracing::debug;

use super::Context;
use crate::config;
use crate::error::{AceError, Result};
use crate::keys;

/// What Env does when the store or an identity file cannot be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OnMissing {
    /// Fail before starting the command
    #[default]
    Error,
    /// Print a warning and continue without the missing input
    Warn,
    /// Continue silently
    Ignore,
}

impl OnMissing {
    /// Apply the policy to a missing-input error.
    ///
    /// Anything that is not a missing input is passed through unchanged.
    fn tolerate(self, err: AceError, ctx: &mut Context<'_>) -> Result<()> {
        if !err.is_missing_input() {
            return Err(err);
        }
        match self {
            OnMissing::Error => Err(err),
            OnMissing::Warn => {
                debug!(error = %err, "continuing without missing input");
                writeln!(ctx.errors, "warning: {err}")?;
                Ok(())
            }
            OnMissing::Ignore => {
                debug!(error = %err, "ignoring missing input");
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct EnvCommand {
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

    /// What to do when the store or an identity file is missing
    #[arg(
        long = "on-missing",
        value_enum,
        env = config::ON_MISSING_VAR,
        default_value_t = OnMissing::Error
    )]
    pub on_missing: OnMissing,

    /// Command to run, after `--`
    #[arg(last = true, required = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

impl EnvCommand {
    /// Resolve secrets, run the child and return its exit code.
    pub fn run(&self, ctx: &mut Context<'_>) -> Result<i32> {
        let env = self.resolve_env(ctx)?;
        spawn(&self.command, &env, ctx)
    }

    fn resolve_env(&self, ctx: &mut Context<'_>) -> Result<ResolvedEnv> {
        let mut identities: Vec<Identity> = Vec::new();
        for path in config::identity_files(&self.identities) {
            match keys::read_identity_file(&path) {
                Ok(found) => identities.extend(found),
                Err(e) => self.on_missing.tolerate(e, ctx)?,
            }
        }

        match resolve(&FileStore::new(&self.env_file), &identities) {
            Ok(env) => Ok(env),
            Err(e) => {
                self.on_missing.tolerate(e.into(), ctx)?;
                Ok(ResolvedEnv::new())
            }
        }
    }
}

/// Start `command` with `env` layered over the inherited environment.
///
/// Child stdout and stderr are relayed to the context while it runs, and
/// the context input is fed to its stdin unless the context inherits stdin.
/// The child is always waited for, even when a relay fails.
fn spawn(command: &[String], env: &ResolvedEnv, ctx: &mut Context<'_>) -> Result<i32> {
    let Some((program, args)) = command.split_first() else {
        return Err(AceError::ChildProcess {
            program: String::new(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "no command given"),
        });
    };
    let child_error = |source: io::Error| AceError::ChildProcess {
        program: program.clone(),
        source,
    };

    debug!(program = %program, secrets = env.len(), "starting child");
    let stdin = if ctx.inherit_stdin {
        Stdio::inherit()
    } else {
        Stdio::piped()
    };
    let mut child = process::Command::new(program)
        .args(args)
        .envs(env)
        .stdin(stdin)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(child_error)?;

    let child_in = child.stdin.take();
    let child_out = child.stdout.take();
    let child_err = child.stderr.take();
    let Context {
        input,
        output,
        errors,
        ..
    } = ctx;

    let relayed = thread::scope(|scope| -> io::Result<()> {
        let feed = child_in.map(|mut stdin| {
            scope.spawn(move || match io::copy(input, &mut stdin) {
                // The child may exit without reading its input.
                Err(e) if e.kind() != io::ErrorKind::BrokenPipe => Err(e),
                _ => Ok(()),
            })
        });
        let drain = child_err.map(|mut stream| {
            scope.spawn(move || io::copy(&mut stream, errors).map(drop))
        });

        // The pipe closes when `stream` drops, so a child blocked on a
        // full stdout sees EPIPE instead of hanging.
        let mut result = match child_out {
            Some(mut stream) => io::copy(&mut stream, output).map(drop),
            None => Ok(()),
        };
        for handle in [feed, drain].into_iter().flatten() {
            let joined = handle.join().unwrap_or_else(|_| {
                Err(io::Error::new(io::ErrorKind::Other, "relay thread panicked"))
            });
            result = result.and(joined);
        }
        result
    });

    let status = child.wait().map_err(child_error)?;
    relayed?;
    ctx.output.flush()?;
    ctx.errors.flush()?;
    Ok(exit_code(status))
}

#[cfg(unix)]
fn exit_code(status: process::ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .unwrap_or_else(|| 128 + status.signal().unwrap_or(0))
}

#[cfg(not(unix))]
fn exit_code(status: process::ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
