//! Command implementations.
//!
//! Every command reads and writes through a [`Context`] rather than the
//! process's standard streams, so tests can drive them with in-memory
//! buffers.

mod env;
mod get;
mod keygen;
mod set;

use std::io::{self, Read, Write};

use clap::Subcommand;

pub use env::{EnvCommand, OnMissing};
pub use get::GetCommand;
pub use keygen::KeygenCommand;
pub use set::SetCommand;

use crate::error::Result;

/// I/O sinks for a command run.
pub struct Context<'a> {
    /// Source of `NAME=VALUE` lines when Set is given no arguments, and
    /// the stdin of `env` children.
    pub input: &'a mut (dyn Read + Send),
    /// Command output.
    pub output: &'a mut (dyn Write + Send),
    /// Warnings and child stderr.
    pub errors: &'a mut (dyn Write + Send),
    /// Give `env` children the process's own stdin instead of `input`.
    ///
    /// Only the binary sets this, so interactive children keep their
    /// terminal.
    pub inherit_stdin: bool,
}

impl<'a> Context<'a> {
    pub fn new(
        input: &'a mut (dyn Read + Send),
        output: &'a mut (dyn Write + Send),
        errors: &'a mut (dyn Write + Send),
    ) -> Self {
        Self {
            input,
            output,
            errors,
            inherit_stdin: false,
        }
    }

    /// See [`Context::inherit_stdin`].
    pub fn inheriting_stdin(mut self) -> Self {
        self.inherit_stdin = true;
        self
    }

    fn read_input(&mut self) -> io::Result<String> {
        let mut text = String::new();
        self.input.read_to_string(&mut text)?;
        Ok(text)
    }
}

/// Every ace subcommand.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Encrypt NAME=VALUE pairs into a new segment
    Set(SetCommand),
    /// Decrypt and print the secrets your identities can read
    Get(GetCommand),
    /// Run a command with the decrypted secrets in its environment
    Env(EnvCommand),
    /// Generate a new identity
    Keygen(KeygenCommand),
    /// Print the version
    Version,
}

impl Command {
    /// Run the command, returning the process exit code.
    pub fn run(&self, ctx: &mut Context<'_>) -> Result<i32> {
        match self {
            Command::Set(cmd) => cmd.run(ctx).map(|_| 0),
            Command::Get(cmd) => cmd.run(ctx).map(|_| 0),
            Command::Env(cmd) => cmd.run(ctx),
            Command::Keygen(cmd) => cmd.run(ctx).map(|_| 0),
            Command::Version => {
                writeln!(ctx.output, "ace {}", env!("CARGO_PKG_VERSION"))?;
                Ok(0)
            }
        }
    }
}
