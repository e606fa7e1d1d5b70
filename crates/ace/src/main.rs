//! The `ace` command-line tool.

use std::io;
use std::process::ExitCode;

use ace::commands::{Command, Context};
use ace::config;
use clap::{CommandFactory, Parser};

#[derive(Parser)]
#[command(name = "ace")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(config::log_filter(cli.verbose))
        .with_writer(io::stderr)
        .init();

    let Some(command) = cli.command else {
        // Bare `ace` prints usage and succeeds.
        if let Err(e) = Cli::command().print_help() {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
        return ExitCode::SUCCESS;
    };

    match run(&command) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: &Command) -> anyhow::Result<i32> {
    let mut input = io::stdin();
    let mut output = io::stdout();
    let mut errors = io::stderr();
    let mut ctx = Context::new(&mut input, &mut output, &mut errors).inheriting_stdin();
    let code = command.run(&mut ctx)?;
    Ok(code)
}
