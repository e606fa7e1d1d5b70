//! # ace
//!
//! Layered, envelope-encrypted environment secrets.
//!
//! A store file is an append-only list of segments. Each `ace set` adds one
//! segment whose values are readable only by the recipients it was written
//! for. Readers merge every segment their identities can open; later
//! segments win.
//!
//! ## Commands
//!
//! - `set` - encrypt `NAME=VALUE` pairs into a new segment
//! - `get` - print the merged secrets, optionally filtered by name
//! - `env` - run a command with the merged secrets in its environment
//! - `keygen` - create an identity
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::io;
//! use ace::commands::{Command, Context, GetCommand};
//!
//! let cmd = Command::Get(GetCommand {
//!     identities: vec!["identity.txt".into()],
//!     env_file: ".env.ace".into(),
//!     names: vec![],
//! });
//!
//! let mut input = io::empty();
//! let mut output = io::stdout();
//! let mut errors = io::stderr();
//! let code = cmd
//!     .run(&mut Context::new(&mut input, &mut output, &mut errors))
//!     .unwrap();
//! assert_eq!(code, 0);
//! ```
//!
//! ## Re-exports
//!
//! - `ace::core` - keys, codecs and key wrapping
//! - `ace::store` - segment logs and the resolve engine

pub mod commands;
pub mod config;
pub mod error;
pub mod keys;

pub use ace_core as core;
pub use ace_store as store;

pub use commands::{Command, Context, OnMissing};
pub use error::{AceError, ErrorKind, Result};
