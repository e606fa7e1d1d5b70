//! Defaults and environment overrides.
//!
//! Command-line flags win over environment variables, which win over the
//! defaults below. Most environment lookups are wired through clap's `env`
//! attribute on each command's arguments; `ACE_IDENTITY` is read here.

use std::env;
use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;

/// Store file used when `--env-file` is not given.
pub const DEFAULT_ENV_FILE: &str = "./.env.ace";

/// Recipient file Set falls back to when no `-R` is given.
pub const DEFAULT_RECIPIENT_FILE: &str = "./recipients.txt";

/// Identity file Get and Env fall back to when no `-i` is given.
pub const DEFAULT_IDENTITY_FILE: &str = "./identity.txt";

pub const ENV_FILE_VAR: &str = "ACE_ENV_FILE";
pub const IDENTITY_VAR: &str = "ACE_IDENTITY";
pub const ON_MISSING_VAR: &str = "ACE_ON_MISSING";
pub const LOG_VAR: &str = "ACE_LOG";

/// Log filter when neither `ACE_LOG` nor `-v` says otherwise.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Recipient files to read for Set.
pub fn recipient_files(given: &[PathBuf]) -> Vec<PathBuf> {
    or_default(given, DEFAULT_RECIPIENT_FILE)
}

/// Identity files to read for Get and Env.
///
/// `-i` paths win, then the `ACE_IDENTITY` list, then the default file.
pub fn identity_files(given: &[PathBuf]) -> Vec<PathBuf> {
    identity_files_from(given, env::var(IDENTITY_VAR).ok().as_deref())
}

/// Only the environment list is split on commas; `-i` paths are taken whole.
fn identity_files_from(given: &[PathBuf], from_env: Option<&str>) -> Vec<PathBuf> {
    if !given.is_empty() {
        return given.to_vec();
    }
    let listed: Vec<PathBuf> = from_env
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
        .collect();
    if listed.is_empty() {
        or_default(&[], DEFAULT_IDENTITY_FILE)
    } else {
        listed
    }
}

fn or_default(given: &[PathBuf], default: &str) -> Vec<PathBuf> {
    if given.is_empty() {
        vec![Path::new(default).to_path_buf()]
    } else {
        given.to_vec()
    }
}

/// Build the log filter: `-v` forces debug, then `ACE_LOG`, then the default.
pub fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_env(LOG_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}
