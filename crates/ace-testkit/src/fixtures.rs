//! Test fixtures and helpers.
//!
//! Common setup code for integration tests: deterministic identities,
//! key files in a temporary directory, and a way to run commands against
//! in-memory I/O.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ace::commands::{Command, Context};
use ace::AceError;
use ace_core::{Identity, Recipient};
use tempfile::TempDir;

/// An identity together with the file it was written to.
#[derive(Debug, Clone)]
pub struct Party {
    pub identity: Identity,
    pub identity_file: PathBuf,
}

impl Party {
    pub fn recipient(&self) -> Recipient {
        self.identity.recipient()
    }
}

/// A scratch directory holding key files and a store file.
pub struct TestFixture {
    dir: TempDir,
    pub env_file: PathBuf,
}

impl TestFixture {
    /// Create a fixture in a fresh temporary directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let env_file = dir.path().join(".env.ace");
        Self { dir, env_file }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// A deterministic identity written to `<name>.txt`.
    pub fn party(&self, name: &str, seed: u8) -> Party {
        let identity = identity_from_seed(seed);
        let identity_file = self.dir.path().join(format!("{name}.txt"));
        fs::write(&identity_file, format!("{}\n", identity.to_secret_string()))
            .expect("write identity file");
        Party {
            identity,
            identity_file,
        }
    }

    /// Write a recipient file listing `parties`.
    pub fn recipient_file(&self, name: &str, parties: &[&Party]) -> PathBuf {
        let path = self.dir.path().join(name);
        let body: String = parties
            .iter()
            .map(|p| format!("{}\n", p.recipient()))
            .collect();
        fs::write(&path, body).expect("write recipient file");
        path
    }

    /// Current store bytes, empty if nothing was written yet.
    pub fn store_bytes(&self) -> Vec<u8> {
        fs::read(&self.env_file).unwrap_or_default()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Captured result of running a command.
#[derive(Debug)]
pub struct RunOutput {
    pub result: Result<i32, AceError>,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    /// Exit code, panicking with the error if the command failed.
    pub fn code(&self) -> i32 {
        match &self.result {
            Ok(code) => *code,
            Err(e) => panic!("command failed: {e}"),
        }
    }
}

/// Run `command` with `stdin` as its input, capturing both outputs.
pub fn run(command: &Command, stdin: &str) -> RunOutput {
    let mut input = io::Cursor::new(stdin.as_bytes().to_vec());
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let result = command.run(&mut Context::new(&mut input, &mut stdout, &mut stderr));
    RunOutput {
        result,
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
    }
}

/// Deterministic identity from a one-byte seed.
///
/// X25519 clamping rewrites the low bits of byte 0 and the high bits of
/// byte 31, so the seed goes in byte 1.
pub fn identity_from_seed(seed: u8) -> Identity {
    let mut bytes = [0x5a; 32];
    bytes[1] = seed;
    Identity::from_bytes(bytes)
}

/// Distinct deterministic identities for multi-party tests.
pub fn multi_party_fixtures(count: usize) -> Vec<Identity> {
    (0..count).map(|i| identity_from_seed(i as u8)).collect()
}
