//! `ace env` against real child processes.
#![cfg(unix)]

use ace::commands::{Command, EnvCommand, SetCommand};
use ace::{AceError, OnMissing};
use ace_testkit::{all_vectors, run, Party, TestFixture};

fn env_cmd(fixture: &TestFixture, party: &Party, policy: OnMissing, script: &str) -> Command {
    Command::Env(EnvCommand {
        identities: vec![party.identity_file.clone()],
        env_file: fixture.env_file.clone(),
        on_missing: policy,
        command: vec!["sh".into(), "-c".into(), script.into()],
    })
}

fn seeded() -> (TestFixture, Party) {
    let fixture = TestFixture::new();
    let alice = fixture.party("alice", 1);
    let recipients = fixture.recipient_file("recipients.txt", &[&alice]);
    let cmd = Command::Set(SetCommand {
        recipients: vec![],
        recipient_files: vec![recipients],
        env_file: fixture.env_file.clone(),
        pairs: vec!["A=1".into(), "B=two words".into()],
    });
    run(&cmd, "").code();
    (fixture, alice)
}

#[test]
fn test_child_sees_secrets() {
    let (fixture, alice) = seeded();

    let out = run(&env_cmd(&fixture, &alice, OnMissing::Error, r#"echo "$A|$B""#), "");
    assert_eq!(out.code(), 0);
    assert_eq!(out.stdout, "1|two words\n");
}

#[test]
fn test_exit_code_propagates() {
    let (fixture, alice) = seeded();

    for code in [0, 1, 42] {
        let out = run(
            &env_cmd(&fixture, &alice, OnMissing::Error, &format!("exit {code}")),
            "",
        );
        assert_eq!(out.code(), code);
    }
}

#[test]
fn test_secrets_override_inherited_environment() {
    let (fixture, alice) = seeded();
    // HOME is inherited from the test process; a secret shadows it.
    let recipients = fixture.recipient_file("recipients.txt", &[&alice]);
    let cmd = Command::Set(SetCommand {
        recipients: vec![],
        recipient_files: vec![recipients],
        env_file: fixture.env_file.clone(),
        pairs: vec!["HOME=/from/ace".into()],
    });
    run(&cmd, "").code();

    let out = run(&env_cmd(&fixture, &alice, OnMissing::Error, "echo $HOME"), "");
    assert_eq!(out.stdout, "/from/ace\n");
}

#[test]
fn test_missing_store_error_policy_runs_no_child() {
    let fixture = TestFixture::new();
    let alice = fixture.party("alice", 1);

    let out = run(&env_cmd(&fixture, &alice, OnMissing::Error, "echo ran"), "");
    let err = out.result.unwrap_err();
    assert!(err.is_missing_input());
    assert!(out.stdout.is_empty());
}

#[test]
fn test_missing_store_warn_policy() {
    let fixture = TestFixture::new();
    let alice = fixture.party("alice", 1);

    let out = run(
        &env_cmd(&fixture, &alice, OnMissing::Warn, r#"echo "[$A]"; exit 42"#),
        "",
    );
    assert_eq!(out.code(), 42);
    assert_eq!(out.stdout, "[]\n");
    assert!(out.stderr.starts_with("warning: "));
}

#[test]
fn test_missing_store_ignore_policy() {
    let fixture = TestFixture::new();
    let alice = fixture.party("alice", 1);

    let out = run(&env_cmd(&fixture, &alice, OnMissing::Ignore, "exit 42"), "");
    assert_eq!(out.code(), 42);
    assert!(out.stderr.is_empty());
}

#[test]
fn test_missing_identity_under_each_policy() {
    let (fixture, alice) = seeded();
    let missing = Party {
        identity: alice.identity.clone(),
        identity_file: fixture.path().join("nope.txt"),
    };

    let err = run(&env_cmd(&fixture, &missing, OnMissing::Error, "exit 0"), "");
    assert!(matches!(err.result, Err(AceError::IdentityFile { .. })));

    let warn = run(&env_cmd(&fixture, &missing, OnMissing::Warn, r#"echo "[$A]""#), "");
    assert_eq!(warn.code(), 0);
    assert_eq!(warn.stdout, "[]\n");
    assert!(warn.stderr.contains("nope.txt"));

    let ignore = run(&env_cmd(&fixture, &missing, OnMissing::Ignore, "exit 7"), "");
    assert_eq!(ignore.code(), 7);
    assert!(ignore.stderr.is_empty());
}

#[test]
fn test_missing_identity_keeps_the_others() {
    let (fixture, alice) = seeded();
    let cmd = Command::Env(EnvCommand {
        identities: vec![fixture.path().join("nope.txt"), alice.identity_file.clone()],
        env_file: fixture.env_file.clone(),
        on_missing: OnMissing::Ignore,
        command: vec!["sh".into(), "-c".into(), r#"echo "$A""#.into()],
    });

    let out = run(&cmd, "");
    assert_eq!(out.stdout, "1\n");
}

#[test]
fn test_corrupt_store_is_fatal_under_any_policy() {
    let fixture = TestFixture::new();
    let alice = fixture.party("alice", 1);
    std::fs::write(&fixture.env_file, "ace:AAAAAAAA\nA=AAAAAAAA\n\n").unwrap();

    let out = run(&env_cmd(&fixture, &alice, OnMissing::Ignore, "echo ran"), "");
    assert!(out.result.is_err());
    assert!(out.stdout.is_empty());
}

#[test]
fn test_quoting_vectors_reach_the_child() {
    let fixture = TestFixture::new();
    let alice = fixture.party("alice", 1);
    let recipients = fixture.recipient_file("recipients.txt", &[&alice]);
    let vectors = all_vectors();

    let set = Command::Set(SetCommand {
        recipients: vec![],
        recipient_files: vec![recipients],
        env_file: fixture.env_file.clone(),
        pairs: vectors.iter().map(|v| v.pair()).collect(),
    });
    run(&set, "").code();

    for vector in &vectors {
        let script = format!(r#"printf '%s' "${}""#, vector.name);
        let out = run(&env_cmd(&fixture, &alice, OnMissing::Error, &script), "");
        assert_eq!(out.code(), 0, "{}", vector.name);
        assert_eq!(out.stdout, vector.expected, "{}", vector.name);
    }
}
