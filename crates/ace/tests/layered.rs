//! End-to-end scenarios over a real store file: layered segments, scope
//! isolation, append-only writes and Get output.

use std::collections::BTreeMap;
use std::path::PathBuf;

use ace::commands::{Command, GetCommand, SetCommand};
use ace::{AceError, ErrorKind};
use ace_testkit::{run, Party, TestFixture};

fn set(fixture: &TestFixture, recipient_file: PathBuf, pairs: &[&str]) -> Command {
    Command::Set(SetCommand {
        recipients: vec![],
        recipient_files: vec![recipient_file],
        env_file: fixture.env_file.clone(),
        pairs: pairs.iter().map(|p| p.to_string()).collect(),
    })
}

fn get(fixture: &TestFixture, parties: &[&Party], names: &[&str]) -> Command {
    Command::Get(GetCommand {
        identities: parties.iter().map(|p| p.identity_file.clone()).collect(),
        env_file: fixture.env_file.clone(),
        names: names.iter().map(|n| n.to_string()).collect(),
    })
}

fn resolve(fixture: &TestFixture, parties: &[&Party]) -> BTreeMap<String, String> {
    let identities: Vec<_> = parties.iter().map(|p| p.identity.clone()).collect();
    ace::store::resolve(&ace::store::FileStore::new(&fixture.env_file), &identities).unwrap()
}

fn env(items: &[(&str, &str)]) -> BTreeMap<String, String> {
    items
        .iter()
        .map(|(n, v)| (n.to_string(), v.to_string()))
        .collect()
}

/// Three segments for overlapping recipient sets.
struct Layered {
    fixture: TestFixture,
    p1: Party,
    p2: Party,
    p3: Party,
}

fn layered() -> Layered {
    let fixture = TestFixture::new();
    let p1 = fixture.party("identity1", 1);
    let p2 = fixture.party("identity2", 2);
    let p3 = fixture.party("identity3", 3);

    let r12 = fixture.recipient_file("recipients12.txt", &[&p1, &p2]);
    let r1 = fixture.recipient_file("recipients1.txt", &[&p1]);
    let r13 = fixture.recipient_file("recipients13.txt", &[&p1, &p3]);

    run(&set(&fixture, r12, &["A=1", "B=2", "C=1 2 3"]), "").code();
    run(&set(&fixture, r1, &["A=2", "D=3"]), "").code();
    run(&set(&fixture, r13, &["E=5"]), "").code();

    Layered { fixture, p1, p2, p3 }
}

#[test]
fn test_layered_override() {
    let l = layered();

    assert_eq!(
        resolve(&l.fixture, &[&l.p1]),
        env(&[("A", "2"), ("B", "2"), ("C", "1 2 3"), ("D", "3"), ("E", "5")])
    );
    assert_eq!(
        resolve(&l.fixture, &[&l.p2]),
        env(&[("A", "1"), ("B", "2"), ("C", "1 2 3")])
    );
    assert_eq!(resolve(&l.fixture, &[&l.p3]), env(&[("E", "5")]));
}

#[test]
fn test_identity_order_does_not_matter() {
    let l = layered();

    let forward = resolve(&l.fixture, &[&l.p1, &l.p2]);
    let backward = resolve(&l.fixture, &[&l.p2, &l.p1]);
    assert_eq!(forward, backward);
    assert_eq!(forward, resolve(&l.fixture, &[&l.p1]));
}

#[test]
fn test_stranger_sees_nothing() {
    let l = layered();
    let stranger = l.fixture.party("stranger", 9);

    let out = run(&get(&l.fixture, &[&stranger], &[]), "");
    assert_eq!(out.code(), 0);
    assert!(out.stdout.is_empty());
}

#[test]
fn test_get_prints_sorted_and_quoted() {
    let l = layered();

    let out = run(&get(&l.fixture, &[&l.p1], &[]), "");
    assert_eq!(out.code(), 0);
    assert_eq!(out.stdout, "A=2\nB=2\nC=1 2 3\nD=3\nE=5\n");
}

#[test]
fn test_get_filter_omits_absent_names() {
    let l = layered();

    let out = run(&get(&l.fixture, &[&l.p2], &["C", "E", "A"]), "");
    assert_eq!(out.code(), 0);
    assert_eq!(out.stdout, "A=1\nC=1 2 3\n");
}

#[test]
fn test_get_quotes_values_that_need_it() {
    let fixture = TestFixture::new();
    let alice = fixture.party("alice", 1);
    let recipients = fixture.recipient_file("recipients.txt", &[&alice]);

    run(&set(&fixture, recipients, &[r#"PADDED="  x  ""#, "EMPTY="]), "").code();

    let out = run(&get(&fixture, &[&alice], &[]), "");
    assert_eq!(out.stdout, "EMPTY=\nPADDED=\"  x  \"\n");
}

#[test]
fn test_get_with_missing_identity_fails() {
    let l = layered();
    let missing = Party {
        identity: l.p1.identity.clone(),
        identity_file: l.fixture.path().join("nope.txt"),
    };

    let out = run(&get(&l.fixture, &[&missing], &[]), "");
    assert!(matches!(out.result, Err(AceError::IdentityFile { .. })));
}

#[test]
fn test_get_with_missing_store_fails() {
    let fixture = TestFixture::new();
    let alice = fixture.party("alice", 1);

    let out = run(&get(&fixture, &[&alice], &[]), "");
    let err = out.result.unwrap_err();
    assert!(err.is_missing_input());
}

#[test]
fn test_set_is_append_only() {
    let fixture = TestFixture::new();
    let alice = fixture.party("alice", 1);
    let recipients = fixture.recipient_file("recipients.txt", &[&alice]);

    run(&set(&fixture, recipients.clone(), &["A=1"]), "").code();
    let before = fixture.store_bytes();

    run(&set(&fixture, recipients.clone(), &["A=2", "B=3"]), "").code();
    let after = fixture.store_bytes();

    assert!(after.len() > before.len());
    assert_eq!(&after[..before.len()], &before[..]);
}

#[test]
fn test_set_reads_pairs_from_input() {
    let fixture = TestFixture::new();
    let alice = fixture.party("alice", 1);
    let recipients = fixture.recipient_file("recipients.txt", &[&alice]);

    let stdin = "# comment\nA=1\n\nnot a pair\n  B = 'two words'\n";
    run(&set(&fixture, recipients, &[]), stdin).code();

    assert_eq!(
        resolve(&fixture, &[&alice]),
        env(&[("A", "1"), ("B", "two words")])
    );
}

#[test]
fn test_set_failures_write_nothing() {
    let fixture = TestFixture::new();
    let alice = fixture.party("alice", 1);
    let recipients = fixture.recipient_file("recipients.txt", &[&alice]);

    let syntax = run(&set(&fixture, recipients.clone(), &["A=\"open"]), "");
    assert_eq!(syntax.result.unwrap_err().kind(), ErrorKind::Syntax);

    let duplicate = run(&set(&fixture, recipients, &["A=1", "A=2"]), "");
    assert_eq!(duplicate.result.unwrap_err().kind(), ErrorKind::Syntax);

    let missing = run(
        &set(&fixture, fixture.path().join("nope.txt"), &["A=1"]),
        "",
    );
    assert!(matches!(
        missing.result,
        Err(AceError::RecipientFile { .. })
    ));

    assert!(fixture.store_bytes().is_empty());
}

#[test]
fn test_set_with_empty_recipient_file() {
    let fixture = TestFixture::new();
    let empty = fixture.recipient_file("recipients.txt", &[]);

    let out = run(&set(&fixture, empty, &["A=1"]), "");
    assert!(matches!(out.result, Err(AceError::NoRecipients)));
    assert!(fixture.store_bytes().is_empty());
}

#[test]
fn test_set_with_literal_recipient() {
    let fixture = TestFixture::new();
    let alice = fixture.party("alice", 1);
    let bob = fixture.party("bob", 2);
    let recipients = fixture.recipient_file("recipients.txt", &[&alice]);

    let cmd = Command::Set(SetCommand {
        recipients: vec![bob.recipient().to_string()],
        recipient_files: vec![recipients],
        env_file: fixture.env_file.clone(),
        pairs: vec!["A=shared".into()],
    });
    run(&cmd, "").code();

    assert_eq!(resolve(&fixture, &[&alice]), env(&[("A", "shared")]));
    assert_eq!(resolve(&fixture, &[&bob]), env(&[("A", "shared")]));
}

#[test]
fn test_tampered_store_is_fatal() {
    let fixture = TestFixture::new();
    let alice = fixture.party("alice", 1);
    let recipients = fixture.recipient_file("recipients.txt", &[&alice]);
    run(&set(&fixture, recipients, &["A=1"]), "").code();

    // Flip one base32 character in the value ciphertext.
    let text = String::from_utf8(fixture.store_bytes()).unwrap();
    let value_start = text.find("\nA=").unwrap() + 3;
    let mut bytes = text.into_bytes();
    bytes[value_start + 10] = if bytes[value_start + 10] == b'A' { b'B' } else { b'A' };
    std::fs::write(&fixture.env_file, bytes).unwrap();

    let out = run(&get(&fixture, &[&alice], &[]), "");
    assert_eq!(out.result.unwrap_err().kind(), ErrorKind::Corrupt);
}

#[test]
fn test_tampered_header_is_fatal() {
    let fixture = TestFixture::new();
    let alice = fixture.party("alice", 1);
    let bob = fixture.party("bob", 2);
    let both = fixture.recipient_file("both.txt", &[&alice, &bob]);
    run(&set(&fixture, both, &["A=1"]), "").code();

    // Change one base32 character in the middle of the header.
    let text = String::from_utf8(fixture.store_bytes()).unwrap();
    let header_len = text.find('\n').unwrap();
    let middle = header_len / 2;
    let mut bytes = text.into_bytes();
    bytes[middle] = if bytes[middle] == b'A' { b'B' } else { b'A' };
    std::fs::write(&fixture.env_file, bytes).unwrap();

    for party in [&alice, &bob] {
        let out = run(&get(&fixture, &[party], &[]), "");
        assert_eq!(out.result.unwrap_err().kind(), ErrorKind::Corrupt);
    }
}
