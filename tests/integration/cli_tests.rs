//! Integration tests for the CLI binary.
//!
//! This test is registered as a [[test]] in the consent-ledger-cli crate
//! so that CARGO_BIN_EXE_cledger is available.

use std::path::Path;
use std::process::{Command, Output};

/// Get a Command pointing to the `cledger` binary.
fn cledger_binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_cledger"))
}

/// Run `cledger --home HOME [--as CALLER] ARGS...`.
fn cledger(home: &Path, caller: Option<&str>, args: &[&str]) -> Output {
    let mut cmd = cledger_binary();
    cmd.arg("--home").arg(home);
    if let Some(caller) = caller {
        cmd.args(["--as", caller]);
    }
    cmd.args(args).output().expect("failed to execute cledger")
}

fn ok(output: Output) -> String {
    assert!(
        output.status.success(),
        "cledger should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn err(output: Output) -> String {
    assert!(!output.status.success(), "cledger should fail");
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Pull the first `dsa_`/`rsa_` token out of command output.
fn agreement_id(stdout: &str) -> String {
    stdout
        .split_whitespace()
        .map(|w| w.trim_end_matches(':'))
        .find(|w| w.starts_with("dsa_") || w.starts_with("rsa_"))
        .expect("output should contain an agreement id")
        .to_string()
}

/// Ledger with owner, app, org (organisation + issuer), pat, doc.
fn setup(home: &Path) {
    ok(cledger(home, None, &["init", "--owner", "owner"]));
    for (role, who) in [
        ("trusted_application", "app"),
        ("healthcare_organization", "org"),
        ("trusted_issuer", "org"),
    ] {
        ok(cledger(home, Some("owner"), &["role", "add", role, who]));
    }
    ok(cledger(home, Some("app"), &["role", "add", "patient", "pat"]));
    ok(cledger(
        home,
        Some("org"),
        &["role", "add", "healthcare-professional", "doc"],
    ));
}

#[test]
fn cli_responds_to_help() {
    let output = cledger_binary()
        .arg("--help")
        .output()
        .expect("failed to execute cledger --help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("cledger") || stdout.contains("ConsentLedger") || stdout.contains("Usage"),
        "cledger --help output should contain usage information, got: {stdout}"
    );
}

#[test]
fn cli_responds_to_version() {
    let output = cledger_binary()
        .arg("--version")
        .output()
        .expect("failed to execute cledger --version");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("0.1"), "got: {stdout}");
}

#[test]
fn cli_exits_with_error_on_unknown_flag() {
    let output = cledger_binary()
        .arg("--nonexistent-flag")
        .output()
        .expect("failed to execute cledger");
    assert!(!output.status.success());
}

#[test]
fn cli_init_refuses_to_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    ok(cledger(dir.path(), None, &["init", "--owner", "owner"]));
    let stderr = err(cledger(dir.path(), None, &["init", "--owner", "other"]));
    assert!(stderr.contains("already exists"), "got: {stderr}");
    ok(cledger(dir.path(), None, &["init", "--owner", "other", "--force"]));
}

#[test]
fn cli_requires_caller_for_mutations() {
    let dir = tempfile::tempdir().unwrap();
    setup(dir.path());
    let stderr = err(cledger(dir.path(), None, &["role", "add", "patient", "x"]));
    assert!(stderr.contains("--as"), "got: {stderr}");
}

#[test]
fn cli_role_check_and_provenance() {
    let dir = tempfile::tempdir().unwrap();
    let home = dir.path();
    setup(home);

    let stdout = ok(cledger(home, None, &["role", "check", "patient", "pat"]));
    assert!(stdout.contains("pat holds patient"), "got: {stdout}");
    assert!(stdout.contains("Added by: app"), "got: {stdout}");

    // Only the trusted application that added the patient may remove them.
    let stderr = err(cledger(home, Some("owner"), &["role", "remove", "patient", "pat"]));
    assert!(stderr.contains("Unauthorized"), "got: {stderr}");
    ok(cledger(home, Some("app"), &["role", "remove", "patient", "pat"]));

    let stdout = ok(cledger(home, None, &["role", "check", "patient", "pat"]));
    assert!(stdout.contains("does not hold"), "got: {stdout}");
}

#[test]
fn cli_dsa_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let home = dir.path();
    setup(home);

    let stdout = ok(cledger(
        home,
        Some("pat"),
        &[
            "dsa", "create", "--recipient", "doc", "--duration", "1 week", "--description",
            "lab results",
        ],
    ));
    let id = agreement_id(&stdout);
    assert!(id.starts_with("dsa_"));

    let stdout = ok(cledger(home, Some("doc"), &["dsa", "list", "--role", "recipient", "--filter", "PENDING"]));
    assert!(stdout.contains(&id), "got: {stdout}");

    ok(cledger(home, Some("doc"), &["dsa", "accept", &id]));
    let stdout = ok(cledger(home, None, &["dsa", "show", &id]));
    assert!(stdout.contains("active"), "got: {stdout}");

    ok(cledger(home, Some("pat"), &["dsa", "revoke", &id]));
    let stderr = err(cledger(home, None, &["dsa", "show", &id]));
    assert!(stderr.contains("Not found"), "got: {stderr}");

    let stderr = err(cledger(
        home,
        Some("pat"),
        &["dsa", "list", "--filter", "DONE"],
    ));
    assert!(stderr.contains("Invalid state filter"), "got: {stderr}");
}

#[test]
fn cli_rsa_with_contact_observer_and_access() {
    let dir = tempfile::tempdir().unwrap();
    let home = dir.path();
    setup(home);

    ok(cledger(home, Some("org"), &["cert", "issue", "resource1", "--subject", "pat"]));
    ok(cledger(home, Some("org"), &["cert", "issue", "resource2", "--subject", "pat"]));

    let stdout = ok(cledger(
        home,
        Some("pat"),
        &[
            "rsa", "create", "--identity", "doc", "--duration", "1 day", "--resource",
            "resource1", "--resource", "resource2", "--observers",
        ],
    ));
    let id = agreement_id(&stdout);
    ok(cledger(home, Some("doc"), &["rsa", "accept", &id]));

    let stdout = ok(cledger(
        home,
        Some("doc"),
        &["observer", "add", &id, "--contact", "observer@example.com"],
    ));
    assert!(stdout.contains("[accepted]"), "got: {stdout}");

    let stderr = err(cledger(
        home,
        Some("doc"),
        &["observer", "add", &id, "--contact", "observer@example.com"],
    ));
    assert!(stderr.contains("Observer already assigned"), "got: {stderr}");

    ok(cledger(
        home,
        Some("org"),
        &["access", &id, "resource2", "--contact", "observer@example.com"],
    ));
    let stdout = ok(cledger(home, None, &["access-log", "--agreement", &id]));
    assert!(stdout.contains("resource2"), "got: {stdout}");

    let stdout = ok(cledger(home, None, &["journal", "verify"]));
    assert!(stdout.contains("Journal OK"), "got: {stdout}");
}

#[test]
fn cli_rsa_rejects_unknown_duration() {
    let dir = tempfile::tempdir().unwrap();
    let home = dir.path();
    setup(home);

    let stderr = err(cledger(
        home,
        Some("pat"),
        &["rsa", "create", "--identity", "doc", "--duration", "2 weeks"],
    ));
    assert!(stderr.contains("Invalid duration"), "got: {stderr}");

    let stderr = err(cledger(home, Some("pat"), &["rsa", "create", "--duration", "1 day"]));
    assert!(stderr.contains("recipient"), "got: {stderr}");
}

#[test]
fn cli_detects_tampered_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let home = dir.path();
    setup(home);

    let path = home.join("ledger.json");
    let mut text = std::fs::read_to_string(&path).unwrap();
    // The journal is written last, so the final mention of "pat" is a
    // journaled event.
    let at = text.rfind("\"pat\"").unwrap();
    text.replace_range(at..at + 5, "\"mal\"");
    std::fs::write(&path, text).unwrap();

    let stderr = err(cledger(home, None, &["journal", "verify"]));
    assert!(stderr.contains("journal"), "got: {stderr}");
}
