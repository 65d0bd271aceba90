//! Integration tests for the account commands.
//!
//! No backend runs during tests, so these cover argument parsing, form
//! validation (which fails before any request) and the local session.

#![allow(deprecated)] // cargo_bin deprecation, replacement not yet stable

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: get a Command for the `trackerops` binary bound to `dir`.
fn trackerops(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("trackerops").expect("binary 'trackerops' should be built");
    cmd.arg("--config")
        .arg(dir.join("missing.toml"))
        .arg("--data-dir")
        .arg(dir)
        .arg("--base-url")
        .arg("http://127.0.0.1:9");
    cmd
}

// ─── Signup ──────────────────────────────────────────────────────────────────

#[test]
fn signup_missing_fields_fails() {
    let dir = tempfile::tempdir().unwrap();
    trackerops(dir.path())
        .args(["signup", "--name", "Ada"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--email"));
}

#[test]
fn signup_rejects_bad_email_before_network() {
    let dir = tempfile::tempdir().unwrap();
    trackerops(dir.path())
        .args([
            "signup",
            "--name",
            "Ada",
            "--email",
            "not-an-email",
            "--organization",
            "Acme",
            "--password",
            "secret1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter a valid email address"));
}

#[test]
fn signup_rejects_blank_fields() {
    let dir = tempfile::tempdir().unwrap();
    trackerops(dir.path())
        .args([
            "signup",
            "--name",
            "  ",
            "--email",
            "ada@example.com",
            "--organization",
            "Acme",
            "--password",
            "secret1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("All fields are required"));
}

// ─── Login / logout ──────────────────────────────────────────────────────────

#[test]
fn login_requires_both_fields() {
    let dir = tempfile::tempdir().unwrap();
    trackerops(dir.path())
        .args(["login", "--email", "", "--password", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Email and password are required"));
}

#[test]
fn login_unreachable_backend_fails_without_session() {
    let dir = tempfile::tempdir().unwrap();
    trackerops(dir.path())
        .args(["login", "--email", "ada@example.com", "--password", "secret1"])
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .failure();

    trackerops(dir.path())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not signed in"));
}

#[test]
fn whoami_reads_stored_session() {
    let dir = tempfile::tempdir().unwrap();
    let stored = serde_json::json!({
        "userToken": "token_1_1",
        "user": r#"{"id":1,"name":"Ada","email":"ada@example.com","organization":"Acme"}"#
    });
    std::fs::write(dir.path().join("storage.json"), stored.to_string()).unwrap();

    trackerops(dir.path())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ada <ada@example.com>"))
        .stdout(predicate::str::contains("Acme"));
}

#[test]
fn logout_clears_stored_session() {
    let dir = tempfile::tempdir().unwrap();
    let stored = serde_json::json!({
        "userToken": "token_1_1",
        "user": r#"{"id":1,"name":"Ada","email":"ada@example.com","organization":"Acme"}"#,
        "video_comments": "[]"
    });
    std::fs::write(dir.path().join("storage.json"), stored.to_string()).unwrap();

    trackerops(dir.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out"));

    trackerops(dir.path())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not signed in"));

    let left = std::fs::read_to_string(dir.path().join("storage.json")).unwrap();
    assert!(left.contains("video_comments"));
    assert!(!left.contains("userToken"));
}

#[test]
fn logout_without_session_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    trackerops(dir.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("No session"));
}

// ─── Profile ─────────────────────────────────────────────────────────────────

#[test]
fn profile_requires_session() {
    let dir = tempfile::tempdir().unwrap();
    trackerops(dir.path())
        .args(["profile", "update", "--name", "Grace"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not signed in"));

    trackerops(dir.path())
        .args(["profile", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not signed in"));
}
