mod common;
use common::*;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_help_lists_commands() {
    folio_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("kb"))
        .stdout(predicate::str::contains("srv"));
}

#[test]
fn test_version_flag() {
    folio_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_command_fails() {
    folio_cmd().arg("frobnicate").assert().failure();
}

#[test]
fn test_missing_config_file_fails() {
    let dir = tempdir().unwrap();
    folio_cmd()
        .arg("--config")
        .arg(dir.path().join("nope.toml"))
        .args(["ask", "hi"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("Failed to read configuration file"));
}

#[test]
fn test_unknown_config_key_fails() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), "[server]\nprot = 8080\n");
    folio_cmd()
        .arg("--config")
        .arg(&config)
        .args(["ask", "hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse TOML"));
}

#[test]
fn test_missing_knowledge_file_env_fails() {
    let dir = tempdir().unwrap();
    let config = default_config(dir.path());
    folio_cmd()
        .env("FOLIO_KNOWLEDGE_FILE", dir.path().join("missing.toml"))
        .arg("--config")
        .arg(&config)
        .args(["kb", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}
