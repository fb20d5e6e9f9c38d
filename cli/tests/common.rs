//! Shared helpers for the `folio` integration tests.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::path::{Path, PathBuf};

/// The `folio` binary with the configuration environment cleared, so a
/// developer's own overrides never leak into test runs.
pub fn folio_cmd() -> Command {
    let mut cmd = Command::cargo_bin("folio").expect("Failed to find folio binary for testing");
    cmd.env_remove("FOLIO_KNOWLEDGE_FILE")
        .env_remove("FOLIO_SITE_DIR")
        .env_remove("FOLIO_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

/// Writes `content` as `folio.toml` in `dir` and returns its path, for use
/// with `--config`.
pub fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("folio.toml");
    std::fs::write(&path, content).expect("Failed to write test config");
    path
}

/// An empty config file: built-in defaults only.
pub fn default_config(dir: &Path) -> PathBuf {
    write_config(dir, "")
}

/// The built-in knowledge base as TOML, via `folio kb show`.
pub fn builtin_knowledge_toml(dir: &Path) -> String {
    let config = default_config(dir);
    let output = folio_cmd()
        .arg("--config")
        .arg(&config)
        .args(["kb", "show"])
        .output()
        .expect("Failed to run folio kb show");
    assert!(output.status.success());
    String::from_utf8(output.stdout).expect("kb show output is UTF-8")
}
