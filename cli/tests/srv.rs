mod common;
use common::*;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_srv_missing_site_dir_fails_fast() {
    let dir = tempdir().unwrap();
    folio_cmd()
        .arg("--config")
        .arg(default_config(dir.path()))
        .args(["srv", "--site"])
        .arg(dir.path().join("dist"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not be found or accessed"));
}

#[test]
fn test_srv_invalid_host_in_config_fails() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), "[server]\nhost = \"not-an-ip\"\n");
    folio_cmd()
        .arg("--config")
        .arg(&config)
        .arg("srv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid server host"));
}

#[test]
fn test_srv_help_shows_flags() {
    folio_cmd()
        .args(["srv", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--site"))
        .stdout(predicate::str::contains("--no-cors"));
}
