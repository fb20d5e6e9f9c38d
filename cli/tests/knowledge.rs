mod common;
use common::*;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_kb_rules_lists_table_in_order() {
    let dir = tempdir().unwrap();
    let output = folio_cmd()
        .arg("--config")
        .arg(default_config(dir.path()))
        .args(["kb", "rules"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let topics: Vec<&str> = stdout
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .collect();
    assert_eq!(
        topics,
        vec![
            "blocked",
            "greeting",
            "name",
            "education",
            "skills",
            "programming",
            "cybersecurity",
            "cloud",
            "certifications",
            "hobbies",
            "music",
            "movies",
            "codechef",
            "location",
            "contact",
            "activities",
            "fallback",
        ]
    );
}

#[test]
fn test_kb_show_prints_toml() {
    let dir = tempdir().unwrap();
    folio_cmd()
        .arg("--config")
        .arg(default_config(dir.path()))
        .args(["kb", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("name = \"Prajesh\""))
        .stdout(predicate::str::contains("[education]"))
        .stdout(predicate::str::contains("Network Defense Essentials"));
}

#[test]
fn test_kb_show_output_loads_as_knowledge_file() {
    let dir = tempdir().unwrap();
    let shown = builtin_knowledge_toml(dir.path());
    let kb_path = dir.path().join("knowledge.toml");
    std::fs::write(&kb_path, &shown).unwrap();

    folio_cmd()
        .env("FOLIO_KNOWLEDGE_FILE", &kb_path)
        .arg("--config")
        .arg(default_config(dir.path()))
        .args(["kb", "show"])
        .assert()
        .success()
        .stdout(shown);
}

#[test]
fn test_kb_prompt_prints_persona() {
    let dir = tempdir().unwrap();
    folio_cmd()
        .arg("--config")
        .arg(default_config(dir.path()))
        .args(["kb", "prompt"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("You are Prajesh's AI assistant"))
        .stdout(predicate::str::contains("Important guidelines:"));
}

#[test]
fn test_project_config_relative_knowledge_file_from_subdirectory() {
    let root = tempdir().unwrap();
    let nested = root.path().join("client/src");
    std::fs::create_dir_all(&nested).unwrap();
    std::fs::create_dir_all(root.path().join(".git")).unwrap();

    let scratch = tempdir().unwrap();
    let renamed = builtin_knowledge_toml(scratch.path())
        .replacen("name = \"Prajesh\"\n", "name = \"Ada\"\n", 1);
    std::fs::write(root.path().join("knowledge.toml"), renamed).unwrap();
    std::fs::write(
        root.path().join(".folio.toml"),
        "[knowledge]\nfile = \"knowledge.toml\"\n",
    )
    .unwrap();

    folio_cmd()
        .current_dir(&nested)
        .env("XDG_CONFIG_HOME", scratch.path())
        .env("HOME", scratch.path())
        .args(["kb", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("name = \"Ada\""));
}
