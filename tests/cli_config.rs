//! Integration tests for `buildctx validate` and `buildctx show`.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn buildctx_cmd() -> Command {
    Command::cargo_bin("buildctx").expect("buildctx binary not found")
}

#[test]
fn test_validate_valid_returns_success() {
    let dir = TempDir::new().unwrap();
    let config = r#"
image: python:3.11-slim
build_steps:
  - pip install -r requirements.txt
env_vars:
  - [LANG, C.UTF-8]
"#;
    fs::write(dir.path().join("build_context.yml"), config).unwrap();

    buildctx_cmd()
        .current_dir(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Build context is valid"));
}

#[test]
fn test_validate_missing_file_returns_error() {
    let dir = TempDir::new().unwrap();

    buildctx_cmd()
        .current_dir(dir.path())
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Build context file not found"));
}

#[test]
fn test_validate_custom_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("ctx.json"), r#"{"dockerfile": "Dockerfile"}"#).unwrap();

    buildctx_cmd()
        .current_dir(dir.path())
        .args(["validate", "--file", "ctx.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ctx.json"));
}

#[test]
fn test_validate_without_image_or_dockerfile_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("build_context.yml"), "context: .\ncommit: 3e1f9a2\n").unwrap();

    buildctx_cmd()
        .current_dir(dir.path())
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Invalid Build context, an image or path to dockerfile is required.",
        ));
}

#[test]
fn test_validate_bad_image_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("build_context.yml"), "image: \"Ubuntu 18.04\"\n").unwrap();

    buildctx_cmd()
        .current_dir(dir.path())
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid docker image `Ubuntu 18.04`"));
}

#[test]
fn test_validate_bad_env_var_reports_field() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("build_context.yml"),
        "image: ubuntu\nenv_vars:\n  - [LANG]\n",
    )
    .unwrap();

    buildctx_cmd()
        .current_dir(dir.path())
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("env_vars"))
        .stderr(predicate::str::contains("exactly 2 elements"));
}

#[test]
fn test_validate_reference_image_mentions_resolution() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("build_context.yml"),
        "image: \"{{ params.image }}\"\n",
    )
    .unwrap();

    buildctx_cmd()
        .current_dir(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("unresolved references"));
}

#[test]
fn test_default_file_from_environment() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("other.yml"), "image: ubuntu\n").unwrap();

    buildctx_cmd()
        .current_dir(dir.path())
        .env("BUILDCTX_DEFAULT_FILE", "other.yml")
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("other.yml"));
}

#[test]
fn test_show_prints_only_set_fields_as_json() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("build_context.yml"),
        "build_context:\n  image: ubuntu:18.04\n  commit: abc123\n",
    )
    .unwrap();

    let output = buildctx_cmd()
        .current_dir(dir.path())
        .args(["show", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let shown: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        shown,
        serde_json::json!({"image": "ubuntu:18.04", "commit": "abc123"})
    );
}

#[test]
fn test_show_yaml() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("build_context.yml"), "dockerfile: Dockerfile\n").unwrap();

    buildctx_cmd()
        .current_dir(dir.path())
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("dockerfile: Dockerfile"))
        .stdout(predicate::str::contains("image").not());
}
