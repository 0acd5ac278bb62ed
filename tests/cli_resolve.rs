//! Integration tests for `buildctx resolve`.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn buildctx_cmd() -> Command {
    Command::cargo_bin("buildctx").expect("buildctx binary not found")
}

fn write_context(dir: &TempDir) {
    let config = r#"
image: "{{ params.image }}"
build_steps: "{{ params.steps }}"
env_vars:
  - [LANG, C.UTF-8]
"#;
    fs::write(dir.path().join("build_context.yml"), config).unwrap();
}

#[test]
fn test_resolve_from_params() {
    let dir = TempDir::new().unwrap();
    write_context(&dir);

    let output = buildctx_cmd()
        .current_dir(dir.path())
        .args([
            "resolve",
            "--json",
            "--param",
            "params.image=localhost:5000/base:2.1",
            "--param",
            "params.steps=[make, make install]",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let resolved: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        resolved,
        json!({
            "image": "localhost:5000/base:2.1",
            "build_steps": ["make", "make install"],
            "env_vars": [["LANG", "C.UTF-8"]]
        })
    );
}

#[test]
fn test_resolve_from_params_file() {
    let dir = TempDir::new().unwrap();
    write_context(&dir);
    fs::write(
        dir.path().join("params.yml"),
        "params:\n  image: ubuntu:18.04\n  steps: [apt-get update]\n",
    )
    .unwrap();

    buildctx_cmd()
        .current_dir(dir.path())
        .args(["resolve", "--params-file", "params.yml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("image: ubuntu:18.04"))
        .stdout(predicate::str::contains("apt-get update"));
}

#[test]
fn test_resolve_missing_param_fails() {
    let dir = TempDir::new().unwrap();
    write_context(&dir);

    buildctx_cmd()
        .current_dir(dir.path())
        .args(["resolve", "--param", "params.image=ubuntu"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unresolved reference: {{ params.steps }}"));
}

#[test]
fn test_resolve_checks_resolved_image() {
    let dir = TempDir::new().unwrap();
    write_context(&dir);

    buildctx_cmd()
        .current_dir(dir.path())
        .args([
            "resolve",
            "--param",
            "params.image=Ubuntu",
            "--param",
            "params.steps=[make]",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid docker image `Ubuntu`"));
}

#[test]
fn test_resolve_keeps_decimal_text() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("build_context.yml"),
        "image: ubuntu\nlang_env: \"{{ v }}\"\n",
    )
    .unwrap();

    let output = buildctx_cmd()
        .current_dir(dir.path())
        .args(["resolve", "--json", "--param", "v=3.10"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let resolved: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(resolved["lang_env"], json!("3.10"));
}
