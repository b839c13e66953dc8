//! Integration tests for `sitepub deploy`.
//!
//! None of these reach a real FTP server: they cover credential resolution,
//! local validation before connecting, and a refused connection.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn sitepub(project: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("sitepub"));
    cmd.env("NO_COLOR", "1")
        .env("SITEPUB_CONFIG", project.join("sitepub.yaml"))
        .env_remove("SITEPUB_SITE")
        .env_remove("SITEPUB_USER")
        .env_remove("SITEPUB_PASSWORD")
        .current_dir(project);
    cmd
}

fn project() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(dir.path().join("package.json"), r#"{"version":"2.3.0"}"#).expect("write");
    std::fs::write(dir.path().join("index.html"), "<html></html>\n").expect("write");
    dir
}

#[test]
fn test_deploy_non_interactive_without_site_fails() {
    let dir = project();
    sitepub(dir.path())
        .args(["deploy", "-y"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No site available"))
        .stderr(predicate::str::contains("SITEPUB_SITE"));
}

#[test]
fn test_deploy_ci_env_is_non_interactive() {
    let dir = project();
    sitepub(dir.path())
        .args(["deploy", "--site", "example.org", "--user", "deployer"])
        .env("CI", "true")
        .assert()
        .failure()
        .stderr(predicate::str::contains("SITEPUB_PASSWORD"));
}

#[test]
fn test_deploy_site_from_config() {
    let dir = project();
    sitepub(dir.path())
        .args(["config", "set", "site", "example.org"])
        .assert()
        .success();
    sitepub(dir.path())
        .args(["deploy", "-y"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No username available"));
}

#[test]
fn test_deploy_missing_artifact_fails_before_connecting() {
    let dir = project();
    sitepub(dir.path())
        .args([
            "deploy",
            "-y",
            "--site",
            "example.org",
            "--user",
            "deployer",
            "--host",
            "127.0.0.1",
            "--port",
            "1",
            "--artifact",
            "favicon.ico",
        ])
        .env("SITEPUB_PASSWORD", "secret")
        .assert()
        .failure()
        .stderr(predicate::str::contains("favicon.ico"))
        .stderr(predicate::str::contains("cannot connect").not());
}

#[test]
fn test_deploy_refused_connection_names_host() {
    let dir = project();
    sitepub(dir.path())
        .args([
            "deploy",
            "-y",
            "--site",
            "example.org",
            "--user",
            "deployer",
            "--host",
            "127.0.0.1",
            "--port",
            "1",
            "--artifact",
            "index.html",
        ])
        .env("SITEPUB_PASSWORD", "secret")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot connect to 127.0.0.1:1"))
        .stderr(predicate::str::contains("secret").not());
}

#[test]
fn test_deploy_refused_connection_json_error() {
    let dir = project();
    let output = sitepub(dir.path())
        .args([
            "deploy",
            "-y",
            "--json",
            "--site",
            "example.org",
            "--user",
            "deployer",
            "--host",
            "127.0.0.1",
            "--port",
            "1",
            "--artifact",
            "index.html",
        ])
        .env("SITEPUB_PASSWORD", "secret")
        .output()
        .expect("run sitepub");
    assert!(!output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(value["code"], "REMOTE_CONNECT_FAILED");
}
