//! CLI end-to-end tests
//!
//! Tests for the media-viewer command-line interface.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::{tempdir, TempDir};

/// Get a command for the media-viewer binary
#[allow(deprecated)]
fn media_viewer_cmd() -> Command {
    let mut cmd = Command::cargo_bin("media-viewer").unwrap();
    cmd.env_remove("MEDIA_SOURCE_URL").env_remove("MEDIA_ROOT");
    cmd
}

fn write_config(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn test_cli_no_args_shows_help() {
    media_viewer_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_command() {
    media_viewer_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("media-viewer"));
}

#[test]
fn test_cli_start_help() {
    media_viewer_cmd()
        .args(["start", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Start the viewer web server"));
}

#[test]
fn test_cli_validate_config() {
    let (_dir, path) = write_config(
        r#"
[server]
port = 8090

[source]
kind = "apps_script"
url = "https://script.example.com/exec"
refresh_interval_secs = 300
"#,
    );

    media_viewer_cmd()
        .arg("validate")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains(":8090"))
        .stdout(predicate::str::contains("apps_script"))
        .stdout(predicate::str::contains("300s"));
}

#[test]
fn test_cli_validate_rejects_bad_config() {
    let (_dir, path) = write_config("[server]\nport = 0\n");

    media_viewer_cmd()
        .arg("validate")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("port"));
}

#[test]
fn test_cli_refresh_literal_json() {
    let (_dir, path) = write_config("[source]\nkind = \"literal\"\n");

    let output = media_viewer_cmd()
        .args(["--config"])
        .arg(&path)
        .args(["refresh", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["image001"]["title"], "Sunset Over the Ocean");
    assert_eq!(json.as_object().unwrap().len(), 4);
}

#[test]
fn test_cli_refresh_inline_entries() {
    let (_dir, path) = write_config(
        r#"
[source.entries.clip7]
title = "Harbour"
type = "video"
file_path = "videos/harbour.mp4"
"#,
    );

    media_viewer_cmd()
        .arg("--config")
        .arg(&path)
        .arg("refresh")
        .assert()
        .success()
        .stdout(predicate::str::contains("Entries: 1"))
        .stdout(predicate::str::contains("clip7 [video] Harbour -> videos/harbour.mp4"));
}

#[test]
fn test_cli_refresh_unconfigured_source_fails() {
    let (_dir, path) = write_config("[source]\nkind = \"apps_script\"\n");

    media_viewer_cmd()
        .arg("--config")
        .arg(&path)
        .arg("refresh")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not configured"));
}
