//! Runs the compiled binary against a temporary workspace.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

use crate::integration::write_file;

fn branchfold(temp_dir: &TempDir, workspace: &Path, args: &[&str]) -> Output {
    let bin = env!("CARGO_BIN_EXE_branchfold");
    Command::new(bin)
        .env("HOME", temp_dir.path().join("home"))
        .env("XDG_CONFIG_HOME", temp_dir.path().join("config"))
        .env("XDG_STATE_HOME", temp_dir.path().join("state"))
        .arg("--workspace")
        .arg(workspace)
        .args(args)
        .output()
        .unwrap()
}

fn workspace(temp_dir: &TempDir) -> std::path::PathBuf {
    let ws = temp_dir.path().join("ws");
    write_file(ws.join("Root/2024-01-01 - A/x.md"), "v1");
    write_file(ws.join("Root/2024-02-01 - B/x.md"), "v2");
    ws
}

#[test]
fn test_merge_command_writes_merge_folder() {
    let temp_dir = TempDir::new().unwrap();
    let ws = workspace(&temp_dir);

    let output = branchfold(&temp_dir, &ws, &["merge", "Root"]);

    assert!(
        output.status.success(),
        "merge should succeed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("Merged 2 branches"));
    assert_eq!(fs::read_to_string(ws.join("Root/Merge/x.md")).unwrap(), "v2");
}

#[test]
fn test_merge_without_branches_reports_notice() {
    let temp_dir = TempDir::new().unwrap();
    let ws = workspace(&temp_dir);

    let output = branchfold(&temp_dir, &ws, &["merge"]);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No branches to merge have been found."));
    assert!(!ws.join("Merge").exists());
}

#[test]
fn test_config_set_then_show() {
    let temp_dir = TempDir::new().unwrap();
    let ws = workspace(&temp_dir);

    let output = branchfold(&temp_dir, &ws, &["config", "set", "auto-merge", "silently"]);
    assert!(output.status.success());

    let output = branchfold(&temp_dir, &ws, &["config", "show", "--format", "json"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["auto_merge"], "silently");
    assert_eq!(value["merge_name"], "Merge");
}

#[test]
fn test_missing_folder_exits_non_zero() {
    let temp_dir = TempDir::new().unwrap();
    let ws = workspace(&temp_dir);

    let output = branchfold(&temp_dir, &ws, &["merge", "Missing"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("Error:"));
}

#[test]
fn test_verbose_logging_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let ws = workspace(&temp_dir);
    let log_file = temp_dir.path().join("logs/branchfold.log");

    let output = Command::new(env!("CARGO_BIN_EXE_branchfold"))
        .env("HOME", temp_dir.path().join("home"))
        .env("XDG_CONFIG_HOME", temp_dir.path().join("config"))
        .arg("--workspace")
        .arg(&ws)
        .arg("--verbose")
        .arg("--log-output")
        .arg("file")
        .arg("--log-file")
        .arg(&log_file)
        .arg("merge")
        .arg("Root")
        .output()
        .unwrap();

    assert!(output.status.success());
    let content = fs::read_to_string(&log_file).unwrap();
    assert!(content.contains("Merge completed"));
}
