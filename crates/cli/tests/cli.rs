//! Binary-level tests that need no storage server
//!
//! Every failure here happens before a connection is attempted.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn run_cos(args: &[&str], config_dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cos"))
        .args(args)
        .env("COS_CONFIG_DIR", config_dir)
        .env_remove("COS_REGION")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute cos command")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// A config directory with a default region, so only binding can fail
fn configured() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let output = run_cos(&["config", "set", "region", "us-south"], dir.path());
    assert!(output.status.success(), "{}", stderr(&output));
    dir
}

#[test]
fn test_missing_mandatory_field_fails_with_usage() {
    let dir = configured();

    let output = run_cos(&["objects-delete", "--bucket", "b"], dir.path());
    assert_eq!(output.status.code(), Some(1));

    let err = stderr(&output);
    assert!(err.starts_with("FAILED"), "{err}");
    assert!(err.contains("Missing required field 'Delete' (--delete)"), "{err}");
    assert!(err.contains("Usage:"), "{err}");
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_first_missing_field_is_reported() {
    let dir = configured();

    let output = run_cos(&["part-upload", "--bucket", "b"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("'Key' (--key)"));
    assert!(!stderr(&output).contains("UploadId"));
}

#[test]
fn test_bad_boolean_in_shorthand() {
    let dir = configured();

    let output = run_cos(
        &[
            "objects-delete",
            "--bucket",
            "b",
            "--delete",
            "Objects=[{Key=a},{Key=b}],Quiet=fale",
        ],
        dir.path(),
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Delete.Quiet"));
}

#[test]
fn test_malformed_shorthand() {
    let dir = configured();

    let output = run_cos(
        &[
            "multipart-complete",
            "--bucket",
            "b",
            "--key",
            "k",
            "--upload-id",
            "u",
            "--multipart-upload",
            "Parts=[{ETag=e1,PartNumber=1}",
        ],
        dir.path(),
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Malformed value for 'MultipartUpload'"));
}

#[test]
fn test_region_unresolved() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_cos(&["buckets"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Region required"));
}

#[test]
fn test_json_failure_document() {
    let dir = configured();

    let output = run_cos(
        &["bucket-head", "--output", "json"],
        dir.path(),
    );
    assert_eq!(output.status.code(), Some(1));

    let value: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(value["error"], "Missing required field 'Bucket' (--bucket)");
}

#[test]
fn test_unknown_flag_is_a_clap_error() {
    let dir = configured();

    let output = run_cos(&["buckets", "--bucket", "b"], dir.path());
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_help_lists_operations() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_cos(&["--help"], dir.path());
    assert!(output.status.success());
    let help = stdout(&output);
    for name in ["buckets", "bucket-cors-put", "objects-delete", "multipart-complete", "config"] {
        assert!(help.contains(name), "{name} missing from help");
    }
}

#[test]
fn test_operation_help_groups_fields() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_cos(&["object-get", "--help"], dir.path());
    assert!(output.status.success());
    let help = stdout(&output);
    assert!(help.contains("Required:"));
    assert!(help.contains("--out-file"));
    assert!(help.contains("Optional:"));
    assert!(help.contains("--if-modified-since"));
    assert!(help.contains("--region"));
}

#[test]
fn test_config_show_masks_secrets() {
    let dir = configured();
    for (key, value) in [("access_key", "AKIAEXAMPLE"), ("secret_key", "topsecret")] {
        let output = run_cos(&["config", "set", key, value], dir.path());
        assert!(output.status.success());
    }

    let output = run_cos(&["config", "show", "--output", "json"], dir.path());
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["Region"], "us-south");
    assert_eq!(value["AccessKey"], "AKIA****");
    assert_eq!(value["SecretKey"], "****");
    assert!(!stdout(&output).contains("topsecret"));
}

#[test]
fn test_config_set_rejects_invalid_value() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_cos(&["config", "set", "color", "sometimes"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Color must be"));
}

#[test]
fn test_completions() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_cos(&["completions", "bash"], dir.path());
    assert!(output.status.success());
    assert!(stdout(&output).contains("objects-delete"));
}
