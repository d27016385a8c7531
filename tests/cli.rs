// End-to-end tests for the command-line entry point.
//
// Drives the compiled binary with std::process::Command. Every case stops
// before a real model would be needed: argument errors, file errors, bad
// configuration, or a missing model with downloads disabled.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_similarity-checker"));
    cmd.env_remove("SIMILARITY_MODEL_DIR")
        .env_remove("SIMILARITY_AUTO_DOWNLOAD")
        .env_remove("SIMILARITY_STOP_WORDS")
        .env_remove("RUST_LOG");
    cmd
}

/// A model directory that is guaranteed empty, with downloads disabled.
fn offline(cmd: &mut Command, models: &Path) {
    cmd.env("SIMILARITY_MODEL_DIR", models)
        .env("SIMILARITY_AUTO_DOWNLOAD", "false");
}

fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8(output.stdout.clone()).expect("stdout is UTF-8");
    assert_eq!(
        stdout.lines().count(),
        1,
        "Expected exactly one line on stdout, got: {stdout:?}"
    );
    serde_json::from_str(stdout.trim()).expect("stdout is JSON")
}

fn error_message(output: &Output) -> String {
    let json = stdout_json(output);
    json["error"]
        .as_str()
        .unwrap_or_else(|| panic!("Expected an error object, got {json}"))
        .to_string()
}

fn write_query(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("query.txt");
    std::fs::write(&path, contents).unwrap();
    path
}

// ============================================================
// Argument count
// ============================================================

#[test]
fn no_arguments_is_usage_error() {
    let output = bin().output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(error_message(&output).starts_with("Invalid arguments"));
}

#[test]
fn one_argument_is_usage_error() {
    let output = bin().arg("only-one").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(error_message(&output).starts_with("Invalid arguments"));
}

#[test]
fn three_arguments_is_usage_error_without_file_access() {
    // The path does not exist; a file error here would mean the file was
    // touched before arity was checked.
    let output = bin()
        .args(["/definitely/not/here.txt", "two", "three"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let message = error_message(&output);
    assert!(message.starts_with("Invalid arguments"), "got {message}");
    assert!(!message.contains("Failed to read"));
}

#[cfg(unix)]
#[test]
fn non_utf8_compare_text_is_encoding_error() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    // Latin-1 "café"; the query path does not exist, so a file error would
    // mean the text was accepted
    let output = bin()
        .arg("/definitely/not/here.txt")
        .arg(OsStr::from_bytes(b"caf\xe9"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let message = error_message(&output);
    assert!(message.contains("not valid UTF-8"), "got {message}");
    assert!(!message.contains("Expected: similarity-checker"), "got {message}");
    assert!(!message.contains("Failed to read"), "got {message}");
}

#[test]
fn help_exits_zero() {
    let output = bin().arg("--help").output().unwrap();
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("similarity-checker"));
}

// ============================================================
// File reading
// ============================================================

#[test]
fn missing_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.txt");
    let output = bin()
        .arg(&missing)
        .arg("compare text")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let message = error_message(&output);
    assert!(message.contains("Failed to read query file"), "got {message}");
    assert!(message.contains("missing.txt"), "got {message}");
}

#[test]
fn invalid_utf8_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("latin1.txt");
    std::fs::write(&path, [0x63, 0x61, 0x66, 0xE9, 0xFF]).unwrap();
    let output = bin().arg(&path).arg("café").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(error_message(&output).contains("Failed to read query file"));
}

// ============================================================
// Configuration and engine errors
// ============================================================

#[test]
fn invalid_config_value_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let query = write_query(&dir, "The cat sat on the mat.");
    let output = bin()
        .env("SIMILARITY_STOP_WORDS", "sometimes")
        .arg(&query)
        .arg("The cat sat on the mat.")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(error_message(&output).contains("SIMILARITY_STOP_WORDS"));
}

#[test]
fn missing_model_offline_is_calculation_error() {
    let dir = tempfile::tempdir().unwrap();
    let models = tempfile::tempdir().unwrap();
    let query = write_query(&dir, "The cat sat on the mat.");

    let mut cmd = bin();
    offline(&mut cmd, models.path());
    let output = cmd
        .arg(&query)
        .arg("The cat sat on the mat.")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let message = error_message(&output);
    assert!(
        message.starts_with("Similarity calculation error: "),
        "got {message}"
    );
}

#[test]
fn model_dir_flag_overrides_environment() {
    let dir = tempfile::tempdir().unwrap();
    let env_models = tempfile::tempdir().unwrap();
    let flag_models = tempfile::tempdir().unwrap();
    let query = write_query(&dir, "text");

    let mut cmd = bin();
    offline(&mut cmd, env_models.path());
    let output = cmd
        .arg("--model-dir")
        .arg(flag_models.path())
        .arg(&query)
        .arg("text")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let message = error_message(&output);
    let flag_dir = flag_models.path().to_string_lossy().to_string();
    assert!(message.contains(&flag_dir), "got {message}");
}

#[test]
fn compare_text_may_start_with_dash() {
    let dir = tempfile::tempdir().unwrap();
    let models = tempfile::tempdir().unwrap();
    let query = write_query(&dir, "text");

    let mut cmd = bin();
    offline(&mut cmd, models.path());
    let output = cmd.arg(&query).arg("-not-a-flag").output().unwrap();

    // Parsing succeeds and the run reaches the engine
    let message = error_message(&output);
    assert!(
        message.starts_with("Similarity calculation error: "),
        "got {message}"
    );
}
