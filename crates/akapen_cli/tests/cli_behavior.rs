//! Integration tests for CLI behavior
//!
//! These tests verify the external behavior of the CLI tool,
//! following behavior-driven testing principles.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper to create a command for the akapen CLI
fn akapen_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_akapen"))
}

/// Writes a config with a short sentence length limit into a fresh directory.
fn workspace() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let conf = dir.path().join(".akapen.json");
    fs::write(
        &conf,
        r#"{
            "lang": "en",
            "validators": [
                { "name": "SentenceLength", "properties": { "max_len": 5 } }
            ]
        }"#,
    )
    .unwrap();
    (dir, conf)
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

mod help_command {
    use super::*;

    #[test]
    fn shows_help_with_flag() {
        akapen_cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage:"))
            .stdout(predicate::str::contains("--result-format"));
    }

    #[test]
    fn shows_version_with_flag() {
        akapen_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn requires_input_or_sentence() {
        akapen_cmd().assert().failure();
    }
}

mod lint_command {
    use super::*;

    #[test]
    fn lints_inline_sentence() {
        let (_dir, conf) = workspace();

        akapen_cmd()
            .arg("--conf")
            .arg(&conf)
            .args(["--sentence", "Hello world."])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "<input>:1:0 error [SentenceLength] The length of the sentence (12) exceeds the maximum of 5.",
            ))
            .stdout(predicate::str::contains("    Hello world."));
    }

    #[test]
    fn fails_when_errors_exceed_limit() {
        let (_dir, conf) = workspace();

        akapen_cmd()
            .arg("--conf")
            .arg(&conf)
            .args(["--sentence", "Hello world.", "--limit", "0"])
            .assert()
            .code(1);
    }

    #[test]
    fn reports_markdown_positions() {
        let (dir, conf) = workspace();
        let doc = write(dir.path(), "doc.md", "# Title\nHello world.\n");

        akapen_cmd()
            .arg("-c")
            .arg(&conf)
            .arg(&doc)
            .assert()
            .success()
            .stdout(predicate::str::contains("doc.md:2:0 error [SentenceLength]"))
            .stdout(predicate::str::contains("Checked 1 documents, found 1 errors"));
    }

    #[test]
    fn discovers_config_in_current_directory() {
        let (dir, _conf) = workspace();
        write(dir.path(), "notes.txt", "Hello world. Tiny. Another long one.\n");

        akapen_cmd()
            .current_dir(dir.path())
            .arg("notes.txt")
            .assert()
            .code(1)
            .stdout(predicate::str::contains("found 2 errors"));
    }

    #[test]
    fn explicit_format_overrides_extension() {
        let (dir, conf) = workspace();
        let doc = write(dir.path(), "doc.txt", "h1. Title\nOk.\n");

        akapen_cmd()
            .arg("-c")
            .arg(&conf)
            .args(["--format", "wiki"])
            .arg(&doc)
            .assert()
            .success()
            .stdout(predicate::str::contains("found 0 errors"));
    }

    #[test]
    fn outputs_json() {
        let (_dir, conf) = workspace();

        let output = akapen_cmd()
            .arg("--conf")
            .arg(&conf)
            .args(["-s", "Hello world.", "-r", "json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        let errors = &json[0]["errors"];
        assert_eq!(json[0]["document"], "<input>");
        assert_eq!(errors.as_array().unwrap().len(), 1);
        assert_eq!(errors[0]["validator_name"], "SentenceLength");
        assert_eq!(errors[0]["severity"], "error");
        assert_eq!(errors[0]["sentence"]["content"], "Hello world.");
    }

    #[test]
    fn prints_timings() {
        let (_dir, conf) = workspace();

        akapen_cmd()
            .arg("--conf")
            .arg(&conf)
            .args(["-s", "Hi.", "--timings"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Performance Timings:"))
            .stdout(predicate::str::contains("SentenceLength"));
    }

    #[test]
    fn rejects_unknown_validator() {
        let dir = tempfile::tempdir().unwrap();
        let conf = write(
            dir.path(),
            "bad.json",
            r#"{ "validators": [{ "name": "Spelling" }] }"#,
        );

        akapen_cmd()
            .arg("--conf")
            .arg(&conf)
            .args(["-s", "Hello."])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Unknown validator 'Spelling'"));
    }

    #[test]
    fn rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let conf = write(dir.path(), "bad.json", r#"{ "lang": "en" }"#);

        akapen_cmd()
            .arg("--conf")
            .arg(&conf)
            .args(["-s", "Hello."])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Config validation failed"));
    }

    #[test]
    fn reports_zero_documents_for_unmatched_pattern() {
        let (dir, _conf) = workspace();

        akapen_cmd()
            .current_dir(dir.path())
            .arg("missing/**/*.md")
            .assert()
            .success()
            .stdout(predicate::str::contains("Checked 0 documents"));
    }
}
