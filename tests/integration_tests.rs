//! Integration tests for the groom CLI.
//!
//! The `run` tests use `cat` as a stand-in agent backend: the prompt is
//! echoed back verbatim, which exercises the full pipeline (request loading,
//! formatting, session lifecycle, parsing, output) without a real model.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use groom::context::{ContextSource, LogEntry, LogOrigin, MergeRequest, SessionUsage, SourceKind};
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn groom() -> Command {
    cargo_bin_cmd!("groom")
}

/// Write a merge request pointing at `project_root` to a JSON file.
fn write_request(dir: &Path, project_root: &Path) -> std::path::PathBuf {
    let request = MergeRequest {
        sources: vec![ContextSource {
            kind: SourceKind::Tab,
            session_id: "sess-a".into(),
            project_root: project_root.to_path_buf(),
            display_name: "Auth refactor".into(),
            logs: vec![
                LogEntry {
                    id: "1".into(),
                    timestamp: chrono::Utc::now(),
                    origin: LogOrigin::User,
                    text: "add login".into(),
                },
                LogEntry {
                    id: "2".into(),
                    timestamp: chrono::Utc::now(),
                    origin: LogOrigin::Agent,
                    text: "done, see auth.rs".into(),
                },
            ],
            agent: "claude".into(),
            usage: Some(SessionUsage {
                input_tokens: 500,
                output_tokens: 500,
                ..Default::default()
            }),
        }],
        target_agent: "claude".into(),
        target_project_root: project_root.to_path_buf(),
        grooming_prompt: None,
    };

    let path = dir.join("request.json");
    fs::write(&path, serde_json::to_string_pretty(&request).unwrap()).unwrap();
    path
}

mod cli_basics {
    use super::*;

    #[test]
    fn test_groom_help() {
        groom().arg("--help").assert().success();
    }

    #[test]
    fn test_groom_version() {
        groom().arg("--version").assert().success();
    }

    #[test]
    fn test_run_requires_request_flag() {
        groom().arg("run").assert().failure();
    }
}

mod check {
    use super::*;

    #[test]
    fn test_check_valid_request() {
        let dir = TempDir::new().unwrap();
        let request_file = write_request(dir.path(), dir.path());

        groom()
            .arg("check")
            .arg("--request")
            .arg(&request_file)
            .assert()
            .success()
            .stdout(predicate::str::contains("merge request is valid"))
            .stdout(predicate::str::contains("Sources:         1"))
            .stdout(predicate::str::contains("Recorded tokens: 1000"));
    }

    #[test]
    fn test_check_missing_file_fails() {
        groom()
            .arg("check")
            .arg("--request")
            .arg("/no/such/request.json")
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to read request file"));
    }

    #[test]
    fn test_check_invalid_json_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();

        groom()
            .arg("check")
            .arg("--request")
            .arg(&path)
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid merge request"));
    }
}

mod run {
    use super::*;

    #[test]
    fn test_run_end_to_end_with_cat_backend() {
        let dir = TempDir::new().unwrap();
        let request_file = write_request(dir.path(), dir.path());
        let output_file = dir.path().join("groomed.md");

        // cat echoes the prompt, so the groomed output is the prompt itself,
        // split at its section headers.
        groom()
            .arg("run")
            .arg("--request")
            .arg(&request_file)
            .arg("--agent-cmd")
            .arg("cat")
            .arg("--output")
            .arg(&output_file)
            .assert()
            .success()
            .stdout(predicate::str::contains("groomed into"));

        let groomed = fs::read_to_string(&output_file).unwrap();
        assert!(groomed.contains("Context Overview"));
        assert!(groomed.contains("[user] add login"));
    }

    #[test]
    fn test_run_missing_request_file_fails() {
        groom()
            .arg("run")
            .arg("--request")
            .arg("/no/such/request.json")
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to read request file"));
    }

    #[test]
    fn test_run_nonexistent_project_root_fails_cleanly() {
        let dir = TempDir::new().unwrap();
        let request_file = write_request(dir.path(), Path::new("/no/such/project"));

        groom()
            .arg("run")
            .arg("--request")
            .arg(&request_file)
            .arg("--agent-cmd")
            .arg("cat")
            .assert()
            .failure()
            .stderr(predicate::str::contains("grooming failed"));
    }
}
