//! Integration tests for the codesearch CLI

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo_bin;
use codesearch_testkit::{temp_dir_in_workspace, write_tree};
use predicates::prelude::*;
use std::path::Path;
use std::process::Command;

const TYPES_TS: &str = "import { Match } from './match';\n\
export interface SearchResponse {\n\
  matches: Match[];\n\
}\n\
export function empty(): SearchResponse {\n\
  return { matches: [] };\n\
}\n";

/// Force the grep fallback so results do not depend on what the host has installed
const GREP_ONLY_CONFIG: &str = r#"
[engines]
ripgrep = "codesearch-missing-rg"
git = "codesearch-missing-git"
"#;

/// Helper: a workspace with one source file, a secret and a grep-only config
fn create_test_workspace(root: &Path) {
    write_tree(
        root,
        &[
            ("codesearch.toml", GREP_ONLY_CONFIG),
            ("src/types.ts", TYPES_TS),
            (".env", "SearchResponse=secret\n"),
            ("node_modules/pkg/index.ts", "export type SearchResponse = {};\n"),
        ],
    );
}

fn codesearch(root: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin!("codesearch"));
    cmd.arg("--root")
        .arg(root)
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "error");
    cmd
}

// ============================================================================
// Top level
// ============================================================================

#[test]
fn test_cli_help_lists_commands() {
    let mut cmd = Command::new(cargo_bin!("codesearch"));
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("doctor"))
        .stdout(predicate::str::contains("mcp"));
}

#[test]
fn test_missing_root_is_an_error() {
    let temp = temp_dir_in_workspace();
    let missing = temp.path().join("nope");

    codesearch(&missing)
        .args(["search", "text", "anything"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Root directory"));
}

// ============================================================================
// search text
// ============================================================================

#[cfg(unix)]
#[test]
fn test_search_text_human_output() {
    let temp = temp_dir_in_workspace();
    create_test_workspace(temp.path());

    codesearch(temp.path())
        .args(["search", "text", "SearchResponse"])
        .assert()
        .success()
        .stdout(predicate::str::contains("src/types.ts:2:1: export interface SearchResponse {"))
        .stdout(predicate::str::contains("src/types.ts:5:1:"))
        .stdout(predicate::str::contains("2 matches in 1 files via grep"))
        .stdout(predicate::str::contains("grep fallback is less precise"))
        .stdout(predicate::str::contains("Some matches were removed"))
        .stdout(predicate::str::contains(".env").not())
        .stdout(predicate::str::contains("node_modules").not());
}

#[cfg(unix)]
#[test]
fn test_search_text_json_output() {
    let temp = temp_dir_in_workspace();
    create_test_workspace(temp.path());

    let output = codesearch(temp.path())
        .args([
            "search",
            "text",
            "SearchResponse",
            "--path",
            "src",
            "--max-results",
            "1",
            "--json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let response: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(response["engine"], "grep");
    assert_eq!(response["mode"], "literal");
    assert_eq!(response["truncated"], true);
    assert_eq!(response["matches"].as_array().unwrap().len(), 1);
    assert_eq!(response["matches"][0]["file"], "src/types.ts");
    assert_eq!(response["matches"][0]["line"], 2);
    assert_eq!(response["stats"]["matchesReturned"], 1);
}

#[cfg(unix)]
#[test]
fn test_search_text_in_subdirectory() {
    let temp = temp_dir_in_workspace();
    create_test_workspace(temp.path());
    write_tree(temp.path(), &[("docs/notes.md", "SearchResponse in docs\n")]);

    let output = codesearch(temp.path())
        .args(["search", "text", "SearchResponse", "--cwd", "docs", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let response: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let matches = response["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["file"], "notes.md");
}

#[test]
fn test_search_denied_path_fails() {
    let temp = temp_dir_in_workspace();
    create_test_workspace(temp.path());

    codesearch(temp.path())
        .args(["search", "text", "secret", "--path", ".env"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Path is not searchable: .env"));
}

#[test]
fn test_search_escaping_cwd_fails() {
    let temp = temp_dir_in_workspace();
    create_test_workspace(temp.path());

    codesearch(temp.path())
        .args(["search", "text", "x", "--cwd", ".."])
        .assert()
        .failure()
        .stderr(predicate::str::contains("outside the workspace root"));
}

#[test]
fn test_search_empty_query_fails() {
    let temp = temp_dir_in_workspace();
    create_test_workspace(temp.path());

    codesearch(temp.path())
        .args(["search", "text", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("query is required"));
}

#[test]
fn test_invalid_config_fails_search() {
    let temp = temp_dir_in_workspace();
    write_tree(temp.path(), &[("codesearch.toml", "[limits]\nkill_grace_ms = 0\n")]);

    codesearch(temp.path())
        .args(["search", "text", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("limits.kill_grace_ms"));
}

// ============================================================================
// search ast / request
// ============================================================================

#[test]
fn test_search_ast_without_engine_is_soft() {
    let temp = temp_dir_in_workspace();
    write_tree(
        temp.path(),
        &[(
            "codesearch.toml",
            "[engines]\nast_grep = \"codesearch-missing-ast-grep\"\n",
        )],
    );

    let output = codesearch(temp.path())
        .args(["search", "ast", "console.log($A)", "--lang", "ts", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let response: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(response["engine"], "ast-grep");
    assert_eq!(response["mode"], "ast");
    assert!(response["matches"].as_array().unwrap().is_empty());
    assert_eq!(
        response["warnings"][0],
        "ast-grep is not available; structural search returned no results."
    );
}

#[cfg(unix)]
#[test]
fn test_search_request_from_stdin() {
    let temp = temp_dir_in_workspace();
    create_test_workspace(temp.path());

    let request = serde_json::json!({
        "type": "text",
        "query": "function\\s+empty",
        "mode": "regex",
        "paths": ["src"],
    });

    let output = assert_cmd::Command::from_std(codesearch(temp.path()))
        .args(["search", "request", "-", "--json"])
        .write_stdin(request.to_string())
        .output()
        .unwrap();
    assert!(output.status.success());

    let response: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(response["mode"], "regex");
    assert_eq!(response["matches"][0]["file"], "src/types.ts");
    assert_eq!(response["matches"][0]["line"], 5);
}

#[test]
fn test_search_request_rejects_bad_json() {
    let temp = temp_dir_in_workspace();
    create_test_workspace(temp.path());

    assert_cmd::Command::from_std(codesearch(temp.path()))
        .args(["search", "request", "-"])
        .write_stdin("{not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Request is not valid JSON"));
}

#[test]
fn test_search_request_rejects_unknown_type() {
    let temp = temp_dir_in_workspace();
    create_test_workspace(temp.path());

    assert_cmd::Command::from_std(codesearch(temp.path()))
        .args(["search", "request", "-"])
        .write_stdin(r#"{"type":"semantic","query":"x"}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid search request"));
}

// ============================================================================
// doctor
// ============================================================================

#[test]
fn test_doctor_json_reports_engines() {
    let temp = temp_dir_in_workspace();
    create_test_workspace(temp.path());

    let output = codesearch(temp.path())
        .args(["doctor", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["schema_version"], "1.0");

    let checks = report["checks"].as_array().unwrap();
    let check = |id: &str| {
        checks
            .iter()
            .find(|c| c["id"] == id)
            .unwrap_or_else(|| panic!("missing check {id}"))
            .clone()
    };

    assert_eq!(check("config_valid")["status"], "ok");
    assert_eq!(check("engine_ripgrep")["status"], "warning");
    assert_eq!(
        check("engine_ripgrep")["details"]["binary"],
        "codesearch-missing-rg"
    );
    assert_eq!(check("engine_git_grep")["status"], "warning");
    assert_eq!(check("text_engine")["message"], "Text search will use grep");
}

#[test]
fn test_doctor_exits_zero_with_invalid_config() {
    let temp = temp_dir_in_workspace();
    write_tree(temp.path(), &[("codesearch.toml", "[engines]\nfzf = \"fzf\"\n")]);

    let output = codesearch(temp.path())
        .args(["doctor", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["checks"][0]["id"], "config_valid");
    assert_eq!(report["checks"][0]["status"], "error");
}

#[test]
fn test_doctor_human_output() {
    let temp = temp_dir_in_workspace();
    create_test_workspace(temp.path());

    codesearch(temp.path())
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("Search Engine Health Check"))
        .stdout(predicate::str::contains("ripgrep is not available"));
}

#[test]
fn test_root_from_environment() {
    let temp = temp_dir_in_workspace();
    create_test_workspace(temp.path());

    let mut cmd = Command::new(cargo_bin!("codesearch"));
    let output = cmd
        .args(["doctor", "--json"])
        .env("CODESEARCH_ROOT", temp.path())
        .env("RUST_LOG", "error")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let expected = temp.path().canonicalize().unwrap();
    assert_eq!(report["root"], expected.display().to_string());
}
