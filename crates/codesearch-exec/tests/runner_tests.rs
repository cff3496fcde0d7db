//! Integration tests for the process runner against real processes

#![cfg(unix)]

use codesearch_exec::{CommandRunner, RunOptions, TokioRunner, run_command};
use codesearch_testkit::{FakeEngine, temp_dir_in_workspace};
use std::time::Duration;

fn sh(script: &str) -> Vec<String> {
    vec!["-c".to_string(), script.to_string()]
}

fn options(timeout_ms: u64, max_output_bytes: usize) -> RunOptions {
    RunOptions::new(".", Duration::from_millis(timeout_ms), max_output_bytes)
}

#[tokio::test]
async fn test_captures_stdout_stderr_and_exit_code() {
    let result = run_command(
        "sh",
        &sh("echo out; echo err >&2; exit 3"),
        &options(5_000, 1024),
    )
    .await
    .unwrap();

    assert_eq!(result.stdout, "out\n");
    assert_eq!(result.stderr, "err\n");
    assert_eq!(result.exit_code, Some(3));
    assert_eq!(result.signal, None);
    assert!(!result.timed_out);
    assert!(!result.truncated);
    assert!(!result.success());
}

#[tokio::test]
async fn test_runs_in_requested_cwd() {
    let temp = temp_dir_in_workspace();
    std::fs::write(temp.path().join("marker.txt"), "x").unwrap();

    let opts = RunOptions::new(temp.path(), Duration::from_secs(5), 1024);
    let result = run_command("ls", &[], &opts).await.unwrap();

    assert!(result.success());
    assert!(result.stdout.contains("marker.txt"));
}

#[tokio::test]
async fn test_output_cap_truncates_but_lets_process_finish() {
    let result = run_command(
        "sh",
        &sh("head -c 200000 /dev/zero | tr '\\000' a; echo finished >&2"),
        &options(10_000, 1_000),
    )
    .await
    .unwrap();

    assert_eq!(result.stdout.len(), 1_000);
    assert!(result.truncated);
    assert!(!result.timed_out);
    assert_eq!(result.exit_code, Some(0));
    assert_eq!(result.stderr.trim(), "finished");
}

#[tokio::test]
async fn test_timeout_terminates_and_keeps_partial_output() {
    let result = run_command("sh", &sh("echo started; sleep 10"), &options(500, 1024))
        .await
        .unwrap();

    assert!(result.timed_out);
    assert_eq!(result.stdout, "started\n");
    assert_eq!(result.exit_code, None, "signal exit must not look like a code");
    assert!(result.signal.is_some());
    assert!(
        result.duration_ms < 5_000,
        "took {}ms, timeout not enforced",
        result.duration_ms
    );
}

#[tokio::test]
async fn test_timeout_escalates_to_kill_when_term_ignored() {
    let opts = options(300, 1024).with_kill_grace(Duration::from_millis(200));
    let result = run_command("sh", &sh("trap '' TERM; echo ready; sleep 10"), &opts)
        .await
        .unwrap();

    assert!(result.timed_out);
    assert_eq!(result.signal, Some(9));
    assert!(result.duration_ms < 5_000);
}

#[tokio::test]
async fn test_fake_engine_through_trait_object() {
    let temp = temp_dir_in_workspace();
    let engine = FakeEngine::builder(temp.path(), "rg")
        .stdout("hello\n")
        .exit_code(1)
        .build();

    let runner: Box<dyn CommandRunner> = Box::new(TokioRunner);
    let args = vec!["--json".to_string(), "needle".to_string()];
    let result = runner
        .run(&engine.binary(), &args, &options(5_000, 1024))
        .await
        .unwrap();

    assert_eq!(result.exit_code, Some(1));
    assert_eq!(result.stdout, "hello\n");
    assert_eq!(engine.invocations(), vec![args]);
}
