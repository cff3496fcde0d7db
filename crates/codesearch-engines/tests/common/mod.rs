//! Scripted command runner shared by the engine integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use codesearch_core::{CodesearchError, Result};
use codesearch_exec::{CommandRunner, RunOptions, RunnerResult};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub struct Call {
    pub binary: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub timeout_ms: u64,
}

impl Call {
    pub fn is_probe(&self) -> bool {
        self.args == ["--version"] || self.args.first().map(String::as_str) == Some("rev-parse")
    }
}

/// Answers probes from a fixed availability table and searches from canned
/// results, recording every invocation
#[derive(Default)]
pub struct ScriptedRunner {
    available: HashSet<String>,
    git_repo: bool,
    results: HashMap<String, RunnerResult>,
    spawn_failures: HashSet<String>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_available(mut self, binaries: &[&str]) -> Self {
        self.available
            .extend(binaries.iter().map(|b| b.to_string()));
        self
    }

    pub fn inside_git_repo(mut self) -> Self {
        self.git_repo = true;
        self
    }

    pub fn with_output(self, binary: &str, stdout: &str, exit_code: i32) -> Self {
        self.with_result(
            binary,
            RunnerResult {
                stdout: stdout.to_string(),
                exit_code: Some(exit_code),
                duration_ms: 5,
                ..Default::default()
            },
        )
    }

    pub fn with_result(mut self, binary: &str, result: RunnerResult) -> Self {
        self.results.insert(binary.to_string(), result);
        self
    }

    /// Probes succeed but the search spawn fails
    pub fn failing_spawn(mut self, binary: &str) -> Self {
        self.spawn_failures.insert(binary.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn search_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(|c| !c.is_probe()).collect()
    }

    pub fn probe_count(&self, binary: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.binary == binary && c.args == ["--version"])
            .count()
    }

    pub fn repo_check_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.args.first().map(String::as_str) == Some("rev-parse"))
            .count()
    }
}

fn not_found(binary: &str) -> CodesearchError {
    CodesearchError::Spawn {
        binary: binary.to_string(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(
        &self,
        binary: &str,
        args: &[String],
        options: &RunOptions,
    ) -> Result<RunnerResult> {
        let call = Call {
            binary: binary.to_string(),
            args: args.to_vec(),
            cwd: options.cwd.clone(),
            timeout_ms: options.timeout.as_millis() as u64,
        };
        let is_probe = call.is_probe();
        self.calls.lock().unwrap().push(call);

        if args == ["--version"] {
            if !self.available.contains(binary) {
                return Err(not_found(binary));
            }
            return Ok(RunnerResult {
                stdout: format!("{} 1.0.0\n", binary),
                exit_code: Some(0),
                ..Default::default()
            });
        }

        if is_probe {
            let inside = self.git_repo && self.available.contains(binary);
            return Ok(RunnerResult {
                stdout: if inside { "true\n" } else { "" }.to_string(),
                stderr: if inside { "" } else { "fatal: not a git repository\n" }.to_string(),
                exit_code: Some(if inside { 0 } else { 128 }),
                ..Default::default()
            });
        }

        if self.spawn_failures.contains(binary) {
            return Err(not_found(binary));
        }

        Ok(self.results.get(binary).cloned().unwrap_or(RunnerResult {
            exit_code: Some(1),
            ..Default::default()
        }))
    }
}
