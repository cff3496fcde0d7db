//! Process runner: the single place an external binary is started
//!
//! stdout/stderr are pumped by one task per stream into a bounded channel and
//! collected into [`CappedBuffer`]s, so memory stays bounded no matter how much
//! the child prints. Hitting the byte cap never kills the child; only the
//! timeout does (SIGTERM, then SIGKILL after the grace window).

use async_trait::async_trait;
use codesearch_core::config::consts::limits;
use codesearch_core::{CodesearchError, Result};
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const READ_CHUNK_BYTES: usize = 8 * 1024;
const CHANNEL_CAPACITY: usize = 16;

/// How long to keep draining pipes after the child has exited
const DRAIN_GRACE: Duration = Duration::from_millis(250);

/// Options for a single process run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub cwd: PathBuf,
    pub timeout: Duration,
    /// Per-stream cap; bytes past it are dropped
    pub max_output_bytes: usize,
    pub kill_grace: Duration,
}

impl RunOptions {
    pub fn new(cwd: impl Into<PathBuf>, timeout: Duration, max_output_bytes: usize) -> Self {
        Self {
            cwd: cwd.into(),
            timeout,
            max_output_bytes,
            kill_grace: Duration::from_millis(limits::KILL_GRACE_MS),
        }
    }

    pub fn with_kill_grace(mut self, kill_grace: Duration) -> Self {
        self.kill_grace = kill_grace;
        self
    }
}

/// Result of a process run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnerResult {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub signal: Option<i32>,
    pub duration_ms: u64,
    pub timed_out: bool,
    /// Either stream hit the byte cap
    pub truncated: bool,
}

impl RunnerResult {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    pub fn first_stderr_line(&self) -> Option<&str> {
        self.stderr
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
    }
}

/// Seam over process execution so callers can be driven without real binaries
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, binary: &str, args: &[String], options: &RunOptions)
    -> Result<RunnerResult>;
}

/// Production runner backed by `tokio::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioRunner;

#[async_trait]
impl CommandRunner for TokioRunner {
    async fn run(
        &self,
        binary: &str,
        args: &[String],
        options: &RunOptions,
    ) -> Result<RunnerResult> {
        run_command(binary, args, options).await
    }
}

/// Byte buffer that silently drops everything past `cap`
#[derive(Debug)]
pub struct CappedBuffer {
    bytes: Vec<u8>,
    cap: usize,
    truncated: bool,
}

impl CappedBuffer {
    pub fn new(cap: usize) -> Self {
        Self {
            bytes: Vec::new(),
            cap,
            truncated: false,
        }
    }

    pub fn push(&mut self, chunk: &[u8]) {
        let remaining = self.cap.saturating_sub(self.bytes.len());
        if chunk.len() > remaining {
            self.truncated = true;
        }
        let take = chunk.len().min(remaining);
        self.bytes.extend_from_slice(&chunk[..take]);
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_string(self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

#[derive(Debug, Clone, Copy)]
enum StreamKind {
    Stdout,
    Stderr,
}

/// Spawn `binary` and wait for it under the timeout and output caps
pub async fn run_command(
    binary: &str,
    args: &[String],
    options: &RunOptions,
) -> Result<RunnerResult> {
    let started = Instant::now();
    let mut child = Command::new(binary)
        .args(args)
        .current_dir(&options.cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| CodesearchError::Spawn {
            binary: binary.to_string(),
            source,
        })?;

    let (tx, mut rx) = mpsc::channel::<(StreamKind, Vec<u8>)>(CHANNEL_CAPACITY);
    let mut pumps: Vec<JoinHandle<()>> = Vec::with_capacity(2);
    if let Some(stdout) = child.stdout.take() {
        pumps.push(tokio::spawn(pump(stdout, StreamKind::Stdout, tx.clone())));
    }
    if let Some(stderr) = child.stderr.take() {
        pumps.push(tokio::spawn(pump(stderr, StreamKind::Stderr, tx.clone())));
    }
    drop(tx);

    let mut stdout = CappedBuffer::new(options.max_output_bytes);
    let mut stderr = CappedBuffer::new(options.max_output_bytes);
    let mut status: Option<ExitStatus> = None;
    let mut streams_open = true;
    let mut timed_out = false;

    let deadline = tokio::time::sleep(options.timeout);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            chunk = rx.recv(), if streams_open => match chunk {
                Some((StreamKind::Stdout, bytes)) => stdout.push(&bytes),
                Some((StreamKind::Stderr, bytes)) => stderr.push(&bytes),
                None => streams_open = false,
            },
            waited = child.wait(), if status.is_none() => {
                status = Some(waited?);
                deadline
                    .as_mut()
                    .reset(tokio::time::Instant::now() + DRAIN_GRACE);
            }
            () = &mut deadline => {
                if status.is_some() {
                    tracing::debug!(binary, "output pipes still open after exit, stop draining");
                    break;
                }
                timed_out = true;
                tracing::warn!(
                    binary,
                    timeout_ms = options.timeout.as_millis() as u64,
                    "process timed out, terminating"
                );
                status = Some(terminate(&mut child, options.kill_grace).await?);
                deadline
                    .as_mut()
                    .reset(tokio::time::Instant::now() + DRAIN_GRACE);
            }
        }

        if status.is_some() && !streams_open {
            break;
        }
    }

    for pump in pumps {
        pump.abort();
    }

    let truncated = stdout.is_truncated() || stderr.is_truncated();
    if truncated {
        tracing::warn!(
            binary,
            max_output_bytes = options.max_output_bytes,
            "process output truncated"
        );
    }

    let (exit_code, signal) = match status {
        Some(status) => (status.code(), exit_signal(&status)),
        None => (None, None),
    };

    Ok(RunnerResult {
        stdout: stdout.into_string(),
        stderr: stderr.into_string(),
        exit_code,
        signal,
        duration_ms: started.elapsed().as_millis() as u64,
        timed_out,
        truncated,
    })
}

/// Read a pipe to completion, forwarding chunks to the collector
async fn pump<R>(mut reader: R, kind: StreamKind, tx: mpsc::Sender<(StreamKind, Vec<u8>)>)
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; READ_CHUNK_BYTES];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                if tx.send((kind, buf[..n].to_vec())).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::debug!("pipe read error: {}", e);
                break;
            }
        }
    }
}

/// SIGTERM, wait `grace`, then SIGKILL
async fn terminate(child: &mut Child, grace: Duration) -> std::io::Result<ExitStatus> {
    #[cfg(unix)]
    if let Some(pid) = child.id() {
        use nix::sys::signal::{Signal, kill};
        use nix::unistd::Pid;

        if kill(Pid::from_raw(pid as i32), Signal::SIGTERM).is_ok() {
            if let Ok(waited) = tokio::time::timeout(grace, child.wait()).await {
                return waited;
            }
        }
    }
    #[cfg(not(unix))]
    let _ = grace;

    if let Err(e) = child.start_kill() {
        tracing::debug!("start_kill failed: {}", e);
    }
    child.wait().await
}

#[cfg(unix)]
fn exit_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: &ExitStatus) -> Option<i32> {
    None
}
