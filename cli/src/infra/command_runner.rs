//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution with guaranteed timeout and kill.

use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::debug;

use crate::application::ports::CommandRunner;

/// Default timeout for short commands (`docker logs`, `docker exec`, `id`).
pub const DEFAULT_CMD_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for long-running commands (package installs, image builds, `up`).
pub const LONG_CMD_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Production `CommandRunner` using tokio for async process execution
/// with guaranteed timeout and kill.
///
/// `tokio::time::timeout` around `.output().await` drops the future but
/// leaves the OS process running, so the child is killed explicitly inside
/// `tokio::select!`.
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn collect(
        program: &str,
        mut child: tokio::process::Child,
        timeout: Duration,
    ) -> Result<Output> {
        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        tokio::select! {
            result = async {
                let (status, stdout, stderr) = tokio::join!(
                    child.wait(),
                    async {
                        let mut buf = Vec::new();
                        if let Some(ref mut h) = stdout_handle {
                            let _ = h.read_to_end(&mut buf).await;
                        }
                        buf
                    },
                    async {
                        let mut buf = Vec::new();
                        if let Some(ref mut h) = stderr_handle {
                            let _ = h.read_to_end(&mut buf).await;
                        }
                        buf
                    },
                );
                Ok(Output {
                    status: status.with_context(|| format!("waiting for {program}"))?,
                    stdout,
                    stderr,
                })
            } => result,
            () = tokio::time::sleep(timeout) => {
                let _ = child.kill().await;
                anyhow::bail!("{program} timed out after {}s", timeout.as_secs())
            }
        }
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.run_with_timeout(program, args, self.timeout).await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        debug!(program, args = ?redact_args(args), timeout_secs = timeout.as_secs(), "spawning");
        let child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let output = Self::collect(program, child, timeout).await?;
        debug!(program, status = ?output.status, "finished");
        Ok(output)
    }

    async fn run_with_stdin(&self, program: &str, args: &[&str], input: &[u8]) -> Result<Output> {
        debug!(program, args = ?redact_args(args), "spawning with stdin");
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(input)
                .await
                .with_context(|| format!("writing stdin of {program}"))?;
            // Dropping the handle closes the pipe so the child sees EOF.
        }

        let output = Self::collect(program, child, self.timeout).await?;
        debug!(program, status = ?output.status, "finished");
        Ok(output)
    }
}

/// Placeholder logged in place of secret argument values.
pub const REDACTED: &str = "********";

/// Copy of `args` fit for logging: the value of `--password=…`, and the
/// argument following a bare `--password`, are replaced by [`REDACTED`].
#[must_use]
pub fn redact_args(args: &[&str]) -> Vec<String> {
    let mut out = Vec::with_capacity(args.len());
    let mut hide_next = false;
    for arg in args {
        if hide_next {
            out.push(REDACTED.to_string());
            hide_next = false;
        } else if let Some((flag, _)) = arg.split_once('=').filter(|(f, _)| is_secret_flag(f)) {
            out.push(format!("{flag}={REDACTED}"));
        } else {
            hide_next = is_secret_flag(arg);
            out.push((*arg).to_string());
        }
    }
    out
}

fn is_secret_flag(flag: &str) -> bool {
    matches!(flag, "--password" | "--passwd")
}

/// Turn a non-zero exit into an error carrying the trimmed stderr.
///
/// # Errors
///
/// Returns an error when `output.status` is not success.
pub fn ensure_success(output: &Output, what: &str) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    let code = output
        .status
        .code()
        .map_or_else(|| "signal".to_string(), |c| c.to_string());
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        anyhow::bail!("{what} failed (exit code {code})");
    }
    anyhow::bail!("{what} failed (exit code {code}): {stderr}")
}
