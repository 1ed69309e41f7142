//! Shared test helpers: a recording `CommandRunner` and output constructors.

#![allow(dead_code)]

use std::process::{ExitStatus, Output};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use silex_deploy::application::ports::CommandRunner;

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
///
/// On Unix the raw wait-status encodes the exit code in bits 8–15, so we shift.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

// ── Output constructors ──────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── MockCommandRunner ────────────────────────────────────────────────────────

/// One recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
    pub stdin: Option<Vec<u8>>,
}

type Responder = dyn Fn(&str, &[String]) -> Result<Output> + Send + Sync;

/// A `CommandRunner` that records every call and answers from a closure.
///
/// Clones share the same call log.
#[derive(Clone)]
pub struct MockCommandRunner {
    calls: Arc<Mutex<Vec<Call>>>,
    respond: Arc<Responder>,
}

impl MockCommandRunner {
    /// Every call succeeds with empty output.
    pub fn new_ok() -> Self {
        Self::responding(|_, _| Ok(ok_output(b"")))
    }

    pub fn responding(
        respond: impl Fn(&str, &[String]) -> Result<Output> + Send + Sync + 'static,
    ) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            respond: Arc::new(respond),
        }
    }

    /// Snapshot of all recorded calls.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("mutex poisoned").clone()
    }

    fn record(&self, program: &str, args: &[&str], stdin: Option<&[u8]>) -> Result<Output> {
        let args: Vec<String> = args.iter().map(|s| (*s).to_string()).collect();
        let out = (self.respond)(program, &args);
        self.calls.lock().expect("mutex poisoned").push(Call {
            program: program.to_string(),
            args,
            stdin: stdin.map(<[u8]>::to_vec),
        });
        out
    }
}

impl CommandRunner for MockCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.record(program, args, None)
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        _timeout: Duration,
    ) -> Result<Output> {
        self.record(program, args, None)
    }

    async fn run_with_stdin(&self, program: &str, args: &[&str], stdin: &[u8]) -> Result<Output> {
        self.record(program, args, Some(stdin))
    }
}

// ── Captured tracing output ──────────────────────────────────────────────────

/// In-memory `MakeWriter` target for a test-scoped tracing subscriber.
#[derive(Clone, Default)]
pub struct LogBuf(Arc<Mutex<Vec<u8>>>);

impl LogBuf {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("mutex poisoned")).into_owned()
    }

    /// Install a DEBUG-level subscriber writing here for the current thread.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }
}

impl std::io::Write for LogBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().expect("mutex poisoned").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
