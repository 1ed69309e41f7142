//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::{Account, DeployConfig, DeploymentTarget, EnvFile, Identity};

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
    /// Run a program with stdin piped from `stdin`.
    async fn run_with_stdin(&self, program: &str, args: &[&str], stdin: &[u8]) -> Result<Output>;
}

// ── Container Ports ───────────────────────────────────────────────────────────

/// Read access to a container's log stream.
#[allow(async_fn_in_trait)]
pub trait ContainerLogs {
    /// Fetch the last `target.tail_lines` lines (stdout and stderr merged).
    async fn fetch_log_tail(&self, target: &DeploymentTarget) -> Result<Vec<String>>;
}

/// User management inside the application container.
#[allow(async_fn_in_trait)]
pub trait UserDirectory {
    /// List the identities currently known to the application.
    async fn list_users(&self) -> Result<BTreeSet<Identity>>;
    /// Create one user. Fails when the creation command exits non-zero.
    async fn create_user(&self, account: &Account) -> Result<()>;
}

/// Compose stack lifecycle.
#[allow(async_fn_in_trait)]
pub trait ComposeStack {
    /// Log in to a registry, passing the password on stdin.
    async fn login(&self, server: &str, username: &str, password: &str) -> Result<()>;
    /// Build the stack's images.
    async fn build(&self) -> Result<()>;
    /// Stop and remove the stack's containers.
    async fn down(&self) -> Result<()>;
    /// Create and start the stack detached.
    async fn up(&self) -> Result<()>;
    /// Restart the running stack.
    async fn restart(&self) -> Result<()>;
}

// ── Host Ports ────────────────────────────────────────────────────────────────

/// System package manager operations.
#[allow(async_fn_in_trait)]
pub trait PackageManager {
    /// Refresh the package index.
    async fn refresh(&self) -> Result<()>;
    /// Upgrade installed packages.
    async fn upgrade(&self) -> Result<()>;
    /// Install packages non-interactively.
    async fn install(&self, packages: &[String]) -> Result<()>;
    /// Install a classic-confined snap.
    async fn install_snap(&self, name: &str) -> Result<()>;
}

/// Service and account management on the host.
#[allow(async_fn_in_trait)]
pub trait ServiceManager {
    /// Enable a systemd unit and start it now.
    async fn enable_now(&self, unit: &str) -> Result<()>;
    /// Add `user` to the supplementary `group`.
    async fn add_to_group(&self, user: &str, group: &str) -> Result<()>;
}

// ── Time Port ─────────────────────────────────────────────────────────────────

/// Injectable sleep so polling loops can run on simulated time in tests.
#[allow(async_fn_in_trait)]
pub trait Sleeper {
    async fn sleep(&self, duration: Duration);
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Config and File Ports ─────────────────────────────────────────────────────

/// Abstracts loading the deploy configuration.
pub trait ConfigStore {
    /// Load the configuration, returning defaults when the file is absent.
    fn load(&self) -> Result<DeployConfig>;
    /// Resolved path of the configuration file.
    fn path(&self) -> Result<PathBuf>;
}

/// Abstracts reading and writing an env file.
#[allow(async_fn_in_trait)]
pub trait EnvFileStore {
    /// Load and parse `path`. A missing file is an empty [`EnvFile`].
    async fn load(&self, path: &Path) -> Result<EnvFile>;
    /// Render and write `env` to `path`.
    async fn save(&self, path: &Path, env: &EnvFile) -> Result<()>;
}

// ── Network Probe Port ────────────────────────────────────────────────────────

/// Abstracts the REST login check so it can be tested without a server.
#[allow(async_fn_in_trait)]
pub trait AuthProbe {
    /// Authenticate against `rest_url`. `Ok(false)` means the server answered
    /// but rejected the credentials.
    async fn authenticate(&self, rest_url: &str, identity: &Identity, password: &str)
    -> Result<bool>;
}
