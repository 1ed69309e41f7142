//! Infrastructure adapter for Debian host setup: `apt-get`, `snap`,
//! `systemctl` and `usermod`.

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, PackageManager, ServiceManager};
use crate::infra::command_runner::{
    DEFAULT_CMD_TIMEOUT, LONG_CMD_TIMEOUT, TokioCommandRunner, ensure_success,
};

/// Routes host administration commands through a `CommandRunner`,
/// prefixing them with `sudo` when not running as root.
pub struct DebianHost<R: CommandRunner> {
    runner: R,
    sudo: bool,
}

impl<R: CommandRunner> DebianHost<R> {
    pub fn new(runner: R, sudo: bool) -> Self {
        Self { runner, sudo }
    }

    /// Probe the effective uid with `id -u` and enable `sudo` unless it is 0.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` cannot be run.
    pub async fn detect(runner: R) -> Result<Self> {
        let output = runner.run("id", &["-u"]).await.context("id -u")?;
        ensure_success(&output, "id -u")?;
        let uid = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Self::new(runner, uid != "0"))
    }

    async fn admin(&self, program: &str, args: &[&str], what: &str) -> Result<()> {
        let mut argv: Vec<&str> = Vec::with_capacity(args.len() + 3);
        let cmd = if self.sudo {
            argv.push(program);
            "sudo"
        } else {
            program
        };
        argv.extend_from_slice(args);
        let output = self
            .runner
            .run_with_timeout(cmd, &argv, LONG_CMD_TIMEOUT)
            .await
            .with_context(|| what.to_string())?;
        ensure_success(&output, what)
    }

    async fn apt(&self, args: &[&str], what: &str) -> Result<()> {
        // `env` carries DEBIAN_FRONTEND through sudo's environment reset.
        let mut argv = vec!["DEBIAN_FRONTEND=noninteractive", "apt-get"];
        argv.extend_from_slice(args);
        self.admin("env", &argv, what).await
    }
}

impl DebianHost<TokioCommandRunner> {
    /// Convenience constructor for production use.
    ///
    /// # Errors
    ///
    /// Returns an error if the effective uid cannot be determined.
    pub async fn default_runner() -> Result<Self> {
        Self::detect(TokioCommandRunner::new(DEFAULT_CMD_TIMEOUT)).await
    }
}

impl<R: CommandRunner> PackageManager for DebianHost<R> {
    async fn refresh(&self) -> Result<()> {
        self.apt(&["update"], "apt-get update").await
    }

    async fn upgrade(&self) -> Result<()> {
        self.apt(&["-y", "upgrade"], "apt-get upgrade").await
    }

    async fn install(&self, packages: &[String]) -> Result<()> {
        if packages.is_empty() {
            return Ok(());
        }
        let mut args = vec!["install", "-y", "--no-install-recommends"];
        args.extend(packages.iter().map(String::as_str));
        self.apt(&args, "apt-get install").await
    }

    async fn install_snap(&self, name: &str) -> Result<()> {
        self.admin("snap", &["install", name, "--classic"], "snap install")
            .await
    }
}

impl<R: CommandRunner> ServiceManager for DebianHost<R> {
    async fn enable_now(&self, unit: &str) -> Result<()> {
        self.admin("systemctl", &["enable", "--now", unit], "systemctl enable")
            .await
    }

    async fn add_to_group(&self, user: &str, group: &str) -> Result<()> {
        self.admin("usermod", &["-aG", group, user], "usermod").await
    }
}
