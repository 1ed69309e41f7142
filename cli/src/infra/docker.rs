//! Infrastructure adapter for the Docker CLI.
//!
//! `DockerCli<R>` routes `docker` and `docker compose` invocations through a
//! `CommandRunner` and implements the container ports on top of them.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use crate::application::ports::{CommandRunner, ComposeStack, ContainerLogs, UserDirectory};
use crate::domain::config::StackConfig;
use crate::domain::error::ProvisionError;
use crate::domain::readiness::DeploymentTarget;
use crate::domain::user::{Account, Identity, identities_in};
use crate::infra::command_runner::{
    DEFAULT_CMD_TIMEOUT, LONG_CMD_TIMEOUT, REDACTED, TokioCommandRunner, ensure_success,
};

/// Docker CLI adapter for one compose project.
///
/// Generic over `R: CommandRunner` so that tests can inject a mock runner
/// without spawning real processes.
pub struct DockerCli<R: CommandRunner> {
    runner: R,
    project_dir: PathBuf,
    compose_files: Vec<PathBuf>,
    env_file: PathBuf,
    container: String,
    admin_cli: String,
}

impl<R: CommandRunner> DockerCli<R> {
    /// Create an adapter for the project described by `stack`.
    pub fn new(runner: R, stack: &StackConfig) -> Self {
        Self {
            runner,
            project_dir: stack.project_dir.clone(),
            compose_files: stack
                .compose_files
                .iter()
                .map(|f| stack.project_dir.join(f))
                .collect(),
            env_file: stack.project_dir.join(&stack.env_file),
            container: stack.container.clone(),
            admin_cli: stack.admin_cli.clone(),
        }
    }

    /// `docker compose` global flags shared by every subcommand.
    fn compose_args(&self) -> Vec<String> {
        let mut args = vec![
            "compose".to_string(),
            "--project-directory".to_string(),
            self.project_dir.display().to_string(),
        ];
        for file in &self.compose_files {
            args.push("-f".to_string());
            args.push(file.display().to_string());
        }
        args.push("--env-file".to_string());
        args.push(self.env_file.display().to_string());
        args
    }

    async fn compose(&self, sub: &[&str]) -> Result<()> {
        let mut args = self.compose_args();
        args.extend(sub.iter().map(|s| (*s).to_string()));
        let argv: Vec<&str> = args.iter().map(String::as_str).collect();
        let output = self
            .runner
            .run_with_timeout("docker", &argv, LONG_CMD_TIMEOUT)
            .await
            .with_context(|| format!("docker compose {}", sub.join(" ")))?;
        ensure_success(&output, &format!("docker compose {}", sub.join(" ")))
    }

    /// `docker exec <container> <admin_cli> user …`
    fn user_args<'a>(&'a self, tail: &[&'a str]) -> Vec<&'a str> {
        let mut args = vec!["exec", self.container.as_str(), self.admin_cli.as_str(), "user"];
        args.extend_from_slice(tail);
        args
    }
}

/// Command output with every occurrence of `secret` masked.
fn scrub(raw: &[u8], secret: &str) -> String {
    let text = String::from_utf8_lossy(raw);
    if secret.is_empty() {
        return text.into_owned();
    }
    text.replace(secret, REDACTED)
}

impl DockerCli<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn default_runner(stack: &StackConfig) -> Self {
        Self::new(TokioCommandRunner::new(DEFAULT_CMD_TIMEOUT), stack)
    }
}

impl<R: CommandRunner> ComposeStack for DockerCli<R> {
    async fn login(&self, server: &str, username: &str, password: &str) -> Result<()> {
        let output = self
            .runner
            .run_with_stdin(
                "docker",
                &["login", server, "--username", username, "--password-stdin"],
                password.as_bytes(),
            )
            .await
            .context("docker login")?;
        ensure_success(&output, "docker login")
    }

    async fn build(&self) -> Result<()> {
        self.compose(&["build"]).await
    }

    async fn down(&self) -> Result<()> {
        self.compose(&["down"]).await
    }

    async fn up(&self) -> Result<()> {
        self.compose(&["up", "-d"]).await
    }

    async fn restart(&self) -> Result<()> {
        self.compose(&["restart"]).await
    }
}

impl<R: CommandRunner> ContainerLogs for DockerCli<R> {
    async fn fetch_log_tail(&self, target: &DeploymentTarget) -> Result<Vec<String>> {
        let tail = target.tail_lines.to_string();
        let output = self
            .runner
            .run("docker", &["logs", "--tail", &tail, &target.container])
            .await
            .context("docker logs")?;
        ensure_success(&output, "docker logs")?;

        // The container's stderr comes back on ours; readiness lines may be on either.
        let mut lines: Vec<String> = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_string)
            .collect();
        lines.extend(
            String::from_utf8_lossy(&output.stderr)
                .lines()
                .map(str::to_string),
        );
        Ok(lines)
    }
}

impl<R: CommandRunner> UserDirectory for DockerCli<R> {
    async fn list_users(&self) -> Result<BTreeSet<Identity>> {
        let args = self.user_args(&["list"]);
        let output = self
            .runner
            .run("docker", &args)
            .await
            .context("listing users")?;
        ensure_success(&output, "user list")?;
        Ok(identities_in(&String::from_utf8_lossy(&output.stdout)))
    }

    async fn create_user(&self, account: &Account) -> Result<()> {
        let flags = account.create_flags();
        let mut tail = vec!["add"];
        tail.extend(flags.iter().map(String::as_str));
        let args = self.user_args(&tail);

        let output = self
            .runner
            .run("docker", &args)
            .await
            .context("creating user")?;
        debug!(
            identity = %account.identity,
            status = ?output.status,
            stdout = %scrub(&output.stdout, &account.password),
            stderr = %scrub(&output.stderr, &account.password),
            "user add finished"
        );
        if !output.status.success() {
            return Err(ProvisionError::CreateFailed {
                identity: account.identity.to_string(),
                code: output
                    .status
                    .code()
                    .map_or_else(|| "signal".to_string(), |c| c.to_string()),
                hint: format!("docker logs --tail 50 {}", self.container),
            }
            .into());
        }
        Ok(())
    }
}
