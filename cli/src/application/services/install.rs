//! Application service: full install pipeline.
//!
//! Host setup → registry login → build → down → env patch → up → readiness
//! → admin user. Setup steps are fail-fast; a readiness timeout is reported
//! as an outcome and skips user provisioning. A failed user creation is an
//! outcome too, so the caller can still print where the stack runs.

use anyhow::{Context, Result};

use crate::application::ports::{
    ComposeStack, ContainerLogs, EnvFileStore, PackageManager, ProgressReporter, ServiceManager,
    Sleeper, UserDirectory,
};
use crate::application::services::env_patch::patch_env_file;
use crate::application::services::host_setup::{HostSetupOptions, setup_host};
use crate::application::services::readiness::{Probe, wait_ready};
use crate::application::services::user_provision::ensure_user;
use crate::domain::config::DeployConfig;
use crate::domain::readiness::ReadinessOutcome;
use crate::domain::user::ProvisionOutcome;

/// Inputs of [`install`] that are not ports.
pub struct InstallOptions<'a> {
    pub config: &'a DeployConfig,
    /// Skip package installation and docker service setup.
    pub skip_host_setup: bool,
    /// Account added to the `docker` group during host setup.
    pub operator: Option<&'a str>,
    /// Registry password, required when `stack.registry` is configured.
    pub registry_password: Option<&'a str>,
}

/// Outcome of the install pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The stack reported ready and the admin account is in place.
    Ready {
        readiness: ReadinessOutcome,
        user: ProvisionOutcome,
    },
    /// The stack is up but the admin account could not be provisioned.
    UserFailed {
        readiness: ReadinessOutcome,
        reason: String,
    },
    /// The stack did not report ready in time; no user was provisioned.
    NotReady { readiness: ReadinessOutcome },
}

/// Run the whole install pipeline.
///
/// # Errors
///
/// Returns the first failing setup step's error. A readiness timeout and a
/// user-provisioning failure are outcomes, not errors.
#[allow(clippy::too_many_arguments)]
pub async fn install(
    packages: &impl PackageManager,
    services: &impl ServiceManager,
    stack: &impl ComposeStack,
    containers: &(impl ContainerLogs + UserDirectory),
    env_store: &impl EnvFileStore,
    sleeper: &impl Sleeper,
    reporter: &impl ProgressReporter,
    opts: InstallOptions<'_>,
) -> Result<InstallOutcome> {
    let InstallOptions {
        config,
        skip_host_setup,
        operator,
        registry_password,
    } = opts;
    config.validate().context("invalid configuration")?;
    let account = config.account()?;
    let policy = config.readiness.policy()?;

    if skip_host_setup {
        reporter.warn("skipping host setup");
    } else {
        setup_host(
            packages,
            services,
            reporter,
            HostSetupOptions {
                host: &config.host,
                operator,
            },
        )
        .await?;
    }

    if let Some(registry) = &config.stack.registry {
        let password = registry_password.with_context(|| {
            format!(
                "stack.registry is set but SILEX_REGISTRY_PASSWORD is empty; cannot log in to {}",
                registry.server
            )
        })?;
        reporter.step(&format!("logging in to {}...", registry.server));
        stack
            .login(&registry.server, &registry.username, password)
            .await
            .with_context(|| format!("logging in to {}", registry.server))?;
    }

    if config.stack.build {
        reporter.step("building images...");
        stack.build().await.context("building images")?;
    }

    reporter.step("stopping stack...");
    stack.down().await.context("stopping stack")?;

    let env_path = config.stack.project_dir.join(&config.stack.env_file);
    patch_env_file(env_store, reporter, &env_path, &config.effective_env_patch()).await?;

    reporter.step("starting stack...");
    stack.up().await.context("starting stack")?;
    reporter.success("stack started");

    let target = config.target();
    reporter.step(&format!(
        "waiting for {} to report ready (up to {}s)...",
        target.container,
        policy.budget().as_secs()
    ));
    let readiness = wait_ready(
        containers,
        sleeper,
        Probe {
            target: &target,
            marker: &config.readiness.marker,
            policy,
        },
    )
    .await?;

    if !readiness.is_ready() {
        reporter.warn(&format!(
            "{} did not report ready after {} attempts ({}s)",
            target.container,
            readiness.attempts(),
            readiness.elapsed().as_secs()
        ));
        reporter.warn(&format!(
            "inspect the logs with: {}",
            target.diagnostic_command()
        ));
        return Ok(InstallOutcome::NotReady { readiness });
    }
    reporter.success(&format!(
        "{} ready after {} attempt(s)",
        target.container,
        readiness.attempts()
    ));

    match ensure_user(containers, reporter, &account).await {
        Ok(user) => Ok(InstallOutcome::Ready { readiness, user }),
        Err(e) => Ok(InstallOutcome::UserFailed {
            readiness,
            reason: format!("{e:#}"),
        }),
    }
}
