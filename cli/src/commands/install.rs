//! `silex-deploy install`: provision the host and deploy the stack.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::{AppContext, operator_account};
use crate::application::services::install::{InstallOptions, InstallOutcome, install};
use crate::domain::config::DeployConfig;
use crate::domain::endpoint::{app_url, rest_url};
use crate::domain::user::ProvisionOutcome;
use crate::infra::clock::TokioSleeper;
use crate::infra::docker::DockerCli;
use crate::infra::env_store::FsEnvFileStore;
use crate::infra::host::DebianHost;
use crate::output::{OutputContext, TerminalReporter};

/// Env var holding the registry password for `stack.registry`.
pub const REGISTRY_PASSWORD_ENV: &str = "SILEX_REGISTRY_PASSWORD";

/// Arguments for the install command.
#[derive(Args, Default)]
pub struct InstallArgs {
    /// Skip package installation and docker service setup
    #[arg(long)]
    pub skip_host_setup: bool,

    /// Also install VS Code
    #[arg(long)]
    pub vscode: bool,

    /// Build images before starting the stack
    #[arg(long)]
    pub build: bool,
}

/// Run the install command.
///
/// # Errors
///
/// Returns an error if configuration is invalid, any setup step fails, or
/// the admin account cannot be created (after the access summary is printed).
pub async fn run(app: &AppContext, args: &InstallArgs) -> Result<ExitCode> {
    let mut config = app.config()?;
    config.host.install_vscode |= args.vscode;
    config.stack.build |= args.build;

    let prompt = format!(
        "Deploy {} from {}? This restarts the stack",
        config.stack.container,
        config.stack.project_dir.display()
    );
    if !app.confirm(&prompt, true)? {
        app.output.warn("aborted");
        return Ok(ExitCode::SUCCESS);
    }

    let host = DebianHost::default_runner().await?;
    let docker = DockerCli::default_runner(&config.stack);
    let env_store = FsEnvFileStore::with_backup();
    let reporter = TerminalReporter::new(&app.output);
    let operator = operator_account();
    let registry_password = std::env::var(REGISTRY_PASSWORD_ENV)
        .ok()
        .filter(|p| !p.is_empty());

    let outcome = install(
        &host,
        &host,
        &docker,
        &docker,
        &env_store,
        &TokioSleeper,
        &reporter,
        InstallOptions {
            config: &config,
            skip_host_setup: args.skip_host_setup,
            operator: operator.as_deref(),
            registry_password: registry_password.as_deref(),
        },
    )
    .await?;

    match outcome {
        InstallOutcome::Ready { user, .. } => print_summary(&app.output, &config, Some(user)),
        InstallOutcome::UserFailed { reason, .. } => {
            print_summary(&app.output, &config, None);
            anyhow::bail!("{reason}");
        }
        InstallOutcome::NotReady { .. } => {
            app.output.info(
                "the stack may still become healthy; re-run `silex-deploy wait` and `silex-deploy user` later",
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Print where to reach the deployment and who can log in.
///
/// `user` is `None` when provisioning the admin account failed.
pub fn print_summary(out: &OutputContext, config: &DeployConfig, user: Option<ProvisionOutcome>) {
    let host = &config.host.public_host;
    let admin = match user {
        Some(ProvisionOutcome::Created) => format!("{} (created)", config.admin.email),
        Some(ProvisionOutcome::AlreadyExists) => format!("{} (existing)", config.admin.email),
        None => format!("{} (not created)", config.admin.email),
    };
    out.header("OpenSILEX is up");
    out.kv("Web UI   ", &app_url(host));
    out.kv("REST API ", &rest_url(host));
    out.kv("Admin    ", &admin);
    out.kv("Logs     ", &config.target().diagnostic_command());
}
