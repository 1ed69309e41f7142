//! `silex-deploy user`: create the admin account unless it exists.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::user_provision::ensure_user;
use crate::infra::docker::DockerCli;
use crate::output::TerminalReporter;

/// Run the user command against the running stack.
///
/// # Errors
///
/// Returns an error if the user listing or creation fails.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let config = app.config()?;
    let account = config.account()?;
    let docker = DockerCli::default_runner(&config.stack);
    let reporter = TerminalReporter::new(&app.output);

    ensure_user(&docker, &reporter, &account).await?;
    Ok(ExitCode::SUCCESS)
}
