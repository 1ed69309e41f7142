//! `silex-deploy verify`: check that the admin account can log in.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::verify::verify_login;
use crate::infra::auth::HttpAuthProbe;
use crate::output::TerminalReporter;

/// Arguments for the verify command.
#[derive(Args)]
pub struct VerifyArgs {
    /// Host, host:port or full REST URL (default: host.public_host)
    pub host: Option<String>,
}

/// Run the verify command.
///
/// # Errors
///
/// Returns an error if the server is unreachable or rejects the credentials.
pub async fn run(app: &AppContext, args: &VerifyArgs) -> Result<ExitCode> {
    let config = app.config()?;
    let account = config.account()?;
    let host = args.host.as_deref().unwrap_or(&config.host.public_host);

    verify_login(
        &HttpAuthProbe::default(),
        &TerminalReporter::new(&app.output),
        host,
        &account.identity,
        &account.password,
    )
    .await?;
    Ok(ExitCode::SUCCESS)
}
