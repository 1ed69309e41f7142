//! `silex-deploy wait`: poll the application logs for the readiness marker.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ComposeStack;
use crate::application::services::readiness::{Probe, wait_ready};
use crate::domain::readiness::{PollPolicy, ReadinessOutcome};
use crate::infra::clock::TokioSleeper;
use crate::infra::docker::DockerCli;
use crate::output::{Mark, progress};

/// Arguments for the wait command.
#[derive(Args)]
pub struct WaitArgs {
    /// Restart the stack before polling
    #[arg(long)]
    pub restart: bool,

    /// Override readiness.max_attempts
    #[arg(long)]
    pub attempts: Option<u32>,

    /// Override readiness.interval_secs
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,

    /// Override readiness.marker
    #[arg(long)]
    pub marker: Option<String>,
}

/// Run the wait command. A timeout prints guidance and still exits 0.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the restart fails.
pub async fn run(app: &AppContext, args: &WaitArgs) -> Result<ExitCode> {
    let config = app.config()?;
    let policy = PollPolicy::new(
        args.attempts.unwrap_or(config.readiness.max_attempts),
        Duration::from_secs(args.interval.unwrap_or(config.readiness.interval_secs)),
    )?;
    let marker = args.marker.as_deref().unwrap_or(&config.readiness.marker);
    let target = config.target();
    let docker = DockerCli::default_runner(&config.stack);

    if args.restart {
        app.output.step("restarting stack...");
        docker.restart().await?;
    }

    let message = format!(
        "waiting for {} to log {marker:?} (up to {}s)...",
        target.container,
        policy.budget().as_secs()
    );
    let pb = app.output.show_progress().then(|| progress::spinner(&message));
    if pb.is_none() {
        app.output.step(&message);
    }

    let outcome = wait_ready(
        &docker,
        &TokioSleeper,
        Probe {
            target: &target,
            marker,
            policy,
        },
    )
    .await?;

    match outcome {
        ReadinessOutcome::Ready { attempts, .. } => {
            let msg = format!("{} ready after {attempts} attempt(s)", target.container);
            match &pb {
                Some(pb) => progress::finish(pb, Mark::Success, &msg),
                None => app.output.success(&msg),
            }
        }
        ReadinessOutcome::TimedOut { attempts, elapsed } => {
            let msg = format!(
                "{} not ready after {attempts} attempts ({}s)",
                target.container,
                elapsed.as_secs()
            );
            match &pb {
                Some(pb) => progress::finish(pb, Mark::Warning, &msg),
                None => app.output.warn(&msg),
            }
            app.output
                .info(&format!("inspect the logs with: {}", target.diagnostic_command()));
        }
    }
    Ok(ExitCode::SUCCESS)
}
