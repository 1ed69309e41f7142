//! Application service: prepare the host: packages, docker service, group.
//!
//! Every step is fail-fast: the first error aborts the sequence.

use anyhow::{Context, Result};

use crate::application::ports::{PackageManager, ProgressReporter, ServiceManager};
use crate::domain::config::HostConfig;

/// Options for [`setup_host`].
pub struct HostSetupOptions<'a> {
    pub host: &'a HostConfig,
    /// Account added to the `docker` group; skipped when `None`.
    pub operator: Option<&'a str>,
}

/// Install packages, start docker, and let the operator use it without sudo.
///
/// # Errors
///
/// Returns the first failing step's error, with context naming the step.
pub async fn setup_host(
    packages: &impl PackageManager,
    services: &impl ServiceManager,
    reporter: &impl ProgressReporter,
    opts: HostSetupOptions<'_>,
) -> Result<()> {
    let HostSetupOptions { host, operator } = opts;

    reporter.step("refreshing package index...");
    packages.refresh().await.context("refreshing package index")?;

    reporter.step("upgrading installed packages...");
    packages.upgrade().await.context("upgrading packages")?;

    reporter.step(&format!("installing {}...", host.packages.join(" ")));
    packages
        .install(&host.packages)
        .await
        .context("installing packages")?;

    if host.install_vscode {
        reporter.step("installing VS Code...");
        packages
            .install_snap("code")
            .await
            .context("installing VS Code")?;
    }

    reporter.step("enabling docker service...");
    services
        .enable_now("docker")
        .await
        .context("enabling docker service")?;

    match operator {
        Some(user) if user != "root" => {
            services
                .add_to_group(user, "docker")
                .await
                .with_context(|| format!("adding {user} to the docker group"))?;
            reporter.warn(&format!(
                "{user} was added to the docker group; log out and back in for it to apply"
            ));
        }
        _ => {}
    }

    reporter.success("host ready");
    Ok(())
}
