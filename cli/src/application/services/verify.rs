//! Application service: check that the admin account can log in.

use anyhow::{Context, Result};

use crate::application::ports::{AuthProbe, ProgressReporter};
use crate::domain::endpoint::rest_url;
use crate::domain::user::Identity;

/// Authenticate against the REST API of `host`.
///
/// `host` accepts the same forms as [`rest_url`].
///
/// # Errors
///
/// Returns an error if the server cannot be reached or rejects the
/// credentials.
pub async fn verify_login(
    probe: &impl AuthProbe,
    reporter: &impl ProgressReporter,
    host: &str,
    identity: &Identity,
    password: &str,
) -> Result<()> {
    let url = rest_url(host);
    reporter.step(&format!("authenticating {identity} against {url}..."));
    let accepted = probe
        .authenticate(&url, identity, password)
        .await
        .with_context(|| format!("contacting {url}"))?;
    if !accepted {
        anyhow::bail!("{url} rejected the credentials for {identity}");
    }
    reporter.success(&format!("{identity} can log in"));
    Ok(())
}
