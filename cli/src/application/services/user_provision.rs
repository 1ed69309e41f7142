//! Application service: create the admin account unless it already exists.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};
use tracing::info;

use crate::application::ports::{ProgressReporter, UserDirectory};
use crate::domain::user::{Account, ProvisionOutcome};

/// Ensure `account` exists, creating it at most once.
///
/// The user list is read live from the directory on every call. A listed
/// identity is a no-op success; otherwise exactly one creation call is made.
///
/// # Errors
///
/// Returns an error if the account is invalid, the listing fails, or the
/// creation command fails.
pub async fn ensure_user(
    directory: &impl UserDirectory,
    reporter: &impl ProgressReporter,
    account: &Account,
) -> Result<ProvisionOutcome> {
    account.validate()?;

    reporter.step(&format!("checking for user {}...", account.identity));
    let existing = directory.list_users().await.context("listing users")?;
    if existing.contains(&account.identity) {
        reporter.success(&format!("user {} already exists", account.identity));
        return Ok(ProvisionOutcome::AlreadyExists);
    }

    reporter.step(&format!("creating user {}...", account.identity));
    directory
        .create_user(account)
        .await
        .with_context(|| format!("creating user {}", account.identity))?;
    info!(identity = %account.identity, admin = account.admin, "user created");
    reporter.success(&format!("user {} created", account.identity));
    Ok(ProvisionOutcome::Created)
}
