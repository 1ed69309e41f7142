//! Application service: upsert a fixed block of keys into the stack's env file.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{EnvFileStore, ProgressReporter};
use crate::domain::env_file::EnvVar;

/// Load `path`, upsert every pair of `patch`, and write the file back once.
///
/// The write is skipped when nothing changed, so re-running is a no-op.
/// Returns the number of keys whose value changed.
///
/// # Errors
///
/// Returns an error if the file cannot be read or written, or a pair is
/// invalid (in which case nothing is written).
pub async fn patch_env_file(
    store: &impl EnvFileStore,
    reporter: &impl ProgressReporter,
    path: &Path,
    patch: &[EnvVar],
) -> Result<usize> {
    reporter.step(&format!("patching {}...", path.display()));
    let mut env = store.load(path).await?;
    let changed = env
        .apply(patch)
        .with_context(|| format!("patching {}", path.display()))?;

    if changed == 0 {
        reporter.success(&format!("{} already up to date", path.display()));
        return Ok(0);
    }

    store.save(path, &env).await?;
    reporter.success(&format!("{} updated ({changed} keys)", path.display()));
    Ok(changed)
}
