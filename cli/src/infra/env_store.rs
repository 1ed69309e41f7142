//! Filesystem implementation of the `EnvFileStore` port.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;

use crate::application::ports::EnvFileStore;
use crate::domain::env_file::EnvFile;

/// Reads and writes env files on the local filesystem.
///
/// Before the first overwrite of an existing file, a copy is kept next to it
/// as `<name>.bak-<UTC timestamp>`.
#[derive(Default)]
pub struct FsEnvFileStore {
    backup: bool,
}

impl FsEnvFileStore {
    #[must_use]
    pub fn with_backup() -> Self {
        Self { backup: true }
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let stamp = Utc::now().format("%Y%m%dT%H%M%SZ");
    let mut name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.push_str(&format!(".bak-{stamp}"));
    path.with_file_name(name)
}

impl EnvFileStore for FsEnvFileStore {
    async fn load(&self, path: &Path) -> Result<EnvFile> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(EnvFile::parse(&content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(EnvFile::default()),
            Err(e) => Err(e).with_context(|| format!("cannot read {}", path.display())),
        }
    }

    async fn save(&self, path: &Path, env: &EnvFile) -> Result<()> {
        if self.backup && tokio::fs::try_exists(path).await.unwrap_or(false) {
            let backup = backup_path(path);
            tokio::fs::copy(path, &backup)
                .await
                .with_context(|| format!("cannot back up {}", path.display()))?;
            tracing::debug!(backup = %backup.display(), "env file backed up");
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        tokio::fs::write(path, env.render())
            .await
            .with_context(|| format!("cannot write {}", path.display()))
    }
}
