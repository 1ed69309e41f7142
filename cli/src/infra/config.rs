//! Infrastructure implementation of the `ConfigStore` port.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::config::DeployConfig;

/// Env var naming an alternative config file.
pub const CONFIG_ENV: &str = "SILEX_DEPLOY_CONFIG";

/// Env var overriding `admin.password`.
pub const ADMIN_PASSWORD_ENV: &str = "SILEX_ADMIN_PASSWORD";

/// Production implementation of `ConfigStore` that reads a YAML file on disk.
///
/// Lookup order: explicit path, `SILEX_DEPLOY_CONFIG`,
/// `~/.silex-deploy/config.yaml`.
#[derive(Default)]
pub struct YamlConfigStore {
    explicit: Option<PathBuf>,
}

impl YamlConfigStore {
    #[must_use]
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self { explicit }
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<DeployConfig> {
        let path = self.path()?;
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            serde_yaml::from_str(&content)
                .with_context(|| format!("cannot parse {}", path.display()))?
        } else {
            if self.explicit.is_some() {
                anyhow::bail!("config file {} does not exist", path.display());
            }
            DeployConfig::default()
        };

        if let Ok(password) = std::env::var(ADMIN_PASSWORD_ENV) {
            if !password.is_empty() {
                config.admin.password = password;
            }
        }
        Ok(config)
    }

    fn path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.explicit {
            return Ok(path.clone());
        }
        if let Ok(val) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(val));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".silex-deploy").join("config.yaml"))
    }
}
