//! Deploy configuration schema and validation.
//!
//! Pure types only, no I/O. Every field
//! defaults to the installer's built-in constants, so an empty YAML document
//! is a complete configuration.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::env_file::EnvVar;
use crate::domain::error::{ConfigError, ReadinessError};
use crate::domain::readiness::{
    DEFAULT_INTERVAL_SECS, DEFAULT_MAX_ATTEMPTS, DEFAULT_TAIL_LINES, DeploymentTarget, PollPolicy,
};
use crate::domain::user::{Account, Identity};

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.silex-deploy/config.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Compose project and container naming.
    pub stack: StackConfig,
    /// Readiness polling.
    pub readiness: ReadinessConfig,
    /// Admin account to provision.
    pub admin: AdminConfig,
    /// Lines upserted into the stack's env file.
    pub env_patch: Vec<EnvVar>,
    /// Host package setup.
    pub host: HostConfig,
}

/// Compose project settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    /// Directory holding the compose files.
    pub project_dir: PathBuf,
    /// Compose files, relative to `project_dir`.
    pub compose_files: Vec<String>,
    /// Env file, relative to `project_dir`.
    pub env_file: String,
    /// Application container whose logs signal readiness.
    pub container: String,
    /// Admin CLI inside the application container.
    pub admin_cli: String,
    /// Run `docker compose build` before starting.
    pub build: bool,
    /// Optional registry to log in to before building.
    pub registry: Option<RegistryConfig>,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("opensilex-docker-compose"),
            compose_files: vec!["docker-compose.yml".to_string()],
            env_file: ".env".to_string(),
            container: "opensilex-docker-opensilexapp".to_string(),
            admin_cli: "./bin/opensilex.sh".to_string(),
            build: false,
            registry: None,
        }
    }
}

/// Container registry credentials. The password is read from
/// `SILEX_REGISTRY_PASSWORD` and never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub server: String,
    pub username: String,
}

/// Readiness probe settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessConfig {
    /// Case-sensitive substring searched for in the container logs.
    pub marker: String,
    pub max_attempts: u32,
    /// Seconds between attempts.
    pub interval_secs: u64,
    pub tail_lines: u32,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            marker: "Server startup in".to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval_secs: DEFAULT_INTERVAL_SECS,
            tail_lines: DEFAULT_TAIL_LINES,
        }
    }
}

impl ReadinessConfig {
    /// # Errors
    ///
    /// Returns an error if `max_attempts` is 0.
    pub fn policy(&self) -> Result<PollPolicy, ReadinessError> {
        PollPolicy::new(self.max_attempts, Duration::from_secs(self.interval_secs))
    }
}

/// Admin account attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub email: String,
    pub admin: bool,
    pub lang: String,
    pub first_name: String,
    pub last_name: String,
    /// Overridden by `SILEX_ADMIN_PASSWORD` when set.
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            email: "admin@opensilex.org".to_string(),
            admin: true,
            lang: "fr".to_string(),
            first_name: "Admin".to_string(),
            last_name: "OpenSilex".to_string(),
            password: "admin".to_string(),
        }
    }
}

/// Host package setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Packages installed with the system package manager.
    pub packages: Vec<String>,
    /// Also install VS Code (snap `code --classic`).
    pub install_vscode: bool,
    /// Public host name or IP used in the printed access URLs.
    pub public_host: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            packages: [
                "ca-certificates",
                "curl",
                "git",
                "docker.io",
                "docker-compose-plugin",
            ]
            .map(str::to_string)
            .to_vec(),
            install_vscode: false,
            public_host: "localhost".to_string(),
        }
    }
}

/// Theme block applied to the env file when the config names none.
#[must_use]
pub fn default_env_patch() -> Vec<EnvVar> {
    vec![
        EnvVar::new("OPENSILEX_CONFIG_THEME", "opensilex-sandbox#sandbox"),
        EnvVar::new("THEME_PRIMARY_COLOR", "#00a38d"),
        EnvVar::new("THEME_SECONDARY_COLOR", "#212121"),
        EnvVar::new("THEME_LOGIN_BACKGROUND", "images/sandbox-login.jpg"),
        EnvVar::new("THEME_HEADER_LOGO", "images/sandbox-logo.png"),
    ]
}

impl DeployConfig {
    /// The configured patch, or [`default_env_patch`] when empty.
    #[must_use]
    pub fn effective_env_patch(&self) -> Vec<EnvVar> {
        if self.env_patch.is_empty() {
            default_env_patch()
        } else {
            self.env_patch.clone()
        }
    }

    #[must_use]
    pub fn target(&self) -> DeploymentTarget {
        DeploymentTarget {
            container: self.stack.container.clone(),
            tail_lines: self.readiness.tail_lines,
        }
    }

    /// Build the account to provision from the `admin` section.
    ///
    /// # Errors
    ///
    /// Returns an error if the email or language is invalid.
    pub fn account(&self) -> Result<Account> {
        let account = Account {
            identity: Identity::parse(&self.admin.email)?,
            admin: self.admin.admin,
            lang: self.admin.lang.clone(),
            first_name: self.admin.first_name.clone(),
            last_name: self.admin.last_name.clone(),
            password: self.admin.password.clone(),
        };
        account.validate()?;
        Ok(account)
    }

    /// Copy suitable for display: the admin password is masked.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.admin.password = "********".to_string();
        copy
    }

    /// Validate cross-field invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<()> {
        if self.stack.container.trim().is_empty() {
            return Err(ConfigError::EmptyField {
                field: "stack.container",
            }
            .into());
        }
        if self.stack.compose_files.is_empty() {
            return Err(ConfigError::EmptyField {
                field: "stack.compose_files",
            }
            .into());
        }
        if self.readiness.marker.is_empty() {
            return Err(ReadinessError::EmptyMarker.into());
        }
        if self.readiness.tail_lines == 0 {
            return Err(ConfigError::InvalidValue {
                field: "readiness.tail_lines",
                value: "0".to_string(),
            }
            .into());
        }
        self.readiness.policy()?;
        if self.admin.password.is_empty() {
            return Err(ConfigError::EmptyField {
                field: "admin.password",
            }
            .into());
        }
        self.account()?;
        Ok(())
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
