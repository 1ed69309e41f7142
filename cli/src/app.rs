//! State shared by every subcommand: terminal output, where the deploy
//! configuration comes from, and whether prompts are allowed.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::config::DeployConfig;
use crate::infra::config::YamlConfigStore;
use crate::output::OutputContext;

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    pub output: OutputFlags,
    /// Skip interactive prompts (also set by `CI` / `SILEX_YES` env vars).
    pub yes: bool,
    /// Explicit config file path.
    pub config: Option<PathBuf>,
}

/// Built once in `Cli::run()` and borrowed by each command.
pub struct AppContext {
    pub output: OutputContext,
    pub config_store: YamlConfigStore,
    /// Prompts answer their default without asking.
    pub non_interactive: bool,
}

impl AppContext {
    #[must_use]
    pub fn new(flags: AppFlags) -> Self {
        let unattended = ["CI", "SILEX_YES"]
            .iter()
            .any(|var| std::env::var_os(var).is_some());
        Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            config_store: YamlConfigStore::new(flags.config),
            non_interactive: flags.yes || unattended,
        }
    }

    /// Load and validate the deploy configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or fails
    /// validation.
    pub fn config(&self) -> Result<DeployConfig> {
        let config = self.config_store.load()?;
        config.validate()?;
        Ok(config)
    }

    /// Yes/no prompt; `default` is returned unasked under `--yes`, `CI` or
    /// `SILEX_YES`.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no terminal to prompt on.
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .context("confirmation prompt failed; pass --yes to run unattended")
    }
}

/// Account that should be allowed to run docker without sudo.
///
/// `SUDO_USER` wins over `USER` so `sudo silex-deploy` targets the caller.
#[must_use]
pub fn operator_account() -> Option<String> {
    ["SUDO_USER", "USER"]
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
}
