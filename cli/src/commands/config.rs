//! `silex-deploy config`: inspect the effective configuration.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (password masked)
    Show,
    /// Print the config file path
    Path,
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded.
pub fn run(app: &AppContext, cmd: &ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show => {
            let config = app.config_store.load()?;
            let yaml = serde_yaml::to_string(&config.redacted()).context("cannot serialize config")?;
            print!("{yaml}");
        }
        ConfigCommand::Path => {
            println!("{}", app.config_store.path()?.display());
        }
    }
    Ok(ExitCode::SUCCESS)
}
