//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, OutputFlags};
use crate::commands;

/// Provision a Debian host and deploy the OpenSILEX stack
#[derive(Parser)]
#[command(name = "silex-deploy", version, propagate_version = true)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output (NO_COLOR is honoured as well)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Skip confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Config file (default: $SILEX_DEPLOY_CONFIG or ~/.silex-deploy/config.yaml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Defaults to `install` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Set up the host, deploy the stack, wait for it and create the admin user
    Install(commands::install::InstallArgs),

    /// Wait for the application container to report ready
    Wait(commands::wait::WaitArgs),

    /// Create the admin user unless it already exists
    User,

    /// Apply the theme patch to the stack's env file
    Env(commands::env::EnvArgs),

    /// Check that the admin user can log in over the REST API
    Verify(commands::verify::VerifyArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            quiet,
            no_color,
            yes,
            config,
            command,
        } = self;
        let app = AppContext::new(AppFlags {
            output: OutputFlags { no_color, quiet },
            yes,
            config,
        });

        match command.unwrap_or_else(|| Command::Install(commands::install::InstallArgs::default())) {
            Command::Install(args) => commands::install::run(&app, &args).await,
            Command::Wait(args) => commands::wait::run(&app, &args).await,
            Command::User => commands::user::run(&app).await,
            Command::Env(args) => commands::env::run(&app, &args).await,
            Command::Verify(args) => commands::verify::run(&app, &args).await,
            Command::Config(cmd) => commands::config::run(&app, &cmd),
            Command::Version => {
                commands::version::run();
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}
