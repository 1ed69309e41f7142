//! `silex-deploy env`: apply the theme patch to the stack's env file.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::EnvFileStore;
use crate::application::services::env_patch::patch_env_file;
use crate::infra::env_store::FsEnvFileStore;
use crate::output::TerminalReporter;

/// Arguments for the env command.
#[derive(Args)]
pub struct EnvArgs {
    /// Print the patched file instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}

/// Run the env command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or written, or the patch is
/// invalid.
pub async fn run(app: &AppContext, args: &EnvArgs) -> Result<ExitCode> {
    let config = app.config()?;
    let path = config.stack.project_dir.join(&config.stack.env_file);
    let patch = config.effective_env_patch();
    let store = FsEnvFileStore::with_backup();

    if args.dry_run {
        let mut env = store.load(&path).await?;
        env.apply(&patch)?;
        print!("{}", env.render());
        return Ok(ExitCode::SUCCESS);
    }

    patch_env_file(&store, &TerminalReporter::new(&app.output), &path, &patch).await?;
    Ok(ExitCode::SUCCESS)
}
