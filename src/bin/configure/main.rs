//! The `configure` driver.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use modconf::ops::{configure, ConfigureOptions, ConfigureOutcome};
use modconf::util::{Shell, SystemRunner};

mod cli;

use cli::Cli;

fn main() {
    let cli = Cli::parse();
    let shell = Arc::new(Shell::new(cli.verbosity(), cli.color));

    let filter =
        EnvFilter::try_from_env("CONFIGURE_LOG").unwrap_or_else(|_| EnvFilter::new("modconf=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    if let Err(e) = run(cli, Arc::clone(&shell)) {
        shell.error(format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(cli: Cli, shell: Arc<Shell>) -> Result<()> {
    let cwd = std::env::current_dir().context("failed to read the current directory")?;
    let src_dir = cli.src_dir.clone().unwrap_or_else(|| cwd.clone());

    let opts = ConfigureOptions::new(src_dir, cwd).args(cli.args);
    match configure(&opts, &mut SystemRunner, shell)? {
        ConfigureOutcome::Help(text) => print!("{}", text),
        ConfigureOutcome::Configured(summary) => {
            tracing::debug!(
                "configured {} modules, artifact changed: {}",
                summary.modules.len(),
                summary.artifact_changed
            );
        }
    }
    Ok(())
}
