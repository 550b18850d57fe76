//! `taskdeck` command-line front end.
//!
//! Resolves settings, opens the JSON store in the data directory, and runs
//! one command against the workspace services. Errors are reported with
//! their full context chain and a non-zero exit status.

mod app;
mod cli;
mod commands;
mod dates;
mod render;
mod session;

use anyhow::{Context, Result, anyhow};
use app::{App, AppClock};
use clap::Parser;
use cli::Cli;
use render::Renderer;
use taskdeck::config::Settings;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let settings = Settings::load(args.data_dir.as_deref()).context("load settings")?;
    init_tracing(args.log_level.as_deref().unwrap_or(&settings.log_level))?;
    debug!(data_dir = %settings.data_dir, "resolved settings");

    let app = App::open(&settings, AppClock::from_override(args.now), args.workspace)?;
    let stdout = std::io::stdout();
    let mut renderer = Renderer::new(stdout.lock(), app.offset);
    commands::run(&app, args.command, &mut renderer).await
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}
