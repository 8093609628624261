//! Grocer CLI - plan meals from recipes and derive grocery lists
//!
//! Command-line front end for `grocer-core`.

mod app;
mod cli;
mod commands;
mod config;
mod errors;
mod logging;
mod output;

use clap::Parser;

use crate::app::AppContext;
use crate::cli::Cli;
use crate::errors::CliError;

fn run(cli: &Cli) -> anyhow::Result<()> {
    let ctx = AppContext::load(cli)?;
    logging::init(ctx.log_level());
    tracing::debug!(command = ?cli.command, "dispatching");
    commands::dispatch(&ctx, &cli.command)
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        tracing::debug!(error = ?err, "command failed");
        CliError::from_anyhow(&err).exit()
    }
}
