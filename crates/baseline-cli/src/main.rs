//! `baseline` - commit baseline resolution and file reversal from the command line
#![allow(clippy::print_stdout, reason = "Results are written to stdout")]

use anyhow::Result;
use clap::Parser as _;
use cli::{Cli, Commands};

mod cli;
mod handlers;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    handlers::init_logging(cli.verbose)?;

    match cli.command {
        Commands::Determine {
            project,
            branch,
            baselines,
            config,
            no_fetch,
            json,
        } => handlers::handle_determine(&handlers::DetermineArgs {
            project,
            branch,
            baselines,
            config,
            no_fetch,
            json,
        }),
        Commands::ReverseFiles {
            sources,
            output,
            workers,
        } => handlers::handle_reverse_files(sources, output, workers).await,
    }
}
