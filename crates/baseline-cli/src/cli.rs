use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the `baseline` tool
#[derive(Debug, Parser)]
#[command(name = "baseline")]
#[command(about = "Resolve commit baselines for performance tests", long_about = None)]
pub struct Cli {
    /// Log at debug level (overridden by `RUST_LOG`)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Determine the commit baseline for the current branch
    Determine {
        #[arg(short, long, default_value = ".", help = "Project root directory")]
        project: PathBuf,

        #[arg(short, long, help = "Current branch name (defaults to $BRANCH_NAME)")]
        branch: Option<String>,

        #[arg(long, help = "Baselines to set on every performance test")]
        baselines: Option<String>,

        #[arg(short, long, help = "Configuration file to use instead of discovery")]
        config: Option<PathBuf>,

        #[arg(long, help = "Do not fetch the upstream branches first")]
        no_fetch: bool,

        #[arg(long, help = "Print the outcome as JSON")]
        json: bool,
    },

    /// Reverse the contents of every source file into an output directory
    ReverseFiles {
        #[arg(short, long = "source", required = true, help = "Source file or directory")]
        sources: Vec<PathBuf>,

        #[arg(short, long, help = "Directory receiving the reversed files")]
        output: PathBuf,

        #[arg(short, long, help = "Maximum concurrent work items [default: CPU count]")]
        workers: Option<usize>,
    },
}
