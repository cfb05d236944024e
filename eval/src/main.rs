mod batch;
mod cli;
mod config;
mod outcome;
mod results;
mod run;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "eval", version, about = "Batch evaluation harness for foresight")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    List,
    Run {
        batch_id: String,
        /// Runs executed in parallel.
        #[arg(long, default_value_t = 1)]
        workers: usize,
    },
}

fn main() -> Result<()> {
    foresight::logging::init();
    let cli = Cli::parse();
    let repo_root = std::env::current_dir()?;
    match cli.command {
        Command::List => cli::list_batches(&repo_root),
        Command::Run { batch_id, workers } => cli::run_batch_by_id(&repo_root, &batch_id, workers),
    }
}
