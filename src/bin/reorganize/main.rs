mod config;
mod logger;
mod reorganize;

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use crate::reorganize::Reorganize;

#[derive(Parser)]
#[command(author, version, name = env!("CARGO_BIN_NAME"), about = "Flatten a nested audiobook library to a single level")]
struct ReorganizeArgs {
    /// Optional input directory
    #[arg(value_hint = clap::ValueHint::DirPath)]
    path: Option<PathBuf>,

    /// Only print planned operations without moving anything
    #[arg(short = 'd', long = "dry-run")]
    dryrun: bool,

    /// Split folders that contain multiple independent works
    #[arg(short, long)]
    split: bool,

    /// Write log output to the given file
    #[arg(short = 'f', long, name = "FILE", value_hint = clap::ValueHint::FilePath)]
    log_file: Option<PathBuf>,

    /// Generate shell completion
    #[arg(short = 'l', long, name = "SHELL")]
    completion: Option<Shell>,

    /// Print verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = ReorganizeArgs::parse();
    if let Some(ref shell) = args.completion {
        audiobook_tools::generate_shell_completion(*shell, ReorganizeArgs::command(), true, env!("CARGO_BIN_NAME"))
    } else {
        Reorganize::new(args)?.run()
    }
}
