mod config;
mod merge;

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use crate::merge::MergeParts;

#[derive(Parser)]
#[command(author, version, name = env!("CARGO_BIN_NAME"), about = "Merge split audiobook part folders into single folders")]
struct MergePartsArgs {
    /// Optional input directory
    #[arg(value_hint = clap::ValueHint::DirPath)]
    path: Option<PathBuf>,

    /// Only print planned merges without moving files
    #[arg(short = 'd', long = "dry-run")]
    dryrun: bool,

    /// Generate shell completion
    #[arg(short = 'l', long, name = "SHELL")]
    completion: Option<Shell>,

    /// Print verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = MergePartsArgs::parse();
    if let Some(ref shell) = args.completion {
        audiobook_tools::generate_shell_completion(*shell, MergePartsArgs::command(), true, env!("CARGO_BIN_NAME"))
    } else {
        MergeParts::new(args)?.run()
    }
}
