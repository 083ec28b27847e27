use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use colored::Colorize;

use audiobook_tools::normalize::longest_common_prefix;
use audiobook_tools::{os_str_to_string, print_error, print_warning, resolve_input_path};

#[derive(Parser)]
#[command(
    author,
    version,
    name = env!("CARGO_BIN_NAME"),
    about = "Remove a common prefix from sibling directory names"
)]
struct Args {
    /// Optional input directory
    #[arg(value_hint = clap::ValueHint::DirPath)]
    path: Option<PathBuf>,

    /// Prefix to remove, auto-detected when not given
    #[arg(short, long, name = "PREFIX")]
    prefix: Option<String>,

    /// Apply the renames instead of the default dry run
    #[arg(short, long)]
    apply: bool,

    /// Generate shell completion
    #[arg(short = 'l', long, name = "SHELL")]
    completion: Option<Shell>,

    /// Print verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(ref shell) = args.completion {
        return audiobook_tools::generate_shell_completion(*shell, Args::command(), true, env!("CARGO_BIN_NAME"));
    }
    let root = resolve_input_path(args.path.as_deref())?;
    remove_prefix(&root, args.prefix.as_deref(), !args.apply, args.verbose);
    Ok(())
}

/// Strip a shared prefix from every directory name under the root.
///
/// With no explicit prefix, the longest common prefix of all sibling
/// directory names is detected and used. Names that would become empty and
/// destinations that already exist are skipped; everything else is renamed.
fn remove_prefix(root: &Path, prefix: Option<&str>, dryrun: bool, verbose: bool) {
    let names = collect_directory_names(root);
    if names.is_empty() {
        println!("No directories found in {}", root.display());
        return;
    }
    if verbose {
        println!("Considering {} directories", names.len());
    }

    let prefix = match prefix {
        Some(given) => given.to_string(),
        None => {
            let detected = longest_common_prefix(&names);
            if detected.is_empty() {
                println!("No common prefix found.");
                return;
            }
            detected
        }
    };

    println!("Prefix to remove: '{prefix}'");

    let to_rename: Vec<&String> = names.iter().filter(|name| name.starts_with(&prefix)).collect();
    if to_rename.is_empty() {
        println!("No items found with the specified prefix.");
        return;
    }

    println!("Found {} item(s) to rename.", to_rename.len());

    let mut renamed_count = 0usize;
    for old_name in to_rename {
        // Separator punctuation often remains after the prefix itself
        let new_name = old_name[prefix.len()..].trim_start_matches([' ', '-', '.']);

        if new_name.is_empty() {
            print_warning!("Skipping '{old_name}' because it would result in an empty name.");
            continue;
        }

        let new_path = root.join(new_name);
        if new_path.exists() {
            print_error!("Cannot rename '{old_name}' to '{new_name}' because the destination already exists.");
            continue;
        }

        println!("RENAME: '{old_name}' -> '{new_name}'");
        if !dryrun {
            match fs::rename(root.join(old_name), &new_path) {
                Ok(()) => renamed_count += 1,
                Err(error) => print_error!("Failed to rename '{old_name}': {error}"),
            }
        }
    }

    if dryrun {
        println!("Dry run complete. No changes were made. Run with --apply to rename.");
    } else {
        println!("{}", format!("Renamed {renamed_count} directories").green());
    }
}

/// Sorted names of directories directly inside the root.
/// An unreadable root contributes no entries.
fn collect_directory_names(root: &Path) -> Vec<String> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(error) => {
            print_error!("Failed to list directory {}: {error}", root.display());
            return Vec::new();
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|file_type| file_type.is_dir()))
        .map(|entry| os_str_to_string(&entry.file_name()))
        .collect();

    names.sort();
    names
}
