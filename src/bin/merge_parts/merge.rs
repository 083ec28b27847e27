use std::fs;
use std::path::{Path, PathBuf};

use colored::Colorize;

use audiobook_tools::moves::{ConsoleLog, MoveStats, PlannedMove, execute_moves};
use audiobook_tools::normalize::group_by_base_name;
use audiobook_tools::{is_directory_empty, path_to_filename_string, print_bold, print_error, print_warning};

use crate::MergePartsArgs;
use crate::config::Config;

#[derive(Debug)]
pub struct MergeParts {
    root: PathBuf,
    config: Config,
}

impl MergeParts {
    pub fn new(args: MergePartsArgs) -> anyhow::Result<Self> {
        let root = audiobook_tools::resolve_input_path(args.path.as_deref())?;
        let config = Config::from_args(args);
        Ok(Self { root, config })
    }

    /// Group sibling folders by base title and merge each group's contents
    /// into one folder named after the base.
    pub fn run(&self) -> anyhow::Result<()> {
        let folders = self.collect_directories_in_root();
        let groups = group_by_base_name(&folders);
        if groups.is_empty() {
            println!("No split folder groups detected.");
            return Ok(());
        }

        print_bold!("Found {} group(s) to merge:\n", groups.len());

        let mut log = ConsoleLog::new(self.config.verbose);
        let mut totals = MoveStats::default();

        for (base, members) in &groups {
            println!("{} ({} parts)", format!("GROUP: '{base}'").cyan().bold(), members.len());
            totals = add_stats(totals, self.merge_group(base, members, &mut log));
            println!();
        }

        if self.config.dryrun {
            println!("Dry run complete. No files were moved.");
        } else {
            println!(
                "{}",
                format!(
                    "Moved {} item(s), {} skipped, {} failed",
                    totals.moved, totals.skipped, totals.failed
                )
                .green()
            );
        }
        Ok(())
    }

    /// Merge all members of one group into the target folder named after the base.
    fn merge_group(&self, base: &str, members: &[String], log: &mut ConsoleLog) -> MoveStats {
        let target_dir = self.root.join(base);
        let mut stats = MoveStats::default();

        for member in members {
            println!("  - MERGE: '{member}' -> '{base}'");
            if member == base {
                // Already named after the base, contents stay in place
                continue;
            }

            let member_path = self.root.join(member);
            let part_id = member
                .strip_prefix(base)
                .unwrap_or(member)
                .trim_matches([' ', '-', '_'])
                .to_string();

            let moves = plan_member_moves(&member_path, &target_dir, &part_id);

            if !self.config.dryrun
                && !target_dir.exists()
                && let Err(error) = fs::create_dir_all(&target_dir)
            {
                print_error!("Failed to create directory {}: {error}", target_dir.display());
                stats.failed += moves.len();
                continue;
            }

            stats = add_stats(stats, execute_moves(&moves, &self.root, self.config.dryrun, log));

            if !self.config.dryrun {
                self.remove_emptied_folder(&member_path, member);
            }
        }

        stats
    }

    /// Remove a merged source folder, leaving it in place when items remain.
    fn remove_emptied_folder(&self, member_path: &Path, member: &str) {
        if is_directory_empty(member_path) {
            if let Err(error) = fs::remove_dir(member_path) {
                print_warning!("Failed to remove emptied folder '{member}': {error}");
            }
        } else {
            print_warning!("Leaving non-empty folder: {member}");
        }
    }

    /// Names of directories directly inside the root.
    /// An unreadable root contributes no entries.
    fn collect_directories_in_root(&self) -> Vec<String> {
        match fs::read_dir(&self.root) {
            Ok(entries) => entries
                .filter_map(Result::ok)
                .filter(|entry| entry.file_type().is_ok_and(|file_type| file_type.is_dir()))
                .filter_map(|entry| audiobook_tools::get_normalized_dir_name(&entry.path()).ok())
                .collect(),
            Err(error) => {
                print_error!("Failed to list directory {}: {error}", self.root.display());
                Vec::new()
            }
        }
    }
}

/// Plan moving every direct child of a member folder into the target folder.
fn plan_member_moves(member_path: &Path, target_dir: &Path, part_id: &str) -> Vec<PlannedMove> {
    let entries = match fs::read_dir(member_path) {
        Ok(entries) => entries,
        Err(error) => {
            print_warning!("Failed to list directory {}: {error}", member_path.display());
            return Vec::new();
        }
    };

    let mut items: Vec<(PathBuf, bool)> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let is_file = entry.file_type().ok()?.is_file();
            Some((entry.path(), is_file))
        })
        .collect();

    items.sort();

    items
        .into_iter()
        .map(|(path, is_file)| {
            let destination = target_dir.join(path_to_filename_string(&path));
            if is_file {
                PlannedMove::file_with_part_id(path, destination, part_id.to_string())
            } else {
                PlannedMove::directory(path, destination)
            }
        })
        .collect()
}

const fn add_stats(total: MoveStats, stats: MoveStats) -> MoveStats {
    MoveStats {
        moved: total.moved + stats.moved,
        skipped: total.skipped + stats.skipped,
        failed: total.failed + stats.failed,
    }
}
