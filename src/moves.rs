//! Planned move execution with conflict checks.
//!
//! Planning and execution are separate phases: every destination is computed
//! up front, then validated again at execution time since earlier moves in
//! the same run may have changed the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::{get_relative_path_or_filename, insert_suffix_before_extension, path_to_filename_string};

/// A single move operation computed during planning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub is_file: bool,
    /// Distinguishing remainder of the source folder name, like "Part 2".
    /// When set, a colliding destination file is renamed by appending it in
    /// parentheses before the extension instead of skipping the move.
    pub part_id: Option<String>,
}

impl PlannedMove {
    /// Plan a file move into a destination directory that may not exist yet.
    #[must_use]
    pub const fn file(source: PathBuf, destination: PathBuf) -> Self {
        Self {
            source,
            destination,
            is_file: true,
            part_id: None,
        }
    }

    /// Plan a file move with a part id for collision renaming.
    #[must_use]
    pub const fn file_with_part_id(source: PathBuf, destination: PathBuf, part_id: String) -> Self {
        Self {
            source,
            destination,
            is_file: true,
            part_id: Some(part_id),
        }
    }

    /// Plan a whole-directory move.
    #[must_use]
    pub const fn directory(source: PathBuf, destination: PathBuf) -> Self {
        Self {
            source,
            destination,
            is_file: false,
            part_id: None,
        }
    }
}

/// Tally of executed, skipped, and failed moves for the final report.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MoveStats {
    pub moved: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Leveled sink for move reporting, scoped to one CLI invocation.
pub trait MoveLog {
    fn info(&mut self, message: &str);
    fn warn(&mut self, message: &str);
    fn error(&mut self, message: &str);
    fn debug(&mut self, message: &str);
}

/// Console logger: info to stdout, warnings and errors colored to stderr,
/// debug detail only when verbose.
#[derive(Debug, Default)]
pub struct ConsoleLog {
    pub verbose: bool,
}

impl ConsoleLog {
    #[must_use]
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl MoveLog for ConsoleLog {
    fn info(&mut self, message: &str) {
        println!("{message}");
    }

    fn warn(&mut self, message: &str) {
        crate::print_warning(message);
    }

    fn error(&mut self, message: &str) {
        crate::print_error(message);
    }

    fn debug(&mut self, message: &str) {
        if self.verbose {
            println!("{message}");
        }
    }
}

/// Execute planned moves, re-validating each destination at execution time.
///
/// Emits one `PLAN:` line per accepted move so a dry run and the planning
/// phase of a real run produce identical output. Collisions are resolved by
/// the part-id rename when available, otherwise the move is skipped with a
/// warning. Failures are reported per item and the rest of the plan
/// continues; no rollback is attempted.
pub fn execute_moves(moves: &[PlannedMove], root: &Path, dryrun: bool, log: &mut dyn MoveLog) -> MoveStats {
    let mut stats = MoveStats::default();

    for planned in moves {
        let source_rel = get_relative_path_or_filename(&planned.source, root);
        let mut destination = planned.destination.clone();

        if destination.exists() {
            if planned.source == destination {
                continue;
            }
            match resolve_collision(planned) {
                Some(renamed) => {
                    log.debug(&format!(
                        "Collision: renaming '{}' to '{}'",
                        path_to_filename_string(&destination),
                        path_to_filename_string(&renamed)
                    ));
                    destination = renamed;
                }
                None => {
                    let destination_rel = get_relative_path_or_filename(&destination, root);
                    log.warn(&format!(
                        "Conflict: target already exists: {destination_rel}. Skipping {source_rel}"
                    ));
                    stats.skipped += 1;
                    continue;
                }
            }
        }

        let destination_rel = get_relative_path_or_filename(&destination, root);
        log.info(&format!("PLAN: '{source_rel}' -> '{destination_rel}'"));

        if dryrun {
            continue;
        }

        if planned.is_file
            && let Some(parent) = destination.parent()
            && !parent.exists()
            && let Err(error) = fs::create_dir_all(parent)
        {
            log.error(&format!("Failed to create directory {}: {error}", parent.display()));
            stats.failed += 1;
            continue;
        }

        match fs::rename(&planned.source, &destination) {
            Ok(()) => stats.moved += 1,
            Err(error) => {
                log.error(&format!("Failed to move '{source_rel}': {error}"));
                stats.failed += 1;
            }
        }
    }

    stats
}

/// Resolve a destination collision with the part-id rename when possible.
///
/// Only file moves with a part id can be renamed; the renamed destination
/// must itself be free. Directory collisions are never merged or overwritten.
fn resolve_collision(planned: &PlannedMove) -> Option<PathBuf> {
    if !planned.is_file {
        return None;
    }
    let part_id = planned.part_id.as_deref()?;
    let renamed = insert_suffix_before_extension(&planned.destination, &format!(" ({part_id})"));
    if renamed.exists() { None } else { Some(renamed) }
}

/// Remove now-empty directories beneath the root, bottom up.
///
/// Removal failures are ignored: `remove_dir` refuses non-empty directories,
/// which is exactly the check needed for a best-effort sweep.
pub fn remove_empty_directories(root: &Path) {
    for entry in WalkDir::new(root)
        .min_depth(1)
        .contents_first(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_dir())
    {
        let _ = fs::remove_dir(entry.path());
    }
}
