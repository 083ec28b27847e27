use std::path::{Path, PathBuf};

use audiobook_tools::classify::{Classification, classify, direct_audio_files, subdirectories};
use audiobook_tools::get_relative_path_or_filename;
use audiobook_tools::moves::{MoveLog, PlannedMove, execute_moves, remove_empty_directories};
use audiobook_tools::normalize::target_name;

use crate::ReorganizeArgs;
use crate::config::Config;
use crate::logger::RunLog;

pub struct Reorganize {
    root: PathBuf,
    config: Config,
}

impl Reorganize {
    pub fn new(args: ReorganizeArgs) -> anyhow::Result<Self> {
        let root = audiobook_tools::resolve_input_path(args.path.as_deref())?;
        let config = Config::from_args(args);
        Ok(Self { root, config })
    }

    /// Flatten the library: scan for classified directories, plan one move
    /// per book or per split-off work, execute, then sweep empty directories.
    pub fn run(&self) -> anyhow::Result<()> {
        let mut log = RunLog::new(self.config.verbose, self.config.log_file.as_deref())?;
        log.info(&format!("Scanning library at: {}", self.root.display()));

        let mut book_dirs = Vec::new();
        let mut multi_work_dirs = Vec::new();
        self.scan_directory(&self.root, &mut book_dirs, &mut multi_work_dirs, &mut log);

        let moves = self.plan_moves(&book_dirs, &multi_work_dirs);
        log.info(&format!("Planned operations: {}", moves.len()));
        if moves.is_empty() {
            log.info("Nothing to reorganize.");
            return Ok(());
        }

        let stats = execute_moves(&moves, &self.root, self.config.dryrun, &mut log);

        if self.config.dryrun {
            log.info(&format!(
                "Dry run complete. {} operation(s) would be performed.",
                moves.len()
            ));
        } else {
            log.info("Cleaning up empty directories...");
            remove_empty_directories(&self.root);
            log.info(&format!(
                "Moved {} item(s), {} skipped, {} failed",
                stats.moved, stats.skipped, stats.failed
            ));
        }
        Ok(())
    }

    /// Walk the tree depth first, collecting classified directories.
    ///
    /// A directory claimed as a book or multi-work container becomes a leaf:
    /// its children are never visited, regardless of actual depth.
    fn scan_directory(
        &self,
        path: &Path,
        book_dirs: &mut Vec<PathBuf>,
        multi_work_dirs: &mut Vec<PathBuf>,
        log: &mut RunLog,
    ) {
        for subdir in subdirectories(path) {
            let relative = get_relative_path_or_filename(&subdir, &self.root);
            match classify(&subdir) {
                Classification::MultiWorkContainer if self.config.split => {
                    log.debug(&format!("Found multi-work directory: {relative}"));
                    multi_work_dirs.push(subdir);
                }
                Classification::SingleBook | Classification::MultiDiscBook => {
                    log.debug(&format!("Found book directory: {relative}"));
                    book_dirs.push(subdir);
                }
                _ => self.scan_directory(&subdir, book_dirs, multi_work_dirs, log),
            }
        }
    }

    /// Compute every destination before anything moves.
    ///
    /// Multi-work containers contribute one file move per audio file, each to
    /// its own target folder. Book directories move whole, skipped when the
    /// source already matches the destination.
    fn plan_moves(&self, book_dirs: &[PathBuf], multi_work_dirs: &[PathBuf]) -> Vec<PlannedMove> {
        let mut moves = Vec::new();

        for container in multi_work_dirs {
            let relative = get_relative_path_or_filename(container, &self.root);
            for file_name in direct_audio_files(container) {
                let target_dir = self.root.join(target_name(&relative, None, Some(&file_name)));
                moves.push(PlannedMove::file(container.join(&file_name), target_dir.join(&file_name)));
            }
        }

        for book in book_dirs {
            let relative = get_relative_path_or_filename(book, &self.root);
            let destination = self.root.join(target_name(&relative, None, None));
            if *book == destination {
                continue;
            }
            moves.push(PlannedMove::directory(book.clone(), destination));
        }

        moves
    }
}
