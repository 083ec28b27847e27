//! Directory classification heuristics for audiobook folders.
//!
//! Decides whether a directory holds a single book, a multi-disc book,
//! or several unrelated works, based purely on file extensions and
//! filename patterns of its contents.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use walkdir::WalkDir;

use crate::{path_to_file_extension_string, path_to_filename_string};

/// Audio file extensions recognized by the classifier.
pub const AUDIO_EXTENSIONS: [&str; 20] = [
    "m4b", "mp3", "m4a", "flac", "opus", "ogg", "oga", "mp4", "aac", "wma", "aiff", "aif", "wav", "webm", "webma",
    "mka", "awb", "caf", "mpg", "mpeg",
];

/// Filenames starting with a track number or a part/disc marker.
static RE_NUMBERED_TRACK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d{1,3}|Part\s?\d+|Disc\s?\d+)\b").expect("Failed to compile numbered track regex")
});

/// Fraction of numbered audio files below which a folder counts as multi-work.
/// Sequentially numbered tracks belong to one book; a majority of unnumbered,
/// differently named files indicates several distinct works sharing a folder.
const MULTI_WORK_NUMBERED_THRESHOLD: f64 = 0.5;

/// Subdirectory name prefixes that mark the discs of a multi-disc book.
const DISC_DIR_PREFIXES: [&str; 3] = ["cd", "disc", "disk"];

/// Classification of a directory based on its immediate contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// One book with its audio files directly inside.
    SingleBook,
    /// One book with tracks split across CD/Disc/Disk subdirectories.
    MultiDiscBook,
    /// Several unrelated works sharing one folder.
    MultiWorkContainer,
    /// None of the above, for example an author or series folder.
    NotABook,
}

/// Check if the path has a recognized audio file extension.
#[must_use]
pub fn is_audio_file(path: &Path) -> bool {
    let extension = path_to_file_extension_string(path);
    AUDIO_EXTENSIONS.contains(&extension.as_str())
}

/// List immediate entries, treating an unreadable directory as empty.
fn read_entries(path: &Path) -> Vec<std::fs::DirEntry> {
    match std::fs::read_dir(path) {
        Ok(entries) => entries.filter_map(Result::ok).collect(),
        Err(error) => {
            crate::print_warning!("Failed to list directory {}: {error}", path.display());
            Vec::new()
        }
    }
}

/// Names of audio files directly inside the given directory.
#[must_use]
pub fn direct_audio_files(path: &Path) -> Vec<String> {
    let mut files: Vec<String> = read_entries(path)
        .into_iter()
        .filter(|entry| entry.file_type().is_ok_and(|file_type| file_type.is_file()))
        .map(|entry| entry.path())
        .filter(|path| is_audio_file(path))
        .map(|path| path_to_filename_string(&path))
        .collect();

    files.sort();
    files
}

/// Immediate subdirectories of the given directory, sorted for deterministic scans.
#[must_use]
pub fn subdirectories(path: &Path) -> Vec<PathBuf> {
    let mut subdirs: Vec<PathBuf> = read_entries(path)
        .into_iter()
        .filter(|entry| entry.file_type().is_ok_and(|file_type| file_type.is_dir()))
        .map(|entry| entry.path())
        .collect();

    subdirs.sort();
    subdirs
}

/// Check if any audio file exists anywhere beneath the given directory.
fn contains_audio(path: &Path) -> bool {
    WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
        .any(|entry| entry.file_type().is_file() && is_audio_file(entry.path()))
}

fn has_disc_prefix(name: &str) -> bool {
    let lower = name.to_lowercase();
    DISC_DIR_PREFIXES.iter().any(|prefix| lower.starts_with(prefix))
}

/// Check if a folder contains multiple independent works.
///
/// Needs at least two direct audio files. When fewer than half of them start
/// with a track number or a part/disc marker, the folder is assumed to hold
/// several distinct works rather than the sequential tracks of one book.
#[must_use]
pub fn is_multi_work_dir(path: &Path) -> bool {
    let audio_files = direct_audio_files(path);
    if audio_files.len() < 2 {
        return false;
    }

    let numbered_count = audio_files
        .iter()
        .filter(|name| RE_NUMBERED_TRACK.is_match(name))
        .count();

    (numbered_count as f64 / audio_files.len() as f64) < MULTI_WORK_NUMBERED_THRESHOLD
}

/// Check if a directory is a single book folder.
///
/// A folder with direct audio is a book unless it is a multi-work container
/// or hides deeper books inside non-disc subdirectories. A folder without
/// direct audio is a multi-disc book when every audio-bearing subdirectory
/// has a CD/Disc/Disk-prefixed name.
#[must_use]
pub fn is_book_dir(path: &Path) -> bool {
    let audio_files = direct_audio_files(path);
    let subdirs = subdirectories(path);

    if !audio_files.is_empty() {
        if is_multi_work_dir(path) {
            return false;
        }

        // A non-disc subdirectory with audio anywhere beneath it means
        // this folder is a container, not a book itself.
        for subdir in &subdirs {
            if !has_disc_prefix(&path_to_filename_string(subdir)) && contains_audio(subdir) {
                return false;
            }
        }
        return true;
    }

    if !subdirs.is_empty() {
        let audio_subdirs: Vec<&PathBuf> = subdirs.iter().filter(|subdir| contains_audio(subdir)).collect();
        if !audio_subdirs.is_empty()
            && audio_subdirs
                .iter()
                .all(|subdir| has_disc_prefix(&path_to_filename_string(subdir)))
        {
            return true;
        }
    }

    false
}

/// Classify a directory from its immediate contents.
#[must_use]
pub fn classify(path: &Path) -> Classification {
    if is_multi_work_dir(path) {
        return Classification::MultiWorkContainer;
    }
    if is_book_dir(path) {
        if direct_audio_files(path).is_empty() {
            Classification::MultiDiscBook
        } else {
            Classification::SingleBook
        }
    } else {
        Classification::NotABook
    }
}

#[cfg(test)]
mod classify_tests {
    use super::*;

    use std::fs::{File, create_dir_all};
    use std::path::Path;

    use tempfile::{TempDir, tempdir};

    fn create_files(dir: &Path, names: &[&str]) {
        for name in names {
            File::create(dir.join(name)).expect("Failed to create test file");
        }
    }

    fn book_dir(files: &[&str]) -> TempDir {
        let dir = tempdir().expect("Failed to create temp dir");
        create_files(dir.path(), files);
        dir
    }

    #[test]
    fn numbered_tracks_are_a_single_book() {
        let dir = book_dir(&["01.mp3", "02.mp3", "03.mp3"]);
        assert!(!is_multi_work_dir(dir.path()));
        assert!(is_book_dir(dir.path()));
        assert_eq!(classify(dir.path()), Classification::SingleBook);
    }

    #[test]
    fn part_prefixed_tracks_are_a_single_book() {
        let dir = book_dir(&["Part 1.mp3", "Part 2.mp3", "Part3.mp3"]);
        assert_eq!(classify(dir.path()), Classification::SingleBook);
    }

    #[test]
    fn unnumbered_files_are_a_multi_work_container() {
        let dir = book_dir(&["Intro.mp3", "RandomEssay.mp3", "Bonus.mp3"]);
        assert!(is_multi_work_dir(dir.path()));
        assert!(!is_book_dir(dir.path()));
        assert_eq!(classify(dir.path()), Classification::MultiWorkContainer);
    }

    #[test]
    fn exactly_half_numbered_is_still_a_book() {
        let dir = book_dir(&["01 Opening.mp3", "Closing.mp3"]);
        assert!(!is_multi_work_dir(dir.path()));
        assert_eq!(classify(dir.path()), Classification::SingleBook);
    }

    #[test]
    fn single_audio_file_is_never_multi_work() {
        let dir = book_dir(&["Lonely Essay.mp3"]);
        assert!(!is_multi_work_dir(dir.path()));
        assert_eq!(classify(dir.path()), Classification::SingleBook);
    }

    #[test]
    fn non_audio_files_are_ignored() {
        let dir = book_dir(&["01.mp3", "02.mp3", "cover.jpg", "info.nfo"]);
        assert_eq!(classify(dir.path()), Classification::SingleBook);
    }

    #[test]
    fn cd_subdirectories_make_a_multi_disc_book() {
        let dir = tempdir().expect("Failed to create temp dir");
        for disc in ["CD1", "CD2"] {
            let disc_dir = dir.path().join(disc);
            create_dir_all(&disc_dir).expect("Failed to create disc dir");
            create_files(&disc_dir, &["01.mp3", "02.mp3"]);
        }
        assert!(is_book_dir(dir.path()));
        assert_eq!(classify(dir.path()), Classification::MultiDiscBook);
    }

    #[test]
    fn audio_free_extras_do_not_break_multi_disc_detection() {
        let dir = tempdir().expect("Failed to create temp dir");
        for disc in ["CD1", "CD2"] {
            let disc_dir = dir.path().join(disc);
            create_dir_all(&disc_dir).expect("Failed to create disc dir");
            create_files(&disc_dir, &["01.mp3"]);
        }
        let extras = dir.path().join("Extras");
        create_dir_all(&extras).expect("Failed to create extras dir");
        create_files(&extras, &["booklet.pdf"]);

        assert!(is_book_dir(dir.path()));
        assert_eq!(classify(dir.path()), Classification::MultiDiscBook);
    }

    #[test]
    fn audio_bearing_non_disc_subdir_means_container() {
        let dir = tempdir().expect("Failed to create temp dir");
        let nested = dir.path().join("Sequel");
        create_dir_all(&nested).expect("Failed to create nested dir");
        create_files(dir.path(), &["01.mp3", "02.mp3"]);
        create_files(&nested, &["01.mp3"]);

        assert!(!is_book_dir(dir.path()));
        assert_eq!(classify(dir.path()), Classification::NotABook);
    }

    #[test]
    fn disc_subdirs_next_to_direct_audio_are_allowed() {
        let dir = tempdir().expect("Failed to create temp dir");
        let disc = dir.path().join("CD2");
        create_dir_all(&disc).expect("Failed to create disc dir");
        create_files(dir.path(), &["01.mp3", "02.mp3"]);
        create_files(&disc, &["01.mp3"]);

        assert!(is_book_dir(dir.path()));
        assert_eq!(classify(dir.path()), Classification::SingleBook);
    }

    #[test]
    fn mixed_subdirectory_names_are_not_a_book() {
        let dir = tempdir().expect("Failed to create temp dir");
        for name in ["CD1", "Bonus Stories"] {
            let subdir = dir.path().join(name);
            create_dir_all(&subdir).expect("Failed to create subdir");
            create_files(&subdir, &["01.mp3"]);
        }
        assert!(!is_book_dir(dir.path()));
        assert_eq!(classify(dir.path()), Classification::NotABook);
    }

    #[test]
    fn empty_directory_is_not_a_book() {
        let dir = tempdir().expect("Failed to create temp dir");
        assert!(!is_book_dir(dir.path()));
        assert!(!is_multi_work_dir(dir.path()));
        assert_eq!(classify(dir.path()), Classification::NotABook);
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        let dir = book_dir(&["01.MP3", "02.M4B"]);
        assert_eq!(classify(dir.path()), Classification::SingleBook);
    }
}
