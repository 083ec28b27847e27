//! Name normalization for audiobook folder and file names.
//!
//! Derives canonical base titles from decorated folder names,
//! cleans author and track names, and builds flat target names
//! for the library reorganization tools.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;

/// Trailing characters that are neither alphanumeric nor a closing bracket or paren.
static RE_TRAILING_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9\]\)]+$").expect("Failed to compile trailing separator regex"));

/// Ordered part/disc/track suffix patterns, applied repeatedly until nothing matches.
static PART_SUFFIX_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\s+Part\s?\d+$",
        r"(?i)\s+CD\s?\d+$",
        r"(?i)\s+Disc\s?\d+$",
        r"(?i)\s+Disk\s?\d+$",
        r"\s+\d+(?:-\d+)?$",
        r"\s+-\s+\d+(?:-\d+)?$",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("Failed to compile part suffix regex"))
    .collect()
});

/// Metadata in curly braces, for example `{11.8mb}`.
static RE_BRACED_METADATA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{.*?\}").expect("Failed to compile braced metadata regex"));

/// Metadata in parentheses, for example a narrator name.
static RE_PAREN_METADATA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*?\)").expect("Failed to compile paren metadata regex"));

/// Bitrate tokens like `32k` or `128kbps`.
static RE_BITRATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b\d{1,3}\s?k(?:bps)?\b").expect("Failed to compile bitrate regex"));

/// Duration tokens like `00.51.22` or `12:34`.
static RE_DURATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{1,2}[.:]\d{2}(?:[.:]\d{2})?\b").expect("Failed to compile duration regex"));

static RE_SPACED_DASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+-\s+").expect("Failed to compile spaced dash regex"));

static RE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Failed to compile whitespace regex"));

/// Suffixes stripped from author folder names.
const AUTHOR_SUFFIXES: [&str; 7] = [
    " Collection",
    " Anthology",
    " Series",
    " Books",
    " Works",
    " Complete",
    " (All Chaptered)",
];

/// Separator used between segments in flattened target names.
const SEGMENT_SEPARATOR: &str = " - ";

/// Derive the canonical base title of a decorated folder name.
///
/// Strips trailing separator characters and part/disc/track suffixes until a
/// fixed point, then resolves redundant title repetition like `Title - Title`:
/// if the last ` - `-separated segment repeats an earlier one, everything
/// after the earlier occurrence is discarded.
///
/// ```rust
/// use audiobook_tools::normalize::base_name;
///
/// assert_eq!(base_name("The Gunslinger Part 2"), "The Gunslinger");
/// assert_eq!(base_name("Dune CD3"), "Dune");
/// assert_eq!(base_name("The Hobbit - The Hobbit"), "The Hobbit");
/// ```
#[must_use]
pub fn base_name(name: &str) -> String {
    let mut base = RE_TRAILING_SEPARATORS.replace(name, "").trim().to_string();

    loop {
        let previous = base.clone();
        for pattern in PART_SUFFIX_PATTERNS.iter() {
            base = pattern.replace(&base, "").trim().to_string();
        }
        if base == previous {
            break;
        }
    }

    // Suffix removal can expose a dangling separator, like "Title -" after
    // stripping the number from "Title - 1356". Clean it so equal titles
    // with different decorations reduce to the same base.
    base = RE_TRAILING_SEPARATORS.replace(&base, "").trim().to_string();

    let parts: Vec<&str> = base
        .split(SEGMENT_SEPARATOR)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    if parts.len() > 1 {
        let last = parts[parts.len() - 1].to_lowercase();
        for (index, part) in parts.iter().take(parts.len() - 1).enumerate() {
            if part.to_lowercase() == last {
                return parts[..=index].join(SEGMENT_SEPARATOR);
            }
        }
    }

    base
}

/// Strip common collection suffixes from an author folder name.
///
/// ```rust
/// use audiobook_tools::normalize::clean_author_name;
///
/// assert_eq!(clean_author_name("Isaac Asimov Collection"), "Isaac Asimov");
/// assert_eq!(clean_author_name("Ursula K. Le Guin"), "Ursula K. Le Guin");
/// ```
#[must_use]
pub fn clean_author_name(name: &str) -> String {
    let mut clean = name.trim().to_string();
    for suffix in AUTHOR_SUFFIXES {
        if clean.len() >= suffix.len()
            && clean
                .get(clean.len() - suffix.len()..)
                .is_some_and(|tail| tail.eq_ignore_ascii_case(suffix))
        {
            clean.truncate(clean.len() - suffix.len());
            clean = clean.trim().to_string();
        }
    }
    clean
}

/// Clean a track title or filename by removing metadata decorations.
///
/// Drops the file extension, bracketed and parenthesized metadata,
/// bitrate and duration tokens, and normalizes separators.
///
/// ```rust
/// use audiobook_tools::normalize::clean_title;
///
/// assert_eq!(
///     clean_title("1997 - A Spy in Europa (Hauenstein) 32k 00.51.22.mp3"),
///     "1997 - A Spy in Europa"
/// );
/// ```
#[must_use]
pub fn clean_title(filename: &str) -> String {
    let base = Path::new(filename)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(filename);

    let base = RE_BRACED_METADATA.replace_all(base, "");
    let base = RE_PAREN_METADATA.replace_all(&base, "");
    let base = RE_BITRATE.replace_all(&base, "");
    let base = RE_DURATION.replace_all(&base, "");

    let base = base.replace('_', " ");
    let base = RE_SPACED_DASH.replace_all(base.trim(), SEGMENT_SEPARATOR);
    let base = RE_WHITESPACE.replace_all(&base, " ");

    base.trim_matches([' ', '-']).to_string()
}

/// Strip a leading case-insensitive author prefix plus separator punctuation from a segment.
fn strip_author_prefix<'a>(segment: &'a str, author: &str) -> &'a str {
    segment
        .get(..author.len())
        .filter(|prefix| prefix.eq_ignore_ascii_case(author))
        .map_or(segment, |_| segment[author.len()..].trim_matches([' ', '-', '_']))
}

/// Build a flat target name from a relative library path.
///
/// The first path segment provides the author (unless overridden), remaining
/// segments contribute series or title information with redundant author
/// prefixes stripped, and an optional item name is cleaned and appended when
/// splitting a multi-work folder. Adjacent segments that repeat each other
/// case-insensitively are collapsed, preferring the longer variant.
///
/// ```rust
/// use audiobook_tools::normalize::target_name;
///
/// assert_eq!(
///     target_name("Frank Herbert/Dune Saga/Dune", None, None),
///     "Frank Herbert - Dune Saga - Dune"
/// );
/// ```
#[must_use]
pub fn target_name(relative_path: &str, author_override: Option<&str>, item_name: Option<&str>) -> String {
    let normalized = relative_path.replace('\\', "/");
    let path_parts: Vec<&str> = normalized
        .split('/')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    let Some(first_part) = path_parts.first() else {
        return String::new();
    };

    let author = author_override.map_or_else(|| clean_author_name(first_part), ToString::to_string);

    let mut segments: Vec<String> = vec![author.clone()];

    for part in &path_parts[1..] {
        let clean_part = strip_author_prefix(part, &author);
        if !clean_part.is_empty() {
            segments.push(clean_part.to_string());
        }
    }

    if let Some(item) = item_name {
        let clean_item = clean_title(item);
        let clean_item = strip_author_prefix(&clean_item, &author);
        if !clean_item.is_empty() {
            segments.push(clean_item.to_string());
        }
    }

    let mut final_segments: Vec<String> = Vec::new();
    for segment in segments {
        let clean = segment.trim_matches([' ', '-', '_']);
        if clean.is_empty() {
            continue;
        }
        if let Some(previous) = final_segments.last() {
            let prev = previous.to_lowercase();
            let curr = clean.to_lowercase();
            if curr == prev || curr.starts_with(&prev) || prev.ends_with(&curr) {
                // Keep the more descriptive variant when the new segment extends the previous one
                if curr.len() > prev.len() && curr.starts_with(&prev) {
                    let last_index = final_segments.len() - 1;
                    final_segments[last_index] = clean.to_string();
                }
                continue;
            }
        }
        final_segments.push(clean.to_string());
    }

    final_segments.join(SEGMENT_SEPARATOR)
}

/// Group directory names by their derived base name.
///
/// Only groups with more than one member are returned, since a single-member
/// group means there is nothing to merge. Members are sorted and groups are
/// ordered by base name for deterministic processing.
#[must_use]
pub fn group_by_base_name(names: &[String]) -> Vec<(String, Vec<String>)> {
    let mut groups: HashMap<String, Vec<String>> = HashMap::new();
    for name in names {
        let base = base_name(name);
        if !base.is_empty() {
            groups.entry(base).or_default().push(name.clone());
        }
    }

    groups
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .map(|(base, members)| (base, members.into_iter().sorted().collect()))
        .sorted_by(|a, b| a.0.cmp(&b.0))
        .collect()
}

/// Get the longest common prefix shared by all given names.
///
/// Returns an empty string when the list is empty or nothing is shared.
#[must_use]
pub fn longest_common_prefix(names: &[String]) -> String {
    let Some(first) = names.first() else {
        return String::new();
    };
    let mut prefix = first.as_str();
    for name in &names[1..] {
        while !name.starts_with(prefix) {
            let mut chars = prefix.chars();
            chars.next_back();
            prefix = chars.as_str();
            if prefix.is_empty() {
                return String::new();
            }
        }
    }
    prefix.to_string()
}


#[cfg(test)]
mod clean_author_name_tests {
    use super::*;

    #[test]
    fn strips_collection_suffixes() {
        assert_eq!(clean_author_name("Isaac Asimov Collection"), "Isaac Asimov");
        assert_eq!(clean_author_name("Isaac Asimov Anthology"), "Isaac Asimov");
        assert_eq!(clean_author_name("Discworld Series"), "Discworld");
        assert_eq!(clean_author_name("Terry Pratchett Books"), "Terry Pratchett");
        assert_eq!(clean_author_name("H.P. Lovecraft Works"), "H.P. Lovecraft");
        assert_eq!(clean_author_name("Sherlock Holmes Complete"), "Sherlock Holmes");
        assert_eq!(clean_author_name("Dan Simmons (All Chaptered)"), "Dan Simmons");
    }

    #[test]
    fn is_case_insensitive() {
        assert_eq!(clean_author_name("Isaac Asimov COLLECTION"), "Isaac Asimov");
        assert_eq!(clean_author_name("isaac asimov collection"), "isaac asimov");
    }

    #[test]
    fn leaves_plain_names_untouched() {
        assert_eq!(clean_author_name("Ursula K. Le Guin"), "Ursula K. Le Guin");
        assert_eq!(clean_author_name("  Frank Herbert  "), "Frank Herbert");
    }
}

#[cfg(test)]
mod clean_title_tests {
    use super::*;

    #[test]
    fn drops_extension_and_metadata() {
        assert_eq!(
            clean_title("1997 - A Spy in Europa (Hauenstein) 32k 00.51.22.mp3"),
            "1997 - A Spy in Europa"
        );
    }

    #[test]
    fn removes_braced_metadata() {
        assert_eq!(clean_title("Track One {notes}.mp3"), "Track One");
    }

    #[test]
    fn removes_bitrate_tokens() {
        assert_eq!(clean_title("Story 128kbps.mp3"), "Story");
        assert_eq!(clean_title("Story 64 k.mp3"), "Story");
        assert_eq!(clean_title("Story 1000k.mp3"), "Story 1000k");
    }

    #[test]
    fn removes_duration_tokens() {
        assert_eq!(clean_title("Story 12:34.mp3"), "Story");
        assert_eq!(clean_title("Story 1.23.45.mp3"), "Story");
    }

    #[test]
    fn replaces_underscores_and_collapses_whitespace() {
        assert_eq!(clean_title("Some_Long_Story.mp3"), "Some Long Story");
        assert_eq!(clean_title("Spaced   -   Out.mp3"), "Spaced - Out");
    }

    #[test]
    fn trims_leading_and_trailing_dashes() {
        assert_eq!(clean_title("- Intro -.mp3"), "Intro");
    }
}


#[cfg(test)]
mod group_by_base_name_tests {
    use super::*;

    #[test]
    fn groups_split_parts_under_one_base() {
        let names = vec![
            "Foo Part 2".to_string(),
            "Foo Part 1".to_string(),
            "Foo Part 3".to_string(),
        ];
        let groups = group_by_base_name(&names);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0, "Foo");
        assert_eq!(groups[0].1, vec!["Foo Part 1", "Foo Part 2", "Foo Part 3"]);
    }

    #[test]
    fn single_member_groups_are_dropped() {
        let names = vec!["Foo Part 1".to_string(), "Bar".to_string()];
        let groups = group_by_base_name(&names);
        assert!(groups.is_empty());
    }

    #[test]
    fn groups_are_ordered_by_base_name() {
        let names = vec![
            "Zeta Part 1".to_string(),
            "Zeta Part 2".to_string(),
            "Alpha CD1".to_string(),
            "Alpha CD2".to_string(),
        ];
        let groups = group_by_base_name(&names);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "Alpha");
        assert_eq!(groups[1].0, "Zeta");
    }

    #[test]
    fn empty_base_never_forms_a_group() {
        let names = vec!["- ".to_string(), "--".to_string()];
        assert!(group_by_base_name(&names).is_empty());
    }
}

#[cfg(test)]
mod longest_common_prefix_tests {
    use super::*;

    #[test]
    fn finds_shared_prefix() {
        let names = vec!["Foo - A".to_string(), "Foo - B".to_string()];
        assert_eq!(longest_common_prefix(&names), "Foo - ");
    }

    #[test]
    fn empty_when_nothing_shared() {
        let names = vec!["Alpha".to_string(), "Beta".to_string()];
        assert_eq!(longest_common_prefix(&names), "");
    }

    #[test]
    fn empty_input_list() {
        assert_eq!(longest_common_prefix(&[]), "");
    }

    #[test]
    fn single_name_is_its_own_prefix() {
        let names = vec!["Solo".to_string()];
        assert_eq!(longest_common_prefix(&names), "Solo");
    }
}
