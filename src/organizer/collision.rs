//! Destination de-duplication.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::PlannedFile;
use super::plan::is_in_place;

/// Make every planned destination unique.
///
/// A file already sitting at its destination under `target_root` keeps it.
/// The others are visited in the given (scan) order: the first to claim a
/// destination keeps it, and each later one gets the smallest ` (n)` suffix
/// that is neither claimed nor the unsuffixed destination of any input file,
/// so a renamed file never takes the spot of a file further down the list.
///
/// A set that is already unique comes back unchanged.
pub fn resolve_collisions(target_root: &Path, files: Vec<PlannedFile>) -> Vec<PlannedFile> {
    let reserved: HashSet<PathBuf> = files
        .iter()
        .map(|f| f.destination.relative_path())
        .collect();
    let settled: Vec<bool> = files.iter().map(|f| is_in_place(target_root, f)).collect();
    let mut claimed: HashSet<PathBuf> = files
        .iter()
        .zip(&settled)
        .filter(|(_, in_place)| **in_place)
        .map(|(f, _)| f.destination.relative_path())
        .collect();

    files
        .into_iter()
        .zip(settled)
        .map(|(mut file, in_place)| {
            if in_place || claimed.insert(file.destination.relative_path()) {
                return file;
            }

            let mut n = 1;
            let renamed = loop {
                let candidate = file.destination.with_suffix(n);
                let path = candidate.relative_path();
                if !reserved.contains(&path) && claimed.insert(path) {
                    break candidate;
                }
                n += 1;
            };

            tracing::debug!(
                source = %file.source.path.display(),
                from = %file.destination.file_name,
                to = %renamed.file_name,
                "Renamed colliding destination"
            );
            file.destination = renamed;
            file
        })
        .collect()
}


/// Property-based tests using proptest
#[cfg(test)]
mod proptests {
    use super::*;
    use crate::test_utils::planned;
    use proptest::prelude::*;
    use std::collections::HashMap;

    const ROOT: &str = "/nonexistent/library";

    /// Small name pools so collisions are frequent
    fn planned_files() -> impl Strategy<Value = Vec<PlannedFile>> {
        prop::collection::vec(
            (
                prop::sample::select(vec!["A", "B"]),
                prop::sample::select(vec!["t.mp3", "t (1).mp3", "u.flac", "t"]),
            ),
            0..24,
        )
        .prop_map(|pairs| {
            pairs
                .into_iter()
                .enumerate()
                .map(|(i, (artist, name))| planned(&format!("/in/{i}"), artist, None, name))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn resolved_destinations_are_unique(files in planned_files()) {
            let resolved = resolve_collisions(Path::new(ROOT), files.clone());
            let unique: HashSet<PathBuf> = paths(&resolved).into_iter().collect();
            prop_assert_eq!(unique.len(), resolved.len());
            prop_assert_eq!(resolved.len(), files.len());
        }

        #[test]
        fn resolving_twice_changes_nothing(files in planned_files()) {
            let once = resolve_collisions(Path::new(ROOT), files);
            let twice = resolve_collisions(Path::new(ROOT), once.clone());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn exactly_n_minus_one_renamed_per_group(files in planned_files()) {
            let mut groups: HashMap<PathBuf, usize> = HashMap::new();
            for f in &files {
                *groups.entry(f.destination.relative_path()).or_default() += 1;
            }
            let expected: usize = groups.values().map(|n| n - 1).sum();

            let resolved = resolve_collisions(Path::new(ROOT), files.clone());
            let renamed = files
                .iter()
                .zip(&resolved)
                .filter(|(before, after)| before.destination != after.destination)
                .count();
            prop_assert_eq!(renamed, expected);
        }

        #[test]
        fn resolution_is_deterministic(files in planned_files()) {
            let root = Path::new(ROOT);
            prop_assert_eq!(resolve_collisions(root, files.clone()), resolve_collisions(root, files));
        }
    }

    fn paths(files: &[PlannedFile]) -> Vec<PathBuf> {
        files.iter().map(|f| f.destination.relative_path()).collect()
    }
}
