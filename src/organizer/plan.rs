//! Operation plan construction.
//!
//! The plan is computed against the current state of the target tree but does
//! not change it. Directories come first (parents before children), then one
//! move per file.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::PlannedFile;
use crate::error::Error;

/// A single filesystem operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    CreateDir { path: PathBuf },
    Move { from: PathBuf, to: PathBuf },
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::CreateDir { path } => write!(f, "mkdir {}", path.display()),
            Operation::Move { from, to } => {
                write!(f, "move  {} -> {}", from.display(), to.display())
            }
        }
    }
}

/// Everything `organize` intends to do, plus what it refuses to do.
#[derive(Debug, Default)]
pub struct OperationPlan {
    /// Executable operations, in order
    pub operations: Vec<Operation>,
    /// Files whose destination is occupied; never executed
    pub conflicts: Vec<Error>,
    /// Files already sitting at their destination
    pub in_place: Vec<PathBuf>,
}

impl OperationPlan {
    pub fn moves(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.operations.iter().filter_map(|op| match op {
            Operation::Move { from, to } => Some((from.as_path(), to.as_path())),
            Operation::CreateDir { .. } => None,
        })
    }

    pub fn dirs(&self) -> impl Iterator<Item = &Path> {
        self.operations.iter().filter_map(|op| match op {
            Operation::CreateDir { path } => Some(path.as_path()),
            Operation::Move { .. } => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Build the ordered operation list for resolved destinations under
/// `target_root`.
///
/// Per file:
/// - destination is the source itself: recorded as already in place
/// - destination (or one of its parent directories) is occupied by something
///   else: recorded as a [`Error::DestinationConflict`] and left out
/// - otherwise: a move, plus creation of any missing parent directories
pub fn build_plan(target_root: &Path, files: &[PlannedFile]) -> OperationPlan {
    let mut plan = OperationPlan::default();
    let mut dirs: Vec<PathBuf> = Vec::new();
    let mut seen_dirs: HashSet<PathBuf> = HashSet::new();
    let mut moves: Vec<Operation> = Vec::new();

    for file in files {
        let from = &file.source.path;
        let to = target_root.join(file.destination.relative_path());

        if fs::symlink_metadata(&to).is_ok() {
            if is_same_file(from, &to) {
                tracing::debug!(path = %from.display(), "Already in place");
                plan.in_place.push(from.clone());
            } else {
                tracing::warn!(from = %from.display(), to = %to.display(), "Destination occupied");
                plan.conflicts.push(Error::DestinationConflict {
                    from: from.clone(),
                    to,
                });
            }
            continue;
        }

        let missing = match missing_dirs(target_root, &to) {
            Ok(missing) => missing,
            Err(blocker) => {
                tracing::warn!(
                    from = %from.display(),
                    blocker = %blocker.display(),
                    "Destination directory is occupied by a file"
                );
                plan.conflicts.push(Error::DestinationConflict {
                    from: from.clone(),
                    to: blocker,
                });
                continue;
            }
        };

        for dir in missing {
            if seen_dirs.insert(dir.clone()) {
                dirs.push(dir);
            }
        }
        moves.push(Operation::Move {
            from: from.clone(),
            to,
        });
    }

    plan.operations = dirs
        .into_iter()
        .map(|path| Operation::CreateDir { path })
        .chain(moves)
        .collect();
    plan
}

/// Directories from `root` down to `dest`'s parent that do not exist yet,
/// outermost first. `Err` carries the first ancestor that exists but is not a
/// directory.
fn missing_dirs(root: &Path, dest: &Path) -> Result<Vec<PathBuf>, PathBuf> {
    let Some(parent) = dest.parent() else {
        return Ok(Vec::new());
    };

    let mut chain = vec![root.to_path_buf()];
    if let Ok(rel) = parent.strip_prefix(root) {
        let mut current = root.to_path_buf();
        for component in rel.components() {
            current.push(component);
            chain.push(current.clone());
        }
    }

    let mut missing = Vec::new();
    for dir in chain {
        match fs::metadata(&dir) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(dir),
            Err(_) => missing.push(dir),
        }
    }
    Ok(missing)
}

/// Whether `file` already sits at its destination under `target_root`.
pub fn is_in_place(target_root: &Path, file: &PlannedFile) -> bool {
    let to = target_root.join(file.destination.relative_path());
    file.source.path == to || is_same_file(&file.source.path, &to)
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{planned, write_file};
    use tempfile::tempdir;

    #[test]
    fn test_dirs_precede_moves_and_are_deduplicated() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("src");
        let target = tmp.path().join("out");
        let a = write_file(&src, "a.mp3", b"a");
        let b = write_file(&src, "b.mp3", b"b");

        let files = vec![
            planned(a.to_str().unwrap(), "Air", Some("Moon Safari"), "Sexy Boy.mp3"),
            planned(b.to_str().unwrap(), "Air", Some("Moon Safari"), "Talisman.mp3"),
        ];

        let plan = build_plan(&target, &files);

        assert_eq!(
            plan.operations,
            vec![
                Operation::CreateDir { path: target.clone() },
                Operation::CreateDir { path: target.join("Air") },
                Operation::CreateDir { path: target.join("Air/Moon Safari") },
                Operation::Move { from: a, to: target.join("Air/Moon Safari/Sexy Boy.mp3") },
                Operation::Move { from: b, to: target.join("Air/Moon Safari/Talisman.mp3") },
            ]
        );
        assert!(plan.conflicts.is_empty());
    }

    #[test]
    fn test_existing_dirs_are_not_recreated() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("out");
        std::fs::create_dir_all(target.join("Air")).unwrap();
        let a = write_file(tmp.path(), "a.mp3", b"a");

        let plan = build_plan(&target, &[planned(a.to_str().unwrap(), "Air", None, "x.mp3")]);

        assert_eq!(plan.dirs().count(), 0);
        assert_eq!(plan.moves().count(), 1);
    }

    #[test]
    fn test_unrelated_file_at_destination_is_conflict() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("out");
        write_file(&target, "Air/x.mp3", b"someone else");
        let a = write_file(tmp.path(), "a.mp3", b"a");
        let b = write_file(tmp.path(), "b.mp3", b"b");

        let files = vec![
            planned(a.to_str().unwrap(), "Air", None, "x.mp3"),
            planned(b.to_str().unwrap(), "Air", None, "y.mp3"),
        ];
        let plan = build_plan(&target, &files);

        assert_eq!(plan.conflicts.len(), 1);
        assert!(matches!(
            &plan.conflicts[0],
            Error::DestinationConflict { from, .. } if *from == a
        ));
        let moves: Vec<_> = plan.moves().collect();
        assert_eq!(moves, vec![(b.as_path(), target.join("Air/y.mp3").as_path())]);
    }

    #[test]
    fn test_file_blocking_a_directory_is_conflict() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("out");
        write_file(&target, "Air", b"not a dir");
        let a = write_file(tmp.path(), "a.mp3", b"a");

        let plan = build_plan(&target, &[planned(a.to_str().unwrap(), "Air", None, "x.mp3")]);

        assert!(plan.is_empty());
        assert!(matches!(
            &plan.conflicts[0],
            Error::DestinationConflict { to, .. } if *to == target.join("Air")
        ));
    }

    #[test]
    fn test_file_already_in_place_is_skipped() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().to_path_buf();
        let a = write_file(&target, "Air/x.mp3", b"a");

        let plan = build_plan(&target, &[planned(a.to_str().unwrap(), "Air", None, "x.mp3")]);

        assert!(plan.is_empty());
        assert!(plan.conflicts.is_empty());
        assert_eq!(plan.in_place, vec![a]);
    }

    #[test]
    fn test_operation_display() {
        let op = Operation::Move {
            from: PathBuf::from("/in/a.mp3"),
            to: PathBuf::from("/out/Air/a.mp3"),
        };
        assert_eq!(op.to_string(), "move  /in/a.mp3 -> /out/Air/a.mp3");
        let op = Operation::CreateDir {
            path: PathBuf::from("/out/Air"),
        };
        assert_eq!(op.to_string(), "mkdir /out/Air");
    }
}
