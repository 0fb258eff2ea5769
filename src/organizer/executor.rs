//! Plan execution.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::plan::{Operation, OperationPlan};
use crate::error::{Error, Result};

/// What happened while applying a plan.
#[derive(Debug, Default)]
pub struct ExecutionReport {
    /// Created directories, or in dry-run mode the ones that would be created
    pub created_dirs: Vec<PathBuf>,
    /// Completed moves, or in dry-run mode the moves that would happen
    pub moved: Vec<(PathBuf, PathBuf)>,
    /// Per-operation failures; execution carried on after each
    pub failures: Vec<Error>,
}

/// Apply `plan`, or in dry-run mode write it to `out` without touching the
/// filesystem.
///
/// Operations run in plan order. A failed operation is recorded and the rest
/// still run. Only writing to `out` can fail the whole call.
pub fn execute(plan: &OperationPlan, dry_run: bool, out: &mut dyn Write) -> Result<ExecutionReport> {
    let mut report = ExecutionReport::default();

    for op in &plan.operations {
        if dry_run {
            writeln!(out, "[dry-run] {op}")?;
            match op {
                Operation::CreateDir { path } => report.created_dirs.push(path.clone()),
                Operation::Move { from, to } => report.moved.push((from.clone(), to.clone())),
            }
            continue;
        }

        match op {
            Operation::CreateDir { path } => match fs::create_dir_all(path) {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), "Created directory");
                    report.created_dirs.push(path.clone());
                }
                Err(error) => {
                    tracing::error!(path = %path.display(), error = %error, "Failed to create directory");
                    report.failures.push(Error::CreateDirFailed {
                        path: path.clone(),
                        error,
                    });
                }
            },
            Operation::Move { from, to } => match move_file(from, to) {
                Ok(()) => {
                    tracing::info!(from = %from.display(), to = %to.display(), "Moved");
                    report.moved.push((from.clone(), to.clone()));
                }
                Err(error) => {
                    tracing::error!(from = %from.display(), to = %to.display(), error = %error, "Move failed");
                    report.failures.push(Error::move_failed(from, to, error));
                }
            },
        }
    }

    Ok(report)
}

/// Move one file without ever replacing an existing destination.
///
/// Uses `rename`; when source and destination are on different filesystems,
/// copies into a hidden sibling of the destination, renames that into place
/// and then removes the source.
pub fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    ensure_vacant(to)?;

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => copy_then_remove(from, to),
        Err(e) => Err(e),
    }
}

fn copy_then_remove(from: &Path, to: &Path) -> io::Result<()> {
    let partial = partial_path(to);
    if let Err(e) = fs::copy(from, &partial) {
        let _ = fs::remove_file(&partial);
        return Err(e);
    }

    if let Err(e) = ensure_vacant(to).and_then(|()| fs::rename(&partial, to)) {
        let _ = fs::remove_file(&partial);
        return Err(e);
    }

    fs::remove_file(from).inspect_err(|e| {
        tracing::warn!(path = %from.display(), error = %e, "Copied but could not remove source");
    })
}

fn ensure_vacant(path: &Path) -> io::Result<()> {
    if fs::symlink_metadata(path).is_ok() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "destination already exists",
        ));
    }
    Ok(())
}

fn partial_path(to: &Path) -> PathBuf {
    let name = to
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    to.with_file_name(format!(".{name}.tagsort-partial"))
}
