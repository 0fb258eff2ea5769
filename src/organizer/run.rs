//! End-to-end `organize` run: scan, read, plan, resolve, execute, summarize.

use rayon::prelude::*;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{PlannedFile, SourceFile, build_plan, execute, resolve_collisions};
use crate::config::OrganizeConfig;
use crate::error::{Error, Result};
use crate::{metadata, scanner};

/// Inputs of one run, as validated by the CLI.
#[derive(Debug, Clone)]
pub struct OrganizeRequest {
    pub source: PathBuf,
    pub target: PathBuf,
    pub with_album: bool,
    pub guess: bool,
    pub dry_run: bool,
}

/// Outcome of a run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub dry_run: bool,
    pub scanned: usize,
    /// Moved files (or, in dry-run mode, files that would be moved)
    pub moved: usize,
    pub in_place: usize,
    pub dirs_created: usize,
    /// Files whose tags could not be read
    pub skipped: Vec<Error>,
    pub conflicts: Vec<Error>,
    /// Failed moves and directory creations
    pub failures: Vec<Error>,
}

impl RunSummary {
    /// All per-file problems, in the order they are reported.
    pub fn issues(&self) -> impl Iterator<Item = &Error> {
        self.skipped
            .iter()
            .chain(&self.conflicts)
            .chain(&self.failures)
    }

    pub fn has_issues(&self) -> bool {
        self.issues().next().is_some()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dry_run {
            writeln!(
                f,
                "Dry run: {} of {} files would be moved ({} new directories), {} already in place",
                self.moved, self.scanned, self.dirs_created, self.in_place
            )?;
        } else {
            writeln!(
                f,
                "Moved {} of {} files ({} new directories), {} already in place",
                self.moved, self.scanned, self.dirs_created, self.in_place
            )?;
        }
        write!(
            f,
            "Skipped {} unreadable, {} conflicting, {} failed",
            self.skipped.len(),
            self.conflicts.len(),
            self.failures.len()
        )?;
        for issue in self.issues() {
            write!(f, "\n  [{}] {}", issue.kind(), issue)?;
        }
        Ok(())
    }
}

/// Organize `request.source` into `request.target`.
///
/// Returns `Err` only for problems that stop the run before anything is
/// touched: bad configuration, unusable source or target. Per-file problems
/// end up in the summary.
pub fn organize(request: &OrganizeRequest, config: &OrganizeConfig, out: &mut dyn Write) -> Result<RunSummary> {
    config.validate()?;
    let source_root = fs::canonicalize(&request.source)
        .map_err(|e| Error::invalid_path(&request.source, format!("cannot read source: {e}")))?;
    let target_root = resolve_target(&request.target)?;

    let paths = scanner::scan(&source_root, config)?;
    tracing::info!(count = paths.len(), source = %source_root.display(), "Scanned source");

    // Per-file reads are independent; collect() keeps scan order.
    let results: Vec<Result<PlannedFile>> = paths
        .par_iter()
        .map(|path| {
            let metadata = metadata::read(path, request.guess, &config.guess_separator)?;
            let source = SourceFile {
                path: path.clone(),
                metadata,
            };
            Ok(PlannedFile::new(source, request.with_album, config))
        })
        .collect();

    let mut files = Vec::with_capacity(results.len());
    let mut skipped = Vec::new();
    for result in results {
        match result {
            Ok(file) => files.push(file),
            Err(e) => {
                tracing::warn!(path = ?e.path(), error = %e, "Skipping file");
                skipped.push(e);
            }
        }
    }

    let mut summary = place(&target_root, files, request.dry_run, out)?;
    summary.scanned += skipped.len();
    summary.skipped = skipped;
    Ok(summary)
}

/// Resolve, plan and execute already-tagged files.
pub fn place(
    target_root: &Path,
    files: Vec<PlannedFile>,
    dry_run: bool,
    out: &mut dyn Write,
) -> Result<RunSummary> {
    let scanned = files.len();
    let resolved = resolve_collisions(target_root, files);
    let plan = build_plan(target_root, &resolved);
    tracing::info!(
        dirs = plan.dirs().count(),
        moves = plan.moves().count(),
        conflicts = plan.conflicts.len(),
        in_place = plan.in_place.len(),
        "Plan built"
    );
    let report = execute(&plan, dry_run, out)?;

    Ok(RunSummary {
        dry_run,
        scanned,
        moved: report.moved.len(),
        in_place: plan.in_place.len(),
        dirs_created: report.created_dirs.len(),
        skipped: Vec::new(),
        conflicts: plan.conflicts,
        failures: report.failures,
    })
}

/// Absolute target path; it may not exist yet but must not be a non-directory.
fn resolve_target(target: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(target)
        .map_err(|e| Error::invalid_path(target, format!("cannot resolve target: {e}")))?;
    match fs::metadata(&absolute) {
        Ok(meta) if !meta.is_dir() => Err(Error::invalid_path(target, "target is not a directory")),
        _ => Ok(absolute),
    }
}
