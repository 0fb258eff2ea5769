//! Source directory scanning.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::OrganizeConfig;
use crate::error::{Error, Result};

/// Scans the given root directory recursively for audio files.
///
/// Entries are visited in file-name order, so the result (and with it every
/// later tie-break) is the same across runs. Symlinks are not followed.
/// Unreadable sub-directories are logged and skipped; an unreadable root is
/// an error.
pub fn scan(root: &Path, config: &OrganizeConfig) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::invalid_path(root, "source is not a directory"));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(Error::invalid_path(root, format!("cannot read source: {e}")));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        if entry.file_type().is_file() && config.is_audio_file(entry.path()) {
            files.push(entry.into_path());
        }
    }

    tracing::debug!(root = %root.display(), count = files.len(), "Scan complete");
    Ok(files)
}
