//! File organization command.

use std::io::{self, Write};
use std::path::Path;

use crate::config;
use crate::organizer::{self, OrganizeRequest};

/// Organize music files based on metadata
pub fn cmd_organize(
    source: &Path,
    target: &Path,
    with_album: bool,
    guess: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    let cfg = config::load();

    println!("Organizing {} into {}", source.display(), target.display());
    if dry_run {
        println!("\n[DRY RUN MODE - No files will be moved]\n");
    }

    let request = OrganizeRequest {
        source: source.to_path_buf(),
        target: target.to_path_buf(),
        with_album,
        guess,
        dry_run,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = organizer::organize(&request, &cfg.organize, &mut out)?;
    out.flush()?;

    println!("\n{summary}");
    if summary.has_issues() && !dry_run {
        println!("Files listed above were left where they are.");
    }
    Ok(())
}
