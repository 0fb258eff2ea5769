//! File organization planning and execution.
//!
//! Turns a set of tagged audio files into an `Artist[/Album]/Title.ext` tree
//! under a target root. Work happens in stages, each in its own module:
//!
//! 1. [`plan_path`] maps one file's metadata to a relative destination (pure)
//! 2. [`collision::resolve_collisions`] makes destinations unique across the run
//! 3. [`plan::build_plan`] checks the target tree and emits ordered operations
//! 4. [`executor::execute`] applies the operations, or lists them in dry-run mode
//!
//! [`run::organize`] wires the stages together behind the CLI.

pub mod collision;
pub mod executor;
pub mod plan;
pub mod run;

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::config::OrganizeConfig;
use crate::metadata::{Tag, TrackMetadata};

pub use collision::resolve_collisions;
pub use executor::{ExecutionReport, execute};
pub use plan::{Operation, OperationPlan, build_plan};
pub use run::{OrganizeRequest, RunSummary, organize};

/// Longest component we emit, in bytes, before the extension is appended.
/// Keeps names well below the common 255-byte filesystem limit.
const MAX_COMPONENT_BYTES: usize = 200;

/// An audio file found under the source root, with its tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub metadata: TrackMetadata,
}

/// Destination of one file, relative to the target root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlannedDestination {
    pub artist: String,
    pub album: Option<String>,
    pub file_name: String,
}

impl PlannedDestination {
    pub fn relative_path(&self) -> PathBuf {
        let mut path = PathBuf::from(&self.artist);
        if let Some(album) = &self.album {
            path.push(album);
        }
        path.push(&self.file_name);
        path
    }

    /// Same directory, with ` (n)` inserted before the extension.
    pub fn with_suffix(&self, n: usize) -> Self {
        let name = Path::new(&self.file_name);
        let stem = name
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file_name.clone());
        let file_name = match name.extension() {
            Some(ext) => format!("{} ({}).{}", stem, n, ext.to_string_lossy()),
            None => format!("{} ({})", stem, n),
        };
        Self {
            file_name,
            ..self.clone()
        }
    }
}

/// A source file paired with where it is going.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub source: SourceFile,
    pub destination: PlannedDestination,
}

impl PlannedFile {
    pub fn new(source: SourceFile, with_album: bool, rules: &OrganizeConfig) -> Self {
        let destination = plan_path(&source, with_album, rules);
        Self {
            source,
            destination,
        }
    }
}

/// Compute the relative destination of a file from its tags.
///
/// - artist directory: the Artist tag, or the unknown-artist placeholder
/// - album directory: only with `with_album` and an Album tag
/// - file name: the Title tag plus the original extension, or the original
///   file name when there is no title
pub fn plan_path(source: &SourceFile, with_album: bool, rules: &OrganizeConfig) -> PlannedDestination {
    let metadata = &source.metadata;

    let artist = metadata
        .get(Tag::Artist)
        .map(|a| sanitize_component(a, &rules.unknown_artist))
        .unwrap_or_else(|| sanitize_component(&rules.unknown_artist, &rules.unknown_artist));

    let album = if with_album {
        metadata
            .get(Tag::Album)
            .map(|a| sanitize_component(a, &rules.unknown_album))
    } else {
        None
    };

    let extension = source.path.extension();
    let file_name = match metadata.get(Tag::Title) {
        Some(title) => with_extension(sanitize_component(title, &rules.unknown_title), extension),
        None => {
            let stem = source
                .path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            with_extension(sanitize_component(&stem, &rules.unknown_title), extension)
        }
    };

    PlannedDestination {
        artist,
        album,
        file_name,
    }
}

/// Make a tag value usable as a single path component.
///
/// Path separators, characters Windows rejects and control characters become
/// `_`. Surrounding whitespace and trailing dots are dropped. A result that
/// is empty, `.` or `..` is replaced by `placeholder`, cleaned the same way.
pub fn sanitize_component(raw: &str, placeholder: &str) -> String {
    let cleaned = clean_component(raw);
    if !cleaned.is_empty() {
        return cleaned;
    }
    let fallback = clean_component(placeholder);
    if fallback.is_empty() {
        "_".to_string()
    } else {
        fallback
    }
}

fn clean_component(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    truncate_bytes(
        replaced.trim().trim_end_matches('.').trim_end(),
        MAX_COMPONENT_BYTES,
    )
    .trim_end()
    .to_string()
}

fn with_extension(stem: String, extension: Option<&OsStr>) -> String {
    match extension {
        Some(ext) => format!("{}.{}", stem, ext.to_string_lossy()),
        None => stem,
    }
}

fn truncate_bytes(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
