//! Path argument validation.
//!
//! [`PathType`] describes what a path argument must look like (whether it
//! exists and what kind of entry it is) and is used as a clap value parser.

use std::fs;
use std::path::{Path, PathBuf};

/// Whether the path must already exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Existence {
    Required,
    /// Must not exist, but its parent directory must
    Forbidden,
    Any,
}

/// Kind of filesystem entry expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Dir,
    Symlink,
    Any,
}

#[derive(Debug, Clone, Copy)]
pub struct PathType {
    pub exists: Existence,
    pub kind: PathKind,
    /// Accept `-` (stdin/stdout). Never accepted for directories or symlinks.
    pub dash_ok: bool,
}

impl PathType {
    pub const fn new(exists: Existence, kind: PathKind) -> Self {
        Self {
            exists,
            kind,
            dash_ok: false,
        }
    }

    pub fn validate(&self, raw: &str) -> Result<PathBuf, String> {
        if raw == "-" {
            return match self.kind {
                PathKind::Dir => Err("standard input/output (-) not allowed as directory path".into()),
                PathKind::Symlink => Err("standard input/output (-) not allowed as symlink path".into()),
                _ if !self.dash_ok => Err("standard input/output (-) not allowed".into()),
                _ => Ok(PathBuf::from(raw)),
            };
        }
        if raw.is_empty() {
            return Err("path must not be empty".into());
        }

        let path = PathBuf::from(raw);
        let exists = fs::symlink_metadata(&path).is_ok();

        match (self.exists, exists) {
            (Existence::Required, false) => Err(format!("path does not exist: {raw}")),
            (Existence::Forbidden, true) => Err(format!("path exists: {raw}")),
            (Existence::Required | Existence::Any, true) => {
                self.check_kind(&path)?;
                Ok(path)
            }
            (Existence::Forbidden | Existence::Any, false) => {
                check_parent(&path)?;
                Ok(path)
            }
        }
    }

    fn check_kind(&self, path: &Path) -> Result<(), String> {
        let (ok, what) = match self.kind {
            PathKind::Any => return Ok(()),
            PathKind::File => (path.is_file(), "file"),
            PathKind::Dir => (path.is_dir(), "directory"),
            PathKind::Symlink => (path.is_symlink(), "symlink"),
        };
        if ok {
            Ok(())
        } else {
            Err(format!("path is not a {what}: {}", path.display()))
        }
    }
}

fn check_parent(path: &Path) -> Result<(), String> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if parent.is_dir() {
        Ok(())
    } else {
        Err(format!("parent path is not a directory: {}", parent.display()))
    }
}

/// clap value parser for the `organize` source argument.
pub fn source_dir(raw: &str) -> Result<PathBuf, String> {
    PathType::new(Existence::Required, PathKind::Dir).validate(raw)
}

/// clap value parser for the `organize` target argument.
pub fn target_dir(raw: &str) -> Result<PathBuf, String> {
    PathType::new(Existence::Any, PathKind::Dir).validate(raw)
}
