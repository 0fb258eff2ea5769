//! Application-wide error types.
//!
//! Library modules return [`Result`] with the [`Error`] enum below, while
//! the CLI edge uses `anyhow` for convenient propagation.
//!
//! Errors fall in two groups:
//! - per-file errors ([`Error::UnreadableFile`], [`Error::DestinationConflict`],
//!   [`Error::MoveFailed`], [`Error::CreateDirFailed`]) are collected into the
//!   run summary and never stop the other files from being processed
//! - fatal errors ([`Error::InvalidPath`], [`Error::Io`], [`Error::Config`])
//!   abort the run before any filesystem mutation

use std::path::{Path, PathBuf};

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Tags could not be extracted; the file is skipped
    #[error("Unreadable file {path}: {message}")]
    UnreadableFile { path: PathBuf, message: String },

    /// An unrelated file already occupies the planned destination
    #[error("Destination conflict: {} -> {} (destination already occupied)", from.display(), to.display())]
    DestinationConflict { from: PathBuf, to: PathBuf },

    /// I/O failure while moving a single file
    #[error("Move failed: {} -> {}: {error}", from.display(), to.display())]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// A planned directory could not be created
    #[error("Failed to create directory {}: {error}", path.display())]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Argument validation failed
    #[error("Invalid path {}: {reason}", path.display())]
    InvalidPath { path: PathBuf, reason: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create an unreadable-file error.
    pub fn unreadable(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::UnreadableFile {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid-path error.
    pub fn invalid_path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a move failure.
    pub fn move_failed(from: &Path, to: &Path, error: std::io::Error) -> Self {
        Self::MoveFailed {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            error,
        }
    }

    /// The file this error is about, when there is one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::UnreadableFile { path, .. }
            | Self::CreateDirFailed { path, .. }
            | Self::InvalidPath { path, .. } => Some(path),
            Self::DestinationConflict { from, .. } | Self::MoveFailed { from, .. } => Some(from),
            Self::Io(_) | Self::Config(_) => None,
        }
    }

    /// Short label used when grouping errors in the run summary.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::UnreadableFile { .. } => "unreadable",
            Self::DestinationConflict { .. } => "conflict",
            Self::MoveFailed { .. } => "move-failed",
            Self::CreateDirFailed { .. } => "mkdir-failed",
            Self::InvalidPath { .. } => "invalid-path",
            Self::Config(_) => "config",
        }
    }
}
