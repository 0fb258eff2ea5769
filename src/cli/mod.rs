//! Command-line interface for tagsort.
//!
//! This module provides the argument definitions, path validation for
//! arguments, and the command implementations.

mod commands;
pub mod path_type;

pub use commands::{Cli, Commands, run_command};
