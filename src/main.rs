//! tagsort - organize a directory of audio files into an
//! `Artist/[Album/]Title.ext` tree based on their tags.
//!
//! Run `tagsort organize <source> <target> --dry-run` to preview what would
//! happen before moving anything.

pub mod cli;
pub mod config;
pub mod error;
pub mod metadata;
pub mod organizer;
pub mod scanner;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging; RUST_LOG still overrides per target
    let default_level = if args.verbose { "tagsort=debug" } else { "tagsort=warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(default_level.parse()?))
        .init();

    cli::run_command(&args)
}
