//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `organize`: move audio files into an artist/album tree
//! - `config`: show or initialize the configuration file

mod config;
mod organize;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::path_type::{source_dir, target_dir};

pub use config::cmd_config;
pub use organize::cmd_organize;

/// Sort audio files into folders by their tags
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(after_help = "use 'tagsort <command> --help' for more info about each command")]
pub struct Cli {
    /// Display more info when running
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Move every audio file in the source directory into the target
    /// directory, sorted into folders
    Organize {
        /// Directory whose content will be organized
        #[arg(value_parser = source_dir)]
        source: PathBuf,
        /// Directory (created if needed) in which the files will be organized
        #[arg(value_parser = target_dir)]
        target: PathBuf,
        /// Create an album directory inside the artist directory
        #[arg(long)]
        with_album: bool,
        /// Guess title and artist from the filename when the file has no tags
        #[arg(short, long)]
        guess: bool,
        /// Do nothing on the files themselves, but print the actions that
        /// would happen
        #[arg(short, long)]
        dry_run: bool,
    },
    /// Show the configuration file location and effective settings
    Config {
        /// Write the default configuration if no file exists yet
        #[arg(long)]
        init: bool,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Organize {
            source,
            target,
            with_album,
            guess,
            dry_run,
        } => cmd_organize(source, target, *with_album, *guess, *dry_run),
        Commands::Config { init } => cmd_config(*init),
    }
}
