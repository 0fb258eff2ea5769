//! Configuration file command.

use anyhow::Context;

use crate::config::{self, Config};

/// Print the config path and effective settings; with `init`, write the
/// defaults when no file exists yet.
pub fn cmd_config(init: bool) -> anyhow::Result<()> {
    let path = config::config_path().context("Could not determine config directory")?;

    if init {
        if path.exists() {
            println!("Config already exists at {}", path.display());
        } else {
            let written = config::save(&Config::default())?;
            println!("Wrote default config to {}", written.display());
        }
    }

    let cfg = config::load();
    cfg.organize.validate()?;

    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(&cfg)?);
    Ok(())
}
