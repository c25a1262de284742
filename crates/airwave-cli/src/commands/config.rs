//! Config command implementation.

use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::cli::ConfigAction;
use crate::config::Config;

pub fn cmd_config(action: ConfigAction, path: &Path, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::Show => {
            let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
            if content.trim().is_empty() {
                println!("# No configuration at {}", path.display());
            } else {
                print!("{}", content);
            }
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                bail!(
                    "Config already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Config::example().save(path)?;
            println!("Wrote example config to {}", path.display());
        }
    }
    Ok(())
}
