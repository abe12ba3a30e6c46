//! Configuration for the CLI
//!
//! Settings come from `~/.monkey/config.toml`, the nearest `monkey.toml`
//! and `MONKEY_*` environment variables. Command-line flags are applied on
//! top by each command.

use anyhow::{Context, Result};
use monkey_config::{Config, ConfigLoader};

/// Load configuration for the current working directory
pub fn load() -> Result<Config> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    ConfigLoader::new()
        .load_from_directory(&cwd)
        .context("Failed to load configuration")
}
