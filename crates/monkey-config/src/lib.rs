//! Monkey Configuration System
//!
//! Provides configuration for the Monkey interpreter and its REPL:
//! - Project configuration (monkey.toml)
//! - Global user configuration (~/.monkey/config.toml)
//! - Configuration precedence and merging
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded and merged in the following order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Global config (~/.monkey/config.toml)
//! 3. Project config (./monkey.toml, searched upwards)
//! 4. Environment variables (MONKEY_*)
//! 5. CLI flags (applied by the caller)
//!
//! # Example
//!
//! ```no_run
//! use monkey_config::ConfigLoader;
//! use std::path::Path;
//!
//! let mut loader = ConfigLoader::new();
//! let config = loader.load_from_directory(Path::new(".")).unwrap();
//! println!("max call depth: {}", config.interpreter.max_call_depth);
//! ```

pub mod loader;
pub mod settings;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Home directory not found")]
    HomeNotFound,
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Name of the per-project configuration file
pub const PROJECT_CONFIG_FILE: &str = "monkey.toml";

// Re-export main types
pub use loader::{Config, ConfigLoader, InterpreterConfig, ReplConfig};
pub use settings::Settings;
