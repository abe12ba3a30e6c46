//! Configuration file contents
//!
//! Both `~/.monkey/config.toml` and a project's `monkey.toml` share this
//! layout. Every key is optional so that a later file only overrides what it
//! actually sets.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One configuration file, as written on disk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Evaluator settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpreter: Option<InterpreterSettings>,

    /// Interactive session settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repl: Option<ReplSettings>,
}

/// `[interpreter]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct InterpreterSettings {
    /// Maximum nested function calls; 0 disables the limit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_call_depth: Option<usize>,
}

/// `[repl]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ReplSettings {
    /// Prompt printed before each line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    /// Persist line history between sessions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<bool>,

    /// Where history is stored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_file: Option<PathBuf>,
}

impl Settings {
    /// Load settings from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        Self::parse(&content, path)
    }

    /// Parse settings from TOML text; `origin` is only used for error messages
    pub fn parse(content: &str, origin: &Path) -> ConfigResult<Self> {
        let settings: Self = toml::from_str(content).map_err(|e| ConfigError::TomlParseError {
            file: origin.to_path_buf(),
            error: e,
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate the settings
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(prompt) = self.repl.as_ref().and_then(|r| r.prompt.as_deref()) {
            if prompt.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "repl.prompt".to_string(),
                    reason: "prompt must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Merge another settings file into this one
    /// Other settings take precedence for keys they set
    pub fn merge(&mut self, other: &Settings) {
        if let Some(theirs) = &other.interpreter {
            let ours = self.interpreter.get_or_insert_with(Default::default);
            if theirs.max_call_depth.is_some() {
                ours.max_call_depth = theirs.max_call_depth;
            }
        }

        if let Some(theirs) = &other.repl {
            let ours = self.repl.get_or_insert_with(Default::default);
            if theirs.prompt.is_some() {
                ours.prompt = theirs.prompt.clone();
            }
            if theirs.history.is_some() {
                ours.history = theirs.history;
            }
            if theirs.history_file.is_some() {
                ours.history_file = theirs.history_file.clone();
            }
        }
    }

    pub fn max_call_depth(&self) -> Option<usize> {
        self.interpreter.as_ref().and_then(|i| i.max_call_depth)
    }

    pub fn prompt(&self) -> Option<&str> {
        self.repl.as_ref().and_then(|r| r.prompt.as_deref())
    }

    pub fn history(&self) -> Option<bool> {
        self.repl.as_ref().and_then(|r| r.history)
    }

    pub fn history_file(&self) -> Option<&Path> {
        self.repl.as_ref().and_then(|r| r.history_file.as_deref())
    }
}
