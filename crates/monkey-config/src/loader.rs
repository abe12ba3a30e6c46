//! Configuration Loader
//!
//! Handles loading and merging configuration from multiple sources with proper precedence.

use crate::settings::Settings;
use crate::{ConfigError, ConfigResult, PROJECT_CONFIG_FILE};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default limit on nested function calls
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1000;

/// Default REPL prompt
pub const DEFAULT_PROMPT: &str = ">> ";

/// Configuration loader
///
/// Loads configuration from multiple sources and merges them with proper precedence:
/// 1. Global config (~/.monkey/config.toml) - lowest priority
/// 2. Project config (./monkey.toml) - overrides global
/// 3. Environment variables (MONKEY_*) - overrides project
/// 4. CLI flags - highest priority (handled by caller)
pub struct ConfigLoader {
    /// Cached global config path
    global_config_path: Option<PathBuf>,
}

/// Evaluator settings after merging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Maximum nested function calls; 0 disables the limit
    pub max_call_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

/// Interactive session settings after merging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplConfig {
    pub prompt: String,
    pub history: bool,
    /// `None` when no location could be determined (no home directory)
    pub history_file: Option<PathBuf>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            history: true,
            history_file: ConfigLoader::global_config_dir()
                .ok()
                .map(|dir| dir.join("history")),
        }
    }
}

/// Merged configuration result
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub interpreter: InterpreterConfig,
    pub repl: ReplConfig,

    /// Project root directory (where monkey.toml was found)
    pub project_root: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            global_config_path: None,
        }
    }

    /// Use a specific file as the global configuration instead of
    /// `~/.monkey/config.toml`
    pub fn with_global_config_path(path: impl Into<PathBuf>) -> Self {
        Self {
            global_config_path: Some(path.into()),
        }
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find monkey.toml, then merges it over
    /// the global config if one exists.
    pub fn load_from_directory(&mut self, start_dir: &Path) -> ConfigResult<Config> {
        let (project_root, project) = self.find_project_config(start_dir)?;
        let mut settings = self.load_global_config()?;
        settings.merge(&project);

        let config = Self::resolve(apply_env_overrides(settings)?, project_root);
        debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Load configuration from a specific project config file
    pub fn load_from_file(&mut self, config_path: &Path) -> ConfigResult<Config> {
        let project = Settings::load_from_file(config_path)?;
        let mut settings = self.load_global_config()?;
        settings.merge(&project);

        let project_root = config_path.parent().map(|p| p.to_path_buf());
        Ok(Self::resolve(apply_env_overrides(settings)?, project_root))
    }

    /// Find project configuration by walking up directory tree
    ///
    /// Returns (project_root, settings); both empty if no monkey.toml exists
    fn find_project_config(&self, start_dir: &Path) -> ConfigResult<(Option<PathBuf>, Settings)> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(PROJECT_CONFIG_FILE);

            if config_path.exists() {
                let settings = Settings::load_from_file(&config_path)?;
                return Ok((Some(current), settings));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Ok((None, Settings::default())),
            }
        }
    }

    /// Load global configuration from ~/.monkey/config.toml
    ///
    /// A missing file, or a missing home directory, yields empty settings.
    fn load_global_config(&mut self) -> ConfigResult<Settings> {
        if self.global_config_path.is_none() {
            self.global_config_path = Self::global_config_path().ok();
        }

        match &self.global_config_path {
            Some(path) if path.exists() => Settings::load_from_file(path),
            _ => Ok(Settings::default()),
        }
    }

    fn resolve(settings: Settings, project_root: Option<PathBuf>) -> Config {
        let defaults = ReplConfig::default();

        Config {
            interpreter: InterpreterConfig {
                max_call_depth: settings.max_call_depth().unwrap_or(DEFAULT_MAX_CALL_DEPTH),
            },
            repl: ReplConfig {
                prompt: settings
                    .prompt()
                    .map(str::to_string)
                    .unwrap_or(defaults.prompt),
                history: settings.history().unwrap_or(defaults.history),
                history_file: settings
                    .history_file()
                    .map(Path::to_path_buf)
                    .or(defaults.history_file),
            },
            project_root,
        }
    }

    /// Get the global configuration directory (~/.monkey)
    pub fn global_config_dir() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(".monkey"))
    }

    /// Get the global config file path (~/.monkey/config.toml)
    pub fn global_config_path() -> ConfigResult<PathBuf> {
        Ok(Self::global_config_dir()?.join("config.toml"))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply environment variable overrides
///
/// MONKEY_MAX_CALL_DEPTH, MONKEY_PROMPT and MONKEY_NO_HISTORY are recognised.
fn apply_env_overrides(mut settings: Settings) -> ConfigResult<Settings> {
    if let Ok(depth) = env::var("MONKEY_MAX_CALL_DEPTH") {
        let depth = depth
            .trim()
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidValue {
                field: "MONKEY_MAX_CALL_DEPTH".to_string(),
                reason: format!("expected a non-negative integer, got '{}'", depth),
            })?;
        settings
            .interpreter
            .get_or_insert_with(Default::default)
            .max_call_depth = Some(depth);
    }

    if let Ok(prompt) = env::var("MONKEY_PROMPT") {
        settings.repl.get_or_insert_with(Default::default).prompt = Some(prompt);
    }

    if let Ok(no_history) = env::var("MONKEY_NO_HISTORY") {
        if matches!(no_history.to_lowercase().as_str(), "true" | "1" | "yes") {
            settings.repl.get_or_insert_with(Default::default).history = Some(false);
        }
    }

    settings.validate()?;
    Ok(settings)
}

impl Config {
    /// Get the project root directory
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// Check if this is a project (has monkey.toml)
    pub fn is_project(&self) -> bool {
        self.project_root.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn create_config_file(dir: &Path, content: &str) -> PathBuf {
        let config_path = dir.join(PROJECT_CONFIG_FILE);
        fs::write(&config_path, content).unwrap();
        config_path
    }

    /// Loader that never looks at the real home directory
    fn isolated_loader(temp: &TempDir) -> ConfigLoader {
        ConfigLoader::with_global_config_path(temp.path().join("no-global.toml"))
    }

    #[test]
    #[serial]
    fn test_load_project_config() {
        let temp_dir = TempDir::new().unwrap();
        create_config_file(
            temp_dir.path(),
            r#"
[interpreter]
max_call_depth = 64
"#,
        );

        let config = isolated_loader(&temp_dir)
            .load_from_directory(temp_dir.path())
            .unwrap();

        assert_eq!(config.interpreter.max_call_depth, 64);
        assert!(config.is_project());
    }

    #[test]
    #[serial]
    fn test_find_config_in_parent() {
        let temp_dir = TempDir::new().unwrap();
        create_config_file(
            temp_dir.path(),
            r#"
[repl]
prompt = "parent> "
"#,
        );

        let sub_dir = temp_dir.path().join("subdir");
        fs::create_dir(&sub_dir).unwrap();

        let config = isolated_loader(&temp_dir)
            .load_from_directory(&sub_dir)
            .unwrap();

        assert_eq!(config.repl.prompt, "parent> ");
        assert_eq!(config.project_root(), Some(temp_dir.path()));
    }

    #[test]
    #[serial]
    fn test_no_project_config_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();

        let config = isolated_loader(&temp_dir)
            .load_from_directory(temp_dir.path())
            .unwrap();

        assert_eq!(config.interpreter.max_call_depth, DEFAULT_MAX_CALL_DEPTH);
        assert_eq!(config.repl.prompt, DEFAULT_PROMPT);
        assert!(config.repl.history);
    }

    #[test]
    #[serial]
    fn test_project_overrides_global() {
        let temp_dir = TempDir::new().unwrap();
        let global = temp_dir.path().join("global.toml");
        fs::write(
            &global,
            r#"
[interpreter]
max_call_depth = 10

[repl]
prompt = "global> "
"#,
        )
        .unwrap();

        let project_dir = temp_dir.path().join("project");
        fs::create_dir(&project_dir).unwrap();
        create_config_file(
            &project_dir,
            r#"
[interpreter]
max_call_depth = 20
"#,
        );

        let config = ConfigLoader::with_global_config_path(global)
            .load_from_directory(&project_dir)
            .unwrap();

        assert_eq!(config.interpreter.max_call_depth, 20);
        assert_eq!(config.repl.prompt, "global> ");
    }

    #[test]
    #[serial]
    fn test_env_override_max_call_depth() {
        let temp_dir = TempDir::new().unwrap();
        create_config_file(
            temp_dir.path(),
            r#"
[interpreter]
max_call_depth = 64
"#,
        );

        env::set_var("MONKEY_MAX_CALL_DEPTH", "0");
        let result = isolated_loader(&temp_dir).load_from_directory(temp_dir.path());
        env::remove_var("MONKEY_MAX_CALL_DEPTH");

        assert_eq!(result.unwrap().interpreter.max_call_depth, 0);
    }

    #[test]
    #[serial]
    fn test_env_override_invalid_depth() {
        let temp_dir = TempDir::new().unwrap();

        env::set_var("MONKEY_MAX_CALL_DEPTH", "deep");
        let result = isolated_loader(&temp_dir).load_from_directory(temp_dir.path());
        env::remove_var("MONKEY_MAX_CALL_DEPTH");

        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    #[serial]
    fn test_env_disables_history() {
        let temp_dir = TempDir::new().unwrap();

        env::set_var("MONKEY_NO_HISTORY", "1");
        let result = isolated_loader(&temp_dir).load_from_directory(temp_dir.path());
        env::remove_var("MONKEY_NO_HISTORY");

        assert!(!result.unwrap().repl.history);
    }

    #[test]
    #[serial]
    fn test_env_empty_prompt_rejected() {
        let temp_dir = TempDir::new().unwrap();

        env::set_var("MONKEY_PROMPT", "");
        let result = isolated_loader(&temp_dir).load_from_directory(temp_dir.path());
        env::remove_var("MONKEY_PROMPT");

        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    #[serial]
    fn test_load_from_specific_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config_file(
            temp_dir.path(),
            r#"
[repl]
history = false
history_file = "hist.txt"
"#,
        );

        let config = isolated_loader(&temp_dir)
            .load_from_file(&config_path)
            .unwrap();

        assert!(!config.repl.history);
        assert_eq!(config.repl.history_file, Some(PathBuf::from("hist.txt")));
        assert_eq!(config.project_root(), Some(temp_dir.path()));
    }

    #[test]
    #[serial]
    fn test_invalid_project_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        create_config_file(temp_dir.path(), "[interpreter\n");

        let result = isolated_loader(&temp_dir).load_from_directory(temp_dir.path());
        assert!(matches!(result, Err(ConfigError::TomlParseError { .. })));
    }
}
