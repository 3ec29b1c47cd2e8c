//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! rolework has two configuration scopes:
//! - **Global**: User-level defaults
//! - **Project**: Overrides for one working directory
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Global config file
//! 3. Project config file
//! 4. Explicit builder calls (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$ROLEWORK_CONFIG` if set (warns when the file is missing)
//! 2. `$XDG_CONFIG_HOME/rolework/config.toml`
//! 3. `~/.rolework/config.toml` (canonical write location)
//!
//! # Project Config Location
//!
//! `<dir>/.rolework/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use rolework::core::config::Config;
//! use std::path::Path;
//!
//! let result = Config::load(Some(Path::new("/path/to/project"))).unwrap();
//! let config = result.config;
//!
//! println!("Round cap: {:?}", config.max_rounds());
//! println!("Fail cost: {}", config.fail_cost());
//! ```

pub mod schema;

pub use schema::{ConfigFile, DistanceSection, FixpointSection};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Merged configuration from all sources.
///
/// Accessors apply precedence: project values override global ones.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: ConfigFile,
    /// Project configuration (if a project directory was given)
    pub project: Option<ConfigFile>,
    global_path: Option<PathBuf>,
    project_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `project_dir` is provided, also loads the project config.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed or hold
    /// invalid values. Missing files are not an error (defaults are used).
    pub fn load(project_dir: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        Self::load_with(project_dir, |key| std::env::var(key).ok())
    }

    /// Like [`Config::load`], reading environment variables through `env`.
    fn load_with(
        project_dir: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let (global, global_path) = Self::load_global(&env, &mut warnings)?;

        let (project, project_path) = match project_dir {
            Some(dir) => Self::load_project(dir)?,
            None => (None, None),
        };

        global.validate()?;
        if let Some(ref p) = project {
            p.validate()?;
        }

        Ok(ConfigLoadResult {
            config: Config {
                global,
                project,
                global_path,
                project_path,
            },
            warnings,
        })
    }

    /// Parse a single file's contents as the global scope.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` or `ConfigError::InvalidValue`.
    pub fn from_toml_str(contents: &str) -> Result<Config, ConfigError> {
        let global: ConfigFile = toml::from_str(contents).map_err(|e| ConfigError::ParseError {
            path: PathBuf::from("<string>"),
            message: e.to_string(),
        })?;
        global.validate()?;
        Ok(Config {
            global,
            ..Default::default()
        })
    }

    fn load_global(
        env: &impl Fn(&str) -> Option<String>,
        warnings: &mut Vec<ConfigWarning>,
    ) -> Result<(ConfigFile, Option<PathBuf>), ConfigError> {
        // 1. $ROLEWORK_CONFIG
        if let Some(path) = env("ROLEWORK_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                let config = Self::read_file(&path)?;
                return Ok((config, Some(path)));
            }
            warn!(path = %path.display(), "ROLEWORK_CONFIG points at a missing file");
            warnings.push(ConfigWarning {
                message: "ROLEWORK_CONFIG is set but the file does not exist; \
                          falling back to the default locations"
                    .to_string(),
                path,
            });
        }

        // 2. $XDG_CONFIG_HOME/rolework/config.toml
        if let Some(xdg_home) = env("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("rolework/config.toml");
            if path.exists() {
                let config = Self::read_file(&path)?;
                return Ok((config, Some(path)));
            }
        }

        // 3. ~/.rolework/config.toml
        if let Ok(path) = Self::global_config_path() {
            if path.exists() {
                let config = Self::read_file(&path)?;
                return Ok((config, Some(path)));
            }
        }

        Ok((ConfigFile::default(), None))
    }

    fn load_project(dir: &Path) -> Result<(Option<ConfigFile>, Option<PathBuf>), ConfigError> {
        let path = Self::project_config_path(dir);
        if !path.exists() {
            return Ok((None, None));
        }
        let config = Self::read_file(&path)?;
        Ok((Some(config), Some(path)))
    }

    fn read_file(path: &Path) -> Result<ConfigFile, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Canonical path for global config: `~/.rolework/config.toml`.
    pub fn global_config_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".rolework/config.toml"))
    }

    /// Canonical path for project config: `<dir>/.rolework/config.toml`.
    pub fn project_config_path(dir: &Path) -> PathBuf {
        dir.join(".rolework/config.toml")
    }

    /// Write project config atomically.
    ///
    /// Creates parent directories if needed. Writes a temp file in the same
    /// directory, then renames it over the target.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for invalid values and
    /// `ConfigError::WriteError` on I/O failure.
    pub fn write_project(dir: &Path, config: &ConfigFile) -> Result<PathBuf, ConfigError> {
        config.validate()?;
        let path = Self::project_config_path(dir);
        Self::write_atomic(&path, config)?;
        Ok(path)
    }

    fn write_atomic(path: &Path, config: &ConfigFile) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        let temp_path = path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        file.write_all(contents.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    fn fixpoint<T>(&self, field: impl Fn(&FixpointSection) -> Option<T>) -> Option<T> {
        let project = self.project.as_ref().and_then(|p| p.fixpoint.as_ref());
        project
            .and_then(&field)
            .or_else(|| self.global.fixpoint.as_ref().and_then(&field))
    }

    fn distance<T>(&self, field: impl Fn(&DistanceSection) -> Option<T>) -> Option<T> {
        let project = self.project.as_ref().and_then(|p| p.distance.as_ref());
        project
            .and_then(&field)
            .or_else(|| self.global.distance.as_ref().and_then(&field))
    }

    /// Fixpoint round cap.
    ///
    /// `None` means the size-derived default applies.
    pub fn max_rounds(&self) -> Option<usize> {
        self.fixpoint(|f| f.max_rounds)
    }

    /// Whether fixpoint rounds are logged at debug level.
    ///
    /// Defaults to `false`.
    pub fn log_rounds(&self) -> bool {
        self.fixpoint(|f| f.log_rounds).unwrap_or(false)
    }

    /// Default cost of an unmatched tie.
    ///
    /// Defaults to `1.0`.
    pub fn fail_cost(&self) -> f64 {
        self.distance(|d| d.fail_cost).unwrap_or(1.0)
    }

    /// Default substitution cost; `None` disallows substitution.
    pub fn subst_cost(&self) -> Option<f64> {
        self.distance(|d| d.subst_cost)
    }

    /// Path of the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Path of the loaded project config file.
    pub fn project_config_loaded_from(&self) -> Option<&Path> {
        self.project_path.as_deref()
    }
}
