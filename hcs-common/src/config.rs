//! Configuration file resolution and TOML loading
//!
//! The config file is located following this priority order:
//! 1. Command-line argument (highest priority)
//! 2. `HCS_CONFIG` environment variable
//! 3. Per-user config file (`<config dir>/hcs/config.toml`)
//! 4. System-wide config file (`/etc/hcs/config.toml`, Linux only)
//!
//! A missing file is never fatal: callers fall back to built-in defaults.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "HCS_CONFIG";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path. The terminal is in raw mode while the home screen runs,
    /// so logs never go to stderr.
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Optional JSON-lines journal of every emitted home event
    #[serde(default)]
    pub event_journal: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
            event_journal: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Where a resolved config file came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    CommandLine,
    Environment,
    UserConfig,
    SystemConfig,
}

/// Locates the configuration file for a module
pub struct ConfigFileResolver {
    module_name: String,
}

impl ConfigFileResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
        }
    }

    /// Resolve the config file path.
    ///
    /// Returns `None` when no candidate exists. An explicit path (CLI or
    /// environment) is returned even if missing so the caller can report it.
    pub fn resolve(&self, cli_arg: Option<&Path>) -> Option<(PathBuf, ConfigSource)> {
        if let Some(path) = cli_arg {
            return Some((path.to_path_buf(), ConfigSource::CommandLine));
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Some((PathBuf::from(path), ConfigSource::Environment));
            }
        }

        if let Some(user) = dirs::config_dir().map(|d| d.join("hcs").join("config.toml")) {
            if user.exists() {
                return Some((user, ConfigSource::UserConfig));
            }
        }

        if cfg!(target_os = "linux") {
            let system = PathBuf::from("/etc/hcs/config.toml");
            if system.exists() {
                return Some((system, ConfigSource::SystemConfig));
            }
        }

        debug!("{}: no config file found", self.module_name);
        None
    }
}

/// Read and parse a TOML file into `T`
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    Ok(toml::from_str(&content)?)
}

/// Load `T` from the resolved file, or return `T::default()` when there is none.
///
/// Explicitly named files that fail to load are errors; nothing named and
/// nothing found falls back to defaults with a warning.
pub fn load_or_default<T: DeserializeOwned + Default>(
    resolver: &ConfigFileResolver,
    cli_arg: Option<&Path>,
) -> Result<(T, Option<PathBuf>)> {
    match resolver.resolve(cli_arg) {
        Some((path, _source)) => {
            let value = load_toml(&path)?;
            Ok((value, Some(path)))
        }
        None => {
            warn!(
                "{}: no configuration file found, using built-in defaults",
                resolver.module_name
            );
            Ok((T::default(), None))
        }
    }
}

/// Get OS-dependent default data folder (sounds, logs)
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("hcs"))
        .unwrap_or_else(|| PathBuf::from("./hcs_data"))
}
