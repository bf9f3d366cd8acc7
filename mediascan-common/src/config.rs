//! Configuration loading and database location resolution
//!
//! Resolution priority (highest first):
//! 1. Command-line argument
//! 2. Environment variable (`MEDIASCAN_DATABASE`, then `DATABASE_URL`)
//! 3. TOML config file
//! 4. OS-dependent compiled default
//!
//! A missing config file is not an error; the resolver warns and falls back
//! to the defaults.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Primary environment variable for the database location
pub const DATABASE_ENV_VAR: &str = "MEDIASCAN_DATABASE";
/// Fallback environment variable for the database location
pub const DATABASE_URL_ENV_VAR: &str = "DATABASE_URL";
/// Environment variable for the log level
pub const LOG_LEVEL_ENV_VAR: &str = "LOG_LEVEL";

/// Compiled-in defaults for the current platform
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub database_path: PathBuf,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        let data_dir = if cfg!(target_os = "linux") {
            // ~/.local/share/mediascan (or /var/lib/mediascan system-wide)
            dirs::data_local_dir()
                .map(|d| d.join("mediascan"))
                .unwrap_or_else(|| PathBuf::from("/var/lib/mediascan"))
        } else if cfg!(target_os = "macos") {
            // ~/Library/Application Support/mediascan
            dirs::data_dir()
                .map(|d| d.join("mediascan"))
                .unwrap_or_else(|| PathBuf::from("/Library/Application Support/mediascan"))
        } else if cfg!(target_os = "windows") {
            // %LOCALAPPDATA%\mediascan
            dirs::data_local_dir()
                .map(|d| d.join("mediascan"))
                .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\mediascan"))
        } else {
            PathBuf::from("./mediascan_data")
        };

        Self {
            database_path: data_dir.join("mediascan.db"),
            log_level: "info".to_string(),
        }
    }
}

/// Logging section of the TOML config
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

/// Contents of `config.toml`
///
/// ```toml
/// database = "/srv/media/catalog.db"
///
/// [logging]
/// level = "debug"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub database: Option<String>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TomlConfig {
    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    /// Load the platform config file, or defaults if there is none
    pub fn load_or_default() -> Result<Self> {
        match default_config_file() {
            Some(path) => Self::from_file(&path),
            None => {
                warn!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Locate the platform config file if one exists
fn default_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("mediascan").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/mediascan/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Resolves runtime settings from CLI, environment, TOML and defaults
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    toml: TomlConfig,
    defaults: CompiledDefaults,
}

impl ConfigResolver {
    pub fn new(toml: TomlConfig) -> Self {
        Self {
            toml,
            defaults: CompiledDefaults::for_current_platform(),
        }
    }

    /// Resolve the database location (URL or filesystem path)
    pub fn database(&self, cli_arg: Option<&str>) -> String {
        if let Some(location) = cli_arg {
            return location.to_string();
        }

        for var in [DATABASE_ENV_VAR, DATABASE_URL_ENV_VAR] {
            if let Ok(location) = std::env::var(var) {
                if !location.trim().is_empty() {
                    return location;
                }
            }
        }

        if let Some(location) = &self.toml.database {
            return location.clone();
        }

        self.defaults.database_path.display().to_string()
    }

    /// Resolve the log level
    pub fn log_level(&self, cli_arg: Option<&str>) -> String {
        if let Some(level) = cli_arg {
            return level.to_string();
        }

        if let Ok(level) = std::env::var(LOG_LEVEL_ENV_VAR) {
            if !level.trim().is_empty() {
                return level;
            }
        }

        self.toml
            .logging
            .level
            .clone()
            .unwrap_or_else(|| self.defaults.log_level.clone())
    }
}

/// Turn a resolved database location into an sqlx connection URL
///
/// `sqlite:` URLs pass through unchanged. Anything else is treated as a file
/// path; its parent directory is created and the URL opens it read-write,
/// creating the file if needed.
pub fn database_url(location: &str) -> Result<String> {
    let location = location.trim();
    if location.is_empty() {
        return Err(Error::InvalidInput("Database location is empty".to_string()));
    }

    if location.starts_with("sqlite:") {
        return Ok(location.to_string());
    }

    if location.contains("://") {
        return Err(Error::InvalidInput(format!(
            "Unsupported database URL (only sqlite is supported): {}",
            location
        )));
    }

    let path = Path::new(location);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    Ok(format!("sqlite://{}?mode=rwc", path.display()))
}
