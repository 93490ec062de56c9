//! Configuration for the pie-chart tool
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/pie-chart/config.toml)
//! 3. Built-in defaults (lowest priority)

use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod serialization;

#[cfg(test)]
mod tests;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const ENV_API_BASE: &str = "PIE_CHART_API_BASE";
pub const ENV_TIMEOUT_SECS: &str = "PIE_CHART_TIMEOUT_SECS";
pub const ENV_LOG_LEVEL: &str = "PIE_CHART_LOG_LEVEL";

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Base URL that relative data endpoints (e.g. `/dune/query/<id>`) are
    /// joined onto
    pub api_base: Option<String>,

    /// Request timeout; `None` waits indefinitely
    pub timeout_secs: Option<u64>,

    /// Logging configuration
    pub logging: LoggingConfig,
}

// ─────────────────────────────────────────────────────────────────────────────
// Logging
// ─────────────────────────────────────────────────────────────────────────────

/// `[logging]` section. Keys left out of the file keep their default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level for the `pie_chart` target when RUST_LOG is unset
    pub level: String,
    /// Also write JSON lines to rolling files
    pub file_enabled: bool,
    pub file_dir: PathBuf,
    pub file_rotation: LogRotation,
    /// File name stem, dated by the appender
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false,
            file_dir: PathBuf::from("./logs"),
            file_rotation: LogRotation::default(),
            file_prefix: "pie-chart".to_string(),
        }
    }
}

/// How often the JSON log file rolls over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    Never,
}

impl LogRotation {
    /// Case-insensitive; anything unrecognised rolls daily
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("hourly") {
            Self::Hourly
        } else if s.eq_ignore_ascii_case("never") {
            Self::Never
        } else {
            Self::Daily
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Never => "never",
        }
    }
}

impl From<String> for LogRotation {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub api_base: Option<String>,
    pub timeout_secs: Option<u64>,

    /// Optional [logging] section
    pub logging: Option<LoggingConfig>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/pie-chart/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("pie-chart").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    /// Called during startup to help users discover configuration options
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Silently fail - config is optional
            }
        }

        // Write config (ignore errors - config is optional)
        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Read a config file; a missing file is the same as an empty one
    ///
    /// # Errors
    /// If the file exists but cannot be read or parsed. A broken config
    /// should fail loudly rather than silently fall back to defaults.
    pub(crate) fn read_file_config(path: &Path) -> anyhow::Result<FileConfig> {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
            Err(e) => Err(e)
                .with_context(|| format!("Cannot read config file {}", path.display())),
        }
    }

    /// Load configuration: file -> env vars -> defaults
    ///
    /// # Errors
    /// If the config file exists but is invalid
    pub fn from_env() -> anyhow::Result<Self> {
        let file = match Self::config_path() {
            Some(path) => Self::read_file_config(&path)?,
            None => FileConfig::default(),
        };
        Ok(Self::merge(file, |key| std::env::var(key).ok()))
    }

    /// Merge file values with environment overrides
    pub(crate) fn merge(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        // API base: env > file > none
        let api_base = env(ENV_API_BASE)
            .or(file.api_base)
            .map(|base| base.trim().to_string())
            .filter(|base| !base.is_empty());

        // Timeout: env > file > none (0 disables)
        let timeout_secs = env(ENV_TIMEOUT_SECS)
            .and_then(|v| v.parse().ok())
            .or(file.timeout_secs)
            .filter(|&secs| secs > 0);

        let mut logging = file.logging.unwrap_or_default();
        if let Some(level) = env(ENV_LOG_LEVEL) {
            logging.level = level;
        }

        Self {
            api_base,
            timeout_secs,
            logging,
        }
    }
}
