//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::controllers::SummaryErrorPolicy;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub notifications: NotificationConfig,

    #[serde(default)]
    pub attendance: AttendanceConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// Default backend base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Notification center configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// How long a notification stays before it is removed automatically
    #[serde(default = "default_ttl_ms")]
    pub ttl_ms: u64,
}

fn default_ttl_ms() -> u64 {
    4000
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            ttl_ms: default_ttl_ms(),
        }
    }
}

/// Attendance page configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceConfig {
    #[serde(default)]
    pub summary_errors: SummaryErrorPolicy,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("hrms-lite").join("config.toml")),
            Some(PathBuf::from("./hrms.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // API overrides (VITE_API_URL kept for deployments that already set it)
        if let Ok(url) = std::env::var("HRMS_API_URL").or_else(|_| std::env::var("VITE_API_URL")) {
            if !url.trim().is_empty() {
                self.api.base_url = url;
            }
        }

        // Notification overrides
        if let Ok(ttl) = std::env::var("HRMS_NOTIFICATION_TTL_MS") {
            if let Ok(ms) = ttl.parse() {
                self.notifications.ttl_ms = ms;
            }
        }

        // Logging overrides
        if let Ok(level) = std::env::var("HRMS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("HRMS_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# HRMS Lite Configuration
#
# Environment variables override these settings:
# - HRMS_API_URL (or VITE_API_URL)
# - HRMS_NOTIFICATION_TTL_MS
# - HRMS_LOG_LEVEL
# - HRMS_LOG_FORMAT

[api]
# Base URL of the HRMS backend
base_url = "http://localhost:8000/api"

[notifications]
# How long a notification is shown before it is dismissed automatically (ms)
ttl_ms = 4000

[attendance]
# What happens when the per-employee summary cannot be fetched:
# "swallow" shows an empty summary, "notify" also raises an error notification
summary_errors = "swallow"

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
