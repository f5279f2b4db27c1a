//! Configuration management for fleet-dashboard

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::date_range::RangeSelection;
use crate::error::{Error, Result};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Reporting backend settings
    pub backend: BackendConfig,

    /// CSV / HTML export settings
    pub export: ExportConfig,

    /// Dashboard defaults
    pub dashboard: DashboardConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Reporting backend connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the REST API, e.g. `https://fleet.example.com/api`
    pub base_url: String,

    /// Request timeout in humantime format (e.g. "10s", "1m")
    pub timeout: String,

    /// Bearer token sent with every request
    pub api_token: Option<String>,
}

/// Export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory for exported files (default: current directory)
    pub output_dir: Option<PathBuf>,

    /// Currency symbol used in reports
    pub currency: String,
}

/// Dashboard defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Range selected when no `--range` is given (e.g. "today", "this-week")
    pub default_range: String,

    /// Rows per table page
    pub page_size: usize,

    /// Number of buses in the fleet ranking
    pub top_buses: usize,
}

// Default implementations

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout: "10s".to_string(),
            api_token: None,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            currency: "$".to_string(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_range: "today".to_string(),
            page_size: 20,
            top_buses: 10,
        }
    }
}

impl BackendConfig {
    /// Parsed request timeout.
    pub fn timeout(&self) -> Result<Duration> {
        humantime::parse_duration(&self.timeout)
            .map_err(|e| Error::config(format!("invalid backend timeout '{}': {e}", self.timeout)))
    }
}

impl DashboardConfig {
    /// The configured default range.
    pub fn default_selection(&self) -> Result<RangeSelection> {
        self.default_range
            .parse()
            .map_err(|e| Error::config(format!("invalid default_range: {e}")))
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let config: Self = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::config("Could not determine config directory"))?;
        Ok(config_dir.join(crate::APP_NAME).join("config.toml"))
    }

    /// Directory that exports are written to.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.export
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Validate configuration values.
    ///
    /// Call this after loading to ensure all values are within acceptable ranges.
    pub fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.to_lowercase().as_str()) {
            return Err(Error::config(format!(
                "log_level must be one of {:?}, got '{}'",
                valid_levels, self.general.log_level
            )));
        }

        let url = self.backend.base_url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::config(format!(
                "backend.base_url must start with http:// or https://, got '{url}'"
            )));
        }

        self.backend.timeout()?;
        self.dashboard.default_selection()?;

        if self.dashboard.page_size == 0 {
            return Err(Error::config("dashboard.page_size must be at least 1"));
        }

        Ok(())
    }
}
