//! Application configuration
//!
//! TOML-backed settings persisted under the platform config directory.
//! Covers the upstream API endpoint, the trailing fetch window, the risk
//! formula anchors, and logging preferences.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::logging::LogConfig;
use crate::risk::RiskConfig;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration metadata
    pub metadata: ConfigMetadata,

    /// Upstream API settings
    pub upstream: UpstreamSettings,

    /// Risk formula anchor points
    pub risk: RiskConfig,

    /// Logging settings
    pub logging: LogConfig,
}

/// Configuration metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Upstream wellness API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamSettings {
    /// Base URL of the upstream API
    pub base_url: String,

    /// Trailing window length in days (start = today - window_days)
    pub window_days: u32,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        UpstreamSettings {
            base_url: "https://api.ouraring.com".to_string(),
            window_days: 5,
            timeout_seconds: 20,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();

        AppConfig {
            metadata: ConfigMetadata {
                version: "1.0".to_string(),
                created_at: now,
                updated_at: now,
            },
            upstream: UpstreamSettings::default(),
            risk: RiskConfig::default(),
            logging: LogConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize configuration")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Default configuration file path (`<config_dir>/wellrs/config.toml`)
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wellrs")
            .join("config.toml")
    }

    /// Load configuration, falling back to defaults if no file exists
    pub fn load_or_default() -> Self {
        match Self::load_from_file(Self::default_config_path()) {
            Ok(config) => config,
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to the default location
    pub fn save_default(&mut self) -> Result<()> {
        self.save_to_file(Self::default_config_path())
    }

    /// Read a configuration value by dotted key, for `wellrs config get`
    pub fn get_value(&self, key: &str) -> Option<String> {
        match key {
            "upstream.base_url" => Some(self.upstream.base_url.clone()),
            "upstream.window_days" => Some(self.upstream.window_days.to_string()),
            "upstream.timeout_seconds" => Some(self.upstream.timeout_seconds.to_string()),
            "risk.steps_floor" => Some(self.risk.steps_floor.to_string()),
            "risk.steps_ceiling" => Some(self.risk.steps_ceiling.to_string()),
            "risk.stress_low_hours" => Some(self.risk.stress_low_hours.to_string()),
            "risk.stress_high_hours" => Some(self.risk.stress_high_hours.to_string()),
            "logging.level" => Some(self.logging.level.to_filter()),
            "logging.format" => Some(self.logging.format.as_str().to_string()),
            _ => None,
        }
    }

    /// Set a configuration value by dotted key, for `wellrs config set`
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "upstream.base_url" => self.upstream.base_url = value.to_string(),
            "upstream.window_days" => {
                self.upstream.window_days = value
                    .parse()
                    .with_context(|| format!("Invalid window_days: {}", value))?
            }
            "upstream.timeout_seconds" => {
                self.upstream.timeout_seconds = value
                    .parse()
                    .with_context(|| format!("Invalid timeout_seconds: {}", value))?
            }
            "risk.steps_floor" => {
                self.risk.steps_floor = value
                    .parse()
                    .with_context(|| format!("Invalid steps_floor: {}", value))?
            }
            "risk.steps_ceiling" => {
                self.risk.steps_ceiling = value
                    .parse()
                    .with_context(|| format!("Invalid steps_ceiling: {}", value))?
            }
            "risk.stress_low_hours" => {
                self.risk.stress_low_hours = value
                    .parse()
                    .with_context(|| format!("Invalid stress_low_hours: {}", value))?
            }
            "risk.stress_high_hours" => {
                self.risk.stress_high_hours = value
                    .parse()
                    .with_context(|| format!("Invalid stress_high_hours: {}", value))?
            }
            "logging.level" => {
                self.logging.level = value
                    .parse()
                    .map_err(|e: String| anyhow::anyhow!(e))
                    .with_context(|| format!("Invalid log level: {}", value))?
            }
            "logging.format" => {
                self.logging.format = value
                    .parse()
                    .map_err(|e: String| anyhow::anyhow!(e))
                    .with_context(|| format!("Invalid log format: {}", value))?
            }
            _ => return Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
        }
        self.metadata.updated_at = Utc::now();
        Ok(())
    }

    /// All known keys with their current values, for `wellrs config list`
    pub fn list_values(&self) -> Vec<(&'static str, String)> {
        const KEYS: [&str; 9] = [
            "upstream.base_url",
            "upstream.window_days",
            "upstream.timeout_seconds",
            "risk.steps_floor",
            "risk.steps_ceiling",
            "risk.stress_low_hours",
            "risk.stress_high_hours",
            "logging.level",
            "logging.format",
        ];
        KEYS.iter()
            .map(|&key| (key, self.get_value(key).unwrap_or_default()))
            .collect()
    }
}
