//! Configuration settings for studyctl.
//!
//! Settings are loaded from `~/.studyctl/config.yaml`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::config::Paths;
use crate::error::StudyError;
use crate::features::blocking::default_blocklist;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Backend connection settings.
    pub api: ApiConfig,
    /// Study session settings.
    pub session: SessionConfig,
    /// Website blocking settings.
    pub blocking: BlockingConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format.
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    /// Color output setting.
    #[serde(default = "default_color")]
    pub color: ColorSetting,
}

/// Color output setting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorSetting {
    /// Auto-detect based on terminal.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Backend root, without the `/api` suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Timeout for ordinary requests, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Timeout for the status probe, in seconds.
    #[serde(default = "default_status_timeout")]
    pub status_timeout_secs: u64,
    /// Timeout for each diagnostic health check, in seconds.
    #[serde(default = "default_health_timeout")]
    pub health_timeout_secs: u64,
}

/// Study session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Duration used when `session create` gets no `--duration`.
    #[serde(default = "default_duration")]
    pub default_duration_minutes: u32,
    /// Focus score recorded when a session runs out without user input.
    #[serde(default = "default_focus_score")]
    pub default_focus_score: u8,
    /// Block distracting websites while a session runs.
    #[serde(default = "default_true")]
    pub block_websites: bool,
}

/// Website blocking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockingConfig {
    /// Sites blocked during a session.
    #[serde(default = "default_blocklist")]
    pub websites: Vec<String>,
}

// Default value functions for serde
const fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

const fn default_color() -> ColorSetting {
    ColorSetting::Auto
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

const fn default_timeout() -> u64 {
    10
}

const fn default_status_timeout() -> u64 {
    5
}

const fn default_health_timeout() -> u64 {
    8
}

const fn default_duration() -> u32 {
    25
}

const fn default_focus_score() -> u8 {
    75
}

const fn default_true() -> bool {
    true
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
            color: default_color(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            status_timeout_secs: default_status_timeout(),
            health_timeout_secs: default_health_timeout(),
        }
    }
}

impl ApiConfig {
    #[must_use]
    pub const fn status_timeout(&self) -> Duration {
        Duration::from_secs(self.status_timeout_secs)
    }

    #[must_use]
    pub const fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.health_timeout_secs)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_duration_minutes: default_duration(),
            default_focus_score: default_focus_score(),
            block_websites: default_true(),
        }
    }
}

impl Default for BlockingConfig {
    fn default() -> Self {
        Self {
            websites: default_blocklist(),
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self, StudyError> {
        let paths = Paths::new()?;
        Self::load_from_path(&paths.config_file)
    }

    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, StudyError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            StudyError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            StudyError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Save configuration to the default path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save(&self) -> Result<(), StudyError> {
        let paths = Paths::new()?;
        paths.ensure_dirs()?;
        self.save_to_path(&paths.config_file)
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), StudyError> {
        let contents = serde_yaml::to_string(self)
            .map_err(|e| StudyError::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, contents).map_err(|e| {
            StudyError::Config(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Replace the backend URL, e.g. from `--api-url`.
    #[must_use]
    pub fn with_api_url(mut self, url: Option<&str>) -> Self {
        if let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) {
            self.api.base_url = url.to_string();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.general.default_output, OutputFormat::Pretty);
        assert_eq!(config.general.color, ColorSetting::Auto);
        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.api.status_timeout(), Duration::from_secs(5));
        assert_eq!(config.api.health_timeout(), Duration::from_secs(8));
        assert_eq!(config.session.default_duration_minutes, 25);
        assert_eq!(config.session.default_focus_score, 75);
        assert!(config.session.block_websites);
        assert_eq!(config.blocking.websites.len(), 6);
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let config = Config::load_from_path(&config_path).unwrap();

        // Should return defaults when file doesn't exist
        assert_eq!(config.general.default_output, OutputFormat::Pretty);
        assert_eq!(config.api.base_url, "http://localhost:5000");
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut config = Config::default();
        config.session.default_focus_score = 90;
        config.blocking.websites = vec!["news.ycombinator.com".to_string()];

        config.save_to_path(&config_path).unwrap();

        let loaded = Config::load_from_path(&config_path).unwrap();

        assert_eq!(loaded.session.default_focus_score, 90);
        assert_eq!(loaded.blocking.websites, vec!["news.ycombinator.com".to_string()]);
    }

    #[test]
    fn test_partial_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let partial_yaml = r"
api:
  base_url: http://study.local:8080
session:
  block_websites: false
";
        std::fs::write(&config_path, partial_yaml).unwrap();

        let config = Config::load_from_path(&config_path).unwrap();

        assert_eq!(config.api.base_url, "http://study.local:8080");
        assert!(!config.session.block_websites);
        // Defaults should be used for missing fields
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.session.default_duration_minutes, 25);
        assert_eq!(config.general.default_output, OutputFormat::Pretty);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(&config_path, "session: [not, a, map]").unwrap();

        assert!(matches!(
            Config::load_from_path(&config_path),
            Err(StudyError::Config(_))
        ));
    }

    #[test]
    fn test_api_url_override() {
        let config = Config::default().with_api_url(Some(" http://10.0.0.2:5000 "));
        assert_eq!(config.api.base_url, "http://10.0.0.2:5000");

        let unchanged = Config::default().with_api_url(Some("  "));
        assert_eq!(unchanged.api.base_url, "http://localhost:5000");
    }
}
