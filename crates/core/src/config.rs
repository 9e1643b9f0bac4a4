//! Application Configuration
//!
//! Manages the few settings the editor needs:
//! - Display geometry (line capacity and visible line count)
//! - Logging level

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use directories::ProjectDirs;
use tracing::{info, debug};

use crate::error::{GaplineError, Result};

/// Display geometry the engine is laid out for
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Display width in columns
    pub width: usize,
    /// Display height in rows
    pub height: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
        }
    }
}

impl DisplayConfig {
    /// Number of bytes a single line can hold.
    ///
    /// Every line gets the full display width; the cursor never sits on
    /// column `width`, it wraps to the next line instead.
    pub fn line_capacity(&self) -> Result<usize> {
        if self.width == 0 {
            return Err(GaplineError::InvalidCapacity(self.width));
        }
        Ok(self.width)
    }

    /// Number of lines shown at once
    pub fn visible_lines(&self) -> usize {
        self.height.max(1)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Configuration version for migrations
    pub version: u32,
    /// Display settings
    pub display: DisplayConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            display: DisplayConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Get the configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("org", "gapline", "Gapline")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the configuration file path
    pub fn config_file() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Load configuration from the default location, creating it if missing
    pub async fn load() -> Result<Self> {
        let config_file = Self::config_file()
            .ok_or_else(|| GaplineError::Config("Cannot determine config path".into()))?;

        if config_file.exists() {
            Self::load_from(&config_file).await
        } else {
            info!("Config file not found, using defaults");
            let config = AppConfig::default();
            config.save_to(&config_file).await?;
            Ok(config)
        }
    }

    /// Load configuration from an explicit file
    pub async fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", path);
        let contents = tokio::fs::read_to_string(path).await?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.display.line_capacity()?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub async fn save(&self) -> Result<()> {
        let config_file = Self::config_file()
            .ok_or_else(|| GaplineError::Config("Cannot determine config path".into()))?;
        self.save_to(&config_file).await
    }

    /// Save configuration to an explicit file
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let contents = toml::to_string_pretty(self)?;
        tokio::fs::write(path, contents).await?;

        debug!("Config saved to {:?}", path);
        Ok(())
    }

    /// Override the display geometry for this session
    pub fn with_display(mut self, width: Option<usize>, height: Option<usize>) -> Self {
        if let Some(width) = width {
            self.display.width = width;
        }
        if let Some(height) = height {
            self.display.height = height;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.display.line_capacity().unwrap(), 80);
        assert_eq!(config.display.visible_lines(), 24);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = AppConfig::from_toml("[display]\nwidth = 40\n").unwrap();
        assert_eq!(config.display.width, 40);
        assert_eq!(config.display.height, 24);
        assert_eq!(config.version, 1);
    }

    #[test]
    fn test_zero_width_rejected() {
        let err = AppConfig::from_toml("[display]\nwidth = 0\n").unwrap_err();
        assert!(matches!(err, GaplineError::InvalidCapacity(0)));
    }

    #[test]
    fn test_zero_height_still_shows_a_line() {
        let config = AppConfig::default().with_display(None, Some(0));
        assert_eq!(config.display.visible_lines(), 1);
    }

    #[tokio::test]
    async fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = AppConfig::default().with_display(Some(20), Some(5));
        config.save_to(&path).await.unwrap();

        let loaded = AppConfig::load_from(&path).await.unwrap();
        assert_eq!(loaded, config);
    }
}
