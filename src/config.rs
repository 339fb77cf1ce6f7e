//! Configuration management and validation.
//!
//! The run configuration is built once at startup from defaults, an optional
//! TOML file and command-line overrides, validated, and then treated as
//! immutable for the rest of the run.

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_MIN_PRECISION, DEFAULT_PROGRESS_INTERVAL,
};
use crate::error::{CleanerError, Result};
use crate::models::{CornerMode, MatchMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Bad-coordinate matching settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Matching strategy selector
    pub mode: MatchMode,

    /// How bad-coordinate lines become set entries
    pub corners: CornerMode,
}

/// Precision filter settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrecisionConfig {
    /// Records whose best axis has fewer decimal digits are excluded
    pub min_decimal_digits: usize,
}

impl Default for PrecisionConfig {
    fn default() -> Self {
        Self {
            min_decimal_digits: DEFAULT_MIN_PRECISION,
        }
    }
}

/// Summary report format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON format for scripting
    Json,
    /// CSV format for data analysis
    Csv,
}

/// Progress and reporting settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Records between progress updates
    pub progress_interval: usize,

    /// Show a progress spinner while classifying
    pub show_progress: bool,

    /// Summary report format
    pub format: ReportFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            show_progress: true,
            format: ReportFormat::Human,
        }
    }
}

/// Complete configuration for a cleaning run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    pub matching: MatchingConfig,
    pub precision: PrecisionConfig,
    pub output: OutputConfig,
}

impl CleanerConfig {
    /// Create configuration with a custom matching mode
    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.matching.mode = mode;
        self
    }

    /// Create configuration with a custom corner mode
    pub fn with_corners(mut self, corners: CornerMode) -> Self {
        self.matching.corners = corners;
        self
    }

    /// Disable the progress spinner
    pub fn without_progress(mut self) -> Self {
        self.output.show_progress = false;
        self
    }

    /// Default config file location (`<config dir>/coord-cleaner/config.toml`)
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            CleanerError::configuration("Could not determine user configuration directory")
        })?;
        Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Parse configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| CleanerError::file_access(path, e))?;
        let config: CleanerConfig =
            toml::from_str(&contents).map_err(|source| CleanerError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load defaults, overlaid by the explicit file or the default file if present
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        match config_file {
            Some(path) => Self::from_file(path),
            None => match Self::default_config_path() {
                Ok(path) if path.exists() => Self::from_file(&path),
                _ => {
                    debug!("No config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Check values for consistency
    pub fn validate(&self) -> Result<()> {
        if !(1..=15).contains(&self.precision.min_decimal_digits) {
            return Err(CleanerError::configuration(format!(
                "precision.min_decimal_digits must be between 1 and 15, got {}",
                self.precision.min_decimal_digits
            )));
        }

        if self.output.progress_interval == 0 {
            return Err(CleanerError::configuration(
                "output.progress_interval must be greater than 0",
            ));
        }

        Ok(())
    }
}
