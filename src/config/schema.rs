//! Configuration schema types
//!
//! This module defines the configuration structure for the FHML pipeline.
//! Every section carries serde defaults so a missing configuration file
//! degrades to a fully usable default configuration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Main pipeline configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GateConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Directory roots shared by the pipeline stages
    #[serde(default)]
    pub directories: DirectoriesConfig,

    /// Byte-level sanitization policy
    #[serde(default)]
    pub sanitizer: SanitizerConfig,

    /// Field validation rule parameters
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Diagnose stage settings
    #[serde(default)]
    pub diagnose: DiagnoseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GateConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.directories.validate()?;
        self.validation.validate()?;
        self.diagnose.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (diagnose/finalize report what they would write
    /// without touching the filesystem)
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Directory roots for reports, archive and outbound artifacts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoriesConfig {
    /// Base directory for per-stem report trees
    #[serde(default = "default_reports_dir")]
    pub reports_dir: String,

    /// Directory the downstream acceptance system picks canonical files
    /// up from
    #[serde(default = "default_outbound_dir")]
    pub outbound_dir: String,
}

impl DirectoriesConfig {
    fn validate(&self) -> Result<(), String> {
        if self.reports_dir.trim().is_empty() {
            return Err("reports_dir cannot be empty".to_string());
        }
        if self.outbound_dir.trim().is_empty() {
            return Err("outbound_dir cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for DirectoriesConfig {
    fn default() -> Self {
        Self {
            reports_dir: default_reports_dir(),
            outbound_dir: default_outbound_dir(),
        }
    }
}

/// Byte-level sanitization policy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SanitizerConfig {
    /// Replace non-ASCII bytes with `?` instead of leaving them in place.
    /// Either way the anomaly is recorded as a WARN issue.
    #[serde(default)]
    pub replace_non_ascii: bool,
}

/// Field validation rule parameters
///
/// The recognized fields themselves are the closed layout table in code;
/// this section only parameterizes the rules applied to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Lower bound of the plausible date range (YYYY-MM-DD)
    #[serde(default = "default_min_date")]
    pub min_date: String,

    /// Upper bound of the plausible date range (YYYY-MM-DD)
    #[serde(default = "default_max_date")]
    pub max_date: String,
}

impl ValidationConfig {
    fn validate(&self) -> Result<(), String> {
        let min = parse_config_date("min_date", &self.min_date)?;
        let max = parse_config_date("max_date", &self.max_date)?;
        if min > max {
            return Err(format!(
                "min_date {} is after max_date {}",
                self.min_date, self.max_date
            ));
        }
        Ok(())
    }

    /// Parsed lower bound of the plausible date range.
    ///
    /// Falls back to an unbounded range when the raw value is invalid;
    /// `validate()` rejects such configurations up front.
    pub fn min_date(&self) -> NaiveDate {
        parse_config_date("min_date", &self.min_date).unwrap_or(NaiveDate::MIN)
    }

    /// Parsed upper bound of the plausible date range.
    pub fn max_date(&self) -> NaiveDate {
        parse_config_date("max_date", &self.max_date).unwrap_or(NaiveDate::MAX)
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_date: default_min_date(),
            max_date: default_max_date(),
        }
    }
}

fn parse_config_date(name: &str, value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("Invalid {name} '{value}': {e}"))
}

/// Diagnose stage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnoseConfig {
    /// Maximum detail records per corrected sub-batch; larger files raise
    /// a RECORD_LIMIT_EXCEEDED issue and are split on diagnosis
    #[serde(default = "default_max_records_per_batch")]
    pub max_records_per_batch: usize,
}

impl DiagnoseConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_records_per_batch == 0 {
            return Err("max_records_per_batch must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for DiagnoseConfig {
    fn default() -> Self {
        Self {
            max_records_per_batch: default_max_records_per_batch(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging (JSON lines, rotated)
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Log rotation (daily or hourly)
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_reports_dir() -> String {
    "reports".to_string()
}

fn default_outbound_dir() -> String {
    "outbound".to_string()
}

fn default_min_date() -> String {
    "1990-01-01".to_string()
}

fn default_max_date() -> String {
    "2099-12-31".to_string()
}

fn default_max_records_per_batch() -> usize {
    5000
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}
