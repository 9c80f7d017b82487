//! Configuration management for the FHML pipeline.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation.
//!
//! # Overview
//!
//! Configuration files support:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `FHML_GATE_*` environment overrides
//! - Default values for every setting (a missing file is fully usable)
//! - Comprehensive validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use fhml_gate::config::load_or_default;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_or_default("fhml-gate.toml")?;
//!
//! println!("Reports dir: {}", config.directories.reports_dir);
//! println!("Outbound dir: {}", config.directories.outbound_dir);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [directories]
//! reports_dir = "reports"
//! outbound_dir = "outbound"
//!
//! [validation]
//! min_date = "1990-01-01"
//! max_date = "2099-12-31"
//!
//! [diagnose]
//! max_records_per_batch = 5000
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, load_or_default};
pub use schema::{
    ApplicationConfig, DiagnoseConfig, DirectoriesConfig, GateConfig, LoggingConfig,
    SanitizerConfig, ValidationConfig,
};
