//! Init command implementation
//!
//! Generates a commented sample configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "fhml-gate.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("Configuration file already exists: {}", self.output);
            println!("Use --force to overwrite.");
            return Ok(2);
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your directories", self.output);
                println!("  2. Validate a file: fhml-gate validate <file.d>");
                println!("  3. Diagnose a faulty file: fhml-gate diagnose <report.json>");
                println!("  4. Finalize and publish: fhml-gate finalize <report.json>");
                Ok(0)
            }
            Err(e) => {
                println!("Failed to write configuration file: {e}");
                Ok(5)
            }
        }
    }

    /// Generate the sample configuration
    fn generate_config() -> String {
        r#"# FHML Gate Configuration File
# Validation, diagnosis and finalization pipeline for FHML files.
# Every setting is optional; the values below are the defaults.

[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Dry run mode: diagnose/finalize report what they would write without
# touching the filesystem
dry_run = false

[directories]
# Base directory for per-stem report trees
# (reports/<stem>/{json,txt,ret,corrigido,archive})
reports_dir = "reports"

# Directory the downstream acceptance system picks canonical files up from
outbound_dir = "outbound"

[sanitizer]
# Replace non-ASCII bytes with '?' instead of leaving them in place
replace_non_ascii = false

[validation]
# Plausible date range for header/detail date fields (YYYY-MM-DD)
min_date = "1990-01-01"
max_date = "2099-12-31"

[diagnose]
# Maximum detail records per corrected sub-batch; larger files are split
max_records_per_batch = 5000

[logging]
# Enable local file logging (JSON lines, rotated)
local_enabled = false

# Local log directory
local_path = "logs"

# Log rotation (daily or hourly)
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: "fhml-gate.toml".to_string(),
            force: false,
        };

        assert_eq!(args.output, "fhml-gate.toml");
        assert!(!args.force);
    }

    #[test]
    fn test_generated_config_parses_and_validates() {
        let content = InitArgs::generate_config();
        let config: crate::config::GateConfig = toml::from_str(&content).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.directories.reports_dir, "reports");
    }
}
