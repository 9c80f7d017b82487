//! Validate command implementation
//!
//! Runs the extract → sanitize → validate → analyze → report chain over
//! one input file and exits with the report status (0 OK, 1 WARN,
//! 2 ERROR). A file that fails sanitization or partitioning produces no
//! report and a fatal error instead.

use crate::config::load_or_default;
use crate::core::pipeline;
use crate::core::report::layout::ReportLayout;
use crate::core::report::render;
use crate::domain::stem::Stem;
use chrono::Utc;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// FHML file or zip container to validate
    pub input: PathBuf,

    /// Override the base directory for report trees
    #[arg(long)]
    pub reports_dir: Option<String>,
}

impl ValidateArgs {
    /// Execute the validate command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(input = %self.input.display(), "Starting validation");

        let mut config = load_or_default(config_path)?;
        if let Some(reports_dir) = &self.reports_dir {
            config.directories.reports_dir = reports_dir.clone();
        }

        let run = pipeline::validate_path(&self.input, &config)?;
        let stem = Stem::new(run.report.stem.clone()).map_err(anyhow::Error::msg)?;
        let layout = ReportLayout::new(&config.directories.reports_dir, &stem);
        let paths = render(&run.report, &layout, Utc::now())?;

        println!("Reports written:");
        println!("  JSON: {}", paths.json_path.display());
        println!("  TXT:  {}", paths.txt_path.display());
        println!();
        println!(
            "Status: {} ({} record(s), {} issue(s))",
            run.report.status,
            run.report.record_counts_by_kind.total,
            run.report.issues.len()
        );

        Ok(run.report.status.exit_code())
    }
}
