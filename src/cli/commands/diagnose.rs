//! Diagnose command implementation
//!
//! Reads a structured report, applies the registered correction rules and
//! writes corrected sub-batches. A report with no ERROR issues is a
//! no-op.

use crate::config::load_or_default;
use crate::core::diagnose::diagnose;
use crate::core::report::read_report;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the diagnose command
#[derive(Args, Debug)]
pub struct DiagnoseArgs {
    /// Structured report (JSON) produced by the validate command
    pub report: PathBuf,

    /// Override the maximum detail records per corrected sub-batch
    #[arg(long)]
    pub max_records: Option<usize>,

    /// Plan and re-validate corrections without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

impl DiagnoseArgs {
    /// Execute the diagnose command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(report = %self.report.display(), "Starting diagnosis");

        let mut config = load_or_default(config_path)?;
        if let Some(max_records) = self.max_records {
            config.diagnose.max_records_per_batch = max_records;
        }
        if self.dry_run {
            config.application.dry_run = true;
        }
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Configuration validation failed: {e}"))?;

        let report = read_report(&self.report)?;
        let outcome = diagnose(&report, &config)?;

        if outcome.batches.is_empty() {
            println!("No ERROR issues in {}, nothing to correct.", report.stem);
            return Ok(0);
        }

        println!(
            "Applied rules: {} ({} corrected batch(es))",
            outcome.rules_applied.join(", "),
            outcome.batches.len()
        );
        for batch in &outcome.batches {
            println!(
                "  {:03}: {} -> {}",
                batch.sequence,
                batch.path.display(),
                batch.report.status
            );
        }

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnose_args_defaults() {
        let args = DiagnoseArgs {
            report: PathBuf::from("report.json"),
            max_records: None,
            dry_run: false,
        };

        assert_eq!(args.report, PathBuf::from("report.json"));
        assert!(args.max_records.is_none());
        assert!(!args.dry_run);
    }
}
