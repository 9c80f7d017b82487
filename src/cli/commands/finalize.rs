//! Finalize command implementation
//!
//! Merges corrected content into the canonical final file, archives any
//! superseded version and publishes to the outbound directory. The
//! archive-then-publish sequence is never entered once a shutdown signal
//! has been observed, so an interrupted run leaves no half-published
//! state.

use crate::config::load_or_default;
use crate::core::finalize::finalize;
use crate::core::report::read_report;
use clap::Args;
use std::path::PathBuf;
use tokio::sync::watch;

/// Arguments for the finalize command
#[derive(Args, Debug)]
pub struct FinalizeArgs {
    /// Final-stage structured report (JSON)
    pub report: PathBuf,

    /// Override the outbound directory
    #[arg(long)]
    pub outbound_dir: Option<String>,

    /// Compute the canonical content without archiving or publishing
    #[arg(long)]
    pub dry_run: bool,
}

impl FinalizeArgs {
    /// Execute the finalize command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(report = %self.report.display(), "Starting finalization");

        let mut config = load_or_default(config_path)?;
        if let Some(outbound_dir) = &self.outbound_dir {
            config.directories.outbound_dir = outbound_dir.clone();
        }
        if self.dry_run {
            config.application.dry_run = true;
        }

        if *shutdown_signal.borrow() {
            tracing::warn!("Shutdown requested before publish, aborting finalization");
            println!("Shutdown requested, finalization not started.");
            return Ok(130);
        }

        let report = read_report(&self.report)?;
        let outcome = finalize(&report, &config)?;

        if config.application.dry_run {
            println!("Dry run: canonical content computed, nothing published.");
        }
        println!("Canonical file: {}", outcome.canonical_path.display());
        println!("Outbound copy:  {}", outcome.outbound_path.display());
        println!("SHA-256:        {}", outcome.checksum);
        if !outcome.archived.is_empty() {
            println!("Archived {} superseded file(s):", outcome.archived.len());
            for entry in &outcome.archived {
                println!("  {}", entry.archived_path.display());
            }
        }
        println!("Status: {}", outcome.report.status);

        Ok(outcome.report.status.exit_code())
    }
}
