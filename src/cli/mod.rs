//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for the FHML pipeline
//! using clap. Each subcommand drives one pipeline entry point; the
//! folder-watching automation invokes these same commands.

pub mod commands;

use clap::{Parser, Subcommand};

/// FHML validation, diagnosis and finalization pipeline
#[derive(Parser, Debug)]
#[command(name = "fhml-gate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "fhml-gate.toml", env = "FHML_GATE_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "FHML_GATE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate an FHML file (or zip container) and produce reports
    Validate(commands::validate::ValidateArgs),

    /// Apply correction rules to a report and produce corrected sub-batches
    Diagnose(commands::diagnose::DiagnoseArgs),

    /// Merge, archive and publish the canonical final file
    Finalize(commands::finalize::FinalizeArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
