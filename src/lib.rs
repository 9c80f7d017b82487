// FHML Gate - FHML validation and finalization pipeline
// Copyright (c) 2025 FHML Gate Contributors
// Licensed under the MIT License

//! # FHML Gate - validation, diagnosis and finalization for FHML files
//!
//! FHML Gate validates fixed-width FHML integration files (240-byte
//! header/detail/trailer records), diagnoses and corrects faulty files,
//! and finalizes the corrected content into one canonical, archived,
//! atomically-published output for the downstream acceptance system.
//!
//! ## Overview
//!
//! The pipeline runs three independently invocable stages:
//! - **Validate**: extract → sanitize → validate → analyze → report
//! - **Diagnose**: apply correction rules, emit corrected sub-batches,
//!   re-validate each
//! - **Finalize**: merge, archive superseded versions, publish atomically
//!
//! The JSON file report is the sole contract between stages; the stages
//! share no in-memory state and compose identically through files (the
//! CLI) or direct calls (the library).
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Pipeline stages (extract, sanitize, validate, analyze,
//!   report, diagnose, finalize)
//! - [`domain`] - Record model, issue taxonomy, report contract, errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fhml_gate::config::load_or_default;
//! use fhml_gate::core::pipeline::validate_path;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_or_default("fhml-gate.toml")?;
//!
//!     let run = validate_path(Path::new("input/HMLMAC12.d"), &config)?;
//!
//!     println!("{}: {}", run.report.stem, run.report.status);
//!     Ok(())
//! }
//! ```
//!
//! ## Correction and finalization
//!
//! A report with ERROR issues can be diagnosed; each ERROR code maps to a
//! registered correction rule (rebuild the trailer, rewrite the header
//! date, drop an irreparable detail, split an oversized file):
//!
//! ```rust,no_run
//! use fhml_gate::core::{diagnose::diagnose, finalize::finalize};
//! # fn example(
//! #     report: &fhml_gate::domain::FileReport,
//! #     config: &fhml_gate::config::GateConfig,
//! # ) -> fhml_gate::domain::Result<()> {
//! let outcome = diagnose(report, config)?;
//! for batch in &outcome.batches {
//!     let publish = finalize(&batch.report, config)?;
//!     println!("published {}", publish.outbound_path.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Recoverable anomalies become WARN/ERROR issues inside the report;
//! stage-fatal conditions are [`domain::FhmlError`] values:
//!
//! ```rust,no_run
//! use fhml_gate::domain::{FhmlError, Result};
//!
//! fn example() -> Result<()> {
//!     let config = fhml_gate::config::load_or_default("fhml-gate.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! FHML Gate uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(stem = "HMLMAC12", "Starting validation");
//! warn!(records = 3, "Unknown record kinds found");
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
