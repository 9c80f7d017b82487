//! Domain models and types for the FHML pipeline.
//!
//! This module contains the core domain vocabulary shared by every
//! pipeline stage: the fixed-width record model, the issue taxonomy, the
//! file report contract and the error hierarchy.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Record model** ([`RawRecord`], [`RecordKind`]) — exact 240-byte
//!   records with closed type-code dispatch
//! - **Issue taxonomy** ([`ValidationIssue`], [`IssueCode`], [`Severity`],
//!   [`Status`]) — recoverable anomalies and the status function
//! - **Report contract** ([`FileReport`]) — the versioned JSON artifact
//!   handed between stages
//! - **Identifiers** ([`Stem`]) — file base identifiers with suffix
//!   canonicalization
//! - **Error types** ([`FhmlError`]) and the [`Result`] alias
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, FhmlError>`]:
//!
//! ```rust
//! use fhml_gate::domain::{FhmlError, Result};
//!
//! fn example() -> Result<()> {
//!     let config = fhml_gate::config::load_or_default("fhml-gate.toml")?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod issue;
pub mod record;
pub mod report;
pub mod result;
pub mod stem;

// Re-export commonly used types for convenience
pub use errors::FhmlError;
pub use issue::{IssueCode, Severity, Status, ValidationIssue};
pub use record::{RawRecord, RecordKind, RECORD_LEN};
pub use report::{FileReport, NewlineKind, RecordCounts, TotalsCheck, REPORT_SCHEMA_VERSION};
pub use result::Result;
pub use stem::Stem;
