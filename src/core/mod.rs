//! Core pipeline stages
//!
//! The business logic of the FHML pipeline, one module per stage:
//!
//! - [`extract`] - candidate payload extraction (flat files and zip containers)
//! - [`sanitize`] - byte-level cleanup and the 240-byte partition invariant
//! - [`validate`] - structural and field-level record validation
//! - [`analyze`] - aggregation into the file report
//! - [`report`] - report serialization and the per-stem directory layout
//! - [`diagnose`] - correction rules and sub-batch generation
//! - [`finalize`] - merge, archive and atomic publish
//! - [`pipeline`] - in-process composition of the validation stages
//! - [`fsutil`] - shared atomic-write and checksum helpers

pub mod analyze;
pub mod diagnose;
pub mod extract;
pub mod finalize;
pub mod fsutil;
pub mod pipeline;
pub mod report;
pub mod sanitize;
pub mod validate;
