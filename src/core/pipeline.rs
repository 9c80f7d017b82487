//! In-process composition of the validation stages
//!
//! Each stage is a pure function from (content, prior artifacts) to new
//! artifacts, so the same stages compose identically whether they are
//! driven through report files by the CLI or called directly, as the
//! diagnose stage does when re-validating corrected sub-batches.

use crate::config::GateConfig;
use crate::core::analyze::analyze;
use crate::core::extract::extract_candidate;
use crate::core::sanitize::{sanitize, SanitizedPayload};
use crate::core::validate::validate;
use crate::domain::report::FileReport;
use crate::domain::result::Result;
use crate::domain::stem::Stem;
use std::path::Path;

/// Outcome of one full validation pass
#[derive(Debug)]
pub struct ValidationRun {
    /// The file report, the canonical inter-stage artifact
    pub report: FileReport,

    /// The sanitized payload backing the report
    pub payload: SanitizedPayload,
}

/// Validates an in-memory payload.
pub fn validate_bytes(
    raw: &[u8],
    source_path: &Path,
    stem: &Stem,
    config: &GateConfig,
) -> Result<ValidationRun> {
    let payload = sanitize(raw, &config.sanitizer)?;
    let outcome = validate(&payload, &config.validation, &config.diagnose);
    let report = analyze(source_path, stem, &payload, outcome);
    Ok(ValidationRun { report, payload })
}

/// Validates a file path, extracting from a zip container when needed.
pub fn validate_path(path: &Path, config: &GateConfig) -> Result<ValidationRun> {
    let extraction = extract_candidate(path)?;
    validate_bytes(&extraction.bytes, &extraction.source_path, &extraction.stem, config)
}
