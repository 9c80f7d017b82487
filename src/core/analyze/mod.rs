//! Aggregation of validation results into a file report
//!
//! Combines the sanitizer's issues with the validator's outcome and
//! derives the overall status. The status precedence (ERROR over WARN
//! over OK) is total and order-independent, so concatenation order of the
//! issue lists never affects it.

use crate::core::sanitize::SanitizedPayload;
use crate::core::validate::ValidationOutcome;
use crate::domain::issue::Status;
use crate::domain::report::{FileReport, TotalsCheck, REPORT_SCHEMA_VERSION};
use crate::domain::stem::Stem;
use std::path::Path;

/// Builds the file report from the sanitize and validate outcomes.
pub fn analyze(
    source_path: &Path,
    stem: &Stem,
    payload: &SanitizedPayload,
    outcome: ValidationOutcome,
) -> FileReport {
    let mut issues = payload.issues.clone();
    issues.extend(outcome.issues);

    let status = Status::from_issues(&issues);
    let totals_check = TotalsCheck::new(outcome.declared_record_count, outcome.counts.detail as u64);
    let amounts_check = TotalsCheck::new(outcome.declared_total_amount, outcome.detail_amount_sum);

    tracing::info!(
        stem = %stem,
        status = %status,
        records = outcome.counts.total,
        issues = issues.len(),
        "Analysis complete"
    );

    FileReport {
        schema_version: REPORT_SCHEMA_VERSION,
        source_path: source_path.display().to_string(),
        stem: stem.as_str().to_string(),
        status,
        record_counts_by_kind: outcome.counts,
        issues,
        totals_check,
        amounts_check,
        newline: payload.newline,
        detail_amount_sum: outcome.detail_amount_sum,
    }
}
