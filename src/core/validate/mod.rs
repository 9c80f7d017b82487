//! Structural and field-level record validation
//!
//! A single streaming pass over the sanitized payload: each record's kind
//! is derived from its type code and dispatched to the kind-specific field
//! extractor from the closed layout table. Per-record anomalies become
//! issues and the scan continues; nothing here is fatal (the partition
//! invariant was already enforced by the sanitizer).

pub mod layout;

use crate::config::{DiagnoseConfig, ValidationConfig};
use crate::core::sanitize::SanitizedPayload;
use crate::domain::issue::{IssueCode, ValidationIssue};
use crate::domain::record::RecordKind;
use crate::domain::report::RecordCounts;
use layout::{HeaderFields, TrailerFields};

/// Outcome of one validation pass
///
/// Decoded field views are dropped at the end of the pass; only the
/// aggregates needed by the analyzer and the diagnose stage survive.
#[derive(Debug)]
pub struct ValidationOutcome {
    /// Issues in detection order
    pub issues: Vec<ValidationIssue>,

    /// Record counts per kind
    pub counts: RecordCounts,

    /// Sum of parseable detail amounts, in cents
    pub detail_amount_sum: u64,

    /// Trailer-declared record count, when parseable
    pub declared_record_count: Option<u64>,

    /// Trailer-declared total amount, when parseable
    pub declared_total_amount: Option<u64>,
}

/// Validates the sanitized payload record by record.
pub fn validate(
    payload: &SanitizedPayload,
    validation: &ValidationConfig,
    diagnose: &DiagnoseConfig,
) -> ValidationOutcome {
    let total = payload.record_count();
    tracing::info!(records = total, "Validating FHML structure");

    let mut issues = Vec::new();
    let mut counts = RecordCounts::default();
    let mut detail_amount_sum = 0u64;
    let mut header: Option<(usize, HeaderFields)> = None;
    let mut trailer: Option<(usize, TrailerFields)> = None;

    for (index, record) in payload.records().enumerate() {
        let index = index + 1;
        let kind = record.kind();
        counts.add(kind);

        match kind {
            RecordKind::Header => {
                if let Some((first_index, _)) = &header {
                    issues.push(
                        ValidationIssue::error(
                            IssueCode::HeaderDuplicate,
                            format!("duplicate header (records {first_index} and {index})"),
                        )
                        .with_record_index(index),
                    );
                    continue;
                }
                if index != 1 {
                    issues.push(
                        ValidationIssue::error(
                            IssueCode::HeaderPosition,
                            format!("header at record {index}, expected first position"),
                        )
                        .with_record_index(index),
                    );
                }
                let fields = layout::parse_header(&record, index, validation, &mut issues);
                header = Some((index, fields));
            }
            RecordKind::Detail => {
                let fields = layout::parse_detail(&record, index, validation, &mut issues);
                if let Some(amount) = fields.amount_cents {
                    detail_amount_sum = detail_amount_sum.saturating_add(amount);
                }
            }
            RecordKind::Trailer => {
                if let Some((first_index, _)) = &trailer {
                    issues.push(
                        ValidationIssue::error(
                            IssueCode::TrailerDuplicate,
                            format!("duplicate trailer (records {first_index} and {index})"),
                        )
                        .with_record_index(index),
                    );
                    continue;
                }
                let fields = layout::parse_trailer(&record, index, &mut issues);
                trailer = Some((index, fields));
            }
            RecordKind::Unknown => {
                issues.push(
                    ValidationIssue::warn(
                        IssueCode::UnknownRecordKind,
                        format!("unknown record type code '{}'", record.text(0, 3)),
                    )
                    .with_record_index(index),
                );
            }
        }
    }

    if header.is_none() {
        issues.push(ValidationIssue::error(
            IssueCode::HeaderMissing,
            "file has no header record (100)",
        ));
    }

    match &trailer {
        None => issues.push(ValidationIssue::error(
            IssueCode::TrailerMissing,
            "file has no trailer record (300)",
        )),
        Some((index, _)) if *index != total => {
            issues.push(
                ValidationIssue::error(
                    IssueCode::TrailerPosition,
                    format!("trailer at record {index}, expected last position ({total})"),
                )
                .with_record_index(*index),
            );
        }
        Some(_) => {}
    }

    if counts.detail == 0 {
        issues.push(ValidationIssue::warn(
            IssueCode::DetailMissing,
            "file has no detail records (200)",
        ));
    }

    let declared_record_count = trailer.as_ref().and_then(|(_, t)| t.record_count);
    let declared_total_amount = trailer.as_ref().and_then(|(_, t)| t.total_amount_cents);

    if let Some(declared) = declared_record_count {
        if declared != counts.detail as u64 {
            issues.push(
                ValidationIssue::error(
                    IssueCode::TotalMismatch,
                    format!(
                        "trailer declares {declared} detail record(s), counted {}",
                        counts.detail
                    ),
                )
                .with_record_index(trailer.as_ref().map(|(i, _)| *i).unwrap_or(total))
                .with_field(layout::TRAILER_RECORD_COUNT.name),
            );
        }
    }

    if let Some(declared) = declared_total_amount {
        if declared != detail_amount_sum {
            issues.push(
                ValidationIssue::error(
                    IssueCode::AmountMismatch,
                    format!(
                        "trailer declares total {declared} cents, summed {detail_amount_sum}"
                    ),
                )
                .with_record_index(trailer.as_ref().map(|(i, _)| *i).unwrap_or(total))
                .with_field(layout::TRAILER_TOTAL_AMOUNT.name),
            );
        }
    }

    if counts.detail > diagnose.max_records_per_batch {
        issues.push(ValidationIssue::error(
            IssueCode::RecordLimitExceeded,
            format!(
                "{} detail record(s) exceed the {} per-batch limit",
                counts.detail, diagnose.max_records_per_batch
            ),
        ));
    }

    ValidationOutcome {
        issues,
        counts,
        detail_amount_sum,
        declared_record_count,
        declared_total_amount,
    }
}
