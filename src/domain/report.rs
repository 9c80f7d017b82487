//! The file report — the canonical inter-stage contract
//!
//! A [`FileReport`] is produced once per validation pass and is the only
//! artifact handed between the validate, diagnose and finalize stages.
//! Its JSON serialization is versioned and must round-trip losslessly:
//! a report serialized and deserialized is field-for-field equal to the
//! original, including issue order.

use crate::domain::issue::{Status, ValidationIssue};
use crate::domain::record::RecordKind;
use serde::{Deserialize, Serialize};

/// Current report schema version.
pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// Newline convention detected in the source payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NewlineKind {
    /// Records delimited by `\r\n`
    #[serde(rename = "CRLF")]
    Crlf,
    /// Records delimited by `\n`
    #[serde(rename = "LF")]
    Lf,
    /// Raw 240-byte stream with no delimiters
    #[serde(rename = "NONE")]
    None,
}

/// Record counts per kind for one file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordCounts {
    pub header: usize,
    pub detail: usize,
    pub trailer: usize,
    pub unknown: usize,
    pub total: usize,
}

impl RecordCounts {
    /// Counts one record of the given kind.
    pub fn add(&mut self, kind: RecordKind) {
        self.total += 1;
        match kind {
            RecordKind::Header => self.header += 1,
            RecordKind::Detail => self.detail += 1,
            RecordKind::Trailer => self.trailer += 1,
            RecordKind::Unknown => self.unknown += 1,
        }
    }
}

/// Cross-check of a trailer-declared value against the computed one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalsCheck {
    /// Value declared by the trailer (0 when absent or unparseable)
    pub declared: u64,
    /// Value computed from the detail records
    pub actual: u64,
    /// Whether declared and actual agree
    pub matches: bool,
}

impl TotalsCheck {
    /// Builds a check from a declared (possibly absent) and computed value.
    ///
    /// An absent declared value never matches a non-zero actual: the
    /// disagreement that produced it is already recorded as an issue.
    pub fn new(declared: Option<u64>, actual: u64) -> Self {
        Self {
            declared: declared.unwrap_or(0),
            actual,
            matches: declared == Some(actual),
        }
    }
}

/// Aggregate validation outcome for one file
///
/// Created by the analyzer; serialized by the reporter as the JSON
/// interchange artifact consumed by the diagnose and finalize stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReport {
    /// Report schema version
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Path of the validated source file
    pub source_path: String,

    /// Base identifier keying the per-file artifact tree
    pub stem: String,

    /// Overall status, a pure function of `issues`
    pub status: Status,

    /// Record counts per kind
    pub record_counts_by_kind: RecordCounts,

    /// Ordered issue list, in detection order
    pub issues: Vec<ValidationIssue>,

    /// Trailer-declared record count vs. counted details
    pub totals_check: TotalsCheck,

    /// Trailer-declared total amount vs. summed detail amounts
    pub amounts_check: TotalsCheck,

    /// Newline convention of the source payload
    pub newline: NewlineKind,

    /// Sum of all detail amounts, in cents
    pub detail_amount_sum: u64,
}

fn default_schema_version() -> u32 {
    REPORT_SCHEMA_VERSION
}

impl FileReport {
    /// Returns true when the report carries at least one ERROR issue.
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.is_error())
    }

    /// Iterates over the ERROR-severity issues.
    pub fn error_issues(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.is_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::issue::IssueCode;

    fn sample_report() -> FileReport {
        FileReport {
            schema_version: REPORT_SCHEMA_VERSION,
            source_path: "/input/HMLMAC12.d".to_string(),
            stem: "HMLMAC12".to_string(),
            status: Status::Error,
            record_counts_by_kind: RecordCounts {
                header: 1,
                detail: 998,
                trailer: 1,
                unknown: 0,
                total: 1000,
            },
            issues: vec![
                ValidationIssue::warn(IssueCode::BomPresent, "UTF-8 BOM stripped"),
                ValidationIssue::error(
                    IssueCode::TotalMismatch,
                    "trailer declares 997 records, counted 998",
                )
                .with_record_index(1000)
                .with_field("record_count"),
            ],
            totals_check: TotalsCheck::new(Some(997), 998),
            amounts_check: TotalsCheck::new(Some(149_700), 149_700),
            newline: NewlineKind::Lf,
            detail_amount_sum: 149_700,
        }
    }

    #[test]
    fn test_record_counts_add() {
        let mut counts = RecordCounts::default();
        counts.add(RecordKind::Header);
        counts.add(RecordKind::Detail);
        counts.add(RecordKind::Detail);
        counts.add(RecordKind::Trailer);
        counts.add(RecordKind::Unknown);

        assert_eq!(counts.header, 1);
        assert_eq!(counts.detail, 2);
        assert_eq!(counts.trailer, 1);
        assert_eq!(counts.unknown, 1);
        assert_eq!(counts.total, 5);
    }

    #[test]
    fn test_totals_check_matches() {
        assert!(TotalsCheck::new(Some(998), 998).matches);
        assert!(!TotalsCheck::new(Some(997), 998).matches);
        assert!(!TotalsCheck::new(None, 998).matches);
        assert_eq!(TotalsCheck::new(None, 998).declared, 0);
    }

    #[test]
    fn test_report_round_trip() {
        let report = sample_report();
        let json = serde_json::to_string_pretty(&report).unwrap();
        let restored: FileReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report, restored);
    }

    #[test]
    fn test_report_json_field_names() {
        let report = sample_report();
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["status"], "ERROR");
        assert_eq!(value["newline"], "LF");
        assert_eq!(value["record_counts_by_kind"]["detail"], 998);
        assert_eq!(value["totals_check"]["matches"], false);
        assert_eq!(value["issues"][1]["code"], "TOTAL_MISMATCH");
        assert_eq!(value["issues"][1]["severity"], "ERROR");
        // Optional fields are omitted when absent
        assert!(value["issues"][0].get("record_index").is_none());
    }

    #[test]
    fn test_has_errors() {
        let report = sample_report();
        assert!(report.has_errors());
        assert_eq!(report.error_issues().count(), 1);
    }

    #[test]
    fn test_schema_version_defaults_on_missing() {
        let mut value = serde_json::to_value(sample_report()).unwrap();
        value.as_object_mut().unwrap().remove("schema_version");
        let restored: FileReport = serde_json::from_value(value).unwrap();
        assert_eq!(restored.schema_version, REPORT_SCHEMA_VERSION);
    }
}
