//! Validation issues, severities and the file status function
//!
//! Issues are the recoverable half of the error model: anomalies recorded
//! during sanitization and validation that do not abort the pipeline. The
//! overall file status is a pure, order-independent function of the issue
//! set.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a single validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// The record remains usable by the downstream acceptance system
    #[serde(rename = "WARN")]
    Warn,
    /// The record (or file) is semantically unusable downstream
    #[serde(rename = "ERROR")]
    Error,
}

/// Closed taxonomy of issue codes
///
/// The code identifies the anomaly class and keys the correction rule
/// registry in the diagnose stage. Serialized in SCREAMING_SNAKE_CASE in
/// the report contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    /// UTF-8 byte order mark at the start of the payload
    BomPresent,
    /// Null byte embedded in the payload
    NullByte,
    /// Byte outside the ASCII range
    NonAsciiByte,
    /// Record type code not in the closed 100/200/300 set
    UnknownRecordKind,
    /// No header record present
    HeaderMissing,
    /// More than one header record present
    HeaderDuplicate,
    /// Header record not in first position
    HeaderPosition,
    /// No trailer record present
    TrailerMissing,
    /// More than one trailer record present
    TrailerDuplicate,
    /// Trailer record not in last position
    TrailerPosition,
    /// No detail records present
    DetailMissing,
    /// Date field failed to parse or is outside the plausible range
    FieldDate,
    /// Numeric field contains non-digits or has the wrong width
    FieldNumeric,
    /// Required text field is blank
    FieldBlank,
    /// Trailer-declared record count disagrees with the counted details
    TotalMismatch,
    /// Trailer-declared total amount disagrees with the summed details
    AmountMismatch,
    /// Detail count exceeds the configured per-batch record limit
    RecordLimitExceeded,
}

impl IssueCode {
    /// Returns the serialized form of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCode::BomPresent => "BOM_PRESENT",
            IssueCode::NullByte => "NULL_BYTE",
            IssueCode::NonAsciiByte => "NON_ASCII_BYTE",
            IssueCode::UnknownRecordKind => "UNKNOWN_RECORD_KIND",
            IssueCode::HeaderMissing => "HEADER_MISSING",
            IssueCode::HeaderDuplicate => "HEADER_DUPLICATE",
            IssueCode::HeaderPosition => "HEADER_POSITION",
            IssueCode::TrailerMissing => "TRAILER_MISSING",
            IssueCode::TrailerDuplicate => "TRAILER_DUPLICATE",
            IssueCode::TrailerPosition => "TRAILER_POSITION",
            IssueCode::DetailMissing => "DETAIL_MISSING",
            IssueCode::FieldDate => "FIELD_DATE",
            IssueCode::FieldNumeric => "FIELD_NUMERIC",
            IssueCode::FieldBlank => "FIELD_BLANK",
            IssueCode::TotalMismatch => "TOTAL_MISMATCH",
            IssueCode::AmountMismatch => "AMOUNT_MISMATCH",
            IssueCode::RecordLimitExceeded => "RECORD_LIMIT_EXCEEDED",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single validation issue
///
/// Immutable once created. `record_index` is 1-based in file order;
/// `field` names the offending field from the layout table when the issue
/// is field-level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Issue severity
    pub severity: Severity,

    /// 1-based record index, absent for file-level issues
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub record_index: Option<usize>,

    /// Field name from the layout table, absent for structural issues
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub field: Option<String>,

    /// Human-readable description
    pub message: String,

    /// Taxonomy tag
    pub code: IssueCode,
}

impl ValidationIssue {
    /// Creates a WARN-severity issue.
    pub fn warn(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warn,
            record_index: None,
            field: None,
            message: message.into(),
            code,
        }
    }

    /// Creates an ERROR-severity issue.
    pub fn error(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            record_index: None,
            field: None,
            message: message.into(),
            code,
        }
    }

    /// Sets the 1-based record index.
    pub fn with_record_index(mut self, index: usize) -> Self {
        self.record_index = Some(index);
        self
    }

    /// Sets the field name.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Returns true when the issue has ERROR severity.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Overall file status
///
/// A pure function of the issue set: ERROR dominates WARN dominates OK,
/// independent of issue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "WARN")]
    Warn,
    #[serde(rename = "ERROR")]
    Error,
}

impl Status {
    /// Computes the status from an issue set. Total and order-independent.
    pub fn from_issues(issues: &[ValidationIssue]) -> Self {
        if issues.iter().any(|i| i.severity == Severity::Error) {
            Status::Error
        } else if issues.iter().any(|i| i.severity == Severity::Warn) {
            Status::Warn
        } else {
            Status::Ok
        }
    }

    /// Returns the serialized form of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Warn => "WARN",
            Status::Error => "ERROR",
        }
    }

    /// Process exit code for this status (0/1/2).
    pub fn exit_code(&self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Warn => 1,
            Status::Error => 2,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
