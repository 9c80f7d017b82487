//! Correction rule registry
//!
//! Every ERROR-class issue code maps to at most one registered correction
//! rule. An ERROR issue with no registered rule is a configuration defect:
//! the diagnose stage fails fast instead of passing the file through
//! silently.

use crate::core::validate::layout;
use crate::domain::issue::{IssueCode, ValidationIssue};
use std::fmt;

/// The closed set of correction rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CorrectionRule {
    /// Keep (or synthesize) exactly one header in first position,
    /// rewriting an unparseable generation date to the current date
    RebuildHeader,
    /// Recompute the trailer's declared count and total from the actual
    /// detail records, synthesizing the trailer when missing
    RebuildTrailer,
    /// Drop an irreparable detail record
    DropRecord,
    /// Split the detail records into bounded sub-batches
    SplitBatch,
}

impl CorrectionRule {
    pub fn name(&self) -> &'static str {
        match self {
            CorrectionRule::RebuildHeader => "rebuild-header",
            CorrectionRule::RebuildTrailer => "rebuild-trailer",
            CorrectionRule::DropRecord => "drop-record",
            CorrectionRule::SplitBatch => "split-batch",
        }
    }
}

impl fmt::Display for CorrectionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Looks up the registered correction rule for an ERROR issue.
///
/// Field-level codes are qualified by the offending field: a bad date in
/// the header is rewritten, a bad date in a detail record drops the
/// record, and a bad company code has no rule at all (nothing can
/// fabricate it).
pub fn rule_for(issue: &ValidationIssue) -> Option<CorrectionRule> {
    match issue.code {
        IssueCode::HeaderMissing | IssueCode::HeaderDuplicate | IssueCode::HeaderPosition => {
            Some(CorrectionRule::RebuildHeader)
        }
        IssueCode::TrailerMissing
        | IssueCode::TrailerDuplicate
        | IssueCode::TrailerPosition
        | IssueCode::TotalMismatch
        | IssueCode::AmountMismatch => Some(CorrectionRule::RebuildTrailer),
        IssueCode::FieldDate => match issue.field.as_deref() {
            Some(name) if name == layout::HEADER_GENERATION_DATE.name => {
                Some(CorrectionRule::RebuildHeader)
            }
            Some(name) if name == layout::DETAIL_MOVEMENT_DATE.name => {
                Some(CorrectionRule::DropRecord)
            }
            _ => None,
        },
        IssueCode::FieldNumeric => match issue.field.as_deref() {
            Some(name) if name == layout::DETAIL_AMOUNT_CENTS.name => {
                Some(CorrectionRule::DropRecord)
            }
            Some(name)
                if name == layout::TRAILER_RECORD_COUNT.name
                    || name == layout::TRAILER_TOTAL_AMOUNT.name =>
            {
                Some(CorrectionRule::RebuildTrailer)
            }
            _ => None,
        },
        IssueCode::RecordLimitExceeded => Some(CorrectionRule::SplitBatch),
        // WARN-only codes never reach the correction engine
        _ => None,
    }
}
