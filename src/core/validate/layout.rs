//! Closed FHML record layout table
//!
//! Fixed sub-field offsets per record kind. The table is versioned with
//! the crate and never inferred at runtime; new layouts are an extension
//! point, not a configuration surface.
//!
//! Offsets are byte positions inside the 240-byte record:
//!
//! | Kind    | Field              | Bytes  | Format              |
//! |---------|--------------------|--------|---------------------|
//! | all     | type_code          | 0..3   | `100`/`200`/`300`   |
//! | header  | generation_date    | 9..17  | YYYYMMDD            |
//! | header  | company_code       | 17..27 | digits              |
//! | header  | service_id         | 27..35 | non-blank text      |
//! | detail  | movement_date      | 9..17  | YYYYMMDD            |
//! | detail  | amount_cents       | 17..32 | digits, zero-padded |
//! | trailer | record_count       | 9..17  | digits, zero-padded |
//! | trailer | total_amount_cents | 17..32 | digits, zero-padded |

use crate::config::ValidationConfig;
use crate::domain::issue::{IssueCode, ValidationIssue};
use crate::domain::record::RawRecord;
use chrono::NaiveDate;

/// A named byte range inside a record
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub start: usize,
    pub end: usize,
}

impl FieldSpec {
    /// Extracts the raw field text from a record.
    pub fn extract(&self, record: &RawRecord) -> String {
        record.text(self.start, self.end).into_owned()
    }
}

pub const HEADER_GENERATION_DATE: FieldSpec = FieldSpec {
    name: "generation_date",
    start: 9,
    end: 17,
};
pub const HEADER_COMPANY_CODE: FieldSpec = FieldSpec {
    name: "company_code",
    start: 17,
    end: 27,
};
pub const HEADER_SERVICE_ID: FieldSpec = FieldSpec {
    name: "service_id",
    start: 27,
    end: 35,
};
pub const DETAIL_MOVEMENT_DATE: FieldSpec = FieldSpec {
    name: "movement_date",
    start: 9,
    end: 17,
};
pub const DETAIL_AMOUNT_CENTS: FieldSpec = FieldSpec {
    name: "amount_cents",
    start: 17,
    end: 32,
};
pub const TRAILER_RECORD_COUNT: FieldSpec = FieldSpec {
    name: "record_count",
    start: 9,
    end: 17,
};
pub const TRAILER_TOTAL_AMOUNT: FieldSpec = FieldSpec {
    name: "total_amount_cents",
    start: 17,
    end: 32,
};

/// Decoded header fields
#[derive(Debug, Clone)]
pub struct HeaderFields {
    pub generation_date: Option<NaiveDate>,
    pub company_code: Option<u64>,
    pub service_id: String,
}

/// Decoded detail fields
#[derive(Debug, Clone)]
pub struct DetailFields {
    pub movement_date: Option<NaiveDate>,
    pub amount_cents: Option<u64>,
}

/// Decoded trailer fields
#[derive(Debug, Clone)]
pub struct TrailerFields {
    pub record_count: Option<u64>,
    pub total_amount_cents: Option<u64>,
}

/// Decodes and validates a header record, recording issues.
pub fn parse_header(
    record: &RawRecord,
    index: usize,
    config: &ValidationConfig,
    issues: &mut Vec<ValidationIssue>,
) -> HeaderFields {
    let generation_date = parse_date(record, HEADER_GENERATION_DATE, index, config, issues);
    let company_code = parse_numeric(record, HEADER_COMPANY_CODE, index, issues);

    let service_id = HEADER_SERVICE_ID.extract(record).trim().to_string();
    if service_id.is_empty() {
        issues.push(
            ValidationIssue::warn(IssueCode::FieldBlank, "header service identifier is blank")
                .with_record_index(index)
                .with_field(HEADER_SERVICE_ID.name),
        );
    }

    HeaderFields {
        generation_date,
        company_code,
        service_id,
    }
}

/// Decodes and validates a detail record, recording issues.
pub fn parse_detail(
    record: &RawRecord,
    index: usize,
    config: &ValidationConfig,
    issues: &mut Vec<ValidationIssue>,
) -> DetailFields {
    DetailFields {
        movement_date: parse_date(record, DETAIL_MOVEMENT_DATE, index, config, issues),
        amount_cents: parse_numeric(record, DETAIL_AMOUNT_CENTS, index, issues),
    }
}

/// Decodes and validates a trailer record, recording issues.
pub fn parse_trailer(
    record: &RawRecord,
    index: usize,
    issues: &mut Vec<ValidationIssue>,
) -> TrailerFields {
    TrailerFields {
        record_count: parse_numeric(record, TRAILER_RECORD_COUNT, index, issues),
        total_amount_cents: parse_numeric(record, TRAILER_TOTAL_AMOUNT, index, issues),
    }
}

/// Parses a fixed-width YYYYMMDD date field against the plausible range.
fn parse_date(
    record: &RawRecord,
    spec: FieldSpec,
    index: usize,
    config: &ValidationConfig,
    issues: &mut Vec<ValidationIssue>,
) -> Option<NaiveDate> {
    let raw = spec.extract(record);
    let value = raw.trim();

    let mut reject = |detail: String| {
        issues.push(
            ValidationIssue::error(IssueCode::FieldDate, detail)
                .with_record_index(index)
                .with_field(spec.name),
        );
        None
    };

    if value.is_empty() {
        return reject(format!("{} is blank", spec.name));
    }
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return reject(format!("{} '{value}' is not an 8-digit date", spec.name));
    }
    let date = match NaiveDate::parse_from_str(value, "%Y%m%d") {
        Ok(date) => date,
        Err(_) => return reject(format!("{} '{value}' is not a valid date", spec.name)),
    };
    if date < config.min_date() || date > config.max_date() {
        return reject(format!(
            "{} {date} is outside the plausible range {}..{}",
            spec.name,
            config.min_date(),
            config.max_date()
        ));
    }
    Some(date)
}

/// Parses a digits-only numeric field of exact width.
fn parse_numeric(
    record: &RawRecord,
    spec: FieldSpec,
    index: usize,
    issues: &mut Vec<ValidationIssue>,
) -> Option<u64> {
    let raw = spec.extract(record);
    let value = raw.trim();

    let mut reject = |detail: String| {
        issues.push(
            ValidationIssue::error(IssueCode::FieldNumeric, detail)
                .with_record_index(index)
                .with_field(spec.name),
        );
        None
    };

    if value.is_empty() {
        return reject(format!("{} is blank", spec.name));
    }
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return reject(format!("{} '{value}' is not numeric", spec.name));
    }
    match value.parse::<u64>() {
        Ok(n) => Some(n),
        Err(_) => reject(format!("{} '{value}' overflows", spec.name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn header(date: &str, company: &str, service: &str) -> RawRecord {
        RawRecord::from_text(&format!("100      {date:<8}{company:<10}{service:<8}"))
    }

    fn detail(date: &str, amount: &str) -> RawRecord {
        RawRecord::from_text(&format!("200      {date:<8}{amount:<15}"))
    }

    #[test]
    fn test_parse_header_valid() {
        let mut issues = Vec::new();
        let fields = parse_header(
            &header("20250115", "0000000042", "SVC01"),
            1,
            &ValidationConfig::default(),
            &mut issues,
        );

        assert!(issues.is_empty());
        assert_eq!(
            fields.generation_date,
            NaiveDate::from_ymd_opt(2025, 1, 15)
        );
        assert_eq!(fields.company_code, Some(42));
        assert_eq!(fields.service_id, "SVC01");
    }

    #[test]
    fn test_parse_header_blank_service_is_warn() {
        let mut issues = Vec::new();
        parse_header(
            &header("20250115", "0000000042", ""),
            1,
            &ValidationConfig::default(),
            &mut issues,
        );

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::FieldBlank);
        assert!(!issues[0].is_error());
    }

    #[test_case("2025011"; "seven digits")]
    #[test_case("2025x115"; "non digit")]
    #[test_case("20251315"; "month out of range")]
    #[test_case(""; "blank")]
    fn test_parse_detail_bad_date(date: &str) {
        let mut issues = Vec::new();
        let fields = parse_detail(
            &detail(date, "000000000000150"),
            7,
            &ValidationConfig::default(),
            &mut issues,
        );

        assert!(fields.movement_date.is_none());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::FieldDate);
        assert_eq!(issues[0].record_index, Some(7));
        assert_eq!(issues[0].field.as_deref(), Some("movement_date"));
    }

    #[test]
    fn test_parse_detail_date_outside_plausible_range() {
        let mut issues = Vec::new();
        let fields = parse_detail(
            &detail("19800101", "000000000000150"),
            2,
            &ValidationConfig::default(),
            &mut issues,
        );

        assert!(fields.movement_date.is_none());
        assert_eq!(issues[0].code, IssueCode::FieldDate);
        assert!(issues[0].message.contains("plausible range"));
    }

    #[test]
    fn test_parse_detail_bad_amount() {
        let mut issues = Vec::new();
        let fields = parse_detail(
            &detail("20250115", "12AB"),
            3,
            &ValidationConfig::default(),
            &mut issues,
        );

        assert!(fields.amount_cents.is_none());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::FieldNumeric);
    }

    #[test]
    fn test_parse_trailer() {
        let mut issues = Vec::new();
        let record = RawRecord::from_text("300      00000998000000000149700");
        let fields = parse_trailer(&record, 1000, &mut issues);

        assert!(issues.is_empty());
        assert_eq!(fields.record_count, Some(998));
        assert_eq!(fields.total_amount_cents, Some(149_700));
    }

    #[test]
    fn test_parse_trailer_blank_fields() {
        let mut issues = Vec::new();
        let record = RawRecord::from_text("300");
        let fields = parse_trailer(&record, 2, &mut issues);

        assert!(fields.record_count.is_none());
        assert!(fields.total_amount_cents.is_none());
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.code == IssueCode::FieldNumeric));
    }
}
