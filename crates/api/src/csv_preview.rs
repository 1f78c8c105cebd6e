// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! CSV preview and validation for bulk swimmer roster import.
//!
//! This module parses and validates a roster CSV without persisting or
//! mutating any state. Import itself is a separate, explicit action.

use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use swimops_domain::{validate_email, validate_swimmer_fields};
use thiserror::Error;

/// CSV format errors that abort the preview entirely.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CsvFormatError {
    /// The header row is missing required columns.
    #[error("Missing required headers: {missing}")]
    MissingHeaders {
        /// Comma-joined missing header names.
        missing: String,
    },
    /// The CSV could not be parsed at all.
    #[error("Unreadable CSV: {reason}")]
    Unreadable {
        /// Parser error message.
        reason: String,
    },
}

/// Status of a previewed CSV row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CsvRowStatus {
    /// Row is valid and can be imported.
    Valid,
    /// Row has validation errors and cannot be imported.
    Invalid,
}

/// A single row result from CSV preview validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvRowResult {
    /// The row number (1-based, excluding header).
    pub row_number: usize,
    /// The parsed first name (if present).
    pub first_name: Option<String>,
    /// The parsed last name (if present).
    pub last_name: Option<String>,
    /// The parsed date of birth (if present).
    pub date_of_birth: Option<String>,
    /// The parsed parent email (if present).
    pub parent_email: Option<String>,
    /// The parsed payment type (if present).
    pub payment_type: Option<String>,
    /// The row status.
    pub status: CsvRowStatus,
    /// Zero or more validation errors.
    pub errors: Vec<String>,
}

/// Result of CSV preview validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvPreviewResult {
    /// Per-row validation results.
    pub rows: Vec<CsvRowResult>,
    /// Total number of rows.
    pub total_rows: usize,
    /// Number of valid rows.
    pub valid_count: usize,
    /// Number of invalid rows.
    pub invalid_count: usize,
}

/// Required CSV column headers (case-insensitive, normalized).
const REQUIRED_HEADERS: &[&str] = &["first_name", "last_name", "date_of_birth", "parent_email"];

/// Recognized payment type values.
const PAYMENT_TYPES: &[&str] = &["private_pay", "funded", "scholarship", "other"];

/// Normalizes a CSV header for case-insensitive, whitespace-tolerant
/// matching.
fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

/// Validates that all required headers are present in the CSV.
fn validate_headers(headers: &StringRecord) -> Result<HashMap<String, usize>, CsvFormatError> {
    let mut header_map: HashMap<String, usize> = HashMap::new();

    for (idx, header) in headers.iter().enumerate() {
        header_map.insert(normalize_header(header), idx);
    }

    let missing: Vec<&str> = REQUIRED_HEADERS
        .iter()
        .copied()
        .filter(|required| !header_map.contains_key(*required))
        .collect();

    if missing.is_empty() {
        Ok(header_map)
    } else {
        Err(CsvFormatError::MissingHeaders {
            missing: missing.join(", "),
        })
    }
}

/// Validates a roster CSV without mutating state.
///
/// # Errors
///
/// Returns a format error if the CSV is unreadable or missing required
/// headers; per-row problems are reported in the result instead.
pub fn preview_csv_swimmers(csv_content: &str) -> Result<CsvPreviewResult, CsvFormatError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(csv_content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| CsvFormatError::Unreadable {
            reason: e.to_string(),
        })?
        .clone();
    let header_map = validate_headers(&headers)?;

    let mut rows = Vec::new();

    for (idx, record) in reader.records().enumerate() {
        let row_number = idx + 1;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                rows.push(CsvRowResult {
                    row_number,
                    first_name: None,
                    last_name: None,
                    date_of_birth: None,
                    parent_email: None,
                    payment_type: None,
                    status: CsvRowStatus::Invalid,
                    errors: vec![format!("unparseable row: {e}")],
                });
                continue;
            }
        };

        rows.push(validate_row(row_number, &record, &header_map));
    }

    let total_rows = rows.len();
    let valid_count = rows
        .iter()
        .filter(|r| r.status == CsvRowStatus::Valid)
        .count();

    Ok(CsvPreviewResult {
        total_rows,
        valid_count,
        invalid_count: total_rows - valid_count,
        rows,
    })
}

fn validate_row(
    row_number: usize,
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
) -> CsvRowResult {
    let mut errors: Vec<String> = Vec::new();

    let get_field = |name: &str| -> Option<String> {
        header_map
            .get(name)
            .and_then(|&idx| record.get(idx))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
    };

    let first_name = get_field("first_name");
    let last_name = get_field("last_name");
    let date_of_birth = get_field("date_of_birth");
    let parent_email = get_field("parent_email");
    let payment_type = get_field("payment_type");

    for (field, value) in [
        ("first_name", &first_name),
        ("last_name", &last_name),
        ("date_of_birth", &date_of_birth),
        ("parent_email", &parent_email),
    ] {
        if value.is_none() {
            errors.push(format!("{field}: required field is missing or empty"));
        }
    }

    if let (Some(first), Some(last), Some(dob)) = (&first_name, &last_name, &date_of_birth) {
        if let Err(e) = validate_swimmer_fields(first, last, dob) {
            errors.push(e.to_string());
        }
    }

    if let Some(email) = &parent_email {
        if let Err(e) = validate_email(email) {
            errors.push(format!("parent_email: {e}"));
        }
    }

    if let Some(payment) = &payment_type {
        if !PAYMENT_TYPES.contains(&payment.as_str()) {
            errors.push(format!("payment_type: unknown value '{payment}'"));
        }
    }

    let status = if errors.is_empty() {
        CsvRowStatus::Valid
    } else {
        CsvRowStatus::Invalid
    };

    CsvRowResult {
        row_number,
        first_name,
        last_name,
        date_of_birth,
        parent_email,
        payment_type,
        status,
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "first_name,last_name,date_of_birth,parent_email,payment_type\n";

    #[test]
    fn test_valid_roster() {
        let csv = format!(
            "{HEADER}Mia,Lopez,2019-04-05,parent@example.com,funded\nNoah,Kim,2018-11-20,noah@example.com,\n"
        );
        let result = preview_csv_swimmers(&csv).expect("preview succeeds");
        assert_eq!(result.total_rows, 2);
        assert_eq!(result.valid_count, 2);
        assert_eq!(result.invalid_count, 0);
    }

    #[test]
    fn test_missing_headers_abort() {
        let result = preview_csv_swimmers("first_name,last_name\nMia,Lopez\n");
        assert_eq!(
            result,
            Err(CsvFormatError::MissingHeaders {
                missing: String::from("date_of_birth, parent_email"),
            })
        );
    }

    #[test]
    fn test_headers_are_normalized() {
        let csv = "First Name,LAST NAME,Date Of Birth,Parent Email\nMia,Lopez,2019-04-05,p@example.com\n";
        let result = preview_csv_swimmers(csv).expect("preview succeeds");
        assert_eq!(result.valid_count, 1);
    }

    #[test]
    fn test_invalid_rows_are_reported_not_fatal() {
        let csv = format!(
            "{HEADER}Mia,Lopez,05/04/2019,parent@example.com,funded\n,Kim,2018-11-20,bad-email,mystery\n"
        );
        let result = preview_csv_swimmers(&csv).expect("preview succeeds");
        assert_eq!(result.total_rows, 2);
        assert_eq!(result.valid_count, 0);

        let first = &result.rows[0];
        assert_eq!(first.status, CsvRowStatus::Invalid);
        assert!(first.errors.iter().any(|e| e.contains("05/04/2019")));

        let second = &result.rows[1];
        assert_eq!(second.errors.len(), 3);
    }
}
