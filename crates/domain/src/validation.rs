// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Form-level validation rules.
//!
//! These checks run before any persistence call; a violation rejects the
//! submission with a field-specific error.

use crate::error::DomainError;
use crate::types::FundingSource;
use chrono::NaiveDate;

/// Splits a comma-separated domain list into trimmed entries.
///
/// Empty entries are dropped; no format validation happens here.
#[must_use]
pub fn parse_email_domains(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Validates a funding source configuration.
///
/// Rules:
/// - name and short name must be non-empty
/// - at least one allowed email domain, every entry starting with `@`
/// - assessment sessions, lessons per PO, and authorization months
///   must be positive
/// - `0 <= renewal_alert_threshold <= lessons_per_po`
///
/// # Errors
///
/// Returns the first violated rule as a field-specific error.
pub fn validate_funding_source(source: &FundingSource) -> Result<(), DomainError> {
    if source.name.trim().is_empty() {
        return Err(DomainError::InvalidName(
            "funding source name is required".to_string(),
        ));
    }
    if source.short_name.trim().is_empty() {
        return Err(DomainError::InvalidName(
            "funding source short name is required".to_string(),
        ));
    }

    if source.allowed_email_domains.is_empty() {
        return Err(DomainError::EmailDomainsRequired);
    }
    for domain in &source.allowed_email_domains {
        if !domain.starts_with('@') {
            return Err(DomainError::EmailDomainFormat {
                domain: domain.clone(),
            });
        }
    }

    if source.assessment_sessions <= 0 {
        return Err(DomainError::InvalidCount {
            field: "assessment_sessions",
            value: source.assessment_sessions,
        });
    }
    if source.lessons_per_po <= 0 {
        return Err(DomainError::InvalidCount {
            field: "lessons_per_po",
            value: source.lessons_per_po,
        });
    }
    if source.authorization_months <= 0 {
        return Err(DomainError::InvalidCount {
            field: "authorization_months",
            value: source.authorization_months,
        });
    }

    if source.renewal_alert_threshold < 0
        || source.renewal_alert_threshold > source.lessons_per_po
    {
        return Err(DomainError::RenewalThresholdOutOfRange {
            threshold: source.renewal_alert_threshold,
            lessons_per_po: source.lessons_per_po,
        });
    }

    if source.lesson_rate_cents <= 0 {
        return Err(DomainError::InvalidCount {
            field: "lesson_rate_cents",
            value: i32::try_from(source.lesson_rate_cents).unwrap_or(i32::MAX),
        });
    }

    Ok(())
}

/// Validates swimmer name and date-of-birth fields.
///
/// # Errors
///
/// Returns a field-specific error for the first violation.
pub fn validate_swimmer_fields(
    first_name: &str,
    last_name: &str,
    date_of_birth: &str,
) -> Result<(), DomainError> {
    if first_name.trim().is_empty() {
        return Err(DomainError::InvalidName(
            "first name is required".to_string(),
        ));
    }
    if last_name.trim().is_empty() {
        return Err(DomainError::InvalidName(
            "last name is required".to_string(),
        ));
    }
    NaiveDate::parse_from_str(date_of_birth, "%Y-%m-%d").map_err(|e| {
        DomainError::DateParseError {
            value: date_of_birth.to_string(),
            error: e.to_string(),
        }
    })?;
    Ok(())
}

/// Minimal email shape check: a non-empty local part and domain around
/// a single `@`.
///
/// # Errors
///
/// Returns `DomainError::InvalidEmail` if the value fails the check.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    let trimmed = email.trim();
    let mut parts = trimmed.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();

    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(DomainError::InvalidEmail(trimmed.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_source() -> FundingSource {
        FundingSource {
            funding_source_id: None,
            name: String::from("Valley Regional Center"),
            short_name: String::from("VMRC"),
            allowed_email_domains: vec![String::from("@regional-center.net")],
            assessment_sessions: 2,
            lessons_per_po: 12,
            authorization_months: 6,
            renewal_alert_threshold: 11,
            lesson_rate_cents: 9500,
            billing_contact_name: Some(String::from("Billing Desk")),
            billing_contact_email: Some(String::from("billing@regional-center.net")),
            billing_contact_phone: None,
            is_active: true,
        }
    }

    #[test]
    fn test_valid_source_passes() {
        assert!(validate_funding_source(&valid_source()).is_ok());
    }

    #[test]
    fn test_domains_must_start_with_at() {
        let mut source = valid_source();
        source.allowed_email_domains =
            vec![String::from("@ok.org"), String::from("missing-at.org")];
        assert_eq!(
            validate_funding_source(&source),
            Err(DomainError::EmailDomainFormat {
                domain: String::from("missing-at.org"),
            })
        );
    }

    #[test]
    fn test_at_least_one_domain_required() {
        let mut source = valid_source();
        source.allowed_email_domains.clear();
        assert_eq!(
            validate_funding_source(&source),
            Err(DomainError::EmailDomainsRequired)
        );
    }

    #[test]
    fn test_renewal_threshold_bounds() {
        let mut source = valid_source();
        source.renewal_alert_threshold = 13;
        assert_eq!(
            validate_funding_source(&source),
            Err(DomainError::RenewalThresholdOutOfRange {
                threshold: 13,
                lessons_per_po: 12,
            })
        );

        source.renewal_alert_threshold = -1;
        assert!(validate_funding_source(&source).is_err());

        source.renewal_alert_threshold = 0;
        assert!(validate_funding_source(&source).is_ok());

        source.renewal_alert_threshold = 12;
        assert!(validate_funding_source(&source).is_ok());
    }

    #[test]
    fn test_counts_must_be_positive() {
        let mut source = valid_source();
        source.lessons_per_po = 0;
        assert!(validate_funding_source(&source).is_err());
    }

    #[test]
    fn test_parse_email_domains_trims_and_drops_empties() {
        assert_eq!(
            parse_email_domains(" @a.org , @b.net ,, "),
            vec![String::from("@a.org"), String::from("@b.net")]
        );
        assert!(parse_email_domains("  ").is_empty());
    }

    #[test]
    fn test_swimmer_fields() {
        assert!(validate_swimmer_fields("Mia", "Lopez", "2019-04-05").is_ok());
        assert!(validate_swimmer_fields("", "Lopez", "2019-04-05").is_err());
        assert!(validate_swimmer_fields("Mia", " ", "2019-04-05").is_err());
        assert!(validate_swimmer_fields("Mia", "Lopez", "04/05/2019").is_err());
    }

    #[test]
    fn test_email_shape() {
        assert!(validate_email("parent@example.com").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@nodot").is_err());
    }
}
