// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use swimops_domain::DomainError;
use swimops_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/persistence errors and represent the
/// API contract.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The booking is inside the 24-hour window; the parent must text
    /// instead of cancelling in the app.
    LateCancellation {
        /// Hours until session start, rounded to one decimal.
        hours_before_session: f64,
        /// User-facing guidance.
        message: String,
        /// Text line to contact.
        contact_phone: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::LateCancellation {
                hours_before_session,
                message,
                ..
            } => {
                write!(
                    f,
                    "Late cancellation ({hours_before_session} hours before session): {message}"
                )
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not
/// leaked directly.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidName(msg) => ApiError::InvalidInput {
            field: String::from("name"),
            message: msg,
        },
        DomainError::InvalidEmail(msg) => ApiError::InvalidInput {
            field: String::from("email"),
            message: format!("Invalid email: {msg}"),
        },
        DomainError::InvalidRole(msg) => ApiError::InvalidInput {
            field: String::from("role"),
            message: format!("Unknown role: {msg}"),
        },
        DomainError::InvalidEnrollmentStatus { status } => ApiError::InvalidInput {
            field: String::from("enrollment_status"),
            message: format!("Unknown enrollment status: {status}"),
        },
        DomainError::InvalidEnrollmentTransition { from, to } => ApiError::DomainRuleViolation {
            rule: String::from("enrollment_lifecycle"),
            message: format!("Enrollment status cannot change from {from} to {to}"),
        },
        DomainError::InvalidPaymentType { value } => ApiError::InvalidInput {
            field: String::from("payment_type"),
            message: format!("Unknown payment type: {value}"),
        },
        DomainError::InvalidSessionStatus { status } => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Unknown session status: {status}"),
        },
        DomainError::InvalidBookingStatus { status } => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Unknown booking status: {status}"),
        },
        DomainError::InvalidBookingType { value } => ApiError::InvalidInput {
            field: String::from("booking_type"),
            message: format!("Unknown booking type: {value}"),
        },
        DomainError::InvalidPoStatus { status } => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Unknown purchase order status: {status}"),
        },
        DomainError::InvalidPoType { value } => ApiError::InvalidInput {
            field: String::from("po_type"),
            message: format!("Unknown purchase order type: {value}"),
        },
        DomainError::InvalidBillingStatus { status } => ApiError::InvalidInput {
            field: String::from("billing_status"),
            message: format!("Unknown billing status: {status}"),
        },
        DomainError::InvalidPeriodStatus { status } => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Unknown billing period status: {status}"),
        },
        DomainError::InvalidLineItemStatus { status } => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Unknown billing line item status: {status}"),
        },
        DomainError::InvalidTimeOffStatus { status } => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Unknown time-off status: {status}"),
        },
        DomainError::InvalidReasonType { value } => ApiError::InvalidInput {
            field: String::from("reason_type"),
            message: format!("Unknown reason type: {value}"),
        },
        DomainError::InvalidTimeEntryStatus { status } => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Unknown time entry status: {status}"),
        },
        DomainError::InvalidStatusTransition { from, to, reason } => {
            ApiError::DomainRuleViolation {
                rule: String::from("status_lifecycle"),
                message: format!("Cannot transition from {from} to {to}: {reason}"),
            }
        }
        DomainError::DeclineReasonRequired => ApiError::InvalidInput {
            field: String::from("reason"),
            message: String::from("A reason is required to decline a purchase order"),
        },
        DomainError::DeclineNotAllowed { status } => ApiError::DomainRuleViolation {
            rule: String::from("po_decline"),
            message: format!(
                "Only pending purchase orders can be declined (current status: {status})"
            ),
        },
        DomainError::CompletionNotAllowed { used, authorized } => ApiError::DomainRuleViolation {
            rule: String::from("po_completion"),
            message: format!(
                "Purchase order cannot be completed: {used} of {authorized} sessions used"
            ),
        },
        DomainError::EmptySelection => ApiError::InvalidInput {
            field: String::from("session_ids"),
            message: String::from("At least one session must be selected"),
        },
        DomainError::EmailDomainFormat { domain } => ApiError::InvalidInput {
            field: String::from("allowed_email_domains"),
            message: format!(
                "Email domains must start with @ (e.g., @regional-center.net, @funding.org): '{domain}'"
            ),
        },
        DomainError::EmailDomainsRequired => ApiError::InvalidInput {
            field: String::from("allowed_email_domains"),
            message: String::from("At least one email domain is required"),
        },
        DomainError::RenewalThresholdOutOfRange {
            threshold,
            lessons_per_po,
        } => ApiError::InvalidInput {
            field: String::from("renewal_alert_threshold"),
            message: format!("Renewal alert must be between 0 and {lessons_per_po} (got {threshold})"),
        },
        DomainError::InvalidCount { field, value } => ApiError::InvalidInput {
            field: field.to_string(),
            message: format!("{field} must be greater than 0 (got {value})"),
        },
        DomainError::InvalidTimeRange { reason } => ApiError::InvalidInput {
            field: String::from("time_range"),
            message: reason,
        },
        DomainError::DateParseError { value, error } => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("Failed to parse date '{value}': {error}"),
        },
        DomainError::InvalidSlotDuration { minutes } => ApiError::InvalidInput {
            field: String::from("session_duration"),
            message: format!("Invalid slot duration: {minutes} minutes"),
        },
        DomainError::InvalidTimezone(tz) => ApiError::InvalidInput {
            field: String::from("timezone"),
            message: format!("Invalid timezone: {tz}"),
        },
        DomainError::SessionNotDraft { session_id } => ApiError::DomainRuleViolation {
            rule: String::from("draft_sessions_only"),
            message: format!("Session {session_id} is not a draft"),
        },
        DomainError::ReplacementInstructorInvalid { reason } => ApiError::InvalidInput {
            field: String::from("replacement_instructor_id"),
            message: reason,
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Business-rule rejections surface as domain rule violations with
/// their own messages; everything else is an internal error.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message,
        },
        PersistenceError::FundingSourceInUse {
            funding_source_id,
            swimmer_count,
        } => ApiError::DomainRuleViolation {
            rule: String::from("funding_source_in_use"),
            message: format!(
                "Cannot delete funding source {funding_source_id}: {swimmer_count} swimmer(s) reference it"
            ),
        },
        PersistenceError::ProfileHasSwimmers {
            user_id,
            swimmer_count,
        } => ApiError::DomainRuleViolation {
            rule: String::from("profile_has_swimmers"),
            message: format!(
                "Cannot delete user {user_id}: {swimmer_count} linked swimmer(s)"
            ),
        },
        PersistenceError::BulkOperationFailed(message) => ApiError::DomainRuleViolation {
            rule: String::from("bulk_all_or_nothing"),
            message,
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
