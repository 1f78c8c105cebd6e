// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A name field is empty or invalid.
    InvalidName(String),
    /// An email address is empty or malformed.
    InvalidEmail(String),
    /// A role string is not recognized.
    InvalidRole(String),
    /// An enrollment status string is not recognized.
    InvalidEnrollmentStatus {
        /// The unrecognized status value.
        status: String,
    },
    /// An enrollment status transition is not permitted.
    InvalidEnrollmentTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },
    /// A payment type string is not recognized.
    InvalidPaymentType {
        /// The unrecognized value.
        value: String,
    },
    /// A session status string is not recognized.
    InvalidSessionStatus {
        /// The unrecognized status value.
        status: String,
    },
    /// A booking status string is not recognized.
    InvalidBookingStatus {
        /// The unrecognized status value.
        status: String,
    },
    /// A booking type string is not recognized.
    InvalidBookingType {
        /// The unrecognized value.
        value: String,
    },
    /// A purchase order status string is not recognized.
    InvalidPoStatus {
        /// The unrecognized status value.
        status: String,
    },
    /// A purchase order type string is not recognized.
    InvalidPoType {
        /// The unrecognized value.
        value: String,
    },
    /// A billing status string is not recognized.
    InvalidBillingStatus {
        /// The unrecognized status value.
        status: String,
    },
    /// A billing period status string is not recognized.
    InvalidPeriodStatus {
        /// The unrecognized status value.
        status: String,
    },
    /// A billing line item status string is not recognized.
    InvalidLineItemStatus {
        /// The unrecognized status value.
        status: String,
    },
    /// A time-off request status string is not recognized.
    InvalidTimeOffStatus {
        /// The unrecognized status value.
        status: String,
    },
    /// A time-off reason type string is not recognized.
    InvalidReasonType {
        /// The unrecognized value.
        value: String,
    },
    /// A time entry status string is not recognized.
    InvalidTimeEntryStatus {
        /// The unrecognized status value.
        status: String,
    },
    /// A status transition is not permitted by lifecycle rules.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition is rejected.
        reason: String,
    },
    /// Declining a purchase order requires a reason.
    DeclineReasonRequired,
    /// Decline is only offered for pending purchase orders.
    DeclineNotAllowed {
        /// The current status.
        status: String,
    },
    /// A purchase order may only be completed once usage reaches authorization.
    CompletionNotAllowed {
        /// Sessions used so far.
        used: i32,
        /// Sessions authorized.
        authorized: i32,
    },
    /// A bulk operation was requested with an empty selection.
    EmptySelection,
    /// An allowed email domain entry does not start with `@`.
    EmailDomainFormat {
        /// The offending entry.
        domain: String,
    },
    /// At least one allowed email domain is required.
    EmailDomainsRequired,
    /// The renewal alert threshold is outside the permitted range.
    RenewalThresholdOutOfRange {
        /// The requested threshold.
        threshold: i32,
        /// The lessons-per-PO upper bound.
        lessons_per_po: i32,
    },
    /// A numeric configuration field must be positive.
    InvalidCount {
        /// The field name.
        field: &'static str,
        /// The invalid value.
        value: i32,
    },
    /// A start/end time pair is inverted or otherwise invalid.
    InvalidTimeRange {
        /// Description of the problem.
        reason: String,
    },
    /// Failed to parse a date or timestamp from a string.
    DateParseError {
        /// The invalid value.
        value: String,
        /// The parser error message.
        error: String,
    },
    /// Slot duration must be positive and fit within the daily window.
    InvalidSlotDuration {
        /// The invalid duration in minutes.
        minutes: i64,
    },
    /// A timezone name could not be resolved.
    InvalidTimezone(String),
    /// The operation requires the session to still be a draft.
    SessionNotDraft {
        /// The offending session id.
        session_id: i64,
    },
    /// A replacement instructor selection is invalid.
    ReplacementInstructorInvalid {
        /// Why the selection is rejected.
        reason: String,
    },
}

impl std::fmt::Display for DomainError {
    #[allow(clippy::too_many_lines)]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::InvalidEmail(msg) => write!(f, "Invalid email: {msg}"),
            Self::InvalidRole(msg) => write!(f, "Invalid role: {msg}"),
            Self::InvalidEnrollmentStatus { status } => {
                write!(f, "Invalid enrollment status: {status}")
            }
            Self::InvalidEnrollmentTransition { from, to } => {
                write!(f, "Enrollment status cannot change from {from} to {to}")
            }
            Self::InvalidPaymentType { value } => write!(f, "Invalid payment type: {value}"),
            Self::InvalidSessionStatus { status } => {
                write!(f, "Invalid session status: {status}")
            }
            Self::InvalidBookingStatus { status } => {
                write!(f, "Invalid booking status: {status}")
            }
            Self::InvalidBookingType { value } => write!(f, "Invalid booking type: {value}"),
            Self::InvalidPoStatus { status } => {
                write!(f, "Invalid purchase order status: {status}")
            }
            Self::InvalidPoType { value } => {
                write!(f, "Invalid purchase order type: {value}")
            }
            Self::InvalidBillingStatus { status } => {
                write!(f, "Invalid billing status: {status}")
            }
            Self::InvalidPeriodStatus { status } => {
                write!(f, "Invalid billing period status: {status}")
            }
            Self::InvalidLineItemStatus { status } => {
                write!(f, "Invalid billing line item status: {status}")
            }
            Self::InvalidTimeOffStatus { status } => {
                write!(f, "Invalid time-off status: {status}")
            }
            Self::InvalidReasonType { value } => {
                write!(f, "Invalid time-off reason type: {value}")
            }
            Self::InvalidTimeEntryStatus { status } => {
                write!(f, "Invalid time entry status: {status}")
            }
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Cannot transition from {from} to {to}: {reason}")
            }
            Self::DeclineReasonRequired => {
                write!(f, "A reason is required to decline a purchase order")
            }
            Self::DeclineNotAllowed { status } => {
                write!(
                    f,
                    "Only pending purchase orders can be declined (current status: {status})"
                )
            }
            Self::CompletionNotAllowed { used, authorized } => {
                write!(
                    f,
                    "Purchase order cannot be completed: {used} of {authorized} sessions used"
                )
            }
            Self::EmptySelection => {
                write!(f, "At least one session must be selected")
            }
            Self::EmailDomainFormat { domain } => {
                write!(
                    f,
                    "Email domains must start with @ (e.g., @regional-center.net): '{domain}'"
                )
            }
            Self::EmailDomainsRequired => {
                write!(f, "At least one email domain is required")
            }
            Self::RenewalThresholdOutOfRange {
                threshold,
                lessons_per_po,
            } => {
                write!(
                    f,
                    "Renewal alert must be between 0 and {lessons_per_po} (got {threshold})"
                )
            }
            Self::InvalidCount { field, value } => {
                write!(f, "{field} must be greater than 0 (got {value})")
            }
            Self::InvalidTimeRange { reason } => write!(f, "Invalid time range: {reason}"),
            Self::DateParseError { value, error } => {
                write!(f, "Failed to parse date '{value}': {error}")
            }
            Self::InvalidSlotDuration { minutes } => {
                write!(f, "Invalid slot duration: {minutes} minutes")
            }
            Self::InvalidTimezone(tz) => write!(f, "Invalid timezone: {tz}"),
            Self::SessionNotDraft { session_id } => {
                write!(f, "Session {session_id} is not a draft")
            }
            Self::ReplacementInstructorInvalid { reason } => {
                write!(f, "Invalid replacement instructor: {reason}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
