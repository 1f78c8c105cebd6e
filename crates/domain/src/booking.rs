// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking status and parent-facing cancellation rules.
//!
//! Single-session cancellation is only available in the app while the
//! session start is more than [`CANCELLATION_CUTOFF_HOURS`] away; inside
//! that window parents are directed to a contact-by-text flow instead.
//! Block cancellation of a recurring batch is all-or-nothing and only
//! offered while the batch's first session is still in the future.

use crate::error::DomainError;
use crate::session::parse_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Hours before session start below which in-app cancellation is blocked.
pub const CANCELLATION_CUTOFF_HOURS: f64 = 24.0;

/// Lifecycle states of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// An active booking.
    Confirmed,
    /// Cancelled by a parent, admin, or session cancellation.
    Cancelled,
    /// The session took place.
    Completed,
}

impl BookingStatus {
    /// Returns the string representation used for persistence and APIs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Validates a transition to another booking status.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not allowed.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        let valid = matches!(
            (self, new_status),
            (Self::Confirmed, Self::Cancelled | Self::Completed)
        );

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "transition not permitted by booking lifecycle rules".to_string(),
            })
        }
    }
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            _ => Err(DomainError::InvalidBookingStatus {
                status: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a booking pays for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingType {
    /// A regular lesson.
    Lesson,
    /// An initial assessment.
    Assessment,
}

impl BookingType {
    /// Returns the string representation used for persistence and APIs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lesson => "lesson",
            Self::Assessment => "assessment",
        }
    }
}

impl FromStr for BookingType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lesson" => Ok(Self::Lesson),
            "assessment" => Ok(Self::Assessment),
            _ => Err(DomainError::InvalidBookingType {
                value: s.to_string(),
            }),
        }
    }
}

/// Outcome of evaluating the single-session cancellation window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CancellationWindow {
    /// The session is far enough out to cancel in the app.
    Cancellable {
        /// Hours until session start.
        hours_before: f64,
    },
    /// Inside the cutoff (or already started); the parent must text
    /// instead of cancelling in the app.
    LateCancellation {
        /// Hours until session start (negative once started).
        hours_before: f64,
    },
}

impl CancellationWindow {
    /// Returns true if in-app cancellation is permitted.
    #[must_use]
    pub const fn is_cancellable(&self) -> bool {
        matches!(self, Self::Cancellable { .. })
    }

    /// Returns the hours until session start.
    #[must_use]
    pub const fn hours_before(&self) -> f64 {
        match self {
            Self::Cancellable { hours_before } | Self::LateCancellation { hours_before } => {
                *hours_before
            }
        }
    }
}

/// Evaluates the 24-hour cancellation rule for a session start time.
///
/// Past sessions fall inside the late window as well; callers can tell
/// them apart by the negative `hours_before`.
///
/// # Errors
///
/// Returns an error if the start time does not parse.
#[allow(clippy::cast_precision_loss)]
pub fn evaluate_cancellation_window(
    session_start: &str,
    now: DateTime<Utc>,
) -> Result<CancellationWindow, DomainError> {
    let start = parse_timestamp(session_start)?;
    let hours_before = (start - now).num_seconds() as f64 / 3600.0;

    if hours_before < CANCELLATION_CUTOFF_HOURS {
        Ok(CancellationWindow::LateCancellation { hours_before })
    } else {
        Ok(CancellationWindow::Cancellable { hours_before })
    }
}

/// Returns whether block (recurring-batch) cancellation is offered.
///
/// The batch's earliest session start must be strictly in the future.
///
/// # Errors
///
/// Returns an error if the start time does not parse.
pub fn block_cancel_allowed(
    first_session_start: &str,
    now: DateTime<Utc>,
) -> Result<bool, DomainError> {
    let start = parse_timestamp(first_session_start)?;
    Ok(start > now)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_cancellable_outside_cutoff() {
        let now = at(2026, 3, 2, 9, 0);
        let window = evaluate_cancellation_window("2026-03-04T09:00:00Z", now).unwrap();
        assert!(window.is_cancellable());
        assert!((window.hours_before() - 48.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_late_inside_cutoff() {
        let now = at(2026, 3, 2, 9, 0);
        let window = evaluate_cancellation_window("2026-03-03T08:00:00Z", now).unwrap();
        assert!(!window.is_cancellable());
        assert!((window.hours_before() - 23.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_exactly_at_cutoff_is_cancellable() {
        let now = at(2026, 3, 2, 9, 0);
        let window = evaluate_cancellation_window("2026-03-03T09:00:00Z", now).unwrap();
        assert!(window.is_cancellable());
    }

    #[test]
    fn test_past_session_is_late_with_negative_hours() {
        let now = at(2026, 3, 2, 9, 0);
        let window = evaluate_cancellation_window("2026-03-01T09:00:00Z", now).unwrap();
        assert!(!window.is_cancellable());
        assert!(window.hours_before() < 0.0);
    }

    #[test]
    fn test_block_cancel_requires_future_first_session() {
        let now = at(2026, 3, 2, 9, 0);
        assert!(block_cancel_allowed("2026-03-02T09:00:01Z", now).unwrap());
        assert!(!block_cancel_allowed("2026-03-02T09:00:00Z", now).unwrap());
        assert!(!block_cancel_allowed("2026-03-01T09:00:00Z", now).unwrap());
    }

    #[test]
    fn test_booking_transitions() {
        assert!(
            BookingStatus::Confirmed
                .validate_transition(BookingStatus::Cancelled)
                .is_ok()
        );
        assert!(
            BookingStatus::Confirmed
                .validate_transition(BookingStatus::Completed)
                .is_ok()
        );
        assert!(
            BookingStatus::Cancelled
                .validate_transition(BookingStatus::Confirmed)
                .is_err()
        );
        assert!(
            BookingStatus::Completed
                .validate_transition(BookingStatus::Cancelled)
                .is_err()
        );
    }
}
