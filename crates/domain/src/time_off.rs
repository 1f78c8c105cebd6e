// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Instructor time-off requests and conflict resolution rules.
//!
//! Approving a request does not require its session conflicts to be
//! resolved first; the review decision and per-session resolution are
//! independent actions, and unresolved conflicts are surfaced rather
//! than blocking.

use crate::error::DomainError;
use crate::session::SessionStatus;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Fixed cancellation reason used when resolving a conflict by
/// cancelling the session.
pub const CONFLICT_CANCEL_REASON: &str = "Instructor unavailable";

/// Review states of a time-off request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOffStatus {
    /// Awaiting admin review.
    Pending,
    /// Approved by an admin.
    Approved,
    /// Declined by an admin.
    Declined,
}

impl TimeOffStatus {
    /// Returns the string representation used for persistence and APIs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Declined => "declined",
        }
    }

    /// Validates a review transition.
    ///
    /// Only pending requests can be reviewed; a decision is final.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not allowed.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        let valid = matches!(
            (self, new_status),
            (Self::Pending, Self::Approved | Self::Declined)
        );

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "only pending time-off requests can be reviewed".to_string(),
            })
        }
    }
}

impl FromStr for TimeOffStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "declined" => Ok(Self::Declined),
            _ => Err(DomainError::InvalidTimeOffStatus {
                status: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for TimeOffStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why the instructor is requesting time off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonType {
    /// Planned vacation.
    Vacation,
    /// Illness.
    Sick,
    /// Personal time.
    Personal,
    /// Family obligation.
    Family,
    /// Anything else.
    Other,
}

impl ReasonType {
    /// Returns the string representation used for persistence and APIs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Vacation => "vacation",
            Self::Sick => "sick",
            Self::Personal => "personal",
            Self::Family => "family",
            Self::Other => "other",
        }
    }
}

impl FromStr for ReasonType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vacation" => Ok(Self::Vacation),
            "sick" => Ok(Self::Sick),
            "personal" => Ok(Self::Personal),
            "family" => Ok(Self::Family),
            "other" => Ok(Self::Other),
            _ => Err(DomainError::InvalidReasonType {
                value: s.to_string(),
            }),
        }
    }
}

/// Returns true if a conflicting session still needs resolution.
///
/// Sessions already cancelled or reassigned offer no further actions.
#[must_use]
pub const fn conflict_actionable(status: SessionStatus) -> bool {
    !matches!(status, SessionStatus::Cancelled | SessionStatus::Reassigned)
}

/// Validates the replacement selection for a conflicting session.
///
/// # Errors
///
/// Returns an error if no replacement was chosen or the replacement is
/// the requesting instructor.
pub fn validate_replacement(
    requesting_instructor_id: i64,
    replacement_instructor_id: i64,
) -> Result<(), DomainError> {
    if replacement_instructor_id == requesting_instructor_id {
        return Err(DomainError::ReplacementInstructorInvalid {
            reason: "replacement must differ from the requesting instructor".to_string(),
        });
    }
    Ok(())
}
