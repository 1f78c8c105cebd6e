// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Timecard (time entry) status tracking.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Approval states of a time entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeEntryStatus {
    /// Submitted, awaiting approval.
    Pending,
    /// Approved for payroll.
    Approved,
}

impl TimeEntryStatus {
    /// Returns the string representation used for persistence and APIs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
        }
    }

    /// Validates a transition to another time entry status.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not allowed.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        if matches!((self, new_status), (Self::Pending, Self::Approved)) {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "time entries move from pending to approved only".to_string(),
            })
        }
    }
}

impl FromStr for TimeEntryStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            _ => Err(DomainError::InvalidTimeEntryStatus {
                status: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for TimeEntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        assert!(
            TimeEntryStatus::Pending
                .validate_transition(TimeEntryStatus::Approved)
                .is_ok()
        );
        assert!(
            TimeEntryStatus::Approved
                .validate_transition(TimeEntryStatus::Pending)
                .is_err()
        );
    }
}
