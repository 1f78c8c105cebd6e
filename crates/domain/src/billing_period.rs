// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Monthly billing period and line item lifecycles.
//!
//! A period aggregates one line item per swimmer+authorization for a
//! month/year bucket. Line items are generated while the period is a
//! draft, reviewed individually, and marked billed as a side effect of
//! the XML export.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle states of a billing period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingPeriodStatus {
    /// Nothing generated yet.
    Draft,
    /// Line items populated.
    Generated,
    /// Line items reviewed.
    Reviewed,
    /// Exported to the funding source.
    Submitted,
    /// Payment received.
    Paid,
}

impl BillingPeriodStatus {
    /// Returns the string representation used for persistence and APIs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Generated => "generated",
            Self::Reviewed => "reviewed",
            Self::Submitted => "submitted",
            Self::Paid => "paid",
        }
    }

    /// Checks if a transition from this state to another is valid.
    ///
    /// The progression is strictly forward:
    /// `draft` → `generated` → `reviewed` → `submitted` → `paid`,
    /// with `generated` → `submitted` allowed when review happens
    /// implicitly during export.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Draft, Self::Generated)
                | (Self::Generated, Self::Reviewed | Self::Submitted)
                | (Self::Reviewed, Self::Submitted)
                | (Self::Submitted, Self::Paid)
        )
    }

    /// Validates a transition, producing a descriptive error.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not allowed.
    pub fn validate_transition(&self, target: Self) -> Result<(), DomainError> {
        if self.can_transition_to(target) {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: target.as_str().to_string(),
                reason: "billing periods progress draft → generated → reviewed → submitted → paid"
                    .to_string(),
            })
        }
    }

    /// Returns true if line-item generation is allowed.
    #[must_use]
    pub const fn generation_allowed(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the XML export is allowed.
    ///
    /// Export is disabled while the period is still a draft (nothing has
    /// been generated yet).
    #[must_use]
    pub const fn export_allowed(&self) -> bool {
        !matches!(self, Self::Draft)
    }
}

impl FromStr for BillingPeriodStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "generated" => Ok(Self::Generated),
            "reviewed" => Ok(Self::Reviewed),
            "submitted" => Ok(Self::Submitted),
            "paid" => Ok(Self::Paid),
            _ => Err(DomainError::InvalidPeriodStatus {
                status: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for BillingPeriodStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Review/billing states of a billing line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItemStatus {
    /// Awaiting review.
    Pending,
    /// Approved for this month's export.
    Included,
    /// The swimmer received no service this month.
    NoService,
    /// Held for a later period.
    Deferred,
    /// Exported; billed to the funding source.
    Billed,
}

impl LineItemStatus {
    /// Returns the string representation used for persistence and APIs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Included => "included",
            Self::NoService => "no_service",
            Self::Deferred => "deferred",
            Self::Billed => "billed",
        }
    }

    /// Validates a reviewer-driven transition.
    ///
    /// Reviewers move `pending` items to `included`, `no_service`, or
    /// `deferred`; `billed` is reached only through export.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not allowed.
    pub fn validate_review_transition(&self, target: Self) -> Result<(), DomainError> {
        let valid = matches!(
            (self, target),
            (
                Self::Pending,
                Self::Included | Self::NoService | Self::Deferred
            ) | (Self::Included | Self::NoService | Self::Deferred, Self::Pending)
        );

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: target.as_str().to_string(),
                reason: "line items are reviewed from pending; billed is set by export only"
                    .to_string(),
            })
        }
    }
}

impl FromStr for LineItemStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "included" => Ok(Self::Included),
            "no_service" => Ok(Self::NoService),
            "deferred" => Ok(Self::Deferred),
            "billed" => Ok(Self::Billed),
            _ => Err(DomainError::InvalidLineItemStatus {
                status: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for LineItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
