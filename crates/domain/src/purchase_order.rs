// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Purchase order lifecycle and billing state.
//!
//! A purchase order moves through an authorization lifecycle driven by
//! coordinator/admin actions. Billing state is tracked independently and
//! "overdue" is derived at read time from the due date, never stored.

use crate::error::DomainError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What a purchase order authorizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoType {
    /// An initial assessment authorization.
    Assessment,
    /// A block of lessons.
    Lessons,
}

impl PoType {
    /// Returns the string representation used for persistence and APIs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Assessment => "assessment",
            Self::Lessons => "lessons",
        }
    }
}

impl FromStr for PoType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assessment" => Ok(Self::Assessment),
            "lessons" => Ok(Self::Lessons),
            _ => Err(DomainError::InvalidPoType {
                value: s.to_string(),
            }),
        }
    }
}

/// Authorization lifecycle states of a purchase order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoStatus {
    /// Awaiting coordinator/admin review.
    Pending,
    /// Approved without an authorization number yet.
    ApprovedPendingAuth,
    /// Approved with an authorization number; bookable.
    Active,
    /// Usage reached authorization; closed out.
    Completed,
    /// The authorization window lapsed.
    Expired,
    /// Declined or withdrawn.
    Cancelled,
}

impl PoStatus {
    /// Returns the string representation used for persistence and APIs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::ApprovedPendingAuth => "approved_pending_auth",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns true if the approval action is offered for this status.
    #[must_use]
    pub const fn can_approve(&self) -> bool {
        matches!(self, Self::Pending | Self::ApprovedPendingAuth)
    }
}

impl FromStr for PoStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved_pending_auth" => Ok(Self::ApprovedPendingAuth),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "expired" => Ok(Self::Expired),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidPoStatus {
                status: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for PoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Billing state of a purchase order, independent of its lifecycle.
///
/// `Overdue` exists as a stored value for data imported from elsewhere,
/// but the overdue badge and filter use [`is_overdue`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingStatus {
    /// No invoice issued yet.
    Unbilled,
    /// Invoiced, awaiting payment.
    Billed,
    /// Partially paid.
    Partial,
    /// Paid in full.
    Paid,
    /// Stored overdue marker (see [`is_overdue`] for the live predicate).
    Overdue,
    /// Payment is contested.
    Disputed,
}

impl BillingStatus {
    /// Returns the string representation used for persistence and APIs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unbilled => "unbilled",
            Self::Billed => "billed",
            Self::Partial => "partial",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
            Self::Disputed => "disputed",
        }
    }
}

impl FromStr for BillingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unbilled" => Ok(Self::Unbilled),
            "billed" => Ok(Self::Billed),
            "partial" => Ok(Self::Partial),
            "paid" => Ok(Self::Paid),
            "overdue" => Ok(Self::Overdue),
            "disputed" => Ok(Self::Disputed),
            _ => Err(DomainError::InvalidBillingStatus {
                status: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for BillingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The reviewer's decision in the approval dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum ApprovalDecision {
    /// Approve, optionally assigning the authorization number now.
    Approve {
        /// Authorization number from the funding source, if known.
        authorization_number: Option<String>,
        /// Replacement notes; when absent the stored notes are kept.
        notes: Option<String>,
    },
    /// Decline with a required reason.
    Decline {
        /// Why the request is declined.
        reason: String,
    },
}

/// The state changes an approval decision produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalOutcome {
    /// The new purchase order status.
    pub new_status: PoStatus,
    /// Authorization number to store, if one was supplied.
    pub authorization_number: Option<String>,
    /// Replacement notes, if the notes field should change.
    pub notes: Option<String>,
}

/// Applies an approval-dialog decision to the current status.
///
/// - Approve with an authorization number: `pending` or
///   `approved_pending_auth` becomes `active`.
/// - Approve without one: `pending` becomes `approved_pending_auth`
///   (an already approved-pending-auth order stays put until a number
///   arrives).
/// - Decline: offered for `pending` only, requires a non-empty reason,
///   and overwrites the notes with `"Declined: <reason>"`.
///
/// # Errors
///
/// Returns an error if the decision is not permitted for the current
/// status or the decline reason is missing.
pub fn apply_approval_decision(
    current: PoStatus,
    decision: &ApprovalDecision,
) -> Result<ApprovalOutcome, DomainError> {
    match decision {
        ApprovalDecision::Approve {
            authorization_number,
            notes,
        } => {
            if !current.can_approve() {
                return Err(DomainError::InvalidStatusTransition {
                    from: current.as_str().to_string(),
                    to: PoStatus::Active.as_str().to_string(),
                    reason: "approval is only offered for pending or approved_pending_auth orders"
                        .to_string(),
                });
            }

            let auth = authorization_number
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string);

            let new_status = if auth.is_some() {
                PoStatus::Active
            } else {
                PoStatus::ApprovedPendingAuth
            };

            Ok(ApprovalOutcome {
                new_status,
                authorization_number: auth,
                notes: notes.clone(),
            })
        }
        ApprovalDecision::Decline { reason } => {
            if current != PoStatus::Pending {
                return Err(DomainError::DeclineNotAllowed {
                    status: current.as_str().to_string(),
                });
            }
            let reason = reason.trim();
            if reason.is_empty() {
                return Err(DomainError::DeclineReasonRequired);
            }

            Ok(ApprovalOutcome {
                new_status: PoStatus::Cancelled,
                authorization_number: None,
                notes: Some(format!("Declined: {reason}")),
            })
        }
    }
}

/// Returns true if the manual "Mark Complete" action is offered.
#[must_use]
pub const fn can_mark_complete(status: PoStatus, used: i32, authorized: i32) -> bool {
    matches!(status, PoStatus::Active) && used >= authorized
}

/// Validates the manual completion transition.
///
/// # Errors
///
/// Returns an error unless the order is `active` with
/// `sessions_used >= sessions_authorized`.
pub fn completion_transition(
    current: PoStatus,
    used: i32,
    authorized: i32,
) -> Result<PoStatus, DomainError> {
    if current != PoStatus::Active {
        return Err(DomainError::InvalidStatusTransition {
            from: current.as_str().to_string(),
            to: PoStatus::Completed.as_str().to_string(),
            reason: "only active purchase orders can be completed".to_string(),
        });
    }
    if used < authorized {
        return Err(DomainError::CompletionNotAllowed { used, authorized });
    }
    Ok(PoStatus::Completed)
}

/// Derived overdue predicate: the due date has passed and the order is
/// not paid. Never persisted; computed wherever an overdue badge or
/// filter is needed so it cannot drift from the stored fields.
///
/// # Errors
///
/// Returns an error if the due date does not parse.
pub fn is_overdue(
    due_date: Option<&str>,
    billing_status: BillingStatus,
    today: NaiveDate,
) -> Result<bool, DomainError> {
    let Some(due) = due_date else {
        return Ok(false);
    };

    let due: NaiveDate =
        NaiveDate::parse_from_str(due, "%Y-%m-%d").map_err(|e| DomainError::DateParseError {
            value: due.to_string(),
            error: e.to_string(),
        })?;

    Ok(due < today && billing_status != BillingStatus::Paid)
}
