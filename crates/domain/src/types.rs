// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Roles a profile may hold.
///
/// Roles live in a separate association; a profile with no role rows
/// defaults to `Parent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A parent booking sessions for their swimmers.
    #[default]
    Parent,
    /// An instructor teaching sessions.
    Instructor,
    /// A system administrator.
    Admin,
    /// A funding-source coordinator managing referrals and authorizations.
    Coordinator,
}

impl Role {
    /// Returns the string representation used for persistence and APIs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Parent => "parent",
            Self::Instructor => "instructor",
            Self::Admin => "admin",
            Self::Coordinator => "coordinator",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "parent" => Ok(Self::Parent),
            "instructor" => Ok(Self::Instructor),
            "admin" => Ok(Self::Admin),
            "coordinator" => Ok(Self::Coordinator),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Enrollment lifecycle of a swimmer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    /// Referred but not yet offered a spot.
    Waitlist,
    /// Offered a spot; paperwork or funding pending.
    Pending,
    /// Actively enrolled.
    Enrolled,
    /// No longer participating.
    Dropped,
}

impl EnrollmentStatus {
    /// Returns the string representation used for persistence and APIs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Waitlist => "waitlist",
            Self::Pending => "pending",
            Self::Enrolled => "enrolled",
            Self::Dropped => "dropped",
        }
    }

    /// Validates a transition to another enrollment status.
    ///
    /// Enrollment moves forward (`waitlist` → `pending` → `enrolled`) and
    /// any non-dropped status may move to `dropped`. `dropped` is terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not permitted.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        let valid = match self {
            Self::Waitlist => matches!(new_status, Self::Pending | Self::Enrolled | Self::Dropped),
            Self::Pending => matches!(new_status, Self::Enrolled | Self::Dropped),
            Self::Enrolled => matches!(new_status, Self::Dropped),
            Self::Dropped => false,
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidEnrollmentTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
            })
        }
    }
}

impl FromStr for EnrollmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waitlist" => Ok(Self::Waitlist),
            "pending" => Ok(Self::Pending),
            "enrolled" => Ok(Self::Enrolled),
            "dropped" => Ok(Self::Dropped),
            _ => Err(DomainError::InvalidEnrollmentStatus {
                status: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a swimmer's lessons are paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    /// The family pays directly.
    PrivatePay,
    /// A funding source pays under purchase orders.
    Funded,
    /// Lessons covered by a scholarship.
    Scholarship,
    /// Anything else (barter, staff family, etc.).
    Other,
}

impl PaymentType {
    /// Returns the string representation used for persistence and APIs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PrivatePay => "private_pay",
            Self::Funded => "funded",
            Self::Scholarship => "scholarship",
            Self::Other => "other",
        }
    }
}

impl FromStr for PaymentType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private_pay" => Ok(Self::PrivatePay),
            "funded" => Ok(Self::Funded),
            "scholarship" => Ok(Self::Scholarship),
            "other" => Ok(Self::Other),
            _ => Err(DomainError::InvalidPaymentType {
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for PaymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user profile.
///
/// `user_id` is the canonical identifier; `None` indicates the profile
/// has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// The canonical numeric identifier assigned by the database.
    pub user_id: Option<i64>,
    /// The profile email (unique).
    pub email: String,
    /// The display name.
    pub full_name: String,
    /// Optional contact phone.
    pub phone: Option<String>,
}

impl Profile {
    /// Creates a new `Profile` without a persisted id.
    #[must_use]
    pub const fn new(email: String, full_name: String, phone: Option<String>) -> Self {
        Self {
            user_id: None,
            email,
            full_name,
            phone,
        }
    }

    /// Creates a `Profile` with an existing persisted id.
    #[must_use]
    pub const fn with_id(
        user_id: i64,
        email: String,
        full_name: String,
        phone: Option<String>,
    ) -> Self {
        Self {
            user_id: Some(user_id),
            email,
            full_name,
            phone,
        }
    }
}

/// A swimmer enrolled (or being enrolled) in the program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swimmer {
    /// The canonical numeric identifier assigned by the database.
    pub swimmer_id: Option<i64>,
    /// The swimmer's first name.
    pub first_name: String,
    /// The swimmer's last name.
    pub last_name: String,
    /// Date of birth (`YYYY-MM-DD`).
    pub date_of_birth: String,
    /// Enrollment lifecycle status.
    pub enrollment_status: EnrollmentStatus,
    /// How lessons are paid for.
    pub payment_type: PaymentType,
    /// The funding source paying for lessons, if funded.
    pub funding_source_id: Option<i64>,
    /// The parent profile responsible for this swimmer.
    pub parent_id: i64,
    /// The coordinator managing this swimmer's authorizations, if any.
    pub coordinator_id: Option<i64>,
    /// Whether the liability waiver has been signed.
    pub waiver_signed: bool,
    /// When the waiver was signed (RFC 3339), if signed.
    pub waiver_signed_at: Option<String>,
}

impl Swimmer {
    /// Returns the swimmer's full display name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A funding source (external agency) configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingSource {
    /// The canonical numeric identifier assigned by the database.
    pub funding_source_id: Option<i64>,
    /// Full agency name.
    pub name: String,
    /// Short name used in listings and exports.
    pub short_name: String,
    /// Email domains coordinators may self-register from. Each entry
    /// must start with `@`.
    pub allowed_email_domains: Vec<String>,
    /// Sessions authorized for an initial assessment.
    pub assessment_sessions: i32,
    /// Lessons authorized per purchase order.
    pub lessons_per_po: i32,
    /// Authorization duration in months.
    pub authorization_months: i32,
    /// Remaining-lesson count at which a renewal alert fires.
    /// Must satisfy `0 <= renewal_alert_threshold <= lessons_per_po`.
    pub renewal_alert_threshold: i32,
    /// Contract rate billed per lesson, in cents.
    pub lesson_rate_cents: i64,
    /// Billing contact name.
    pub billing_contact_name: Option<String>,
    /// Billing contact email.
    pub billing_contact_email: Option<String>,
    /// Billing contact phone.
    pub billing_contact_phone: Option<String>,
    /// Whether the source is accepting new authorizations.
    pub is_active: bool,
}
