// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod batch;
mod billing_period;
mod booking;
mod error;
mod purchase_order;
mod schedule;
mod session;
mod time_off;
mod timecard;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use batch::{
    DateRange, DraftBatch, SelectionSet, UNKNOWN_INSTRUCTOR, batch_title, group_draft_sessions,
};
pub use billing_period::{BillingPeriodStatus, LineItemStatus};
pub use booking::{
    BookingStatus, BookingType, CANCELLATION_CUTOFF_HOURS, CancellationWindow,
    block_cancel_allowed, evaluate_cancellation_window,
};
pub use error::DomainError;
pub use purchase_order::{
    ApprovalDecision, ApprovalOutcome, BillingStatus, PoStatus, PoType, apply_approval_decision,
    can_mark_complete, completion_transition, is_overdue,
};
pub use schedule::{
    BreakWindow, ExistingSession, PlannedSession, SlotConflict, TimeSlot, explicit_dates,
    generate_time_slots, next_month_range, plan_sessions, target_dates,
};
pub use session::{
    Session, SessionStatus, format_timestamp, parse_timestamp, recombine_session_times,
};
pub use time_off::{
    CONFLICT_CANCEL_REASON, ReasonType, TimeOffStatus, conflict_actionable, validate_replacement,
};
pub use timecard::TimeEntryStatus;
pub use types::{EnrollmentStatus, FundingSource, PaymentType, Profile, Role, Swimmer};
pub use validation::{
    parse_email_domains, validate_email, validate_funding_source, validate_swimmer_fields,
};
