// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response DTOs for the API boundary.
//!
//! These types are distinct from domain types and represent the API
//! contract.

use serde::{Deserialize, Serialize};
use swimops_domain::ApprovalDecision;

// ============================================================================
// Draft sessions
// ============================================================================

/// Instructor reference in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructorInfo {
    /// Profile id.
    pub id: i64,
    /// Display name.
    pub name: String,
}

/// One session within a draft batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: i64,
    pub instructor_id: i64,
    pub instructor_name: String,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub status: String,
    pub batch_id: Option<String>,
    pub max_capacity: i32,
    pub booking_count: i32,
    pub price_cents: i64,
    pub session_type: String,
    pub is_recurring: bool,
}

/// First-to-last session date range of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRangeInfo {
    pub start: String,
    pub end: String,
}

/// One review-ready batch of draft sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftBatchInfo {
    pub batch_id: String,
    /// Derived display title (`"March - Mondays - Jordan"`).
    pub title: String,
    pub created_at: String,
    pub session_count: usize,
    pub date_range: DateRangeInfo,
    pub location: String,
    pub instructor: InstructorInfo,
    pub sessions: Vec<SessionInfo>,
}

/// Response for the draft batch listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListDraftBatchesResponse {
    pub batches: Vec<DraftBatchInfo>,
    pub total_sessions: usize,
}

/// Request to open selected draft sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenSessionsRequest {
    pub session_ids: Vec<i64>,
}

/// Request to delete selected draft sessions.
///
/// Deletion requires an explicit confirmation flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteSessionsRequest {
    pub session_ids: Vec<i64>,
    pub confirm: bool,
}

/// Response for bulk open/delete operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkSessionsResponse {
    pub count: usize,
    pub message: String,
}

/// Request to edit one draft session.
///
/// The date and clock times are recombined into full timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSessionRequest {
    pub session_id: i64,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `HH:MM`.
    pub start_time: String,
    /// `HH:MM`.
    pub end_time: String,
    pub instructor_id: i64,
}

/// Response for a single-session edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSessionResponse {
    pub session_id: i64,
    pub start_time: String,
    pub end_time: String,
    pub message: String,
}

// ============================================================================
// Session generation
// ============================================================================

/// A break window during which no slots are scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakWindowInput {
    /// `HH:MM`.
    pub start_time: String,
    /// `HH:MM`.
    pub end_time: String,
}

/// Request to generate a batch of draft sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateSessionsRequest {
    /// `next_month` or `custom_range`.
    pub mode: String,
    /// Required for `custom_range` (`YYYY-MM-DD`).
    pub start_date: Option<String>,
    /// Required for `custom_range` (`YYYY-MM-DD`).
    pub end_date: Option<String>,
    /// Weekdays, 0 = Sunday through 6 = Saturday.
    pub days_of_week: Vec<u8>,
    /// Daily first slot start (`HH:MM`).
    pub start_time: String,
    /// Daily last slot end (`HH:MM`).
    pub end_time: String,
    /// Slot length in minutes.
    pub session_duration: i64,
    pub instructor_ids: Vec<i64>,
    #[serde(default)]
    pub breaks: Vec<BreakWindowInput>,
    pub session_type: String,
    pub location: String,
    #[serde(default)]
    pub price_cents: i64,
    /// `YYYY-MM-DD` dates to skip.
    #[serde(default)]
    pub blackout_dates: Vec<String>,
    /// Explicit dates instead of weekday matching.
    pub additional_dates: Option<Vec<String>>,
    /// IANA timezone the clock times are declared in.
    pub timezone: String,
}

/// A skipped candidate slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConflictInfo {
    pub date: String,
    pub time: String,
    pub instructor_id: i64,
    pub reason: String,
}

/// Response for a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateSessionsResponse {
    pub created: usize,
    pub skipped: usize,
    pub batch_id: String,
    pub conflicts: Vec<GenerationConflictInfo>,
}

// ============================================================================
// Purchase orders
// ============================================================================

/// Request to create a purchase order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePurchaseOrderRequest {
    pub swimmer_id: i64,
    pub funding_source_id: i64,
    pub coordinator_id: Option<i64>,
    /// `assessment` or `lessons`.
    pub po_type: String,
    pub sessions_authorized: i32,
    /// `YYYY-MM-DD`.
    pub start_date: String,
    /// `YYYY-MM-DD`.
    pub end_date: String,
    pub notes: Option<String>,
    /// `YYYY-MM-DD`.
    pub due_date: Option<String>,
}

/// Response for purchase order creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePurchaseOrderResponse {
    pub po_id: i64,
    pub status: String,
    pub message: String,
}

/// Filters for the purchase order listing.
///
/// `billing_status: "overdue"` filters on the derived predicate, not
/// the stored enum.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPurchaseOrdersRequest {
    pub search: Option<String>,
    pub status: Option<String>,
    pub billing_status: Option<String>,
    pub po_type: Option<String>,
    pub funding_source_id: Option<i64>,
}

/// One purchase order in the listing, with joined display data and
/// derived flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrderInfo {
    pub po_id: i64,
    pub po_type: String,
    pub status: String,
    pub authorization_number: Option<String>,
    pub sessions_authorized: i32,
    pub sessions_booked: i32,
    pub sessions_used: i32,
    pub start_date: String,
    pub end_date: String,
    pub notes: Option<String>,
    pub billing_status: String,
    pub billed_amount_cents: i64,
    pub paid_amount_cents: i64,
    pub invoice_number: Option<String>,
    pub payment_reference: Option<String>,
    pub billing_notes: Option<String>,
    pub due_date: Option<String>,
    pub billed_at: Option<String>,
    pub paid_at: Option<String>,
    pub created_at: String,
    pub swimmer_id: i64,
    pub swimmer_name: String,
    pub funding_source_id: i64,
    pub funding_source_name: String,
    pub funding_source_short_name: String,
    pub coordinator_name: Option<String>,
    /// Derived: `due_date < today && billing_status != paid`.
    pub is_overdue: bool,
    /// Derived: the manual Mark Complete action is offered.
    pub can_mark_complete: bool,
    /// Derived: paid exceeds billed (flagged, not blocked).
    pub payment_exceeds_billed: bool,
}

/// Per-status counts and money totals for the listing header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrderStats {
    pub total: usize,
    pub pending: usize,
    pub need_auth: usize,
    pub active: usize,
    pub completed: usize,
    pub expired: usize,
    pub cancelled: usize,
    pub unbilled: usize,
    pub billed: usize,
    pub paid: usize,
    pub partial: usize,
    pub overdue: usize,
    pub disputed: usize,
    pub total_billed_cents: i64,
    pub total_paid_cents: i64,
    pub total_outstanding_cents: i64,
}

/// Response for the purchase order listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPurchaseOrdersResponse {
    pub orders: Vec<PurchaseOrderInfo>,
    pub stats: PurchaseOrderStats,
}

/// Approval-dialog submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewPurchaseOrderRequest {
    pub po_id: i64,
    #[serde(flatten)]
    pub decision: ApprovalDecision,
}

/// Response for an approval-dialog submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewPurchaseOrderResponse {
    pub po_id: i64,
    pub status: String,
    pub authorization_number: Option<String>,
    pub message: String,
}

/// Request to mark an exhausted purchase order complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletePurchaseOrderRequest {
    pub po_id: i64,
}

/// Billing-modal submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePoBillingRequest {
    pub po_id: i64,
    pub billing_status: String,
    pub billed_amount_cents: i64,
    pub paid_amount_cents: i64,
    pub invoice_number: Option<String>,
    pub payment_reference: Option<String>,
    pub billing_notes: Option<String>,
    /// `YYYY-MM-DD`.
    pub due_date: Option<String>,
}

/// Request to record session usage against a purchase order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePoUsageRequest {
    pub po_id: i64,
    pub sessions_booked: i32,
    pub sessions_used: i32,
}

/// Generic single-order response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrderActionResponse {
    pub po_id: i64,
    pub status: String,
    pub billing_status: String,
    pub message: String,
}

// ============================================================================
// Monthly billing
// ============================================================================

/// Request to create a billing period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBillingPeriodRequest {
    pub month: i32,
    pub year: i32,
    pub funding_source_id: i64,
}

/// One billing period in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingPeriodInfo {
    pub billing_period_id: i64,
    pub month: i32,
    pub year: i32,
    pub funding_source_id: i64,
    pub status: String,
    pub generated_at: Option<String>,
    pub exported_at: Option<String>,
}

/// Response listing billing periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListBillingPeriodsResponse {
    pub periods: Vec<BillingPeriodInfo>,
}

/// Request to advance a period's status (e.g., mark reviewed or paid).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateBillingPeriodStatusRequest {
    pub billing_period_id: i64,
    /// Target status along the forward-only progression.
    pub status: String,
}

/// Request to populate a draft period's line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateBillingRequest {
    pub billing_period_id: i64,
}

/// Response for line-item generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateBillingResponse {
    pub billing_period_id: i64,
    pub created: usize,
    pub message: String,
}

/// One line item in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingLineItemInfo {
    pub line_item_id: i64,
    pub po_id: i64,
    pub swimmer_id: i64,
    pub swimmer_name: String,
    pub authorization_number: Option<String>,
    pub units_billed: i32,
    pub rate_cents: i64,
    pub gross_amount_cents: i64,
    pub status: String,
}

/// Response listing a period's line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListLineItemsResponse {
    pub billing_period_id: i64,
    pub line_items: Vec<BillingLineItemInfo>,
}

/// Reviewer decision on one line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewLineItemRequest {
    pub line_item_id: i64,
    /// `included`, `no_service`, `deferred`, or back to `pending`.
    pub status: String,
}

/// Response for a line-item review decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemActionResponse {
    pub line_item_id: i64,
    pub status: String,
    pub message: String,
}

/// Request to export a period's e-billing XML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportBillingXmlRequest {
    pub billing_period_id: i64,
}

/// Response for the XML export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportBillingXmlResponse {
    pub billing_period_id: i64,
    pub file_name: String,
    pub xml_content: String,
    pub billed_count: usize,
    pub summary: BillingPeriodSummary,
}

/// Aggregated totals for a billing period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingPeriodSummary {
    pub total_lessons_billed: i64,
    pub total_amount_billed_cents: i64,
    pub total_lessons_remaining: i64,
    pub total_amount_pending_cents: i64,
}

// ============================================================================
// Time off
// ============================================================================

/// One time-off request with display names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOffRequestInfo {
    pub time_off_id: i64,
    pub instructor_id: i64,
    pub instructor_name: String,
    pub start_at: String,
    pub end_at: String,
    pub all_day: bool,
    pub reason_type: String,
    pub status: String,
    pub admin_notes: Option<String>,
    pub reviewer_name: Option<String>,
    pub reviewed_at: Option<String>,
    pub created_at: String,
}

/// Response listing time-off requests, pending first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTimeOffRequestsResponse {
    pub requests: Vec<TimeOffRequestInfo>,
}

/// One conflicting session in the review modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictInfo {
    pub session_id: i64,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub status: String,
    pub swimmer_count: i64,
    /// False once the session is cancelled or reassigned.
    pub actionable: bool,
}

/// Another approved request overlapping the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlappingTimeOffInfo {
    pub time_off_id: i64,
    pub start_at: String,
    pub end_at: String,
    pub reason_type: String,
}

/// Response for the conflict lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOffConflictsResponse {
    pub time_off_id: i64,
    pub conflicts: Vec<ConflictInfo>,
    pub overlapping_time_off: Vec<OverlappingTimeOffInfo>,
    pub conflict_count: usize,
    pub has_conflicts: bool,
}

/// Review decision submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewTimeOffRequest {
    pub time_off_id: i64,
    /// `approved` or `declined`.
    pub status: String,
    pub admin_notes: Option<String>,
}

/// Response for a review decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewTimeOffResponse {
    pub time_off_id: i64,
    pub status: String,
    /// Conflicting sessions still awaiting resolution. The decision is
    /// never blocked on them; this count is surfaced for the reviewer.
    pub unresolved_conflicts: usize,
    pub message: String,
}

/// Request to hand a conflicting session to a replacement instructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceInstructorRequest {
    pub session_id: i64,
    pub replacement_instructor_id: i64,
    pub notify_parents: bool,
}

/// Request to cancel a conflicting session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelSessionRequest {
    pub session_id: i64,
    pub notify_parents: bool,
}

/// Response for per-session conflict resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictResolutionResponse {
    pub session_id: i64,
    pub status: String,
    pub parents_notified: usize,
    pub message: String,
}

// ============================================================================
// Bookings
// ============================================================================

/// Parent-facing single-booking cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelBookingRequest {
    pub booking_id: i64,
    pub reason: Option<String>,
}

/// Response for a successful single-booking cancellation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelBookingResponse {
    pub booking_id: i64,
    pub hours_before_session: f64,
    pub message: String,
}

/// Recurring-block cancellation (all-or-nothing over future sessions).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelBlockRequest {
    pub swimmer_id: i64,
    pub batch_id: String,
    pub reason: Option<String>,
}

/// Response for a block cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelBlockResponse {
    pub block_cancel_id: String,
    pub canceled: usize,
    pub skipped: usize,
    pub message: String,
}

// ============================================================================
// People & funding sources
// ============================================================================

/// Request to create a profile with roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProfileRequest {
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Response for profile creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProfileResponse {
    pub user_id: i64,
    pub message: String,
}

/// Request to delete a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteProfileRequest {
    pub user_id: i64,
}

/// Response for profile deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteProfileResponse {
    pub user_id: i64,
    pub message: String,
}

/// Request to record a signed waiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignWaiverRequest {
    pub swimmer_id: i64,
}

/// Response for waiver completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignWaiverResponse {
    pub swimmer_id: i64,
    pub waiver_signed_at: String,
    pub message: String,
}

/// Response listing instructors for replacement pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListInstructorsResponse {
    pub instructors: Vec<InstructorInfo>,
}

/// Request to create a swimmer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSwimmerRequest {
    pub first_name: String,
    pub last_name: String,
    /// `YYYY-MM-DD`.
    pub date_of_birth: String,
    /// Defaults to `waitlist` when absent.
    pub enrollment_status: Option<String>,
    /// Defaults to `private_pay` when absent.
    pub payment_type: Option<String>,
    pub funding_source_id: Option<i64>,
    /// Defaults to the caller for parent submissions.
    pub parent_id: Option<i64>,
    pub coordinator_id: Option<i64>,
}

/// Response for swimmer creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSwimmerResponse {
    pub swimmer_id: i64,
    pub enrollment_status: String,
    pub message: String,
}

/// Request to move a swimmer along the enrollment lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateEnrollmentRequest {
    pub swimmer_id: i64,
    pub enrollment_status: String,
}

/// Response for an enrollment update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateEnrollmentResponse {
    pub swimmer_id: i64,
    pub enrollment_status: String,
    pub message: String,
}

/// A brand-new coordinator created as part of a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCoordinatorInput {
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
}

/// Request to reassign a swimmer's coordinator.
///
/// Exactly one of `coordinator_id` and `new_coordinator` must be set;
/// the latter creates the coordinator profile + role atomically with
/// the reassignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferClientRequest {
    pub swimmer_id: i64,
    pub coordinator_id: Option<i64>,
    pub new_coordinator: Option<NewCoordinatorInput>,
}

/// Response for a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferClientResponse {
    pub swimmer_id: i64,
    pub coordinator_id: i64,
    pub created_coordinator: bool,
    pub message: String,
}

/// Funding source form payload (create and update).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingSourceForm {
    pub name: String,
    pub short_name: String,
    /// Comma-separated `@`-prefixed domains, as typed in the form.
    pub allowed_email_domains: String,
    pub assessment_sessions: i32,
    pub lessons_per_po: i32,
    pub authorization_months: i32,
    pub renewal_alert_threshold: i32,
    pub lesson_rate_cents: i64,
    pub billing_contact_name: Option<String>,
    pub billing_contact_email: Option<String>,
    pub billing_contact_phone: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

const fn default_true() -> bool {
    true
}

/// One funding source in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingSourceInfo {
    pub funding_source_id: i64,
    pub name: String,
    pub short_name: String,
    pub allowed_email_domains: Vec<String>,
    pub assessment_sessions: i32,
    pub lessons_per_po: i32,
    pub authorization_months: i32,
    pub renewal_alert_threshold: i32,
    pub lesson_rate_cents: i64,
    pub billing_contact_name: Option<String>,
    pub billing_contact_email: Option<String>,
    pub billing_contact_phone: Option<String>,
    pub is_active: bool,
    /// Swimmers currently referencing this source.
    pub swimmer_count: i64,
}

/// Response listing funding sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFundingSourcesResponse {
    pub sources: Vec<FundingSourceInfo>,
}

/// Response for funding source create/update/delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingSourceActionResponse {
    pub funding_source_id: i64,
    pub message: String,
}

// ============================================================================
// Timecards
// ============================================================================

/// Filters for the time entry listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTimeEntriesRequest {
    pub instructor_id: Option<i64>,
    /// `YYYY-MM-DD`.
    pub from_date: String,
    /// `YYYY-MM-DD`.
    pub to_date: String,
}

/// One time entry in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntryInfo {
    pub time_entry_id: i64,
    pub instructor_id: i64,
    pub work_date: String,
    pub clock_in: String,
    pub clock_out: String,
    pub minutes: i32,
    pub status: String,
    pub notes: Option<String>,
}

/// Response listing time entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTimeEntriesResponse {
    pub entries: Vec<TimeEntryInfo>,
    pub total_minutes: i64,
}

/// Patch one time entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTimeEntryRequest {
    pub time_entry_id: i64,
    /// `pending` or `approved`.
    pub status: String,
    pub notes: Option<String>,
}

/// Approve all pending entries for an instructor in a range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkApproveTimeEntriesRequest {
    pub instructor_id: i64,
    pub from_date: String,
    pub to_date: String,
}

/// Response for timecard mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntryActionResponse {
    pub affected: usize,
    pub message: String,
}
