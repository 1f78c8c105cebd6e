// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Every handler takes the persistence adapter, its request DTO, and
//! the request-scoped [`AuthenticatedActor`]. Authorization runs first,
//! validation second, persistence last; time-dependent handlers take
//! `now` explicitly so rules like the 24-hour cutoff are testable.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use std::collections::{HashMap, HashSet};
use tracing::info;

use swimops_domain::{
    BillingPeriodStatus, BillingStatus, BookingType, CancellationWindow, DomainError,
    EnrollmentStatus, LineItemStatus, PaymentType, PoStatus, PoType, Role, SessionStatus,
    TimeEntryStatus, TimeOffStatus, apply_approval_decision, batch_title, block_cancel_allowed,
    can_mark_complete, completion_transition, conflict_actionable, evaluate_cancellation_window,
    explicit_dates, format_timestamp, generate_time_slots, group_draft_sessions, is_overdue,
    next_month_range, parse_email_domains, parse_timestamp, plan_sessions,
    recombine_session_times, target_dates, validate_email, validate_funding_source,
    validate_replacement, validate_swimmer_fields, BreakWindow, ExistingSession, FundingSource,
    CONFLICT_CANCEL_REASON, UNKNOWN_INSTRUCTOR,
};
use swimops_persistence::{
    BillingUpdate, NewBillingLineItem, NewBillingPeriod, NewCancellation, NewFundingSource,
    NewProfile, NewPurchaseOrder, NewSession, NewSwimmer, Persistence, PersistenceError,
    encode_domains, generate_batch_id, generate_block_cancel_id,
};

use crate::auth::{AuthenticatedActor, AuthorizationService, has_role};
use crate::billing_export::{export_file_name, render_billing_xml};
use crate::csv_preview::{CsvFormatError, CsvPreviewResult, preview_csv_swimmers};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    BillingLineItemInfo, BillingPeriodInfo, BillingPeriodSummary, BreakWindowInput,
    BulkApproveTimeEntriesRequest, BulkSessionsResponse, CancelBlockRequest, CancelBlockResponse,
    CancelBookingRequest, CancelBookingResponse, CancelSessionRequest,
    CompletePurchaseOrderRequest, ConflictInfo, ConflictResolutionResponse,
    CreateBillingPeriodRequest, CreateProfileRequest, CreateProfileResponse,
    CreatePurchaseOrderRequest, CreatePurchaseOrderResponse, CreateSwimmerRequest,
    CreateSwimmerResponse, DateRangeInfo, DeleteProfileRequest, DeleteProfileResponse,
    DeleteSessionsRequest, DraftBatchInfo, ExportBillingXmlRequest, ExportBillingXmlResponse,
    FundingSourceActionResponse, FundingSourceForm, FundingSourceInfo, GenerateBillingRequest,
    GenerateBillingResponse, GenerateSessionsRequest, GenerateSessionsResponse,
    GenerationConflictInfo, InstructorInfo, LineItemActionResponse, ListBillingPeriodsResponse,
    ListDraftBatchesResponse, ListFundingSourcesResponse, ListInstructorsResponse,
    ListLineItemsResponse, ListPurchaseOrdersRequest, ListPurchaseOrdersResponse,
    ListTimeEntriesRequest, ListTimeEntriesResponse, ListTimeOffRequestsResponse,
    OpenSessionsRequest, OverlappingTimeOffInfo, PurchaseOrderActionResponse, PurchaseOrderInfo,
    PurchaseOrderStats, ReplaceInstructorRequest, ReviewLineItemRequest,
    ReviewPurchaseOrderRequest, ReviewPurchaseOrderResponse, ReviewTimeOffRequest,
    UpdateBillingPeriodStatusRequest, UpdatePoUsageRequest,
    ReviewTimeOffResponse, SessionInfo, SignWaiverRequest, SignWaiverResponse,
    TimeEntryActionResponse, TimeEntryInfo, TimeOffRequestInfo, TimeOffConflictsResponse,
    TransferClientRequest, TransferClientResponse, UpdateEnrollmentRequest,
    UpdateEnrollmentResponse, UpdatePoBillingRequest, UpdateSessionRequest,
    UpdateSessionResponse, UpdateTimeEntryRequest,
};

/// Text line parents are directed to for late cancellations.
pub const CONTACT_TEXT_LINE: &str = "(209) 643-7969";

fn internal(err: &PersistenceError) -> ApiError {
    ApiError::Internal {
        message: err.to_string(),
    }
}

fn parse_status<T: std::str::FromStr<Err = DomainError>>(value: &str) -> Result<T, ApiError> {
    value.parse::<T>().map_err(translate_domain_error)
}

fn parse_date(value: &str, field: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| ApiError::InvalidInput {
        field: field.to_string(),
        message: format!("Failed to parse date '{value}': {e}"),
    })
}

fn parse_clock(value: &str, field: &str) -> Result<NaiveTime, ApiError> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|e| ApiError::InvalidInput {
        field: field.to_string(),
        message: format!("Failed to parse time '{value}': {e}"),
    })
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round_hundredth(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ============================================================================
// Draft session batch manager
// ============================================================================

/// Lists draft sessions grouped by generation batch.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the listing fails.
pub fn list_draft_batches(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<ListDraftBatchesResponse, ApiError> {
    AuthorizationService::authorize_manage_sessions(actor)?;

    let rows = persistence
        .list_draft_sessions()
        .map_err(|e| internal(&e))?;

    let mut sessions = Vec::with_capacity(rows.len());
    for row in &rows {
        sessions.push(row.to_domain().map_err(|e| internal(&e))?);
    }

    let instructor_ids: Vec<i64> = {
        let unique: HashSet<i64> = sessions.iter().map(|s| s.instructor_id).collect();
        unique.into_iter().collect()
    };
    let instructor_names: HashMap<i64, String> = persistence
        .get_profiles_by_ids(&instructor_ids)
        .map_err(|e| internal(&e))?
        .into_iter()
        .map(|p| (p.user_id, p.full_name))
        .collect();

    let batches = group_draft_sessions(&sessions, &instructor_names);
    let total_sessions = batches.iter().map(|b| b.session_count).sum();

    let mut infos = Vec::with_capacity(batches.len());
    for batch in &batches {
        let title = batch_title(batch).map_err(translate_domain_error)?;
        let sessions = batch
            .sessions
            .iter()
            .map(|session| SessionInfo {
                session_id: session.session_id.unwrap_or_default(),
                instructor_id: session.instructor_id,
                instructor_name: instructor_names
                    .get(&session.instructor_id)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_INSTRUCTOR.to_string()),
                start_time: session.start_time.clone(),
                end_time: session.end_time.clone(),
                location: session.location.clone(),
                status: session.status.as_str().to_string(),
                batch_id: session.batch_id.clone(),
                max_capacity: session.max_capacity,
                booking_count: session.booking_count,
                price_cents: session.price_cents,
                session_type: session.session_type.clone(),
                is_recurring: session.is_recurring,
            })
            .collect();

        infos.push(DraftBatchInfo {
            batch_id: batch.batch_id.clone(),
            title,
            created_at: batch.created_at.clone(),
            session_count: batch.session_count,
            date_range: DateRangeInfo {
                start: batch.date_range.start.clone(),
                end: batch.date_range.end.clone(),
            },
            location: batch.location.clone(),
            instructor: InstructorInfo {
                id: batch.instructor_id,
                name: batch.instructor_name.clone(),
            },
            sessions,
        });
    }

    Ok(ListDraftBatchesResponse {
        batches: infos,
        total_sessions,
    })
}

/// Opens the selected draft sessions for booking, all-or-nothing.
///
/// # Errors
///
/// Returns an error if the selection is empty or any member is not an
/// open-able draft (the whole batch rolls back).
pub fn open_selected_sessions(
    persistence: &mut Persistence,
    request: &OpenSessionsRequest,
    actor: &AuthenticatedActor,
    now: DateTime<Utc>,
) -> Result<BulkSessionsResponse, ApiError> {
    AuthorizationService::authorize_manage_sessions(actor)?;

    if request.session_ids.is_empty() {
        return Err(translate_domain_error(DomainError::EmptySelection));
    }

    let count = persistence
        .open_draft_sessions(&request.session_ids, &format_timestamp(now))
        .map_err(translate_persistence_error)?;

    info!(count, "Opened draft sessions for booking");

    Ok(BulkSessionsResponse {
        count,
        message: format!(
            "{count} session{} are now available for booking",
            if count == 1 { "" } else { "s" }
        ),
    })
}

/// Deletes the selected draft sessions, all-or-nothing.
///
/// Requires an explicit confirmation flag.
///
/// # Errors
///
/// Returns an error if the selection is empty, unconfirmed, or any
/// member is not a deletable draft (the whole batch rolls back).
pub fn delete_selected_sessions(
    persistence: &mut Persistence,
    request: &DeleteSessionsRequest,
    actor: &AuthenticatedActor,
) -> Result<BulkSessionsResponse, ApiError> {
    AuthorizationService::authorize_manage_sessions(actor)?;

    if request.session_ids.is_empty() {
        return Err(translate_domain_error(DomainError::EmptySelection));
    }
    if !request.confirm {
        return Err(ApiError::InvalidInput {
            field: String::from("confirm"),
            message: String::from(
                "Deleting draft sessions cannot be undone and must be confirmed",
            ),
        });
    }

    let count = persistence
        .delete_draft_sessions(&request.session_ids)
        .map_err(translate_persistence_error)?;

    info!(count, "Deleted draft sessions");

    Ok(BulkSessionsResponse {
        count,
        message: format!(
            "{count} draft session{} have been deleted",
            if count == 1 { "" } else { "s" }
        ),
    })
}

/// Edits one draft session: recombines the edited date and clock times
/// into full timestamps and updates that single session.
///
/// # Errors
///
/// Returns an error if parsing fails, the instructor is unknown, or
/// the session is no longer an editable draft.
pub fn update_draft_session(
    persistence: &mut Persistence,
    request: &UpdateSessionRequest,
    actor: &AuthenticatedActor,
) -> Result<UpdateSessionResponse, ApiError> {
    AuthorizationService::authorize_manage_sessions(actor)?;

    let (start_time, end_time) =
        recombine_session_times(&request.date, &request.start_time, &request.end_time)
            .map_err(translate_domain_error)?;

    persistence
        .get_profile(request.instructor_id)
        .map_err(translate_persistence_error)?;

    persistence
        .update_draft_session_schedule(
            request.session_id,
            &start_time,
            &end_time,
            request.instructor_id,
        )
        .map_err(translate_persistence_error)?;

    Ok(UpdateSessionResponse {
        session_id: request.session_id,
        start_time,
        end_time,
        message: String::from("Session updated"),
    })
}

/// Generates a batch of draft sessions from a schedule configuration.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or persistence
/// fails.
#[allow(clippy::too_many_lines)]
pub fn generate_sessions(
    persistence: &mut Persistence,
    request: &GenerateSessionsRequest,
    actor: &AuthenticatedActor,
    now: DateTime<Utc>,
) -> Result<GenerateSessionsResponse, ApiError> {
    AuthorizationService::authorize_manage_sessions(actor)?;

    if request.instructor_ids.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("instructor_ids"),
            message: String::from("At least one instructor is required"),
        });
    }

    let day_start = parse_clock(&request.start_time, "start_time")?;
    let day_end = parse_clock(&request.end_time, "end_time")?;

    let mut breaks = Vec::with_capacity(request.breaks.len());
    for BreakWindowInput {
        start_time,
        end_time,
    } in &request.breaks
    {
        breaks.push(BreakWindow {
            start: parse_clock(start_time, "breaks.start_time")?,
            end: parse_clock(end_time, "breaks.end_time")?,
        });
    }

    let slots = generate_time_slots(day_start, day_end, request.session_duration, &breaks)
        .map_err(translate_domain_error)?;

    let (range_start, range_end) = match request.mode.as_str() {
        "next_month" => next_month_range(now.date_naive()).map_err(translate_domain_error)?,
        "custom_range" => {
            let start = request.start_date.as_deref().ok_or_else(|| {
                ApiError::InvalidInput {
                    field: String::from("start_date"),
                    message: String::from("start_date is required for custom_range"),
                }
            })?;
            let end = request.end_date.as_deref().ok_or_else(|| {
                ApiError::InvalidInput {
                    field: String::from("end_date"),
                    message: String::from("end_date is required for custom_range"),
                }
            })?;
            (parse_date(start, "start_date")?, parse_date(end, "end_date")?)
        }
        other => {
            return Err(ApiError::InvalidInput {
                field: String::from("mode"),
                message: format!("Unknown generation mode: {other}"),
            });
        }
    };

    let mut weekdays = Vec::with_capacity(request.days_of_week.len());
    for day in &request.days_of_week {
        weekdays.push(match day {
            0 => Weekday::Sun,
            1 => Weekday::Mon,
            2 => Weekday::Tue,
            3 => Weekday::Wed,
            4 => Weekday::Thu,
            5 => Weekday::Fri,
            6 => Weekday::Sat,
            other => {
                return Err(ApiError::InvalidInput {
                    field: String::from("days_of_week"),
                    message: format!("Weekday must be 0-6 (got {other})"),
                });
            }
        });
    }

    let mut blackouts = HashSet::new();
    for date in &request.blackout_dates {
        blackouts.insert(parse_date(date, "blackout_dates")?);
    }

    let dates = if let Some(additional) = &request.additional_dates {
        let mut parsed = Vec::with_capacity(additional.len());
        for date in additional {
            parsed.push(parse_date(date, "additional_dates")?);
        }
        explicit_dates(&parsed, &blackouts)
    } else {
        target_dates(range_start, range_end, &weekdays, &blackouts)
    };

    // Existing sessions in the range, for instructor overlap detection.
    let range_start_ts = format!("{range_start}T00:00:00Z");
    let range_end_ts = format!("{range_end}T23:59:59Z");
    let existing_rows = persistence
        .list_active_sessions_in_range(&range_start_ts, &range_end_ts)
        .map_err(|e| internal(&e))?;

    let mut existing = Vec::with_capacity(existing_rows.len());
    for row in &existing_rows {
        existing.push(ExistingSession {
            instructor_id: row.instructor_id,
            start: parse_timestamp(&row.start_time).map_err(translate_domain_error)?,
            end: parse_timestamp(&row.end_time).map_err(translate_domain_error)?,
        });
    }

    let (planned, conflicts) = plan_sessions(
        &dates,
        &request.instructor_ids,
        &slots,
        &request.timezone,
        &existing,
    )
    .map_err(translate_domain_error)?;

    let batch_id = generate_batch_id();
    let is_recurring = request.additional_dates.is_none();
    let created_at = format_timestamp(now);

    let records: Vec<NewSession> = planned
        .iter()
        .map(|p| NewSession {
            instructor_id: p.instructor_id,
            start_time: p.start_time.clone(),
            end_time: p.end_time.clone(),
            location: request.location.clone(),
            status: SessionStatus::Draft.as_str().to_string(),
            batch_id: Some(batch_id.clone()),
            max_capacity: 1,
            booking_count: 0,
            price_cents: request.price_cents,
            session_type: request.session_type.clone(),
            is_recurring: i32::from(is_recurring),
            open_at: None,
            created_at: created_at.clone(),
        })
        .collect();

    let created = if records.is_empty() {
        0
    } else {
        persistence
            .insert_sessions(&records)
            .map_err(|e| internal(&e))?
    };

    info!(
        created,
        skipped = conflicts.len(),
        batch_id = %batch_id,
        "Generated draft sessions"
    );

    Ok(GenerateSessionsResponse {
        created,
        skipped: conflicts.len(),
        batch_id,
        conflicts: conflicts
            .iter()
            .map(|c| GenerationConflictInfo {
                date: c.date.to_string(),
                time: format!(
                    "{}-{}",
                    c.slot.start.format("%H:%M"),
                    c.slot.end.format("%H:%M")
                ),
                instructor_id: c.instructor_id,
                reason: String::from("Instructor conflict"),
            })
            .collect(),
    })
}

// ============================================================================
// Purchase orders
// ============================================================================

/// Creates a funding authorization request.
///
/// # Errors
///
/// Returns an error if the actor lacks permission or references are
/// invalid.
pub fn create_purchase_order(
    persistence: &mut Persistence,
    request: &CreatePurchaseOrderRequest,
    actor: &AuthenticatedActor,
    now: DateTime<Utc>,
) -> Result<CreatePurchaseOrderResponse, ApiError> {
    AuthorizationService::authorize_manage_purchase_orders(actor)?;

    let po_type: PoType = parse_status(&request.po_type)?;
    if request.sessions_authorized <= 0 {
        return Err(ApiError::InvalidInput {
            field: String::from("sessions_authorized"),
            message: format!(
                "sessions_authorized must be greater than 0 (got {})",
                request.sessions_authorized
            ),
        });
    }
    parse_date(&request.start_date, "start_date")?;
    parse_date(&request.end_date, "end_date")?;
    if let Some(due) = &request.due_date {
        parse_date(due, "due_date")?;
    }

    persistence
        .get_swimmer(request.swimmer_id)
        .map_err(translate_persistence_error)?;
    persistence
        .get_funding_source(request.funding_source_id)
        .map_err(translate_persistence_error)?;

    let ts = format_timestamp(now);
    let po_id = persistence
        .create_purchase_order(&NewPurchaseOrder {
            swimmer_id: request.swimmer_id,
            funding_source_id: request.funding_source_id,
            coordinator_id: request.coordinator_id,
            po_type: po_type.as_str().to_string(),
            status: PoStatus::Pending.as_str().to_string(),
            authorization_number: None,
            sessions_authorized: request.sessions_authorized,
            sessions_booked: 0,
            sessions_used: 0,
            start_date: request.start_date.clone(),
            end_date: request.end_date.clone(),
            notes: request.notes.clone(),
            billing_status: BillingStatus::Unbilled.as_str().to_string(),
            due_date: request.due_date.clone(),
            created_at: ts.clone(),
            updated_at: ts,
        })
        .map_err(|e| internal(&e))?;

    Ok(CreatePurchaseOrderResponse {
        po_id,
        status: PoStatus::Pending.as_str().to_string(),
        message: String::from("Purchase order created and awaiting review"),
    })
}

/// Lists purchase orders with joined display data, derived flags, and
/// rollup stats.
///
/// The overdue filter and badge use the derived predicate
/// (`due_date < today && billing_status != paid`), never the stored
/// enum.
///
/// # Errors
///
/// Returns an error if the actor lacks permission or a lookup fails.
#[allow(clippy::too_many_lines)]
pub fn list_purchase_orders(
    persistence: &mut Persistence,
    request: &ListPurchaseOrdersRequest,
    actor: &AuthenticatedActor,
    today: NaiveDate,
) -> Result<ListPurchaseOrdersResponse, ApiError> {
    AuthorizationService::authorize_manage_purchase_orders(actor)?;

    let rows = persistence
        .list_purchase_orders()
        .map_err(|e| internal(&e))?;

    let swimmer_ids: Vec<i64> = {
        let unique: HashSet<i64> = rows.iter().map(|r| r.swimmer_id).collect();
        unique.into_iter().collect()
    };
    let source_ids: Vec<i64> = {
        let unique: HashSet<i64> = rows.iter().map(|r| r.funding_source_id).collect();
        unique.into_iter().collect()
    };
    let coordinator_ids: Vec<i64> = {
        let unique: HashSet<i64> = rows.iter().filter_map(|r| r.coordinator_id).collect();
        unique.into_iter().collect()
    };

    let swimmers: HashMap<i64, String> = persistence
        .get_swimmers_by_ids(&swimmer_ids)
        .map_err(|e| internal(&e))?
        .into_iter()
        .map(|s| (s.swimmer_id, s.full_name()))
        .collect();
    let sources: HashMap<i64, (String, String)> = persistence
        .get_funding_sources_by_ids(&source_ids)
        .map_err(|e| internal(&e))?
        .into_iter()
        .map(|s| (s.funding_source_id, (s.name, s.short_name)))
        .collect();
    let coordinators: HashMap<i64, String> = persistence
        .get_profiles_by_ids(&coordinator_ids)
        .map_err(|e| internal(&e))?
        .into_iter()
        .map(|p| (p.user_id, p.full_name))
        .collect();

    let mut orders = Vec::with_capacity(rows.len());
    let mut stats = PurchaseOrderStats::default();

    for row in &rows {
        let status: PoStatus = parse_status(&row.status)?;
        let billing_status: BillingStatus = parse_status(&row.billing_status)?;
        let overdue = is_overdue(row.due_date.as_deref(), billing_status, today)
            .map_err(translate_domain_error)?;

        let (source_name, source_short) = sources
            .get(&row.funding_source_id)
            .cloned()
            .unwrap_or_else(|| (String::new(), String::new()));

        let order = PurchaseOrderInfo {
            po_id: row.po_id,
            po_type: row.po_type.clone(),
            status: row.status.clone(),
            authorization_number: row.authorization_number.clone(),
            sessions_authorized: row.sessions_authorized,
            sessions_booked: row.sessions_booked,
            sessions_used: row.sessions_used,
            start_date: row.start_date.clone(),
            end_date: row.end_date.clone(),
            notes: row.notes.clone(),
            billing_status: row.billing_status.clone(),
            billed_amount_cents: row.billed_amount_cents,
            paid_amount_cents: row.paid_amount_cents,
            invoice_number: row.invoice_number.clone(),
            payment_reference: row.payment_reference.clone(),
            billing_notes: row.billing_notes.clone(),
            due_date: row.due_date.clone(),
            billed_at: row.billed_at.clone(),
            paid_at: row.paid_at.clone(),
            created_at: row.created_at.clone(),
            swimmer_id: row.swimmer_id,
            swimmer_name: swimmers.get(&row.swimmer_id).cloned().unwrap_or_default(),
            funding_source_id: row.funding_source_id,
            funding_source_name: source_name,
            funding_source_short_name: source_short,
            coordinator_name: row
                .coordinator_id
                .and_then(|id| coordinators.get(&id).cloned()),
            is_overdue: overdue,
            can_mark_complete: can_mark_complete(
                status,
                row.sessions_used,
                row.sessions_authorized,
            ),
            payment_exceeds_billed: row.paid_amount_cents > row.billed_amount_cents,
        };

        // Stats cover the full set, before filters.
        stats.total += 1;
        match status {
            PoStatus::Pending => stats.pending += 1,
            PoStatus::ApprovedPendingAuth => stats.need_auth += 1,
            PoStatus::Active => stats.active += 1,
            PoStatus::Completed => stats.completed += 1,
            PoStatus::Expired => stats.expired += 1,
            PoStatus::Cancelled => stats.cancelled += 1,
        }
        match billing_status {
            BillingStatus::Unbilled => stats.unbilled += 1,
            BillingStatus::Billed => stats.billed += 1,
            BillingStatus::Paid => stats.paid += 1,
            BillingStatus::Partial => stats.partial += 1,
            BillingStatus::Overdue | BillingStatus::Disputed => stats.disputed += 1,
        }
        if overdue {
            stats.overdue += 1;
        }
        stats.total_billed_cents += row.billed_amount_cents;
        stats.total_paid_cents += row.paid_amount_cents;

        orders.push(order);
    }
    stats.total_outstanding_cents = stats.total_billed_cents - stats.total_paid_cents;

    // Filters apply after stats, matching the listing page behavior.
    let search = request.search.as_deref().map(str::to_lowercase);
    let orders: Vec<PurchaseOrderInfo> = orders
        .into_iter()
        .filter(|order| {
            let matches_search = search.as_deref().is_none_or(|term| {
                order.swimmer_name.to_lowercase().contains(term)
                    || order
                        .authorization_number
                        .as_deref()
                        .is_some_and(|v| v.to_lowercase().contains(term))
                    || order
                        .coordinator_name
                        .as_deref()
                        .is_some_and(|v| v.to_lowercase().contains(term))
                    || order
                        .invoice_number
                        .as_deref()
                        .is_some_and(|v| v.to_lowercase().contains(term))
            });

            let matches_status = request
                .status
                .as_deref()
                .is_none_or(|s| order.status == s);
            let matches_billing = request.billing_status.as_deref().is_none_or(|s| {
                if s == "overdue" {
                    order.is_overdue
                } else {
                    order.billing_status == s
                }
            });
            let matches_type = request
                .po_type
                .as_deref()
                .is_none_or(|t| order.po_type == t);
            let matches_source = request
                .funding_source_id
                .is_none_or(|id| order.funding_source_id == id);

            matches_search && matches_status && matches_billing && matches_type && matches_source
        })
        .collect();

    Ok(ListPurchaseOrdersResponse { orders, stats })
}

/// Applies an approval-dialog decision (approve or decline).
///
/// Declining overwrites the stored notes with `"Declined: <reason>"`.
///
/// # Errors
///
/// Returns an error if the decision is not permitted for the order's
/// current status or the decline reason is missing.
pub fn review_purchase_order(
    persistence: &mut Persistence,
    request: &ReviewPurchaseOrderRequest,
    actor: &AuthenticatedActor,
    now: DateTime<Utc>,
) -> Result<ReviewPurchaseOrderResponse, ApiError> {
    AuthorizationService::authorize_manage_purchase_orders(actor)?;

    let row = persistence
        .get_purchase_order(request.po_id)
        .map_err(translate_persistence_error)?;
    let current: PoStatus = parse_status(&row.status)?;

    let outcome =
        apply_approval_decision(current, &request.decision).map_err(translate_domain_error)?;

    persistence
        .update_po_status(
            request.po_id,
            outcome.new_status.as_str(),
            outcome.authorization_number.as_deref(),
            outcome.notes.as_deref(),
            &format_timestamp(now),
        )
        .map_err(translate_persistence_error)?;

    let message = match outcome.new_status {
        PoStatus::Active => String::from("Purchase order approved and active"),
        PoStatus::ApprovedPendingAuth => {
            String::from("Purchase order approved; awaiting authorization number")
        }
        PoStatus::Cancelled => String::from("Purchase order declined"),
        other => format!("Purchase order is now {other}"),
    };

    info!(po_id = request.po_id, status = %outcome.new_status, "Reviewed purchase order");

    Ok(ReviewPurchaseOrderResponse {
        po_id: request.po_id,
        status: outcome.new_status.as_str().to_string(),
        authorization_number: outcome
            .authorization_number
            .or(row.authorization_number),
        message,
    })
}

/// Marks an exhausted active purchase order complete.
///
/// # Errors
///
/// Returns an error unless the order is active with
/// `sessions_used >= sessions_authorized`.
pub fn complete_purchase_order(
    persistence: &mut Persistence,
    request: &CompletePurchaseOrderRequest,
    actor: &AuthenticatedActor,
    now: DateTime<Utc>,
) -> Result<PurchaseOrderActionResponse, ApiError> {
    AuthorizationService::authorize_manage_purchase_orders(actor)?;

    let row = persistence
        .get_purchase_order(request.po_id)
        .map_err(translate_persistence_error)?;
    let current: PoStatus = parse_status(&row.status)?;

    let new_status = completion_transition(current, row.sessions_used, row.sessions_authorized)
        .map_err(translate_domain_error)?;

    persistence
        .update_po_status(
            request.po_id,
            new_status.as_str(),
            None,
            None,
            &format_timestamp(now),
        )
        .map_err(translate_persistence_error)?;

    Ok(PurchaseOrderActionResponse {
        po_id: request.po_id,
        status: new_status.as_str().to_string(),
        billing_status: row.billing_status,
        message: String::from("Purchase order marked complete"),
    })
}

/// Updates a purchase order's billing fields through the billing modal.
///
/// `paid > billed` is flagged in listings, not blocked here.
///
/// # Errors
///
/// Returns an error if the actor lacks permission or a field is
/// invalid.
pub fn update_purchase_order_billing(
    persistence: &mut Persistence,
    request: &UpdatePoBillingRequest,
    actor: &AuthenticatedActor,
    now: DateTime<Utc>,
) -> Result<PurchaseOrderActionResponse, ApiError> {
    AuthorizationService::authorize_manage_billing(actor)?;

    let billing_status: BillingStatus = parse_status(&request.billing_status)?;
    if request.billed_amount_cents < 0 || request.paid_amount_cents < 0 {
        return Err(ApiError::InvalidInput {
            field: String::from("amount_cents"),
            message: String::from("Amounts cannot be negative"),
        });
    }
    if let Some(due) = &request.due_date {
        parse_date(due, "due_date")?;
    }

    let row = persistence
        .get_purchase_order(request.po_id)
        .map_err(translate_persistence_error)?;

    let ts = format_timestamp(now);
    let billed_at = if request.billed_amount_cents > 0 {
        row.billed_at.or_else(|| Some(ts.clone()))
    } else {
        row.billed_at
    };
    let paid_at = if request.paid_amount_cents > 0 {
        row.paid_at.or_else(|| Some(ts.clone()))
    } else {
        row.paid_at
    };

    persistence
        .update_po_billing(
            request.po_id,
            &BillingUpdate {
                billing_status: billing_status.as_str().to_string(),
                billed_amount_cents: request.billed_amount_cents,
                paid_amount_cents: request.paid_amount_cents,
                invoice_number: request.invoice_number.clone(),
                payment_reference: request.payment_reference.clone(),
                billing_notes: request.billing_notes.clone(),
                due_date: request.due_date.clone(),
                billed_at,
                paid_at,
            },
            &ts,
        )
        .map_err(translate_persistence_error)?;

    Ok(PurchaseOrderActionResponse {
        po_id: request.po_id,
        status: row.status,
        billing_status: billing_status.as_str().to_string(),
        message: String::from("Billing details updated"),
    })
}

/// Records session usage against a purchase order.
///
/// `sessions_used` may exceed `sessions_authorized` (overbooking is
/// surfaced in listings, not blocked).
///
/// # Errors
///
/// Returns an error if the counts are negative or the order is
/// unknown.
pub fn update_purchase_order_usage(
    persistence: &mut Persistence,
    request: &UpdatePoUsageRequest,
    actor: &AuthenticatedActor,
    now: DateTime<Utc>,
) -> Result<PurchaseOrderActionResponse, ApiError> {
    AuthorizationService::authorize_manage_purchase_orders(actor)?;

    if request.sessions_booked < 0 || request.sessions_used < 0 {
        return Err(ApiError::InvalidInput {
            field: String::from("sessions"),
            message: String::from("Session counts cannot be negative"),
        });
    }

    let row = persistence
        .get_purchase_order(request.po_id)
        .map_err(translate_persistence_error)?;

    persistence
        .update_po_usage(
            request.po_id,
            request.sessions_booked,
            request.sessions_used,
            &format_timestamp(now),
        )
        .map_err(translate_persistence_error)?;

    Ok(PurchaseOrderActionResponse {
        po_id: request.po_id,
        status: row.status,
        billing_status: row.billing_status,
        message: String::from("Session usage recorded"),
    })
}

// ============================================================================
// Monthly billing
// ============================================================================

/// Lists billing periods, newest first.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the listing fails.
pub fn list_billing_periods(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<ListBillingPeriodsResponse, ApiError> {
    AuthorizationService::authorize_manage_billing(actor)?;

    let periods = persistence
        .list_billing_periods()
        .map_err(|e| internal(&e))?
        .into_iter()
        .map(|row| BillingPeriodInfo {
            billing_period_id: row.billing_period_id,
            month: row.month,
            year: row.year,
            funding_source_id: row.funding_source_id,
            status: row.status,
            generated_at: row.generated_at,
            exported_at: row.exported_at,
        })
        .collect();

    Ok(ListBillingPeriodsResponse { periods })
}

/// Creates a month/year billing bucket for a funding source.
///
/// # Errors
///
/// Returns an error if the month is invalid or the period already
/// exists.
pub fn create_billing_period(
    persistence: &mut Persistence,
    request: &CreateBillingPeriodRequest,
    actor: &AuthenticatedActor,
) -> Result<BillingPeriodInfo, ApiError> {
    AuthorizationService::authorize_manage_billing(actor)?;

    if !(1..=12).contains(&request.month) {
        return Err(ApiError::InvalidInput {
            field: String::from("month"),
            message: format!("Month must be between 1 and 12 (got {})", request.month),
        });
    }

    persistence
        .get_funding_source(request.funding_source_id)
        .map_err(translate_persistence_error)?;

    let existing = persistence
        .find_billing_period(request.month, request.year, request.funding_source_id)
        .map_err(|e| internal(&e))?;
    if existing.is_some() {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("unique_billing_period"),
            message: format!(
                "Billing period {}/{} already exists for this funding source",
                request.month, request.year
            ),
        });
    }

    let billing_period_id = persistence
        .create_billing_period(&NewBillingPeriod {
            month: request.month,
            year: request.year,
            funding_source_id: request.funding_source_id,
            status: BillingPeriodStatus::Draft.as_str().to_string(),
        })
        .map_err(|e| internal(&e))?;

    Ok(BillingPeriodInfo {
        billing_period_id,
        month: request.month,
        year: request.year,
        funding_source_id: request.funding_source_id,
        status: BillingPeriodStatus::Draft.as_str().to_string(),
        generated_at: None,
        exported_at: None,
    })
}

/// Populates a draft period's line items: one pending item per billable
/// lessons authorization with unbilled usage.
///
/// Idempotent: repeated calls delete and regenerate inside one
/// transaction.
///
/// # Errors
///
/// Returns an error if the period is past draft or persistence fails.
pub fn generate_billing(
    persistence: &mut Persistence,
    request: &GenerateBillingRequest,
    actor: &AuthenticatedActor,
    now: DateTime<Utc>,
) -> Result<GenerateBillingResponse, ApiError> {
    AuthorizationService::authorize_manage_billing(actor)?;

    let period = persistence
        .get_billing_period(request.billing_period_id)
        .map_err(translate_persistence_error)?;
    let status: BillingPeriodStatus = parse_status(&period.status)?;
    if !status.generation_allowed() {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("billing_generation"),
            message: format!(
                "Line items can only be generated while the period is a draft (current status: {status})"
            ),
        });
    }

    let source = persistence
        .get_funding_source(period.funding_source_id)
        .map_err(translate_persistence_error)?;
    let orders = persistence
        .list_billable_lesson_orders(period.funding_source_id)
        .map_err(|e| internal(&e))?;

    let swimmer_ids: Vec<i64> = {
        let unique: HashSet<i64> = orders.iter().map(|o| o.swimmer_id).collect();
        unique.into_iter().collect()
    };
    let swimmers: HashMap<i64, String> = persistence
        .get_swimmers_by_ids(&swimmer_ids)
        .map_err(|e| internal(&e))?
        .into_iter()
        .map(|s| (s.swimmer_id, s.full_name()))
        .collect();

    let mut items = Vec::new();
    for order in &orders {
        let already_billed = persistence
            .billed_units_for_order(order.po_id)
            .map_err(|e| internal(&e))?;
        let usable = i64::from(order.sessions_used.min(order.sessions_authorized));
        let units = usable - already_billed;
        if units <= 0 {
            continue;
        }

        let units = i32::try_from(units).map_err(|_| ApiError::Internal {
            message: format!("unit overflow for purchase order {}", order.po_id),
        })?;
        items.push(NewBillingLineItem {
            billing_period_id: period.billing_period_id,
            po_id: order.po_id,
            swimmer_id: order.swimmer_id,
            swimmer_name: swimmers
                .get(&order.swimmer_id)
                .cloned()
                .unwrap_or_default(),
            authorization_number: order.authorization_number.clone(),
            units_billed: units,
            rate_cents: source.lesson_rate_cents,
            gross_amount_cents: i64::from(units) * source.lesson_rate_cents,
            status: LineItemStatus::Pending.as_str().to_string(),
        });
    }

    let created = persistence
        .regenerate_line_items(period.billing_period_id, &items, &format_timestamp(now))
        .map_err(translate_persistence_error)?;

    info!(
        billing_period_id = period.billing_period_id,
        created, "Generated billing line items"
    );

    Ok(GenerateBillingResponse {
        billing_period_id: period.billing_period_id,
        created,
        message: format!("Generated {created} billing line items"),
    })
}

/// Advances a billing period along its forward-only progression
/// (e.g., marking a generated period reviewed, or a submitted period
/// paid once the agency remits).
///
/// # Errors
///
/// Returns an error if the transition is not permitted.
pub fn update_billing_period_status(
    persistence: &mut Persistence,
    request: &UpdateBillingPeriodStatusRequest,
    actor: &AuthenticatedActor,
) -> Result<BillingPeriodInfo, ApiError> {
    AuthorizationService::authorize_manage_billing(actor)?;

    let period = persistence
        .get_billing_period(request.billing_period_id)
        .map_err(translate_persistence_error)?;
    let current: BillingPeriodStatus = parse_status(&period.status)?;
    let target: BillingPeriodStatus = parse_status(&request.status)?;
    current
        .validate_transition(target)
        .map_err(translate_domain_error)?;

    persistence
        .update_period_status(request.billing_period_id, target.as_str())
        .map_err(translate_persistence_error)?;

    Ok(BillingPeriodInfo {
        billing_period_id: period.billing_period_id,
        month: period.month,
        year: period.year,
        funding_source_id: period.funding_source_id,
        status: target.as_str().to_string(),
        generated_at: period.generated_at,
        exported_at: period.exported_at,
    })
}

/// Lists a period's line items.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the period is
/// unknown.
pub fn list_line_items(
    persistence: &mut Persistence,
    billing_period_id: i64,
    actor: &AuthenticatedActor,
) -> Result<ListLineItemsResponse, ApiError> {
    AuthorizationService::authorize_manage_billing(actor)?;

    persistence
        .get_billing_period(billing_period_id)
        .map_err(translate_persistence_error)?;

    let line_items = persistence
        .list_line_items(billing_period_id)
        .map_err(|e| internal(&e))?
        .into_iter()
        .map(|row| BillingLineItemInfo {
            line_item_id: row.line_item_id,
            po_id: row.po_id,
            swimmer_id: row.swimmer_id,
            swimmer_name: row.swimmer_name,
            authorization_number: row.authorization_number,
            units_billed: row.units_billed,
            rate_cents: row.rate_cents,
            gross_amount_cents: row.gross_amount_cents,
            status: row.status,
        })
        .collect();

    Ok(ListLineItemsResponse {
        billing_period_id,
        line_items,
    })
}

/// Records a reviewer decision on one line item.
///
/// # Errors
///
/// Returns an error if the period is already submitted or the
/// transition is not a valid review move.
pub fn review_line_item(
    persistence: &mut Persistence,
    request: &ReviewLineItemRequest,
    actor: &AuthenticatedActor,
) -> Result<LineItemActionResponse, ApiError> {
    AuthorizationService::authorize_manage_billing(actor)?;

    let item = persistence
        .get_line_item(request.line_item_id)
        .map_err(translate_persistence_error)?;
    let period = persistence
        .get_billing_period(item.billing_period_id)
        .map_err(translate_persistence_error)?;

    let period_status: BillingPeriodStatus = parse_status(&period.status)?;
    if matches!(
        period_status,
        BillingPeriodStatus::Submitted | BillingPeriodStatus::Paid
    ) {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("period_locked"),
            message: String::from("Line items are locked once the period is submitted"),
        });
    }

    let current: LineItemStatus = parse_status(&item.status)?;
    let target: LineItemStatus = parse_status(&request.status)?;
    current
        .validate_review_transition(target)
        .map_err(translate_domain_error)?;

    persistence
        .update_line_item_status(request.line_item_id, target.as_str())
        .map_err(translate_persistence_error)?;

    Ok(LineItemActionResponse {
        line_item_id: request.line_item_id,
        status: target.as_str().to_string(),
        message: String::from("Line item updated"),
    })
}

fn compute_period_summary(
    persistence: &mut Persistence,
    billing_period_id: i64,
) -> Result<BillingPeriodSummary, ApiError> {
    let items = persistence
        .list_line_items(billing_period_id)
        .map_err(|e| internal(&e))?;

    let mut summary = BillingPeriodSummary::default();
    let mut po_ids: Vec<i64> = Vec::new();

    for item in &items {
        match item.status.as_str() {
            "billed" => {
                summary.total_lessons_billed += i64::from(item.units_billed);
                summary.total_amount_billed_cents += item.gross_amount_cents;
            }
            "pending" | "included" => {
                summary.total_amount_pending_cents += item.gross_amount_cents;
            }
            _ => {}
        }
        if !po_ids.contains(&item.po_id) {
            po_ids.push(item.po_id);
        }
    }

    for po_id in po_ids {
        let order = persistence
            .get_purchase_order(po_id)
            .map_err(translate_persistence_error)?;
        summary.total_lessons_remaining +=
            i64::from((order.sessions_authorized - order.sessions_used).max(0));
    }

    Ok(summary)
}

/// Returns the aggregated totals for a billing period.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the period is
/// unknown.
pub fn get_billing_period_summary(
    persistence: &mut Persistence,
    billing_period_id: i64,
    actor: &AuthenticatedActor,
) -> Result<BillingPeriodSummary, ApiError> {
    AuthorizationService::authorize_manage_billing(actor)?;

    persistence
        .get_billing_period(billing_period_id)
        .map_err(translate_persistence_error)?;

    compute_period_summary(persistence, billing_period_id)
}

/// Renders the period's e-billing XML and applies the export side
/// effects atomically: included items become billed, their purchase
/// orders' billing fields advance, and the period moves to
/// `submitted`.
///
/// Export is disabled while the period is still a draft.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the period is a
/// draft, or persistence fails.
pub fn export_billing_xml(
    persistence: &mut Persistence,
    request: &ExportBillingXmlRequest,
    actor: &AuthenticatedActor,
    now: DateTime<Utc>,
) -> Result<ExportBillingXmlResponse, ApiError> {
    AuthorizationService::authorize_manage_billing(actor)?;

    let period = persistence
        .get_billing_period(request.billing_period_id)
        .map_err(translate_persistence_error)?;
    let status: BillingPeriodStatus = parse_status(&period.status)?;
    if !status.export_allowed() {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("billing_export"),
            message: String::from("Nothing generated yet: export is disabled for draft periods"),
        });
    }

    let source = persistence
        .get_funding_source(period.funding_source_id)
        .map_err(translate_persistence_error)?;

    let items = persistence
        .list_line_items(period.billing_period_id)
        .map_err(|e| internal(&e))?;
    let exported: Vec<_> = items
        .into_iter()
        .filter(|item| matches!(item.status.as_str(), "included" | "billed"))
        .collect();

    let xml_content = render_billing_xml(&source, &period, &exported);
    let file_name = export_file_name(&source, &period);

    let billed_count = persistence
        .mark_exported(period.billing_period_id, &format_timestamp(now))
        .map_err(translate_persistence_error)?;

    let summary = compute_period_summary(persistence, period.billing_period_id)?;

    info!(
        billing_period_id = period.billing_period_id,
        billed_count, "Exported billing XML"
    );

    Ok(ExportBillingXmlResponse {
        billing_period_id: period.billing_period_id,
        file_name,
        xml_content,
        billed_count,
        summary,
    })
}

// ============================================================================
// Time off
// ============================================================================

/// Lists time-off requests with display names, pending first.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or a lookup fails.
pub fn list_time_off_requests(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<ListTimeOffRequestsResponse, ApiError> {
    AuthorizationService::authorize_review_time_off(actor)?;

    let rows = persistence
        .list_time_off_requests()
        .map_err(|e| internal(&e))?;

    let profile_ids: Vec<i64> = {
        let mut unique: HashSet<i64> = rows.iter().map(|r| r.instructor_id).collect();
        unique.extend(rows.iter().filter_map(|r| r.reviewed_by));
        unique.into_iter().collect()
    };
    let names: HashMap<i64, String> = persistence
        .get_profiles_by_ids(&profile_ids)
        .map_err(|e| internal(&e))?
        .into_iter()
        .map(|p| (p.user_id, p.full_name))
        .collect();

    let mut requests: Vec<TimeOffRequestInfo> = rows
        .into_iter()
        .map(|row| TimeOffRequestInfo {
            time_off_id: row.time_off_id,
            instructor_id: row.instructor_id,
            instructor_name: names
                .get(&row.instructor_id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_INSTRUCTOR.to_string()),
            start_at: row.start_at,
            end_at: row.end_at,
            all_day: row.all_day != 0,
            reason_type: row.reason_type,
            status: row.status,
            admin_notes: row.admin_notes,
            reviewer_name: row.reviewed_by.and_then(|id| names.get(&id).cloned()),
            reviewed_at: row.reviewed_at,
            created_at: row.created_at,
        })
        .collect();

    // Pending requests surface first; each group stays newest-first.
    requests.sort_by_key(|r| r.status != "pending");

    Ok(ListTimeOffRequestsResponse { requests })
}

fn conflicts_for_request(
    persistence: &mut Persistence,
    instructor_id: i64,
    window_start: &str,
    window_end: &str,
) -> Result<Vec<ConflictInfo>, ApiError> {
    let sessions = persistence
        .list_instructor_sessions_in_window(instructor_id, window_start, window_end)
        .map_err(|e| internal(&e))?;

    let mut conflicts = Vec::with_capacity(sessions.len());
    for session in &sessions {
        let status: SessionStatus = parse_status(&session.status)?;
        if status == SessionStatus::Draft {
            // Drafts are not parent-visible; they never conflict.
            continue;
        }
        let swimmer_count = persistence
            .count_confirmed_bookings(session.session_id)
            .map_err(|e| internal(&e))?;
        conflicts.push(ConflictInfo {
            session_id: session.session_id,
            start_time: session.start_time.clone(),
            end_time: session.end_time.clone(),
            location: session.location.clone(),
            status: session.status.clone(),
            swimmer_count,
            actionable: conflict_actionable(status),
        });
    }

    Ok(conflicts)
}

/// Looks up the sessions conflicting with a time-off request, plus any
/// other approved requests overlapping the window.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the request is
/// unknown.
pub fn get_time_off_conflicts(
    persistence: &mut Persistence,
    time_off_id: i64,
    actor: &AuthenticatedActor,
) -> Result<TimeOffConflictsResponse, ApiError> {
    AuthorizationService::authorize_review_time_off(actor)?;

    let request = persistence
        .get_time_off_request(time_off_id)
        .map_err(translate_persistence_error)?;

    let conflicts = conflicts_for_request(
        persistence,
        request.instructor_id,
        &request.start_at,
        &request.end_at,
    )?;

    let overlapping_time_off: Vec<OverlappingTimeOffInfo> = persistence
        .list_overlapping_approved_requests(
            request.instructor_id,
            &request.start_at,
            &request.end_at,
            time_off_id,
        )
        .map_err(|e| internal(&e))?
        .into_iter()
        .map(|row| OverlappingTimeOffInfo {
            time_off_id: row.time_off_id,
            start_at: row.start_at,
            end_at: row.end_at,
            reason_type: row.reason_type,
        })
        .collect();

    let conflict_count = conflicts.len();
    let has_conflicts = conflict_count > 0 || !overlapping_time_off.is_empty();

    Ok(TimeOffConflictsResponse {
        time_off_id,
        conflicts,
        overlapping_time_off,
        conflict_count,
        has_conflicts,
    })
}

/// Records the review decision on a time-off request.
///
/// The decision submits independently of conflict resolution; the
/// response surfaces the remaining actionable conflict count instead
/// of blocking.
///
/// # Errors
///
/// Returns an error if the request is not pending or the status is
/// invalid.
pub fn review_time_off(
    persistence: &mut Persistence,
    request: &ReviewTimeOffRequest,
    actor: &AuthenticatedActor,
    now: DateTime<Utc>,
) -> Result<ReviewTimeOffResponse, ApiError> {
    AuthorizationService::authorize_review_time_off(actor)?;

    let row = persistence
        .get_time_off_request(request.time_off_id)
        .map_err(translate_persistence_error)?;
    let current: TimeOffStatus = parse_status(&row.status)?;
    let target: TimeOffStatus = parse_status(&request.status)?;
    current
        .validate_transition(target)
        .map_err(translate_domain_error)?;

    persistence
        .review_time_off_request(
            request.time_off_id,
            target.as_str(),
            request.admin_notes.as_deref(),
            actor.user_id,
            &format_timestamp(now),
        )
        .map_err(translate_persistence_error)?;

    let unresolved_conflicts =
        conflicts_for_request(persistence, row.instructor_id, &row.start_at, &row.end_at)?
            .iter()
            .filter(|c| c.actionable)
            .count();

    info!(
        time_off_id = request.time_off_id,
        status = %target,
        unresolved_conflicts,
        "Reviewed time-off request"
    );

    Ok(ReviewTimeOffResponse {
        time_off_id: request.time_off_id,
        status: target.as_str().to_string(),
        unresolved_conflicts,
        message: format!("Request {target} successfully"),
    })
}

/// Resolves a conflicting session by handing it to a replacement
/// instructor.
///
/// # Errors
///
/// Returns an error if the session is already resolved or the
/// replacement selection is invalid.
pub fn replace_conflict_instructor(
    persistence: &mut Persistence,
    request: &ReplaceInstructorRequest,
    actor: &AuthenticatedActor,
) -> Result<ConflictResolutionResponse, ApiError> {
    AuthorizationService::authorize_review_time_off(actor)?;

    let session = persistence
        .get_session(request.session_id)
        .map_err(translate_persistence_error)?;
    let status: SessionStatus = parse_status(&session.status)?;
    if !conflict_actionable(status) {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("conflict_resolved"),
            message: format!("Session {} has already been resolved", request.session_id),
        });
    }

    validate_replacement(session.instructor_id, request.replacement_instructor_id)
        .map_err(translate_domain_error)?;
    persistence
        .get_profile(request.replacement_instructor_id)
        .map_err(translate_persistence_error)?;

    let confirmed = persistence
        .replace_session_instructor(request.session_id, request.replacement_instructor_id)
        .map_err(translate_persistence_error)?;
    let parents_notified = if request.notify_parents { confirmed } else { 0 };

    Ok(ConflictResolutionResponse {
        session_id: request.session_id,
        status: SessionStatus::Reassigned.as_str().to_string(),
        parents_notified,
        message: format!(
            "Instructor replaced; {parents_notified} parent(s) notified"
        ),
    })
}

/// Resolves a conflicting session by cancelling it (and its confirmed
/// bookings) with the fixed conflict reason.
///
/// # Errors
///
/// Returns an error if the session is already resolved.
pub fn cancel_conflict_session(
    persistence: &mut Persistence,
    request: &CancelSessionRequest,
    actor: &AuthenticatedActor,
    now: DateTime<Utc>,
) -> Result<ConflictResolutionResponse, ApiError> {
    AuthorizationService::authorize_review_time_off(actor)?;

    let session = persistence
        .get_session(request.session_id)
        .map_err(translate_persistence_error)?;
    let status: SessionStatus = parse_status(&session.status)?;
    if !conflict_actionable(status) {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("conflict_resolved"),
            message: format!("Session {} has already been resolved", request.session_id),
        });
    }

    let cancelled = persistence
        .cancel_session_with_bookings(
            request.session_id,
            CONFLICT_CANCEL_REASON,
            actor.user_id,
            &format_timestamp(now),
        )
        .map_err(translate_persistence_error)?;
    let parents_notified = if request.notify_parents { cancelled } else { 0 };

    Ok(ConflictResolutionResponse {
        session_id: request.session_id,
        status: SessionStatus::Cancelled.as_str().to_string(),
        parents_notified,
        message: format!("Session cancelled; {parents_notified} parent(s) notified"),
    })
}

// ============================================================================
// Booking cancellation
// ============================================================================

/// Cancels a single booking, enforcing the 24-hour rule for parents.
///
/// Inside the cutoff the request is rejected with a distinct
/// late-cancellation error carrying contact-by-text guidance; admins
/// bypass the cutoff.
///
/// # Errors
///
/// Returns an error if the caller does not own the booking, the
/// booking is already cancelled, or the session is inside the cutoff.
pub fn cancel_booking(
    persistence: &mut Persistence,
    request: &CancelBookingRequest,
    actor: &AuthenticatedActor,
    now: DateTime<Utc>,
) -> Result<CancelBookingResponse, ApiError> {
    let booking = persistence
        .get_booking(request.booking_id)
        .map_err(translate_persistence_error)?;

    AuthorizationService::authorize_cancel_booking(actor, booking.parent_id)?;

    if booking.status == "cancelled" {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("booking_already_cancelled"),
            message: String::from("Booking is already cancelled"),
        });
    }

    let session = persistence
        .get_session(booking.session_id)
        .map_err(translate_persistence_error)?;

    let window = evaluate_cancellation_window(&session.start_time, now)
        .map_err(translate_domain_error)?;
    let is_admin = has_role(actor, &[Role::Admin]);

    if !window.is_cancellable() && !is_admin {
        return Err(ApiError::LateCancellation {
            hours_before_session: round_tenth(window.hours_before()),
            message: String::from(
                "For cancellations less than 24 hours before your session, please text us.",
            ),
            contact_phone: CONTACT_TEXT_LINE.to_string(),
        });
    }

    let booking_type: BookingType = parse_status(&booking.booking_type)?;
    let cancellation_type = match booking_type {
        BookingType::Assessment => "assessment",
        BookingType::Lesson => "single",
    };
    let cancel_source = if actor.user_id == booking.parent_id {
        "parent"
    } else {
        "admin"
    };

    let record = NewCancellation {
        booking_id: booking.booking_id,
        session_id: session.session_id,
        swimmer_id: booking.swimmer_id,
        parent_id: booking.parent_id,
        canceled_by: actor.user_id,
        cancellation_type: cancellation_type.to_string(),
        session_start_time: session.start_time.clone(),
        hours_before_session: round_hundredth(window.hours_before()),
        was_late_cancellation: i32::from(!matches!(window, CancellationWindow::Cancellable { .. })),
        cancel_reason: request.reason.clone(),
        cancel_source: cancel_source.to_string(),
        block_cancel_id: None,
        created_at: format_timestamp(now),
    };

    persistence
        .cancel_booking(booking.booking_id, session.session_id, &record)
        .map_err(translate_persistence_error)?;

    info!(booking_id = booking.booking_id, "Cancelled booking");

    Ok(CancelBookingResponse {
        booking_id: booking.booking_id,
        hours_before_session: round_tenth(window.hours_before()),
        message: String::from("Booking cancelled successfully"),
    })
}

/// Cancels a swimmer's entire recurring block, all-or-nothing over the
/// remaining future sessions.
///
/// Offered only while the block's earliest session is still strictly
/// in the future (admins bypass); sessions that already started are
/// skipped rather than cancelled.
///
/// # Errors
///
/// Returns an error if no active bookings exist in the block or the
/// first session has already started.
pub fn cancel_block(
    persistence: &mut Persistence,
    request: &CancelBlockRequest,
    actor: &AuthenticatedActor,
    now: DateTime<Utc>,
) -> Result<CancelBlockResponse, ApiError> {
    let swimmer = persistence
        .get_swimmer(request.swimmer_id)
        .map_err(translate_persistence_error)?;

    AuthorizationService::authorize_cancel_booking(actor, swimmer.parent_id)?;

    let bookings = persistence
        .list_confirmed_batch_bookings(request.swimmer_id, &request.batch_id)
        .map_err(|e| internal(&e))?;
    if bookings.is_empty() {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Block bookings"),
            message: String::from("No active bookings found in this block"),
        });
    }

    let is_admin = has_role(actor, &[Role::Admin]);
    let first_start = &bookings[0].1.start_time;
    let allowed = block_cancel_allowed(first_start, now).map_err(translate_domain_error)?;
    if !allowed && !is_admin {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("block_cancel_window"),
            message: String::from(
                "Cannot cancel block after first session has started. You can only cancel individual future sessions.",
            ),
        });
    }

    let block_cancel_id = generate_block_cancel_id();
    let cancel_source = if actor.user_id == swimmer.parent_id {
        "parent"
    } else {
        "admin"
    };
    let created_at = format_timestamp(now);

    let mut items = Vec::new();
    let mut skipped = 0usize;
    for (booking, session) in &bookings {
        let start = parse_timestamp(&session.start_time).map_err(translate_domain_error)?;
        if start <= now {
            skipped += 1;
            continue;
        }

        #[allow(clippy::cast_precision_loss)]
        let hours_before = (start - now).num_seconds() as f64 / 3600.0;
        items.push((
            booking.booking_id,
            session.session_id,
            NewCancellation {
                booking_id: booking.booking_id,
                session_id: session.session_id,
                swimmer_id: booking.swimmer_id,
                parent_id: booking.parent_id,
                canceled_by: actor.user_id,
                cancellation_type: String::from("block"),
                session_start_time: session.start_time.clone(),
                hours_before_session: round_hundredth(hours_before),
                was_late_cancellation: 0,
                cancel_reason: request.reason.clone(),
                cancel_source: cancel_source.to_string(),
                block_cancel_id: Some(block_cancel_id.clone()),
                created_at: created_at.clone(),
            },
        ));
    }

    let canceled = if items.is_empty() {
        0
    } else {
        persistence
            .cancel_bookings_block(&items)
            .map_err(translate_persistence_error)?
    };

    info!(
        swimmer_id = request.swimmer_id,
        batch_id = %request.batch_id,
        canceled,
        skipped,
        "Cancelled recurring block"
    );

    Ok(CancelBlockResponse {
        block_cancel_id,
        canceled,
        skipped,
        message: format!("{canceled} booking(s) cancelled, {skipped} skipped"),
    })
}

// ============================================================================
// People & enrollment
// ============================================================================

/// Creates a profile with optional roles.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the email is
/// malformed, or the email is already registered.
pub fn create_profile(
    persistence: &mut Persistence,
    request: &CreateProfileRequest,
    actor: &AuthenticatedActor,
    now: DateTime<Utc>,
) -> Result<CreateProfileResponse, ApiError> {
    AuthorizationService::authorize_administer_accounts(actor)?;

    validate_email(&request.email).map_err(translate_domain_error)?;
    if request.full_name.trim().is_empty() {
        return Err(translate_domain_error(DomainError::InvalidName(
            String::from("full name is required"),
        )));
    }
    for role in &request.roles {
        parse_status::<Role>(role)?;
    }

    let existing = persistence
        .get_profile_by_email(&request.email)
        .map_err(|e| internal(&e))?;
    if existing.is_some() {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("unique_email"),
            message: format!("A profile already exists for {}", request.email),
        });
    }

    let user_id = persistence
        .create_profile(
            &NewProfile {
                email: request.email.clone(),
                full_name: request.full_name.clone(),
                phone: request.phone.clone(),
                created_at: format_timestamp(now),
            },
            &request.roles,
        )
        .map_err(|e| internal(&e))?;

    Ok(CreateProfileResponse {
        user_id,
        message: format!("Created profile for {}", request.email),
    })
}

/// Deletes a profile, blocked while swimmers link to it.
///
/// # Errors
///
/// Returns a domain rule violation if swimmers reference the profile.
pub fn delete_profile(
    persistence: &mut Persistence,
    request: &DeleteProfileRequest,
    actor: &AuthenticatedActor,
) -> Result<DeleteProfileResponse, ApiError> {
    AuthorizationService::authorize_administer_accounts(actor)?;

    persistence
        .delete_profile(request.user_id)
        .map_err(translate_persistence_error)?;

    Ok(DeleteProfileResponse {
        user_id: request.user_id,
        message: String::from("Profile deleted"),
    })
}

/// Lists instructors for replacement pickers and the generator form.
///
/// # Errors
///
/// Returns an error if the actor is not an admin.
pub fn list_instructors(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<ListInstructorsResponse, ApiError> {
    AuthorizationService::authorize_manage_sessions(actor)?;

    let instructors = persistence
        .list_profiles_by_role(Role::Instructor.as_str())
        .map_err(|e| internal(&e))?
        .into_iter()
        .map(|p| InstructorInfo {
            id: p.user_id,
            name: p.full_name,
        })
        .collect();

    Ok(ListInstructorsResponse { instructors })
}

/// Creates a swimmer via the enrollment flow or direct admin entry.
///
/// Parents create swimmers under their own profile; specifying another
/// parent requires the admin role.
///
/// # Errors
///
/// Returns an error if field validation fails or references are
/// invalid.
pub fn create_swimmer(
    persistence: &mut Persistence,
    request: &CreateSwimmerRequest,
    actor: &AuthenticatedActor,
) -> Result<CreateSwimmerResponse, ApiError> {
    let parent_id = request.parent_id.unwrap_or(actor.user_id);
    if parent_id != actor.user_id && !has_role(actor, &[Role::Admin]) {
        return Err(ApiError::Unauthorized {
            action: String::from("create_swimmer"),
            required_role: String::from("admin"),
        });
    }

    validate_swimmer_fields(
        &request.first_name,
        &request.last_name,
        &request.date_of_birth,
    )
    .map_err(translate_domain_error)?;

    let enrollment: EnrollmentStatus = request
        .enrollment_status
        .as_deref()
        .map_or(Ok(EnrollmentStatus::Waitlist), parse_status)?;
    let payment: PaymentType = request
        .payment_type
        .as_deref()
        .map_or(Ok(PaymentType::PrivatePay), parse_status)?;

    persistence
        .get_profile(parent_id)
        .map_err(translate_persistence_error)?;
    if let Some(source_id) = request.funding_source_id {
        persistence
            .get_funding_source(source_id)
            .map_err(translate_persistence_error)?;
    }

    let swimmer_id = persistence
        .create_swimmer(&NewSwimmer {
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            date_of_birth: request.date_of_birth.clone(),
            enrollment_status: enrollment.as_str().to_string(),
            payment_type: payment.as_str().to_string(),
            funding_source_id: request.funding_source_id,
            parent_id,
            coordinator_id: request.coordinator_id,
            waiver_signed: 0,
            waiver_signed_at: None,
        })
        .map_err(|e| internal(&e))?;

    Ok(CreateSwimmerResponse {
        swimmer_id,
        enrollment_status: enrollment.as_str().to_string(),
        message: format!(
            "Created swimmer {} {}",
            request.first_name, request.last_name
        ),
    })
}

/// Moves a swimmer along the enrollment lifecycle.
///
/// # Errors
///
/// Returns an error if the transition is not permitted.
pub fn update_swimmer_enrollment(
    persistence: &mut Persistence,
    request: &UpdateEnrollmentRequest,
    actor: &AuthenticatedActor,
) -> Result<UpdateEnrollmentResponse, ApiError> {
    AuthorizationService::authorize_administer_accounts(actor)?;

    let swimmer = persistence
        .get_swimmer(request.swimmer_id)
        .map_err(translate_persistence_error)?;
    let current: EnrollmentStatus = parse_status(&swimmer.enrollment_status)?;
    let target: EnrollmentStatus = parse_status(&request.enrollment_status)?;
    current
        .validate_transition(target)
        .map_err(translate_domain_error)?;

    persistence
        .update_enrollment_status(request.swimmer_id, target.as_str())
        .map_err(translate_persistence_error)?;

    Ok(UpdateEnrollmentResponse {
        swimmer_id: request.swimmer_id,
        enrollment_status: target.as_str().to_string(),
        message: format!("Enrollment status updated to {target}"),
    })
}

/// Records a signed liability waiver.
///
/// # Errors
///
/// Returns an error if the caller is neither the swimmer's parent nor
/// an admin.
pub fn sign_waiver(
    persistence: &mut Persistence,
    request: &SignWaiverRequest,
    actor: &AuthenticatedActor,
    now: DateTime<Utc>,
) -> Result<SignWaiverResponse, ApiError> {
    let swimmer = persistence
        .get_swimmer(request.swimmer_id)
        .map_err(translate_persistence_error)?;
    AuthorizationService::authorize_cancel_booking(actor, swimmer.parent_id).map_err(|_| {
        ApiError::Unauthorized {
            action: String::from("sign_waiver"),
            required_role: String::from("owning parent or admin"),
        }
    })?;

    let signed_at = format_timestamp(now);
    persistence
        .record_waiver_signed(request.swimmer_id, &signed_at)
        .map_err(translate_persistence_error)?;

    Ok(SignWaiverResponse {
        swimmer_id: request.swimmer_id,
        waiver_signed_at: signed_at,
        message: String::from("Waiver recorded"),
    })
}

/// Reassigns a swimmer's coordinator.
///
/// With `coordinator_id` the swimmer moves to an existing coordinator;
/// with `new_coordinator` the coordinator profile, its role, and the
/// reassignment happen in one transaction.
///
/// # Errors
///
/// Returns an error unless exactly one target form is supplied and
/// valid.
pub fn transfer_client(
    persistence: &mut Persistence,
    request: &TransferClientRequest,
    actor: &AuthenticatedActor,
    now: DateTime<Utc>,
) -> Result<TransferClientResponse, ApiError> {
    AuthorizationService::authorize_administer_accounts(actor)?;

    persistence
        .get_swimmer(request.swimmer_id)
        .map_err(translate_persistence_error)?;

    match (&request.coordinator_id, &request.new_coordinator) {
        (Some(coordinator_id), None) => {
            persistence
                .get_profile(*coordinator_id)
                .map_err(translate_persistence_error)?;
            persistence
                .update_swimmer_coordinator(request.swimmer_id, *coordinator_id)
                .map_err(translate_persistence_error)?;
            persistence
                .add_role(*coordinator_id, Role::Coordinator.as_str())
                .map_err(|e| internal(&e))?;

            Ok(TransferClientResponse {
                swimmer_id: request.swimmer_id,
                coordinator_id: *coordinator_id,
                created_coordinator: false,
                message: String::from("Client transferred"),
            })
        }
        (None, Some(new_coordinator)) => {
            validate_email(&new_coordinator.email).map_err(translate_domain_error)?;
            let existing = persistence
                .get_profile_by_email(&new_coordinator.email)
                .map_err(|e| internal(&e))?;
            if existing.is_some() {
                return Err(ApiError::DomainRuleViolation {
                    rule: String::from("unique_email"),
                    message: format!(
                        "A profile already exists for {}; transfer to it by id instead",
                        new_coordinator.email
                    ),
                });
            }

            let coordinator_id = persistence
                .transfer_to_new_coordinator(
                    request.swimmer_id,
                    &NewProfile {
                        email: new_coordinator.email.clone(),
                        full_name: new_coordinator.full_name.clone(),
                        phone: new_coordinator.phone.clone(),
                        created_at: format_timestamp(now),
                    },
                )
                .map_err(translate_persistence_error)?;

            info!(
                swimmer_id = request.swimmer_id,
                coordinator_id, "Transferred client to newly created coordinator"
            );

            Ok(TransferClientResponse {
                swimmer_id: request.swimmer_id,
                coordinator_id,
                created_coordinator: true,
                message: String::from("Client transferred to new coordinator"),
            })
        }
        _ => Err(ApiError::InvalidInput {
            field: String::from("coordinator"),
            message: String::from(
                "Provide exactly one of coordinator_id or new_coordinator",
            ),
        }),
    }
}

// ============================================================================
// Funding sources
// ============================================================================

fn form_to_domain(form: &FundingSourceForm, funding_source_id: Option<i64>) -> FundingSource {
    FundingSource {
        funding_source_id,
        name: form.name.clone(),
        short_name: form.short_name.clone(),
        allowed_email_domains: parse_email_domains(&form.allowed_email_domains),
        assessment_sessions: form.assessment_sessions,
        lessons_per_po: form.lessons_per_po,
        authorization_months: form.authorization_months,
        renewal_alert_threshold: form.renewal_alert_threshold,
        lesson_rate_cents: form.lesson_rate_cents,
        billing_contact_name: form.billing_contact_name.clone(),
        billing_contact_email: form.billing_contact_email.clone(),
        billing_contact_phone: form.billing_contact_phone.clone(),
        is_active: form.is_active,
    }
}

fn domain_to_row(source: &FundingSource) -> Result<NewFundingSource, ApiError> {
    Ok(NewFundingSource {
        name: source.name.clone(),
        short_name: source.short_name.clone(),
        allowed_email_domains: encode_domains(&source.allowed_email_domains)
            .map_err(|e| internal(&e))?,
        assessment_sessions: source.assessment_sessions,
        lessons_per_po: source.lessons_per_po,
        authorization_months: source.authorization_months,
        renewal_alert_threshold: source.renewal_alert_threshold,
        lesson_rate_cents: source.lesson_rate_cents,
        billing_contact_name: source.billing_contact_name.clone(),
        billing_contact_email: source.billing_contact_email.clone(),
        billing_contact_phone: source.billing_contact_phone.clone(),
        is_active: i32::from(source.is_active),
    })
}

/// Creates a funding source after form validation.
///
/// # Errors
///
/// Returns a field error before any persistence call if the form is
/// invalid.
pub fn create_funding_source(
    persistence: &mut Persistence,
    form: &FundingSourceForm,
    actor: &AuthenticatedActor,
) -> Result<FundingSourceActionResponse, ApiError> {
    AuthorizationService::authorize_administer_accounts(actor)?;

    let source = form_to_domain(form, None);
    validate_funding_source(&source).map_err(translate_domain_error)?;

    let funding_source_id = persistence
        .create_funding_source(&domain_to_row(&source)?)
        .map_err(|e| internal(&e))?;

    Ok(FundingSourceActionResponse {
        funding_source_id,
        message: format!("Created funding source {}", source.name),
    })
}

/// Updates a funding source after form validation.
///
/// # Errors
///
/// Returns a field error before any persistence call if the form is
/// invalid.
pub fn update_funding_source(
    persistence: &mut Persistence,
    funding_source_id: i64,
    form: &FundingSourceForm,
    actor: &AuthenticatedActor,
) -> Result<FundingSourceActionResponse, ApiError> {
    AuthorizationService::authorize_administer_accounts(actor)?;

    let source = form_to_domain(form, Some(funding_source_id));
    validate_funding_source(&source).map_err(translate_domain_error)?;

    persistence
        .update_funding_source(funding_source_id, &domain_to_row(&source)?)
        .map_err(translate_persistence_error)?;

    Ok(FundingSourceActionResponse {
        funding_source_id,
        message: format!("Updated funding source {}", source.name),
    })
}

/// Deletes a funding source, blocked while swimmers reference it.
///
/// # Errors
///
/// Returns a domain rule violation while swimmers reference the
/// source.
pub fn delete_funding_source(
    persistence: &mut Persistence,
    funding_source_id: i64,
    actor: &AuthenticatedActor,
) -> Result<FundingSourceActionResponse, ApiError> {
    AuthorizationService::authorize_administer_accounts(actor)?;

    persistence
        .delete_funding_source(funding_source_id)
        .map_err(translate_persistence_error)?;

    Ok(FundingSourceActionResponse {
        funding_source_id,
        message: String::from("Funding source deleted"),
    })
}

/// Lists funding sources with their swimmer reference counts.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or a lookup fails.
pub fn list_funding_sources(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<ListFundingSourcesResponse, ApiError> {
    AuthorizationService::authorize_administer_accounts(actor)?;

    let rows = persistence
        .list_funding_sources()
        .map_err(|e| internal(&e))?;

    let mut sources = Vec::with_capacity(rows.len());
    for row in rows {
        let swimmer_count = persistence
            .count_swimmers_for_funding_source(row.funding_source_id)
            .map_err(|e| internal(&e))?;
        let allowed_email_domains = row.domains().map_err(|e| internal(&e))?;
        sources.push(FundingSourceInfo {
            funding_source_id: row.funding_source_id,
            name: row.name,
            short_name: row.short_name,
            allowed_email_domains,
            assessment_sessions: row.assessment_sessions,
            lessons_per_po: row.lessons_per_po,
            authorization_months: row.authorization_months,
            renewal_alert_threshold: row.renewal_alert_threshold,
            lesson_rate_cents: row.lesson_rate_cents,
            billing_contact_name: row.billing_contact_name,
            billing_contact_email: row.billing_contact_email,
            billing_contact_phone: row.billing_contact_phone,
            is_active: row.is_active != 0,
            swimmer_count,
        });
    }

    Ok(ListFundingSourcesResponse { sources })
}

// ============================================================================
// Timecards
// ============================================================================

/// Lists time entries in a date range.
///
/// Admins see everyone; instructors see their own entries only.
///
/// # Errors
///
/// Returns an error if the caller lacks permission or dates are
/// malformed.
pub fn list_time_entries(
    persistence: &mut Persistence,
    request: &ListTimeEntriesRequest,
    actor: &AuthenticatedActor,
) -> Result<ListTimeEntriesResponse, ApiError> {
    let is_admin = has_role(actor, &[Role::Admin]);
    let own_entries = has_role(actor, &[Role::Instructor])
        && request.instructor_id == Some(actor.user_id);
    if !is_admin && !own_entries {
        return Err(ApiError::Unauthorized {
            action: String::from("list_time_entries"),
            required_role: String::from("admin (or instructor, own entries only)"),
        });
    }

    parse_date(&request.from_date, "from_date")?;
    parse_date(&request.to_date, "to_date")?;

    let entries: Vec<TimeEntryInfo> = persistence
        .list_time_entries(request.instructor_id, &request.from_date, &request.to_date)
        .map_err(|e| internal(&e))?
        .into_iter()
        .map(|row| TimeEntryInfo {
            time_entry_id: row.time_entry_id,
            instructor_id: row.instructor_id,
            work_date: row.work_date,
            clock_in: row.clock_in,
            clock_out: row.clock_out,
            minutes: row.minutes,
            status: row.status,
            notes: row.notes,
        })
        .collect();

    let total_minutes = entries.iter().map(|e| i64::from(e.minutes)).sum();

    Ok(ListTimeEntriesResponse {
        entries,
        total_minutes,
    })
}

/// Patches a single time entry's status and notes.
///
/// # Errors
///
/// Returns an error if the transition is not permitted.
pub fn update_time_entry(
    persistence: &mut Persistence,
    request: &UpdateTimeEntryRequest,
    actor: &AuthenticatedActor,
    now: DateTime<Utc>,
) -> Result<TimeEntryActionResponse, ApiError> {
    AuthorizationService::authorize_manage_timecards(actor)?;

    let entry = persistence
        .get_time_entry(request.time_entry_id)
        .map_err(translate_persistence_error)?;
    let current: TimeEntryStatus = parse_status(&entry.status)?;
    let target: TimeEntryStatus = parse_status(&request.status)?;
    if current != target {
        current
            .validate_transition(target)
            .map_err(translate_domain_error)?;
    }

    let (approved_by, approved_at) = if target == TimeEntryStatus::Approved {
        (Some(actor.user_id), Some(format_timestamp(now)))
    } else {
        (entry.approved_by, entry.approved_at.clone())
    };

    persistence
        .update_time_entry(
            request.time_entry_id,
            target.as_str(),
            request.notes.as_deref().or(entry.notes.as_deref()),
            approved_by,
            approved_at.as_deref(),
        )
        .map_err(translate_persistence_error)?;

    Ok(TimeEntryActionResponse {
        affected: 1,
        message: String::from("Time entry updated"),
    })
}

/// Approves every pending entry for an instructor within a range, in
/// one transaction.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or dates are
/// malformed.
pub fn bulk_approve_time_entries(
    persistence: &mut Persistence,
    request: &BulkApproveTimeEntriesRequest,
    actor: &AuthenticatedActor,
    now: DateTime<Utc>,
) -> Result<TimeEntryActionResponse, ApiError> {
    AuthorizationService::authorize_manage_timecards(actor)?;

    parse_date(&request.from_date, "from_date")?;
    parse_date(&request.to_date, "to_date")?;

    let affected = persistence
        .bulk_approve_time_entries(
            request.instructor_id,
            &request.from_date,
            &request.to_date,
            actor.user_id,
            &format_timestamp(now),
        )
        .map_err(translate_persistence_error)?;

    info!(
        instructor_id = request.instructor_id,
        affected, "Bulk-approved time entries"
    );

    Ok(TimeEntryActionResponse {
        affected,
        message: format!("{affected} time entr{} approved", if affected == 1 { "y" } else { "ies" }),
    })
}

// ============================================================================
// CSV roster preview
// ============================================================================

/// Validates a swimmer roster CSV without mutating state.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the CSV is
/// structurally unreadable; per-row problems are reported in the
/// result.
pub fn preview_roster_csv(
    csv_content: &str,
    actor: &AuthenticatedActor,
) -> Result<CsvPreviewResult, ApiError> {
    AuthorizationService::authorize_administer_accounts(actor)?;

    preview_csv_swimmers(csv_content).map_err(|e| match e {
        CsvFormatError::MissingHeaders { .. } | CsvFormatError::Unreadable { .. } => {
            ApiError::InvalidInput {
                field: String::from("csv"),
                message: e.to_string(),
            }
        }
    })
}
