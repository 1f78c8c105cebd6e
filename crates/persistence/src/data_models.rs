// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row and insert structs mapping the Diesel schema.
//!
//! Booleans are stored as integers and enums as their string forms; the
//! API layer converts rows back into domain types.

use crate::diesel_schema::{
    billing_line_items, billing_periods, bookings, cancellations, funding_sources, profiles,
    purchase_orders, sessions, swimmers, time_entries, time_off_requests, user_roles,
};
use crate::error::PersistenceError;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Serialize, Deserialize)]
pub struct ProfileRow {
    pub user_id: i64,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = profiles)]
pub struct NewProfile {
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_roles)]
pub struct NewUserRole {
    pub user_id: i64,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Serialize, Deserialize)]
pub struct FundingSourceRow {
    pub funding_source_id: i64,
    pub name: String,
    pub short_name: String,
    /// JSON-encoded array of `@`-prefixed domains.
    pub allowed_email_domains: String,
    pub assessment_sessions: i32,
    pub lessons_per_po: i32,
    pub authorization_months: i32,
    pub renewal_alert_threshold: i32,
    pub lesson_rate_cents: i64,
    pub billing_contact_name: Option<String>,
    pub billing_contact_email: Option<String>,
    pub billing_contact_phone: Option<String>,
    pub is_active: i32,
}

impl FundingSourceRow {
    /// Decodes the stored domain list.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored JSON is invalid.
    pub fn domains(&self) -> Result<Vec<String>, PersistenceError> {
        Ok(serde_json::from_str(&self.allowed_email_domains)?)
    }
}

/// Encodes a domain list for storage.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn encode_domains(domains: &[String]) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string(domains)?)
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = funding_sources)]
pub struct NewFundingSource {
    pub name: String,
    pub short_name: String,
    pub allowed_email_domains: String,
    pub assessment_sessions: i32,
    pub lessons_per_po: i32,
    pub authorization_months: i32,
    pub renewal_alert_threshold: i32,
    pub lesson_rate_cents: i64,
    pub billing_contact_name: Option<String>,
    pub billing_contact_email: Option<String>,
    pub billing_contact_phone: Option<String>,
    pub is_active: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Serialize, Deserialize)]
pub struct SwimmerRow {
    pub swimmer_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub enrollment_status: String,
    pub payment_type: String,
    pub funding_source_id: Option<i64>,
    pub parent_id: i64,
    pub coordinator_id: Option<i64>,
    pub waiver_signed: i32,
    pub waiver_signed_at: Option<String>,
}

impl SwimmerRow {
    /// Returns the swimmer's full display name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = swimmers)]
pub struct NewSwimmer {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub enrollment_status: String,
    pub payment_type: String,
    pub funding_source_id: Option<i64>,
    pub parent_id: i64,
    pub coordinator_id: Option<i64>,
    pub waiver_signed: i32,
    pub waiver_signed_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Serialize, Deserialize)]
pub struct SessionRow {
    pub session_id: i64,
    pub instructor_id: i64,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub status: String,
    pub batch_id: Option<String>,
    pub max_capacity: i32,
    pub booking_count: i32,
    pub price_cents: i64,
    pub session_type: String,
    pub is_recurring: i32,
    pub open_at: Option<String>,
    pub created_at: String,
}

impl SessionRow {
    /// Converts the row into the domain session type.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored status string is invalid.
    pub fn to_domain(&self) -> Result<swimops_domain::Session, PersistenceError> {
        Ok(swimops_domain::Session {
            session_id: Some(self.session_id),
            instructor_id: self.instructor_id,
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            location: self.location.clone(),
            status: self
                .status
                .parse()
                .map_err(|e: swimops_domain::DomainError| {
                    PersistenceError::SerializationError(e.to_string())
                })?,
            batch_id: self.batch_id.clone(),
            max_capacity: self.max_capacity,
            booking_count: self.booking_count,
            price_cents: self.price_cents,
            session_type: self.session_type.clone(),
            is_recurring: self.is_recurring != 0,
            created_at: self.created_at.clone(),
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = sessions)]
pub struct NewSession {
    pub instructor_id: i64,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub status: String,
    pub batch_id: Option<String>,
    pub max_capacity: i32,
    pub booking_count: i32,
    pub price_cents: i64,
    pub session_type: String,
    pub is_recurring: i32,
    pub open_at: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Serialize, Deserialize)]
pub struct BookingRow {
    pub booking_id: i64,
    pub session_id: i64,
    pub swimmer_id: i64,
    pub parent_id: i64,
    pub status: String,
    pub booking_type: String,
    pub cancel_reason: Option<String>,
    pub canceled_at: Option<String>,
    pub canceled_by: Option<i64>,
    pub created_at: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bookings)]
pub struct NewBooking {
    pub session_id: i64,
    pub swimmer_id: i64,
    pub parent_id: i64,
    pub status: String,
    pub booking_type: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Queryable)]
pub struct CancellationRow {
    pub cancellation_id: i64,
    pub booking_id: i64,
    pub session_id: i64,
    pub swimmer_id: i64,
    pub parent_id: i64,
    pub canceled_by: i64,
    pub cancellation_type: String,
    pub session_start_time: String,
    pub hours_before_session: f64,
    pub was_late_cancellation: i32,
    pub cancel_reason: Option<String>,
    pub cancel_source: String,
    pub block_cancel_id: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = cancellations)]
pub struct NewCancellation {
    pub booking_id: i64,
    pub session_id: i64,
    pub swimmer_id: i64,
    pub parent_id: i64,
    pub canceled_by: i64,
    pub cancellation_type: String,
    pub session_start_time: String,
    pub hours_before_session: f64,
    pub was_late_cancellation: i32,
    pub cancel_reason: Option<String>,
    pub cancel_source: String,
    pub block_cancel_id: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Serialize, Deserialize)]
pub struct PurchaseOrderRow {
    pub po_id: i64,
    pub swimmer_id: i64,
    pub funding_source_id: i64,
    pub coordinator_id: Option<i64>,
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
    pub updated_at: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = purchase_orders)]
pub struct NewPurchaseOrder {
    pub swimmer_id: i64,
    pub funding_source_id: i64,
    pub coordinator_id: Option<i64>,
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
    pub due_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Serialize, Deserialize)]
pub struct BillingPeriodRow {
    pub billing_period_id: i64,
    pub month: i32,
    pub year: i32,
    pub funding_source_id: i64,
    pub status: String,
    pub generated_at: Option<String>,
    pub exported_at: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = billing_periods)]
pub struct NewBillingPeriod {
    pub month: i32,
    pub year: i32,
    pub funding_source_id: i64,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Serialize, Deserialize)]
pub struct BillingLineItemRow {
    pub line_item_id: i64,
    pub billing_period_id: i64,
    pub po_id: i64,
    pub swimmer_id: i64,
    pub swimmer_name: String,
    pub authorization_number: Option<String>,
    pub units_billed: i32,
    pub rate_cents: i64,
    pub gross_amount_cents: i64,
    pub status: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = billing_line_items)]
pub struct NewBillingLineItem {
    pub billing_period_id: i64,
    pub po_id: i64,
    pub swimmer_id: i64,
    pub swimmer_name: String,
    pub authorization_number: Option<String>,
    pub units_billed: i32,
    pub rate_cents: i64,
    pub gross_amount_cents: i64,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Serialize, Deserialize)]
pub struct TimeOffRequestRow {
    pub time_off_id: i64,
    pub instructor_id: i64,
    pub start_at: String,
    pub end_at: String,
    pub all_day: i32,
    pub reason_type: String,
    pub status: String,
    pub admin_notes: Option<String>,
    pub reviewed_by: Option<i64>,
    pub reviewed_at: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = time_off_requests)]
pub struct NewTimeOffRequest {
    pub instructor_id: i64,
    pub start_at: String,
    pub end_at: String,
    pub all_day: i32,
    pub reason_type: String,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Serialize, Deserialize)]
pub struct TimeEntryRow {
    pub time_entry_id: i64,
    pub instructor_id: i64,
    pub work_date: String,
    pub clock_in: String,
    pub clock_out: String,
    pub minutes: i32,
    pub status: String,
    pub notes: Option<String>,
    pub approved_by: Option<i64>,
    pub approved_at: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = time_entries)]
pub struct NewTimeEntry {
    pub instructor_id: i64,
    pub work_date: String,
    pub clock_in: String,
    pub clock_out: String,
    pub minutes: i32,
    pub status: String,
    pub notes: Option<String>,
}
