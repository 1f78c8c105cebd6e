// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the swimops platform.
//!
//! This crate provides `SQLite` persistence for profiles, swimmers,
//! sessions, bookings, purchase orders, billing, and time-off data. It
//! is built on Diesel with embedded migrations.
//!
//! `SQLite` is the sole backend: it serves development, unit and
//! integration tests (shared in-memory databases), and file-based
//! production deployments (WAL mode).

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
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{
    BillingLineItemRow, BillingPeriodRow, BookingRow, CancellationRow, FundingSourceRow,
    NewBillingLineItem, NewBillingPeriod, NewBooking, NewCancellation, NewFundingSource,
    NewProfile, NewPurchaseOrder, NewSession, NewSwimmer, NewTimeEntry, NewTimeOffRequest,
    ProfileRow, PurchaseOrderRow, SessionRow, SwimmerRow, TimeEntryRow, TimeOffRequestRow,
    encode_domains,
};
pub use error::PersistenceError;
pub use mutations::purchase_orders::BillingUpdate;

/// Atomic counter for generating unique in-memory database names.
///
/// This ensures deterministic test isolation by eliminating time-based
/// collisions. Each call to `new_in_memory()` receives a unique
/// sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generates a fresh batch identifier for a session generation run.
#[must_use]
pub fn generate_batch_id() -> String {
    format!("batch_{:016x}", rand::random::<u64>())
}

/// Generates a fresh block-cancel identifier.
#[must_use]
pub fn generate_block_cancel_id() -> String {
    format!("block_{:016x}", rand::random::<u64>())
}

/// Persistence adapter owning the database connection.
///
/// Backend selection happens once at construction time; all
/// query/mutation functions run against the owned connection.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite`
    /// database.
    ///
    /// Each call receives a unique database instance via atomic
    /// counter, ensuring deterministic test isolation without
    /// time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("memdb_test_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite`
    /// database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or
    /// initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Profiles & roles
    // ========================================================================

    /// Creates a profile with its role rows. Returns the new id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (e.g., duplicate email).
    pub fn create_profile(
        &mut self,
        profile: &NewProfile,
        roles: &[String],
    ) -> Result<i64, PersistenceError> {
        mutations::people::insert_profile_with_roles(&mut self.conn, profile, roles)
    }

    /// Fetches a profile by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the profile does not exist.
    pub fn get_profile(&mut self, user_id: i64) -> Result<ProfileRow, PersistenceError> {
        queries::people::get_profile(&mut self.conn, user_id)
    }

    /// Fetches a profile by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_profile_by_email(
        &mut self,
        email: &str,
    ) -> Result<Option<ProfileRow>, PersistenceError> {
        queries::people::get_profile_by_email(&mut self.conn, email)
    }

    /// Fetches profiles by id set.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_profiles_by_ids(
        &mut self,
        user_ids: &[i64],
    ) -> Result<Vec<ProfileRow>, PersistenceError> {
        queries::people::get_profiles_by_ids(&mut self.conn, user_ids)
    }

    /// Fetches the role strings of a profile (empty means `parent`).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_roles_for_user(&mut self, user_id: i64) -> Result<Vec<String>, PersistenceError> {
        queries::people::get_roles_for_user(&mut self.conn, user_id)
    }

    /// Lists profiles holding a role.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_profiles_by_role(
        &mut self,
        role: &str,
    ) -> Result<Vec<ProfileRow>, PersistenceError> {
        queries::people::list_profiles_by_role(&mut self.conn, role)
    }

    /// Adds a role to a profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn add_role(&mut self, user_id: i64, role: &str) -> Result<(), PersistenceError> {
        mutations::people::add_role(&mut self.conn, user_id, role)
    }

    /// Deletes a profile, blocked while swimmers link to it.
    ///
    /// # Errors
    ///
    /// Returns `ProfileHasSwimmers` if swimmers reference the profile.
    pub fn delete_profile(&mut self, user_id: i64) -> Result<(), PersistenceError> {
        mutations::people::delete_profile(&mut self.conn, user_id)
    }

    // ========================================================================
    // Swimmers
    // ========================================================================

    /// Creates a swimmer. Returns the new id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_swimmer(&mut self, swimmer: &NewSwimmer) -> Result<i64, PersistenceError> {
        mutations::people::insert_swimmer(&mut self.conn, swimmer)
    }

    /// Fetches a swimmer by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the swimmer does not exist.
    pub fn get_swimmer(&mut self, swimmer_id: i64) -> Result<SwimmerRow, PersistenceError> {
        queries::people::get_swimmer(&mut self.conn, swimmer_id)
    }

    /// Fetches swimmers by id set.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_swimmers_by_ids(
        &mut self,
        swimmer_ids: &[i64],
    ) -> Result<Vec<SwimmerRow>, PersistenceError> {
        queries::people::get_swimmers_by_ids(&mut self.conn, swimmer_ids)
    }

    /// Lists all swimmers.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_swimmers(&mut self) -> Result<Vec<SwimmerRow>, PersistenceError> {
        queries::people::list_swimmers(&mut self.conn)
    }

    /// Updates a swimmer's enrollment status.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_enrollment_status(
        &mut self,
        swimmer_id: i64,
        status: &str,
    ) -> Result<(), PersistenceError> {
        mutations::people::update_enrollment_status(&mut self.conn, swimmer_id, status)
    }

    /// Reassigns a swimmer's funding source and payment type.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_swimmer_funding(
        &mut self,
        swimmer_id: i64,
        funding_source_id: Option<i64>,
        payment_type: &str,
    ) -> Result<(), PersistenceError> {
        mutations::people::update_swimmer_funding(
            &mut self.conn,
            swimmer_id,
            funding_source_id,
            payment_type,
        )
    }

    /// Records waiver completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn record_waiver_signed(
        &mut self,
        swimmer_id: i64,
        signed_at: &str,
    ) -> Result<(), PersistenceError> {
        mutations::people::record_waiver_signed(&mut self.conn, swimmer_id, signed_at)
    }

    /// Reassigns a swimmer's coordinator to an existing profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_swimmer_coordinator(
        &mut self,
        swimmer_id: i64,
        coordinator_id: i64,
    ) -> Result<(), PersistenceError> {
        mutations::people::update_swimmer_coordinator(&mut self.conn, swimmer_id, coordinator_id)
    }

    /// Transfers a swimmer to a brand-new coordinator atomically.
    /// Returns the new coordinator's profile id.
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails; nothing is persisted then.
    pub fn transfer_to_new_coordinator(
        &mut self,
        swimmer_id: i64,
        coordinator_profile: &NewProfile,
    ) -> Result<i64, PersistenceError> {
        mutations::people::transfer_to_new_coordinator(
            &mut self.conn,
            swimmer_id,
            coordinator_profile,
        )
    }

    /// Counts swimmers linked to a profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_swimmers_for_profile(&mut self, user_id: i64) -> Result<i64, PersistenceError> {
        queries::people::count_swimmers_for_profile(&mut self.conn, user_id)
    }

    /// Counts swimmers referencing a funding source.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_swimmers_for_funding_source(
        &mut self,
        funding_source_id: i64,
    ) -> Result<i64, PersistenceError> {
        queries::people::count_swimmers_for_funding_source(&mut self.conn, funding_source_id)
    }

    // ========================================================================
    // Funding sources
    // ========================================================================

    /// Creates a funding source. Returns the new id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_funding_source(
        &mut self,
        source: &NewFundingSource,
    ) -> Result<i64, PersistenceError> {
        mutations::funding_sources::insert_funding_source(&mut self.conn, source)
    }

    /// Updates a funding source.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the source does not exist.
    pub fn update_funding_source(
        &mut self,
        funding_source_id: i64,
        source: &NewFundingSource,
    ) -> Result<(), PersistenceError> {
        mutations::funding_sources::update_funding_source(&mut self.conn, funding_source_id, source)
    }

    /// Deletes a funding source, blocked while swimmers reference it.
    ///
    /// # Errors
    ///
    /// Returns `FundingSourceInUse` if swimmers reference the source.
    pub fn delete_funding_source(
        &mut self,
        funding_source_id: i64,
    ) -> Result<(), PersistenceError> {
        mutations::funding_sources::delete_funding_source(&mut self.conn, funding_source_id)
    }

    /// Fetches a funding source by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the source does not exist.
    pub fn get_funding_source(
        &mut self,
        funding_source_id: i64,
    ) -> Result<FundingSourceRow, PersistenceError> {
        queries::funding_sources::get_funding_source(&mut self.conn, funding_source_id)
    }

    /// Fetches funding sources by id set.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_funding_sources_by_ids(
        &mut self,
        ids: &[i64],
    ) -> Result<Vec<FundingSourceRow>, PersistenceError> {
        queries::funding_sources::get_funding_sources_by_ids(&mut self.conn, ids)
    }

    /// Lists all funding sources.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_funding_sources(&mut self) -> Result<Vec<FundingSourceRow>, PersistenceError> {
        queries::funding_sources::list_funding_sources(&mut self.conn)
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    /// Creates a single session. Returns the new id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_session(&mut self, record: &NewSession) -> Result<i64, PersistenceError> {
        mutations::sessions::insert_session(&mut self.conn, record)
    }

    /// Bulk inserts generated sessions. Returns the inserted count.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails; nothing is persisted then.
    pub fn insert_sessions(&mut self, records: &[NewSession]) -> Result<usize, PersistenceError> {
        mutations::sessions::insert_sessions(&mut self.conn, records)
    }

    /// Lists all draft sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_draft_sessions(&mut self) -> Result<Vec<SessionRow>, PersistenceError> {
        queries::sessions::list_draft_sessions(&mut self.conn)
    }

    /// Fetches a session by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the session does not exist.
    pub fn get_session(&mut self, session_id: i64) -> Result<SessionRow, PersistenceError> {
        queries::sessions::get_session(&mut self.conn, session_id)
    }

    /// Fetches `(session_id, status)` pairs for a set of sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_session_statuses(
        &mut self,
        session_ids: &[i64],
    ) -> Result<Vec<(i64, String)>, PersistenceError> {
        queries::sessions::get_session_statuses(&mut self.conn, session_ids)
    }

    /// Opens a set of draft sessions, all-or-nothing.
    ///
    /// # Errors
    ///
    /// Returns `BulkOperationFailed` (and rolls back) if any selected
    /// session is not an open-able draft.
    pub fn open_draft_sessions(
        &mut self,
        session_ids: &[i64],
        opened_at: &str,
    ) -> Result<usize, PersistenceError> {
        mutations::sessions::open_draft_sessions(&mut self.conn, session_ids, opened_at)
    }

    /// Deletes a set of draft sessions, all-or-nothing.
    ///
    /// # Errors
    ///
    /// Returns `BulkOperationFailed` (and rolls back) if any selected
    /// session is not a deletable draft.
    pub fn delete_draft_sessions(
        &mut self,
        session_ids: &[i64],
    ) -> Result<usize, PersistenceError> {
        mutations::sessions::delete_draft_sessions(&mut self.conn, session_ids)
    }

    /// Updates one draft session's schedule.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is not an editable draft.
    pub fn update_draft_session_schedule(
        &mut self,
        session_id: i64,
        start_time: &str,
        end_time: &str,
        instructor_id: i64,
    ) -> Result<(), PersistenceError> {
        mutations::sessions::update_draft_session_schedule(
            &mut self.conn,
            session_id,
            start_time,
            end_time,
            instructor_id,
        )
    }

    /// Lists an instructor's sessions starting within a window.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_instructor_sessions_in_window(
        &mut self,
        instructor_id: i64,
        window_start: &str,
        window_end: &str,
    ) -> Result<Vec<SessionRow>, PersistenceError> {
        queries::sessions::list_instructor_sessions_in_window(
            &mut self.conn,
            instructor_id,
            window_start,
            window_end,
        )
    }

    /// Lists non-cancelled sessions starting within a range.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_active_sessions_in_range(
        &mut self,
        range_start: &str,
        range_end: &str,
    ) -> Result<Vec<SessionRow>, PersistenceError> {
        queries::sessions::list_active_sessions_in_range(&mut self.conn, range_start, range_end)
    }

    /// Lists the sessions of a batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_sessions_in_batch(
        &mut self,
        batch_id: &str,
    ) -> Result<Vec<SessionRow>, PersistenceError> {
        queries::sessions::list_sessions_in_batch(&mut self.conn, batch_id)
    }

    /// Cancels a session and its confirmed bookings. Returns the number
    /// of bookings cancelled.
    ///
    /// # Errors
    ///
    /// Returns an error if the session does not exist; nothing is
    /// persisted then.
    pub fn cancel_session_with_bookings(
        &mut self,
        session_id: i64,
        reason: &str,
        canceled_by: i64,
        canceled_at: &str,
    ) -> Result<usize, PersistenceError> {
        mutations::sessions::cancel_session_with_bookings(
            &mut self.conn,
            session_id,
            reason,
            canceled_by,
            canceled_at,
        )
    }

    /// Hands a session to a replacement instructor. Returns the number
    /// of confirmed bookings.
    ///
    /// # Errors
    ///
    /// Returns an error if the session does not exist.
    pub fn replace_session_instructor(
        &mut self,
        session_id: i64,
        replacement_instructor_id: i64,
    ) -> Result<usize, PersistenceError> {
        mutations::sessions::replace_session_instructor(
            &mut self.conn,
            session_id,
            replacement_instructor_id,
        )
    }

    // ========================================================================
    // Bookings
    // ========================================================================

    /// Creates a booking. Returns the new id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_booking(&mut self, booking: &NewBooking) -> Result<i64, PersistenceError> {
        mutations::bookings::insert_booking(&mut self.conn, booking)
    }

    /// Fetches a booking by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the booking does not exist.
    pub fn get_booking(&mut self, booking_id: i64) -> Result<BookingRow, PersistenceError> {
        queries::bookings::get_booking(&mut self.conn, booking_id)
    }

    /// Counts confirmed bookings on a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_confirmed_bookings(&mut self, session_id: i64) -> Result<i64, PersistenceError> {
        queries::bookings::count_confirmed_bookings(&mut self.conn, session_id)
    }

    /// Lists a swimmer's confirmed bookings in a batch with sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_confirmed_batch_bookings(
        &mut self,
        swimmer_id: i64,
        batch_id: &str,
    ) -> Result<Vec<(BookingRow, SessionRow)>, PersistenceError> {
        queries::bookings::list_confirmed_batch_bookings(&mut self.conn, swimmer_id, batch_id)
    }

    /// Lists the confirmed bookings on a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_confirmed_session_bookings(
        &mut self,
        session_id: i64,
    ) -> Result<Vec<BookingRow>, PersistenceError> {
        queries::bookings::list_confirmed_session_bookings(&mut self.conn, session_id)
    }

    /// Cancels one booking with its analytics record.
    ///
    /// # Errors
    ///
    /// Returns an error if the booking is not active; nothing is
    /// persisted then.
    pub fn cancel_booking(
        &mut self,
        booking_id: i64,
        session_id: i64,
        record: &NewCancellation,
    ) -> Result<(), PersistenceError> {
        mutations::bookings::cancel_booking(&mut self.conn, booking_id, session_id, record)
    }

    /// Cancels a block of bookings, all-or-nothing. Returns the count.
    ///
    /// # Errors
    ///
    /// Returns `BulkOperationFailed` (and rolls back) if any member is
    /// no longer active.
    pub fn cancel_bookings_block(
        &mut self,
        items: &[(i64, i64, NewCancellation)],
    ) -> Result<usize, PersistenceError> {
        mutations::bookings::cancel_bookings_block(&mut self.conn, items)
    }

    // ========================================================================
    // Purchase orders
    // ========================================================================

    /// Creates a purchase order. Returns the new id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_purchase_order(
        &mut self,
        order: &NewPurchaseOrder,
    ) -> Result<i64, PersistenceError> {
        mutations::purchase_orders::insert_purchase_order(&mut self.conn, order)
    }

    /// Fetches a purchase order by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the order does not exist.
    pub fn get_purchase_order(
        &mut self,
        po_id: i64,
    ) -> Result<PurchaseOrderRow, PersistenceError> {
        queries::purchase_orders::get_purchase_order(&mut self.conn, po_id)
    }

    /// Lists all purchase orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_purchase_orders(&mut self) -> Result<Vec<PurchaseOrderRow>, PersistenceError> {
        queries::purchase_orders::list_purchase_orders(&mut self.conn)
    }

    /// Lists a funding source's billable lessons orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_billable_lesson_orders(
        &mut self,
        funding_source_id: i64,
    ) -> Result<Vec<PurchaseOrderRow>, PersistenceError> {
        queries::purchase_orders::list_billable_lesson_orders(&mut self.conn, funding_source_id)
    }

    /// Applies a status outcome to a purchase order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the order does not exist.
    pub fn update_po_status(
        &mut self,
        po_id: i64,
        status: &str,
        authorization_number: Option<&str>,
        notes: Option<&str>,
        updated_at: &str,
    ) -> Result<(), PersistenceError> {
        mutations::purchase_orders::update_po_status(
            &mut self.conn,
            po_id,
            status,
            authorization_number,
            notes,
            updated_at,
        )
    }

    /// Updates a purchase order's billing fields.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the order does not exist.
    pub fn update_po_billing(
        &mut self,
        po_id: i64,
        update: &BillingUpdate,
        updated_at: &str,
    ) -> Result<(), PersistenceError> {
        mutations::purchase_orders::update_po_billing(&mut self.conn, po_id, update, updated_at)
    }

    /// Records session usage against a purchase order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the order does not exist.
    pub fn update_po_usage(
        &mut self,
        po_id: i64,
        sessions_booked: i32,
        sessions_used: i32,
        updated_at: &str,
    ) -> Result<(), PersistenceError> {
        mutations::purchase_orders::update_po_usage(
            &mut self.conn,
            po_id,
            sessions_booked,
            sessions_used,
            updated_at,
        )
    }

    // ========================================================================
    // Billing periods & line items
    // ========================================================================

    /// Creates a billing period. Returns the new id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (e.g., duplicate period).
    pub fn create_billing_period(
        &mut self,
        period: &NewBillingPeriod,
    ) -> Result<i64, PersistenceError> {
        mutations::billing::insert_billing_period(&mut self.conn, period)
    }

    /// Finds a period by month/year/funding source.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_billing_period(
        &mut self,
        month: i32,
        year: i32,
        funding_source_id: i64,
    ) -> Result<Option<BillingPeriodRow>, PersistenceError> {
        queries::billing::find_billing_period(&mut self.conn, month, year, funding_source_id)
    }

    /// Fetches a billing period by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the period does not exist.
    pub fn get_billing_period(
        &mut self,
        billing_period_id: i64,
    ) -> Result<BillingPeriodRow, PersistenceError> {
        queries::billing::get_billing_period(&mut self.conn, billing_period_id)
    }

    /// Lists all billing periods, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_billing_periods(&mut self) -> Result<Vec<BillingPeriodRow>, PersistenceError> {
        queries::billing::list_billing_periods(&mut self.conn)
    }

    /// Lists a period's line items.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_line_items(
        &mut self,
        billing_period_id: i64,
    ) -> Result<Vec<BillingLineItemRow>, PersistenceError> {
        queries::billing::list_line_items(&mut self.conn, billing_period_id)
    }

    /// Fetches a line item by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the item does not exist.
    pub fn get_line_item(
        &mut self,
        line_item_id: i64,
    ) -> Result<BillingLineItemRow, PersistenceError> {
        queries::billing::get_line_item(&mut self.conn, line_item_id)
    }

    /// Sums units already billed against a purchase order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn billed_units_for_order(&mut self, po_id: i64) -> Result<i64, PersistenceError> {
        queries::billing::billed_units_for_order(&mut self.conn, po_id)
    }

    /// Updates a period's status.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the period does not exist.
    pub fn update_period_status(
        &mut self,
        billing_period_id: i64,
        status: &str,
    ) -> Result<(), PersistenceError> {
        mutations::billing::update_period_status(&mut self.conn, billing_period_id, status)
    }

    /// Replaces a draft period's line items and marks it generated.
    /// Returns the created count.
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails; nothing is persisted then.
    pub fn regenerate_line_items(
        &mut self,
        billing_period_id: i64,
        items: &[NewBillingLineItem],
        generated_at: &str,
    ) -> Result<usize, PersistenceError> {
        mutations::billing::regenerate_line_items(
            &mut self.conn,
            billing_period_id,
            items,
            generated_at,
        )
    }

    /// Sets a line item's review status.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the item does not exist.
    pub fn update_line_item_status(
        &mut self,
        line_item_id: i64,
        status: &str,
    ) -> Result<(), PersistenceError> {
        mutations::billing::update_line_item_status(&mut self.conn, line_item_id, status)
    }

    /// Applies the export side effects atomically. Returns the number
    /// of newly billed line items.
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails; nothing is persisted then.
    pub fn mark_exported(
        &mut self,
        billing_period_id: i64,
        exported_at: &str,
    ) -> Result<usize, PersistenceError> {
        mutations::billing::mark_exported(&mut self.conn, billing_period_id, exported_at)
    }

    // ========================================================================
    // Time off
    // ========================================================================

    /// Creates a time-off request. Returns the new id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_time_off_request(
        &mut self,
        request: &NewTimeOffRequest,
    ) -> Result<i64, PersistenceError> {
        mutations::time_off::insert_time_off_request(&mut self.conn, request)
    }

    /// Fetches a time-off request by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the request does not exist.
    pub fn get_time_off_request(
        &mut self,
        time_off_id: i64,
    ) -> Result<TimeOffRequestRow, PersistenceError> {
        queries::time_off::get_time_off_request(&mut self.conn, time_off_id)
    }

    /// Lists all time-off requests, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_time_off_requests(
        &mut self,
    ) -> Result<Vec<TimeOffRequestRow>, PersistenceError> {
        queries::time_off::list_time_off_requests(&mut self.conn)
    }

    /// Lists an instructor's other approved requests overlapping a
    /// window.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_overlapping_approved_requests(
        &mut self,
        instructor_id: i64,
        window_start: &str,
        window_end: &str,
        exclude_id: i64,
    ) -> Result<Vec<TimeOffRequestRow>, PersistenceError> {
        queries::time_off::list_overlapping_approved_requests(
            &mut self.conn,
            instructor_id,
            window_start,
            window_end,
            exclude_id,
        )
    }

    /// Records a review decision on a time-off request.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the request does not exist.
    pub fn review_time_off_request(
        &mut self,
        time_off_id: i64,
        status: &str,
        admin_notes: Option<&str>,
        reviewed_by: i64,
        reviewed_at: &str,
    ) -> Result<(), PersistenceError> {
        mutations::time_off::review_time_off_request(
            &mut self.conn,
            time_off_id,
            status,
            admin_notes,
            reviewed_by,
            reviewed_at,
        )
    }

    // ========================================================================
    // Time entries
    // ========================================================================

    /// Creates a time entry. Returns the new id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_time_entry(&mut self, entry: &NewTimeEntry) -> Result<i64, PersistenceError> {
        mutations::time_entries::insert_time_entry(&mut self.conn, entry)
    }

    /// Fetches a time entry by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the entry does not exist.
    pub fn get_time_entry(&mut self, time_entry_id: i64) -> Result<TimeEntryRow, PersistenceError> {
        queries::time_entries::get_time_entry(&mut self.conn, time_entry_id)
    }

    /// Lists time entries in a range, optionally for one instructor.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_time_entries(
        &mut self,
        instructor_id: Option<i64>,
        from_date: &str,
        to_date: &str,
    ) -> Result<Vec<TimeEntryRow>, PersistenceError> {
        queries::time_entries::list_time_entries(&mut self.conn, instructor_id, from_date, to_date)
    }

    /// Patches one time entry.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the entry does not exist.
    pub fn update_time_entry(
        &mut self,
        time_entry_id: i64,
        status: &str,
        notes: Option<&str>,
        approved_by: Option<i64>,
        approved_at: Option<&str>,
    ) -> Result<(), PersistenceError> {
        mutations::time_entries::update_time_entry(
            &mut self.conn,
            time_entry_id,
            status,
            notes,
            approved_by,
            approved_at,
        )
    }

    /// Approves all pending entries for an instructor within a range.
    /// Returns the approved count.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails; nothing is persisted then.
    pub fn bulk_approve_time_entries(
        &mut self,
        instructor_id: i64,
        from_date: &str,
        to_date: &str,
        approved_by: i64,
        approved_at: &str,
    ) -> Result<usize, PersistenceError> {
        mutations::time_entries::bulk_approve_time_entries(
            &mut self.conn,
            instructor_id,
            from_date,
            to_date,
            approved_by,
            approved_at,
        )
    }
}
