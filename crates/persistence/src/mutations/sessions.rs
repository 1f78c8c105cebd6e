// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session mutation operations.
//!
//! Bulk open/delete validate every member inside the transaction; a
//! non-draft member rolls the whole batch back.

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::NewSession;
use crate::diesel_schema::{bookings, sessions};
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::SqliteConnection;

/// Insert a single session. Returns the new id.
pub fn insert_session(
    conn: &mut SqliteConnection,
    record: &NewSession,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(sessions::table)
        .values(record)
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Bulk insert generated sessions. Returns the inserted count.
pub fn insert_sessions(
    conn: &mut SqliteConnection,
    records: &[NewSession],
) -> Result<usize, PersistenceError> {
    conn.transaction::<usize, PersistenceError, _>(|conn| {
        diesel::insert_into(sessions::table)
            .values(records)
            .execute(conn)
            .map_err(Into::into)
    })
}

/// Open a set of draft sessions for booking, all-or-nothing.
///
/// Every id must name an existing `draft` session; otherwise the batch
/// rolls back with [`PersistenceError::BulkOperationFailed`].
pub fn open_draft_sessions(
    conn: &mut SqliteConnection,
    session_ids: &[i64],
    opened_at: &str,
) -> Result<usize, PersistenceError> {
    conn.transaction::<usize, PersistenceError, _>(|conn| {
        let affected = diesel::update(
            sessions::table
                .filter(sessions::session_id.eq_any(session_ids))
                .filter(sessions::status.eq("draft")),
        )
        .set((
            sessions::status.eq("open"),
            sessions::open_at.eq(opened_at),
        ))
        .execute(conn)?;

        if affected != session_ids.len() {
            return Err(PersistenceError::BulkOperationFailed(format!(
                "{} of {} selected sessions are not open-able drafts",
                session_ids.len() - affected,
                session_ids.len()
            )));
        }
        Ok(affected)
    })
}

/// Delete a set of draft sessions, all-or-nothing.
///
/// Every id must name an existing `draft` session; otherwise the batch
/// rolls back with [`PersistenceError::BulkOperationFailed`].
pub fn delete_draft_sessions(
    conn: &mut SqliteConnection,
    session_ids: &[i64],
) -> Result<usize, PersistenceError> {
    conn.transaction::<usize, PersistenceError, _>(|conn| {
        let affected = diesel::delete(
            sessions::table
                .filter(sessions::session_id.eq_any(session_ids))
                .filter(sessions::status.eq("draft")),
        )
        .execute(conn)?;

        if affected != session_ids.len() {
            return Err(PersistenceError::BulkOperationFailed(format!(
                "{} of {} selected sessions are not deletable drafts",
                session_ids.len() - affected,
                session_ids.len()
            )));
        }
        Ok(affected)
    })
}

/// Update one draft session's schedule (times and instructor).
///
/// Fails if the session is no longer a draft.
pub fn update_draft_session_schedule(
    conn: &mut SqliteConnection,
    session_id: i64,
    start_time: &str,
    end_time: &str,
    instructor_id: i64,
) -> Result<(), PersistenceError> {
    let updated = diesel::update(
        sessions::table
            .filter(sessions::session_id.eq(session_id))
            .filter(sessions::status.eq("draft")),
    )
    .set((
        sessions::start_time.eq(start_time),
        sessions::end_time.eq(end_time),
        sessions::instructor_id.eq(instructor_id),
    ))
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::BulkOperationFailed(format!(
            "session {session_id} is not an editable draft"
        )));
    }
    Ok(())
}

/// Cancel a session and its confirmed bookings in one transaction.
///
/// Returns the number of bookings cancelled (parents to notify).
pub fn cancel_session_with_bookings(
    conn: &mut SqliteConnection,
    session_id: i64,
    reason: &str,
    canceled_by: i64,
    canceled_at: &str,
) -> Result<usize, PersistenceError> {
    conn.transaction::<usize, PersistenceError, _>(|conn| {
        let updated = diesel::update(sessions::table.filter(sessions::session_id.eq(session_id)))
            .set((sessions::status.eq("cancelled"), sessions::booking_count.eq(0)))
            .execute(conn)?;
        if updated == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Session {session_id} does not exist"
            )));
        }

        let cancelled = diesel::update(
            bookings::table
                .filter(bookings::session_id.eq(session_id))
                .filter(bookings::status.eq("confirmed")),
        )
        .set((
            bookings::status.eq("cancelled"),
            bookings::cancel_reason.eq(reason),
            bookings::canceled_at.eq(canceled_at),
            bookings::canceled_by.eq(canceled_by),
        ))
        .execute(conn)?;

        Ok(cancelled)
    })
}

/// Hand a session to a replacement instructor, marking it reassigned.
///
/// Returns the number of confirmed bookings (parents to notify).
pub fn replace_session_instructor(
    conn: &mut SqliteConnection,
    session_id: i64,
    replacement_instructor_id: i64,
) -> Result<usize, PersistenceError> {
    conn.transaction::<usize, PersistenceError, _>(|conn| {
        let updated = diesel::update(sessions::table.filter(sessions::session_id.eq(session_id)))
            .set((
                sessions::instructor_id.eq(replacement_instructor_id),
                sessions::status.eq("reassigned"),
            ))
            .execute(conn)?;
        if updated == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Session {session_id} does not exist"
            )));
        }

        let confirmed: i64 = bookings::table
            .filter(bookings::session_id.eq(session_id))
            .filter(bookings::status.eq("confirmed"))
            .count()
            .get_result(conn)?;

        Ok(usize::try_from(confirmed).unwrap_or(0))
    })
}
