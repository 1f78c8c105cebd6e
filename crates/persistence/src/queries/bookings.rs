// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking query operations.

use crate::data_models::{BookingRow, SessionRow};
use crate::diesel_schema::{bookings, sessions};
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::SqliteConnection;

/// Fetch a booking by id.
pub fn get_booking(
    conn: &mut SqliteConnection,
    booking_id: i64,
) -> Result<BookingRow, PersistenceError> {
    bookings::table
        .filter(bookings::booking_id.eq(booking_id))
        .first::<BookingRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_booking: {e}")))?
        .ok_or_else(|| PersistenceError::NotFound(format!("Booking {booking_id} does not exist")))
}

/// Count confirmed bookings on a session.
pub fn count_confirmed_bookings(
    conn: &mut SqliteConnection,
    session_id: i64,
) -> Result<i64, PersistenceError> {
    bookings::table
        .filter(bookings::session_id.eq(session_id))
        .filter(bookings::status.eq("confirmed"))
        .count()
        .get_result(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("count_confirmed_bookings: {e}")))
}

/// Fetch a swimmer's confirmed bookings joined with their sessions,
/// restricted to a recurring batch, ordered by session start.
pub fn list_confirmed_batch_bookings(
    conn: &mut SqliteConnection,
    swimmer_id: i64,
    batch_id: &str,
) -> Result<Vec<(BookingRow, SessionRow)>, PersistenceError> {
    bookings::table
        .inner_join(sessions::table)
        .filter(bookings::swimmer_id.eq(swimmer_id))
        .filter(bookings::status.eq("confirmed"))
        .filter(sessions::batch_id.eq(batch_id))
        .order(sessions::start_time.asc())
        .load::<(BookingRow, SessionRow)>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_confirmed_batch_bookings: {e}")))
}

/// Fetch the confirmed bookings on a session.
pub fn list_confirmed_session_bookings(
    conn: &mut SqliteConnection,
    session_id: i64,
) -> Result<Vec<BookingRow>, PersistenceError> {
    bookings::table
        .filter(bookings::session_id.eq(session_id))
        .filter(bookings::status.eq("confirmed"))
        .load::<BookingRow>(conn)
        .map_err(|e| {
            PersistenceError::QueryFailed(format!("list_confirmed_session_bookings: {e}"))
        })
}
