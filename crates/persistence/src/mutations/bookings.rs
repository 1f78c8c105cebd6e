// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking mutation operations.
//!
//! Every cancellation writes an analytics record alongside the booking
//! update and the session booking-count adjustment.

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{NewBooking, NewCancellation};
use crate::diesel_schema::{bookings, cancellations, sessions};
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::SqliteConnection;

/// Insert a booking and bump the session's booking count.
///
/// Returns the new booking id.
pub fn insert_booking(
    conn: &mut SqliteConnection,
    booking: &NewBooking,
) -> Result<i64, PersistenceError> {
    conn.transaction::<i64, PersistenceError, _>(|conn| {
        diesel::insert_into(bookings::table)
            .values(booking)
            .execute(conn)?;
        let booking_id = get_last_insert_rowid(conn)?;

        diesel::update(sessions::table.filter(sessions::session_id.eq(booking.session_id)))
            .set(sessions::booking_count.eq(sessions::booking_count + 1))
            .execute(conn)?;

        Ok(booking_id)
    })
}

/// Cancel one booking: booking update, session count decrement, and
/// the cancellation record, in one transaction.
pub fn cancel_booking(
    conn: &mut SqliteConnection,
    booking_id: i64,
    session_id: i64,
    record: &NewCancellation,
) -> Result<(), PersistenceError> {
    conn.transaction::<(), PersistenceError, _>(|conn| {
        let updated = diesel::update(
            bookings::table
                .filter(bookings::booking_id.eq(booking_id))
                .filter(bookings::status.eq("confirmed")),
        )
        .set((
            bookings::status.eq("cancelled"),
            bookings::cancel_reason.eq(&record.cancel_reason),
            bookings::canceled_at.eq(&record.created_at),
            bookings::canceled_by.eq(record.canceled_by),
        ))
        .execute(conn)?;
        if updated == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Booking {booking_id} is not an active booking"
            )));
        }

        decrement_booking_count(conn, session_id)?;

        diesel::insert_into(cancellations::table)
            .values(record)
            .execute(conn)?;

        Ok(())
    })
}

/// Cancel a pre-validated set of block bookings, all-or-nothing.
///
/// Each element pairs a booking/session with its cancellation record.
/// Returns the cancelled count.
pub fn cancel_bookings_block(
    conn: &mut SqliteConnection,
    items: &[(i64, i64, NewCancellation)],
) -> Result<usize, PersistenceError> {
    conn.transaction::<usize, PersistenceError, _>(|conn| {
        for (booking_id, session_id, record) in items {
            let updated = diesel::update(
                bookings::table
                    .filter(bookings::booking_id.eq(booking_id))
                    .filter(bookings::status.eq("confirmed")),
            )
            .set((
                bookings::status.eq("cancelled"),
                bookings::cancel_reason.eq(&record.cancel_reason),
                bookings::canceled_at.eq(&record.created_at),
                bookings::canceled_by.eq(record.canceled_by),
            ))
            .execute(conn)?;
            if updated == 0 {
                return Err(PersistenceError::BulkOperationFailed(format!(
                    "booking {booking_id} is no longer an active booking"
                )));
            }

            decrement_booking_count(conn, *session_id)?;

            diesel::insert_into(cancellations::table)
                .values(record)
                .execute(conn)?;
        }

        Ok(items.len())
    })
}

/// Decrement a session's booking count, never below zero.
fn decrement_booking_count(
    conn: &mut SqliteConnection,
    session_id: i64,
) -> Result<(), PersistenceError> {
    diesel::update(
        sessions::table
            .filter(sessions::session_id.eq(session_id))
            .filter(sessions::booking_count.gt(0)),
    )
    .set(sessions::booking_count.eq(sessions::booking_count - 1))
    .execute(conn)?;
    Ok(())
}
