// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Time entry (timecard) mutation operations.

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::NewTimeEntry;
use crate::diesel_schema::time_entries;
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::SqliteConnection;

/// Insert a time entry. Returns the new id.
pub fn insert_time_entry(
    conn: &mut SqliteConnection,
    entry: &NewTimeEntry,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(time_entries::table)
        .values(entry)
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Patch one entry's status and notes.
pub fn update_time_entry(
    conn: &mut SqliteConnection,
    time_entry_id: i64,
    status: &str,
    notes: Option<&str>,
    approved_by: Option<i64>,
    approved_at: Option<&str>,
) -> Result<(), PersistenceError> {
    let updated = diesel::update(
        time_entries::table.filter(time_entries::time_entry_id.eq(time_entry_id)),
    )
    .set((
        time_entries::status.eq(status),
        time_entries::notes.eq(notes),
        time_entries::approved_by.eq(approved_by),
        time_entries::approved_at.eq(approved_at),
    ))
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Time entry {time_entry_id} does not exist"
        )));
    }
    Ok(())
}

/// Approve every pending entry for an instructor within a date range,
/// in one transaction. Returns the approved count.
pub fn bulk_approve_time_entries(
    conn: &mut SqliteConnection,
    instructor_id: i64,
    from_date: &str,
    to_date: &str,
    approved_by: i64,
    approved_at: &str,
) -> Result<usize, PersistenceError> {
    conn.transaction::<usize, PersistenceError, _>(|conn| {
        diesel::update(
            time_entries::table
                .filter(time_entries::instructor_id.eq(instructor_id))
                .filter(time_entries::work_date.ge(from_date))
                .filter(time_entries::work_date.le(to_date))
                .filter(time_entries::status.eq("pending")),
        )
        .set((
            time_entries::status.eq("approved"),
            time_entries::approved_by.eq(approved_by),
            time_entries::approved_at.eq(approved_at),
        ))
        .execute(conn)
        .map_err(Into::into)
    })
}
