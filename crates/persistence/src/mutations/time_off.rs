// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Time-off request mutation operations.

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::NewTimeOffRequest;
use crate::diesel_schema::time_off_requests;
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::SqliteConnection;

/// Insert a time-off request. Returns the new id.
pub fn insert_time_off_request(
    conn: &mut SqliteConnection,
    request: &NewTimeOffRequest,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(time_off_requests::table)
        .values(request)
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Record the admin's review decision.
pub fn review_time_off_request(
    conn: &mut SqliteConnection,
    time_off_id: i64,
    status: &str,
    admin_notes: Option<&str>,
    reviewed_by: i64,
    reviewed_at: &str,
) -> Result<(), PersistenceError> {
    let updated = diesel::update(
        time_off_requests::table.filter(time_off_requests::time_off_id.eq(time_off_id)),
    )
    .set((
        time_off_requests::status.eq(status),
        time_off_requests::admin_notes.eq(admin_notes),
        time_off_requests::reviewed_by.eq(reviewed_by),
        time_off_requests::reviewed_at.eq(reviewed_at),
    ))
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Time-off request {time_off_id} does not exist"
        )));
    }
    Ok(())
}
