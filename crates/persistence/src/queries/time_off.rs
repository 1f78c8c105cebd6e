// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Time-off request query operations.

use crate::data_models::TimeOffRequestRow;
use crate::diesel_schema::time_off_requests;
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::SqliteConnection;

/// Fetch a time-off request by id.
pub fn get_time_off_request(
    conn: &mut SqliteConnection,
    time_off_id: i64,
) -> Result<TimeOffRequestRow, PersistenceError> {
    time_off_requests::table
        .filter(time_off_requests::time_off_id.eq(time_off_id))
        .first::<TimeOffRequestRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_time_off_request: {e}")))?
        .ok_or_else(|| {
            PersistenceError::NotFound(format!("Time-off request {time_off_id} does not exist"))
        })
}

/// Fetch all time-off requests, newest first.
pub fn list_time_off_requests(
    conn: &mut SqliteConnection,
) -> Result<Vec<TimeOffRequestRow>, PersistenceError> {
    time_off_requests::table
        .order(time_off_requests::created_at.desc())
        .load::<TimeOffRequestRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_time_off_requests: {e}")))
}

/// Fetch an instructor's approved requests overlapping a window,
/// excluding one request id.
pub fn list_overlapping_approved_requests(
    conn: &mut SqliteConnection,
    instructor_id: i64,
    window_start: &str,
    window_end: &str,
    exclude_id: i64,
) -> Result<Vec<TimeOffRequestRow>, PersistenceError> {
    time_off_requests::table
        .filter(time_off_requests::instructor_id.eq(instructor_id))
        .filter(time_off_requests::status.eq("approved"))
        .filter(time_off_requests::time_off_id.ne(exclude_id))
        .filter(time_off_requests::start_at.le(window_end))
        .filter(time_off_requests::end_at.ge(window_start))
        .load::<TimeOffRequestRow>(conn)
        .map_err(|e| {
            PersistenceError::QueryFailed(format!("list_overlapping_approved_requests: {e}"))
        })
}
