// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Time entry (timecard) query operations.

use crate::data_models::TimeEntryRow;
use crate::diesel_schema::time_entries;
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::SqliteConnection;

/// Fetch a time entry by id.
pub fn get_time_entry(
    conn: &mut SqliteConnection,
    time_entry_id: i64,
) -> Result<TimeEntryRow, PersistenceError> {
    time_entries::table
        .filter(time_entries::time_entry_id.eq(time_entry_id))
        .first::<TimeEntryRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_time_entry: {e}")))?
        .ok_or_else(|| {
            PersistenceError::NotFound(format!("Time entry {time_entry_id} does not exist"))
        })
}

/// Fetch time entries in a date range, optionally for one instructor,
/// ordered by work date.
pub fn list_time_entries(
    conn: &mut SqliteConnection,
    instructor_id: Option<i64>,
    from_date: &str,
    to_date: &str,
) -> Result<Vec<TimeEntryRow>, PersistenceError> {
    let mut query = time_entries::table
        .filter(time_entries::work_date.ge(from_date))
        .filter(time_entries::work_date.le(to_date))
        .order(time_entries::work_date.asc())
        .into_boxed();

    if let Some(id) = instructor_id {
        query = query.filter(time_entries::instructor_id.eq(id));
    }

    query
        .load::<TimeEntryRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_time_entries: {e}")))
}
