// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session query operations.

use crate::data_models::SessionRow;
use crate::diesel_schema::sessions;
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::SqliteConnection;

/// Fetch a session by id.
pub fn get_session(
    conn: &mut SqliteConnection,
    session_id: i64,
) -> Result<SessionRow, PersistenceError> {
    sessions::table
        .filter(sessions::session_id.eq(session_id))
        .first::<SessionRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_session: {e}")))?
        .ok_or_else(|| PersistenceError::NotFound(format!("Session {session_id} does not exist")))
}

/// Fetch all draft sessions, newest created first.
pub fn list_draft_sessions(
    conn: &mut SqliteConnection,
) -> Result<Vec<SessionRow>, PersistenceError> {
    sessions::table
        .filter(sessions::status.eq("draft"))
        .order(sessions::created_at.desc())
        .load::<SessionRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_draft_sessions: {e}")))
}

/// Fetch the statuses of a set of sessions as `(session_id, status)`.
pub fn get_session_statuses(
    conn: &mut SqliteConnection,
    session_ids: &[i64],
) -> Result<Vec<(i64, String)>, PersistenceError> {
    if session_ids.is_empty() {
        return Ok(Vec::new());
    }
    sessions::table
        .filter(sessions::session_id.eq_any(session_ids))
        .select((sessions::session_id, sessions::status))
        .load::<(i64, String)>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("get_session_statuses: {e}")))
}

/// Fetch an instructor's sessions whose start time falls within a
/// window, ordered by start time. All statuses are returned; callers
/// derive per-session actionability.
pub fn list_instructor_sessions_in_window(
    conn: &mut SqliteConnection,
    instructor_id: i64,
    window_start: &str,
    window_end: &str,
) -> Result<Vec<SessionRow>, PersistenceError> {
    sessions::table
        .filter(sessions::instructor_id.eq(instructor_id))
        .filter(sessions::start_time.ge(window_start))
        .filter(sessions::start_time.le(window_end))
        .order(sessions::start_time.asc())
        .load::<SessionRow>(conn)
        .map_err(|e| {
            PersistenceError::QueryFailed(format!("list_instructor_sessions_in_window: {e}"))
        })
}

/// Fetch all non-cancelled sessions whose start time falls within a
/// range, for generation conflict detection.
pub fn list_active_sessions_in_range(
    conn: &mut SqliteConnection,
    range_start: &str,
    range_end: &str,
) -> Result<Vec<SessionRow>, PersistenceError> {
    sessions::table
        .filter(sessions::status.ne("cancelled"))
        .filter(sessions::start_time.ge(range_start))
        .filter(sessions::start_time.le(range_end))
        .load::<SessionRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_active_sessions_in_range: {e}")))
}

/// Fetch the sessions of a batch, ordered by start time.
pub fn list_sessions_in_batch(
    conn: &mut SqliteConnection,
    batch_id: &str,
) -> Result<Vec<SessionRow>, PersistenceError> {
    sessions::table
        .filter(sessions::batch_id.eq(batch_id))
        .order(sessions::start_time.asc())
        .load::<SessionRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_sessions_in_batch: {e}")))
}
