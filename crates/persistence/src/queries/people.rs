// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Profile, role, and swimmer query operations.

use crate::data_models::{ProfileRow, SwimmerRow};
use crate::diesel_schema::{profiles, swimmers, user_roles};
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::SqliteConnection;

/// Fetch a profile by id.
pub fn get_profile(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<ProfileRow, PersistenceError> {
    profiles::table
        .filter(profiles::user_id.eq(user_id))
        .first::<ProfileRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_profile: {e}")))?
        .ok_or_else(|| PersistenceError::NotFound(format!("Profile {user_id} does not exist")))
}

/// Fetch a profile by email.
pub fn get_profile_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<ProfileRow>, PersistenceError> {
    profiles::table
        .filter(profiles::email.eq(email))
        .first::<ProfileRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_profile_by_email: {e}")))
}

/// Fetch profiles by id set.
pub fn get_profiles_by_ids(
    conn: &mut SqliteConnection,
    user_ids: &[i64],
) -> Result<Vec<ProfileRow>, PersistenceError> {
    if user_ids.is_empty() {
        return Ok(Vec::new());
    }
    profiles::table
        .filter(profiles::user_id.eq_any(user_ids))
        .load::<ProfileRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("get_profiles_by_ids: {e}")))
}

/// Fetch the role strings assigned to a profile.
///
/// An empty result means the profile holds the default `parent` role.
pub fn get_roles_for_user(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Vec<String>, PersistenceError> {
    user_roles::table
        .filter(user_roles::user_id.eq(user_id))
        .select(user_roles::role)
        .load::<String>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("get_roles_for_user: {e}")))
}

/// Fetch all profiles holding a role, ordered by name.
pub fn list_profiles_by_role(
    conn: &mut SqliteConnection,
    role: &str,
) -> Result<Vec<ProfileRow>, PersistenceError> {
    profiles::table
        .inner_join(user_roles::table)
        .filter(user_roles::role.eq(role))
        .select((
            profiles::user_id,
            profiles::email,
            profiles::full_name,
            profiles::phone,
            profiles::created_at,
        ))
        .order(profiles::full_name.asc())
        .load::<ProfileRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_profiles_by_role: {e}")))
}

/// Count swimmers linked to a profile as parent or coordinator.
pub fn count_swimmers_for_profile(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<i64, PersistenceError> {
    swimmers::table
        .filter(
            swimmers::parent_id
                .eq(user_id)
                .or(swimmers::coordinator_id.eq(user_id)),
        )
        .count()
        .get_result(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("count_swimmers_for_profile: {e}")))
}

/// Fetch a swimmer by id.
pub fn get_swimmer(
    conn: &mut SqliteConnection,
    swimmer_id: i64,
) -> Result<SwimmerRow, PersistenceError> {
    swimmers::table
        .filter(swimmers::swimmer_id.eq(swimmer_id))
        .first::<SwimmerRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_swimmer: {e}")))?
        .ok_or_else(|| PersistenceError::NotFound(format!("Swimmer {swimmer_id} does not exist")))
}

/// Fetch swimmers by id set.
pub fn get_swimmers_by_ids(
    conn: &mut SqliteConnection,
    swimmer_ids: &[i64],
) -> Result<Vec<SwimmerRow>, PersistenceError> {
    if swimmer_ids.is_empty() {
        return Ok(Vec::new());
    }
    swimmers::table
        .filter(swimmers::swimmer_id.eq_any(swimmer_ids))
        .load::<SwimmerRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("get_swimmers_by_ids: {e}")))
}

/// Fetch all swimmers ordered by name.
pub fn list_swimmers(conn: &mut SqliteConnection) -> Result<Vec<SwimmerRow>, PersistenceError> {
    swimmers::table
        .order((swimmers::last_name.asc(), swimmers::first_name.asc()))
        .load::<SwimmerRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_swimmers: {e}")))
}

/// Count swimmers referencing a funding source.
pub fn count_swimmers_for_funding_source(
    conn: &mut SqliteConnection,
    funding_source_id: i64,
) -> Result<i64, PersistenceError> {
    swimmers::table
        .filter(swimmers::funding_source_id.eq(funding_source_id))
        .count()
        .get_result(conn)
        .map_err(|e| {
            PersistenceError::QueryFailed(format!("count_swimmers_for_funding_source: {e}"))
        })
}
