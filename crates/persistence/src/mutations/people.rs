// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Profile, role, and swimmer mutation operations.

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{NewProfile, NewSwimmer, NewUserRole};
use crate::diesel_schema::{profiles, swimmers, user_roles};
use crate::error::PersistenceError;
use crate::queries::people::count_swimmers_for_profile;
use diesel::prelude::*;
use diesel::SqliteConnection;

/// Insert a profile with its role rows in one transaction.
///
/// Returns the new profile id.
pub fn insert_profile_with_roles(
    conn: &mut SqliteConnection,
    profile: &NewProfile,
    roles: &[String],
) -> Result<i64, PersistenceError> {
    conn.transaction::<i64, PersistenceError, _>(|conn| {
        diesel::insert_into(profiles::table)
            .values(profile)
            .execute(conn)?;
        let user_id = get_last_insert_rowid(conn)?;

        for role in roles {
            diesel::insert_into(user_roles::table)
                .values(&NewUserRole {
                    user_id,
                    role: role.clone(),
                })
                .execute(conn)?;
        }

        Ok(user_id)
    })
}

/// Add a role to a profile (no-op if already present).
pub fn add_role(
    conn: &mut SqliteConnection,
    user_id: i64,
    role: &str,
) -> Result<(), PersistenceError> {
    diesel::insert_or_ignore_into(user_roles::table)
        .values(&NewUserRole {
            user_id,
            role: role.to_string(),
        })
        .execute(conn)?;
    Ok(())
}

/// Delete a profile, blocked while swimmers link to it.
pub fn delete_profile(conn: &mut SqliteConnection, user_id: i64) -> Result<(), PersistenceError> {
    conn.transaction::<(), PersistenceError, _>(|conn| {
        let swimmer_count = count_swimmers_for_profile(conn, user_id)?;
        if swimmer_count > 0 {
            return Err(PersistenceError::ProfileHasSwimmers {
                user_id,
                swimmer_count,
            });
        }

        diesel::delete(user_roles::table.filter(user_roles::user_id.eq(user_id)))
            .execute(conn)?;
        let deleted = diesel::delete(profiles::table.filter(profiles::user_id.eq(user_id)))
            .execute(conn)?;
        if deleted == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Profile {user_id} does not exist"
            )));
        }
        Ok(())
    })
}

/// Insert a swimmer. Returns the new swimmer id.
pub fn insert_swimmer(
    conn: &mut SqliteConnection,
    swimmer: &NewSwimmer,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(swimmers::table)
        .values(swimmer)
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Update a swimmer's enrollment status.
pub fn update_enrollment_status(
    conn: &mut SqliteConnection,
    swimmer_id: i64,
    status: &str,
) -> Result<(), PersistenceError> {
    diesel::update(swimmers::table.filter(swimmers::swimmer_id.eq(swimmer_id)))
        .set(swimmers::enrollment_status.eq(status))
        .execute(conn)?;
    Ok(())
}

/// Reassign a swimmer's funding source and payment type together.
pub fn update_swimmer_funding(
    conn: &mut SqliteConnection,
    swimmer_id: i64,
    funding_source_id: Option<i64>,
    payment_type: &str,
) -> Result<(), PersistenceError> {
    diesel::update(swimmers::table.filter(swimmers::swimmer_id.eq(swimmer_id)))
        .set((
            swimmers::funding_source_id.eq(funding_source_id),
            swimmers::payment_type.eq(payment_type),
        ))
        .execute(conn)?;
    Ok(())
}

/// Record waiver completion.
pub fn record_waiver_signed(
    conn: &mut SqliteConnection,
    swimmer_id: i64,
    signed_at: &str,
) -> Result<(), PersistenceError> {
    diesel::update(swimmers::table.filter(swimmers::swimmer_id.eq(swimmer_id)))
        .set((
            swimmers::waiver_signed.eq(1),
            swimmers::waiver_signed_at.eq(signed_at),
        ))
        .execute(conn)?;
    Ok(())
}

/// Reassign a swimmer's coordinator to an existing profile.
pub fn update_swimmer_coordinator(
    conn: &mut SqliteConnection,
    swimmer_id: i64,
    coordinator_id: i64,
) -> Result<(), PersistenceError> {
    diesel::update(swimmers::table.filter(swimmers::swimmer_id.eq(swimmer_id)))
        .set(swimmers::coordinator_id.eq(coordinator_id))
        .execute(conn)?;
    Ok(())
}

/// Transfer a swimmer to a brand-new coordinator: the coordinator
/// profile, its role row, and the swimmer update happen in one
/// transaction.
///
/// Returns the new coordinator's profile id.
pub fn transfer_to_new_coordinator(
    conn: &mut SqliteConnection,
    swimmer_id: i64,
    coordinator_profile: &NewProfile,
) -> Result<i64, PersistenceError> {
    conn.transaction::<i64, PersistenceError, _>(|conn| {
        diesel::insert_into(profiles::table)
            .values(coordinator_profile)
            .execute(conn)?;
        let coordinator_id = get_last_insert_rowid(conn)?;

        diesel::insert_into(user_roles::table)
            .values(&NewUserRole {
                user_id: coordinator_id,
                role: String::from("coordinator"),
            })
            .execute(conn)?;

        let updated = diesel::update(swimmers::table.filter(swimmers::swimmer_id.eq(swimmer_id)))
            .set(swimmers::coordinator_id.eq(coordinator_id))
            .execute(conn)?;
        if updated == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Swimmer {swimmer_id} does not exist"
            )));
        }

        Ok(coordinator_id)
    })
}
