// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Funding source mutation operations.

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::NewFundingSource;
use crate::diesel_schema::funding_sources;
use crate::error::PersistenceError;
use crate::queries::people::count_swimmers_for_funding_source;
use diesel::prelude::*;
use diesel::SqliteConnection;

/// Insert a funding source. Returns the new id.
pub fn insert_funding_source(
    conn: &mut SqliteConnection,
    source: &NewFundingSource,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(funding_sources::table)
        .values(source)
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Update a funding source's configuration.
pub fn update_funding_source(
    conn: &mut SqliteConnection,
    funding_source_id: i64,
    source: &NewFundingSource,
) -> Result<(), PersistenceError> {
    let updated = diesel::update(
        funding_sources::table.filter(funding_sources::funding_source_id.eq(funding_source_id)),
    )
    .set((
        funding_sources::name.eq(&source.name),
        funding_sources::short_name.eq(&source.short_name),
        funding_sources::allowed_email_domains.eq(&source.allowed_email_domains),
        funding_sources::assessment_sessions.eq(source.assessment_sessions),
        funding_sources::lessons_per_po.eq(source.lessons_per_po),
        funding_sources::authorization_months.eq(source.authorization_months),
        funding_sources::renewal_alert_threshold.eq(source.renewal_alert_threshold),
        funding_sources::lesson_rate_cents.eq(source.lesson_rate_cents),
        funding_sources::billing_contact_name.eq(&source.billing_contact_name),
        funding_sources::billing_contact_email.eq(&source.billing_contact_email),
        funding_sources::billing_contact_phone.eq(&source.billing_contact_phone),
        funding_sources::is_active.eq(source.is_active),
    ))
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Funding source {funding_source_id} does not exist"
        )));
    }
    Ok(())
}

/// Delete a funding source, blocked while swimmers reference it.
pub fn delete_funding_source(
    conn: &mut SqliteConnection,
    funding_source_id: i64,
) -> Result<(), PersistenceError> {
    conn.transaction::<(), PersistenceError, _>(|conn| {
        let swimmer_count = count_swimmers_for_funding_source(conn, funding_source_id)?;
        if swimmer_count > 0 {
            return Err(PersistenceError::FundingSourceInUse {
                funding_source_id,
                swimmer_count,
            });
        }

        let deleted = diesel::delete(
            funding_sources::table
                .filter(funding_sources::funding_source_id.eq(funding_source_id)),
        )
        .execute(conn)?;
        if deleted == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Funding source {funding_source_id} does not exist"
            )));
        }
        Ok(())
    })
}
