// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Funding source query operations.

use crate::data_models::FundingSourceRow;
use crate::diesel_schema::funding_sources;
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::SqliteConnection;

/// Fetch a funding source by id.
pub fn get_funding_source(
    conn: &mut SqliteConnection,
    funding_source_id: i64,
) -> Result<FundingSourceRow, PersistenceError> {
    funding_sources::table
        .filter(funding_sources::funding_source_id.eq(funding_source_id))
        .first::<FundingSourceRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_funding_source: {e}")))?
        .ok_or_else(|| {
            PersistenceError::NotFound(format!("Funding source {funding_source_id} does not exist"))
        })
}

/// Fetch funding sources by id set.
pub fn get_funding_sources_by_ids(
    conn: &mut SqliteConnection,
    ids: &[i64],
) -> Result<Vec<FundingSourceRow>, PersistenceError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    funding_sources::table
        .filter(funding_sources::funding_source_id.eq_any(ids))
        .load::<FundingSourceRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("get_funding_sources_by_ids: {e}")))
}

/// Fetch all funding sources, ordered by name.
pub fn list_funding_sources(
    conn: &mut SqliteConnection,
) -> Result<Vec<FundingSourceRow>, PersistenceError> {
    funding_sources::table
        .order(funding_sources::name.asc())
        .load::<FundingSourceRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_funding_sources: {e}")))
}
