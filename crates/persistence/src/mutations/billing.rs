// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Billing period and line item mutation operations.
//!
//! Generation and export are idempotency-sensitive: generation is
//! delete-and-regenerate within one transaction, and export marks
//! included items billed exactly once while re-renders stay harmless.

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{NewBillingLineItem, NewBillingPeriod};
use crate::diesel_schema::{billing_line_items, billing_periods, purchase_orders};
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::SqliteConnection;

/// Insert a billing period. Returns the new id.
pub fn insert_billing_period(
    conn: &mut SqliteConnection,
    period: &NewBillingPeriod,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(billing_periods::table)
        .values(period)
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Update a period's status.
pub fn update_period_status(
    conn: &mut SqliteConnection,
    billing_period_id: i64,
    status: &str,
) -> Result<(), PersistenceError> {
    let updated = diesel::update(
        billing_periods::table
            .filter(billing_periods::billing_period_id.eq(billing_period_id)),
    )
    .set(billing_periods::status.eq(status))
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Billing period {billing_period_id} does not exist"
        )));
    }
    Ok(())
}

/// Replace a draft period's line items and mark it generated.
///
/// Deleting and re-inserting inside one transaction keeps repeated
/// generation calls idempotent.
pub fn regenerate_line_items(
    conn: &mut SqliteConnection,
    billing_period_id: i64,
    items: &[NewBillingLineItem],
    generated_at: &str,
) -> Result<usize, PersistenceError> {
    conn.transaction::<usize, PersistenceError, _>(|conn| {
        diesel::delete(
            billing_line_items::table
                .filter(billing_line_items::billing_period_id.eq(billing_period_id)),
        )
        .execute(conn)?;

        diesel::insert_into(billing_line_items::table)
            .values(items)
            .execute(conn)?;

        diesel::update(
            billing_periods::table
                .filter(billing_periods::billing_period_id.eq(billing_period_id)),
        )
        .set((
            billing_periods::status.eq("generated"),
            billing_periods::generated_at.eq(generated_at),
        ))
        .execute(conn)?;

        Ok(items.len())
    })
}

/// Set a line item's review status.
pub fn update_line_item_status(
    conn: &mut SqliteConnection,
    line_item_id: i64,
    status: &str,
) -> Result<(), PersistenceError> {
    let updated = diesel::update(
        billing_line_items::table.filter(billing_line_items::line_item_id.eq(line_item_id)),
    )
    .set(billing_line_items::status.eq(status))
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Billing line item {line_item_id} does not exist"
        )));
    }
    Ok(())
}

/// Export side effects, applied atomically with the XML render:
/// included items become billed, their purchase orders' billing fields
/// advance, and the period moves to `submitted`.
///
/// Returns the number of newly billed line items.
pub fn mark_exported(
    conn: &mut SqliteConnection,
    billing_period_id: i64,
    exported_at: &str,
) -> Result<usize, PersistenceError> {
    conn.transaction::<usize, PersistenceError, _>(|conn| {
        let included: Vec<(i64, i64, i64)> = billing_line_items::table
            .filter(billing_line_items::billing_period_id.eq(billing_period_id))
            .filter(billing_line_items::status.eq("included"))
            .select((
                billing_line_items::line_item_id,
                billing_line_items::po_id,
                billing_line_items::gross_amount_cents,
            ))
            .load::<(i64, i64, i64)>(conn)?;

        for (line_item_id, po_id, gross_amount_cents) in &included {
            diesel::update(
                billing_line_items::table
                    .filter(billing_line_items::line_item_id.eq(line_item_id)),
            )
            .set(billing_line_items::status.eq("billed"))
            .execute(conn)?;

            diesel::update(purchase_orders::table.filter(purchase_orders::po_id.eq(po_id)))
                .set((
                    purchase_orders::billed_amount_cents
                        .eq(purchase_orders::billed_amount_cents + *gross_amount_cents),
                    purchase_orders::billed_at.eq(exported_at),
                    purchase_orders::updated_at.eq(exported_at),
                ))
                .execute(conn)?;

            diesel::update(
                purchase_orders::table
                    .filter(purchase_orders::po_id.eq(po_id))
                    .filter(purchase_orders::billing_status.eq("unbilled")),
            )
            .set(purchase_orders::billing_status.eq("billed"))
            .execute(conn)?;
        }

        diesel::update(
            billing_periods::table
                .filter(billing_periods::billing_period_id.eq(billing_period_id)),
        )
        .set((
            billing_periods::status.eq("submitted"),
            billing_periods::exported_at.eq(exported_at),
        ))
        .execute(conn)?;

        Ok(included.len())
    })
}
