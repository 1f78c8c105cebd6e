// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Billing period and line item query operations.

use crate::data_models::{BillingLineItemRow, BillingPeriodRow};
use crate::diesel_schema::{billing_line_items, billing_periods};
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::SqliteConnection;

/// Fetch a billing period by id.
pub fn get_billing_period(
    conn: &mut SqliteConnection,
    billing_period_id: i64,
) -> Result<BillingPeriodRow, PersistenceError> {
    billing_periods::table
        .filter(billing_periods::billing_period_id.eq(billing_period_id))
        .first::<BillingPeriodRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_billing_period: {e}")))?
        .ok_or_else(|| {
            PersistenceError::NotFound(format!(
                "Billing period {billing_period_id} does not exist"
            ))
        })
}

/// Fetch a billing period by month/year/funding source.
pub fn find_billing_period(
    conn: &mut SqliteConnection,
    month: i32,
    year: i32,
    funding_source_id: i64,
) -> Result<Option<BillingPeriodRow>, PersistenceError> {
    billing_periods::table
        .filter(billing_periods::month.eq(month))
        .filter(billing_periods::year.eq(year))
        .filter(billing_periods::funding_source_id.eq(funding_source_id))
        .first::<BillingPeriodRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("find_billing_period: {e}")))
}

/// Fetch all billing periods, newest first.
pub fn list_billing_periods(
    conn: &mut SqliteConnection,
) -> Result<Vec<BillingPeriodRow>, PersistenceError> {
    billing_periods::table
        .order((billing_periods::year.desc(), billing_periods::month.desc()))
        .load::<BillingPeriodRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_billing_periods: {e}")))
}

/// Fetch a period's line items ordered by swimmer name.
pub fn list_line_items(
    conn: &mut SqliteConnection,
    billing_period_id: i64,
) -> Result<Vec<BillingLineItemRow>, PersistenceError> {
    billing_line_items::table
        .filter(billing_line_items::billing_period_id.eq(billing_period_id))
        .order(billing_line_items::swimmer_name.asc())
        .load::<BillingLineItemRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_line_items: {e}")))
}

/// Fetch a line item by id.
pub fn get_line_item(
    conn: &mut SqliteConnection,
    line_item_id: i64,
) -> Result<BillingLineItemRow, PersistenceError> {
    billing_line_items::table
        .filter(billing_line_items::line_item_id.eq(line_item_id))
        .first::<BillingLineItemRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_line_item: {e}")))?
        .ok_or_else(|| {
            PersistenceError::NotFound(format!("Billing line item {line_item_id} does not exist"))
        })
}

/// Sum of units already billed against a purchase order across all
/// billing periods.
pub fn billed_units_for_order(
    conn: &mut SqliteConnection,
    po_id: i64,
) -> Result<i64, PersistenceError> {
    use diesel::dsl::sum;

    billing_line_items::table
        .filter(billing_line_items::po_id.eq(po_id))
        .filter(billing_line_items::status.eq("billed"))
        .select(sum(billing_line_items::units_billed))
        .first::<Option<i64>>(conn)
        .map(|total| total.unwrap_or(0))
        .map_err(|e| PersistenceError::QueryFailed(format!("billed_units_for_order: {e}")))
}
