// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Purchase order query operations.

use crate::data_models::PurchaseOrderRow;
use crate::diesel_schema::purchase_orders;
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::SqliteConnection;

/// Fetch a purchase order by id.
pub fn get_purchase_order(
    conn: &mut SqliteConnection,
    po_id: i64,
) -> Result<PurchaseOrderRow, PersistenceError> {
    purchase_orders::table
        .filter(purchase_orders::po_id.eq(po_id))
        .first::<PurchaseOrderRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_purchase_order: {e}")))?
        .ok_or_else(|| {
            PersistenceError::NotFound(format!("Purchase order {po_id} does not exist"))
        })
}

/// Fetch all purchase orders, newest created first.
pub fn list_purchase_orders(
    conn: &mut SqliteConnection,
) -> Result<Vec<PurchaseOrderRow>, PersistenceError> {
    purchase_orders::table
        .order(purchase_orders::created_at.desc())
        .load::<PurchaseOrderRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_purchase_orders: {e}")))
}

/// Fetch the billable lessons purchase orders of a funding source.
///
/// Billable means `active` or `completed` lessons authorizations.
pub fn list_billable_lesson_orders(
    conn: &mut SqliteConnection,
    funding_source_id: i64,
) -> Result<Vec<PurchaseOrderRow>, PersistenceError> {
    purchase_orders::table
        .filter(purchase_orders::funding_source_id.eq(funding_source_id))
        .filter(purchase_orders::po_type.eq("lessons"))
        .filter(
            purchase_orders::status
                .eq("active")
                .or(purchase_orders::status.eq("completed")),
        )
        .order(purchase_orders::po_id.asc())
        .load::<PurchaseOrderRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_billable_lesson_orders: {e}")))
}
