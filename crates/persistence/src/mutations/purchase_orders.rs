// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Purchase order mutation operations.

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::NewPurchaseOrder;
use crate::diesel_schema::purchase_orders;
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::SqliteConnection;

/// Insert a purchase order. Returns the new id.
pub fn insert_purchase_order(
    conn: &mut SqliteConnection,
    order: &NewPurchaseOrder,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(purchase_orders::table)
        .values(order)
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Apply an approval/decline/completion outcome to a purchase order.
///
/// `notes` replaces the stored notes only when `Some`; the
/// authorization number is written only when `Some`.
pub fn update_po_status(
    conn: &mut SqliteConnection,
    po_id: i64,
    status: &str,
    authorization_number: Option<&str>,
    notes: Option<&str>,
    updated_at: &str,
) -> Result<(), PersistenceError> {
    conn.transaction::<(), PersistenceError, _>(|conn| {
        let updated =
            diesel::update(purchase_orders::table.filter(purchase_orders::po_id.eq(po_id)))
                .set((
                    purchase_orders::status.eq(status),
                    purchase_orders::updated_at.eq(updated_at),
                ))
                .execute(conn)?;
        if updated == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Purchase order {po_id} does not exist"
            )));
        }

        if let Some(auth) = authorization_number {
            diesel::update(purchase_orders::table.filter(purchase_orders::po_id.eq(po_id)))
                .set(purchase_orders::authorization_number.eq(auth))
                .execute(conn)?;
        }
        if let Some(notes) = notes {
            diesel::update(purchase_orders::table.filter(purchase_orders::po_id.eq(po_id)))
                .set(purchase_orders::notes.eq(notes))
                .execute(conn)?;
        }

        Ok(())
    })
}

/// Billing fields updated through the billing modal.
#[derive(Debug, Clone)]
pub struct BillingUpdate {
    pub billing_status: String,
    pub billed_amount_cents: i64,
    pub paid_amount_cents: i64,
    pub invoice_number: Option<String>,
    pub payment_reference: Option<String>,
    pub billing_notes: Option<String>,
    pub due_date: Option<String>,
    pub billed_at: Option<String>,
    pub paid_at: Option<String>,
}

/// Update a purchase order's billing fields.
pub fn update_po_billing(
    conn: &mut SqliteConnection,
    po_id: i64,
    update: &BillingUpdate,
    updated_at: &str,
) -> Result<(), PersistenceError> {
    let updated = diesel::update(purchase_orders::table.filter(purchase_orders::po_id.eq(po_id)))
        .set((
            purchase_orders::billing_status.eq(&update.billing_status),
            purchase_orders::billed_amount_cents.eq(update.billed_amount_cents),
            purchase_orders::paid_amount_cents.eq(update.paid_amount_cents),
            purchase_orders::invoice_number.eq(&update.invoice_number),
            purchase_orders::payment_reference.eq(&update.payment_reference),
            purchase_orders::billing_notes.eq(&update.billing_notes),
            purchase_orders::due_date.eq(&update.due_date),
            purchase_orders::billed_at.eq(&update.billed_at),
            purchase_orders::paid_at.eq(&update.paid_at),
            purchase_orders::updated_at.eq(updated_at),
        ))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Purchase order {po_id} does not exist"
        )));
    }
    Ok(())
}

/// Record session usage against a purchase order.
pub fn update_po_usage(
    conn: &mut SqliteConnection,
    po_id: i64,
    sessions_booked: i32,
    sessions_used: i32,
    updated_at: &str,
) -> Result<(), PersistenceError> {
    let updated = diesel::update(purchase_orders::table.filter(purchase_orders::po_id.eq(po_id)))
        .set((
            purchase_orders::sessions_booked.eq(sessions_booked),
            purchase_orders::sessions_used.eq(sessions_used),
            purchase_orders::updated_at.eq(updated_at),
        ))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Purchase order {po_id} does not exist"
        )));
    }
    Ok(())
}
