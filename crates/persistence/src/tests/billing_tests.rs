// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Billing period generation and export side effects.

use crate::tests::helpers::{
    create_funding_source, create_profile, create_purchase_order, create_swimmer, test_db,
};
use crate::{NewBillingLineItem, NewBillingPeriod, Persistence};

fn seed_period(db: &mut Persistence) -> (i64, i64) {
    let parent = create_profile(db, "p@home.test", "Sam Ortiz", &[]);
    let source = create_funding_source(db, "Valley Regional Center", "VMRC");
    let swimmer = create_swimmer(db, parent, Some(source));
    let po = create_purchase_order(db, swimmer, source, "active", 4);

    let period = db
        .create_billing_period(&NewBillingPeriod {
            month: 3,
            year: 2026,
            funding_source_id: source,
            status: String::from("draft"),
        })
        .unwrap();

    let items = vec![NewBillingLineItem {
        billing_period_id: period,
        po_id: po,
        swimmer_id: swimmer,
        swimmer_name: String::from("Mia Lopez"),
        authorization_number: Some(String::from("AUTH-123")),
        units_billed: 4,
        rate_cents: 9500,
        gross_amount_cents: 38000,
        status: String::from("pending"),
    }];
    db.regenerate_line_items(period, &items, "2026-04-01T00:00:00Z")
        .unwrap();

    (period, po)
}

#[test]
fn test_duplicate_period_rejected() {
    let mut db = test_db();
    let source = create_funding_source(&mut db, "Valley Regional Center", "VMRC");

    let period = NewBillingPeriod {
        month: 3,
        year: 2026,
        funding_source_id: source,
        status: String::from("draft"),
    };
    db.create_billing_period(&period).unwrap();
    assert!(db.create_billing_period(&period).is_err());
}

#[test]
fn test_regenerate_is_idempotent() {
    let mut db = test_db();
    let (period, po) = seed_period(&mut db);

    // Regenerating replaces rather than appends.
    let items = vec![NewBillingLineItem {
        billing_period_id: period,
        po_id: po,
        swimmer_id: db.list_line_items(period).unwrap()[0].swimmer_id,
        swimmer_name: String::from("Mia Lopez"),
        authorization_number: Some(String::from("AUTH-123")),
        units_billed: 5,
        rate_cents: 9500,
        gross_amount_cents: 47500,
        status: String::from("pending"),
    }];
    db.regenerate_line_items(period, &items, "2026-04-02T00:00:00Z")
        .unwrap();

    let stored = db.list_line_items(period).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].units_billed, 5);

    let row = db.get_billing_period(period).unwrap();
    assert_eq!(row.status, "generated");
    assert_eq!(row.generated_at.as_deref(), Some("2026-04-02T00:00:00Z"));
}

#[test]
fn test_export_marks_included_billed_and_advances_po() {
    let mut db = test_db();
    let (period, po) = seed_period(&mut db);

    let item = db.list_line_items(period).unwrap()[0].clone();
    db.update_line_item_status(item.line_item_id, "included")
        .unwrap();

    let billed = db.mark_exported(period, "2026-04-05T00:00:00Z").unwrap();
    assert_eq!(billed, 1);

    let stored = db.list_line_items(period).unwrap();
    assert_eq!(stored[0].status, "billed");

    let period_row = db.get_billing_period(period).unwrap();
    assert_eq!(period_row.status, "submitted");
    assert_eq!(period_row.exported_at.as_deref(), Some("2026-04-05T00:00:00Z"));

    let po_row = db.get_purchase_order(po).unwrap();
    assert_eq!(po_row.billing_status, "billed");
    assert_eq!(po_row.billed_amount_cents, 38000);
    assert_eq!(po_row.billed_at.as_deref(), Some("2026-04-05T00:00:00Z"));

    assert_eq!(db.billed_units_for_order(po).unwrap(), 4);
}

#[test]
fn test_re_export_does_not_double_bill() {
    let mut db = test_db();
    let (period, po) = seed_period(&mut db);

    let item = db.list_line_items(period).unwrap()[0].clone();
    db.update_line_item_status(item.line_item_id, "included")
        .unwrap();
    db.mark_exported(period, "2026-04-05T00:00:00Z").unwrap();

    // A second export finds no included items left to bill.
    let billed = db.mark_exported(period, "2026-04-06T00:00:00Z").unwrap();
    assert_eq!(billed, 0);
    assert_eq!(db.get_purchase_order(po).unwrap().billed_amount_cents, 38000);
}

#[test]
fn test_pending_items_are_not_billed_by_export() {
    let mut db = test_db();
    let (period, po) = seed_period(&mut db);

    let billed = db.mark_exported(period, "2026-04-05T00:00:00Z").unwrap();
    assert_eq!(billed, 0);

    let stored = db.list_line_items(period).unwrap();
    assert_eq!(stored[0].status, "pending");
    assert_eq!(db.get_purchase_order(po).unwrap().billing_status, "unbilled");
}
